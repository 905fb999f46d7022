use chrono::NaiveDate;
use serde::Deserialize;

use crate::error::ApiError;
use crate::schemas::Expense;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Raw query string of the listing endpoints.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct FilterParams {
    pub category: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

/// Inclusive date interval. Only constructible with `start <= end`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, ApiError> {
        if start > end {
            return Err(ApiError::InvalidRange(
                "start_date cannot be later than end_date".to_string(),
            ));
        }
        Ok(DateRange { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// A validated predicate over one user's expenses. The owner is not part of
/// the filter, stores always scope by the requesting user first.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ExpenseFilter {
    All,
    Category(String),
    DateRange(DateRange),
    CategoryAndDateRange { category: String, range: DateRange },
}

impl ExpenseFilter {
    pub fn matches(&self, expense: &Expense) -> bool {
        match self {
            ExpenseFilter::All => true,
            ExpenseFilter::Category(category) => expense.category == *category,
            ExpenseFilter::DateRange(range) => range.contains(expense.date),
            ExpenseFilter::CategoryAndDateRange { category, range } => {
                expense.category == *category && range.contains(expense.date)
            }
        }
    }
}

pub fn parse_date(raw: &str) -> Result<NaiveDate, ApiError> {
    NaiveDate::parse_from_str(raw, DATE_FORMAT).map_err(|_| {
        ApiError::InvalidDateFormat("Invalid date format. Use YYYY-MM-DD.".to_string())
    })
}

fn parse_range(start: &str, end: &str) -> Result<DateRange, ApiError> {
    DateRange::new(parse_date(start)?, parse_date(end)?)
}

/// The category with surrounding whitespace trimmed, or `None` when blank.
fn category_of(params: &FilterParams) -> Option<&str> {
    params
        .category
        .as_deref()
        .map(str::trim)
        .filter(|category| !category.is_empty())
}

/// Resolves the combined filter. A lone start or end bound is ignored.
pub fn resolve(params: &FilterParams) -> Result<ExpenseFilter, ApiError> {
    let category = category_of(params);
    let dates = (params.start_date.as_deref(), params.end_date.as_deref());

    match (category, dates) {
        (Some(category), (Some(start), Some(end))) => Ok(ExpenseFilter::CategoryAndDateRange {
            category: category.to_string(),
            range: parse_range(start, end)?,
        }),
        (None, (Some(start), Some(end))) => Ok(ExpenseFilter::DateRange(parse_range(start, end)?)),
        (category, (start, end)) => {
            if start.is_some() || end.is_some() {
                tracing::debug!(?start, ?end, "ignoring incomplete date interval");
            }
            Ok(match category {
                Some(category) => ExpenseFilter::Category(category.to_string()),
                None => ExpenseFilter::All,
            })
        }
    }
}

pub fn resolve_category(params: &FilterParams) -> Result<ExpenseFilter, ApiError> {
    if category_of(params).is_none() {
        return Err(ApiError::MissingParameter(
            "Category parameter is required".to_string(),
        ));
    }
    resolve(&FilterParams {
        category: params.category.clone(),
        start_date: None,
        end_date: None,
    })
}

pub fn resolve_interval(params: &FilterParams) -> Result<ExpenseFilter, ApiError> {
    if params.start_date.is_none() || params.end_date.is_none() {
        return Err(ApiError::MissingParameter(
            "Both start_date and end_date are required".to_string(),
        ));
    }
    resolve(&FilterParams {
        category: None,
        start_date: params.start_date.clone(),
        end_date: params.end_date.clone(),
    })
}
