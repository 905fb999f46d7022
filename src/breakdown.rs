use std::collections::BTreeMap;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use crate::error::ApiError;
use crate::schemas::Expense;

/// Share of total spend per category, in percent with two decimals.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CategoryBreakdown {
    #[serde(rename = "total_expense")]
    pub total: Decimal,
    #[serde(rename = "category_percentages")]
    pub breakdown: BTreeMap<String, Decimal>,
}

pub fn compute_category_breakdown(expenses: &[Expense]) -> Result<CategoryBreakdown, ApiError> {
    if expenses.is_empty() {
        return Err(ApiError::NoExpensesFound);
    }

    let mut category_totals: BTreeMap<&str, Decimal> = BTreeMap::new();
    for expense in expenses {
        let category_total = category_totals
            .entry(expense.category.as_str())
            .or_insert(Decimal::ZERO);
        *category_total = category_total
            .checked_add(expense.amount)
            .ok_or_else(overflow)?;
    }
    let total = category_totals
        .values()
        .try_fold(Decimal::ZERO, |sum, v| sum.checked_add(*v))
        .ok_or_else(overflow)?;

    let breakdown = category_totals
        .into_iter()
        .map(|(category, category_total)| (category.to_string(), percentage(category_total, total)))
        .collect();

    Ok(CategoryBreakdown { total, breakdown })
}

fn overflow() -> ApiError {
    ApiError::Internal("total spend exceeds the decimal range".to_string())
}

// Banker's rounding, each category rounded on its own
fn percentage(part: Decimal, total: Decimal) -> Decimal {
    let mut share = match part.checked_div(total) {
        Some(ratio) => (ratio * Decimal::ONE_HUNDRED)
            .round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven),
        // Only reachable when every amount is zero
        None => Decimal::ZERO,
    };
    share.rescale(2);
    share
}
