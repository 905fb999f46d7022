use bson::oid::ObjectId;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::filter::parse_date;

pub type UserId = String;
pub type ExpenseId = String;

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Expense {
    pub id: ExpenseId,
    pub owner: UserId,
    pub amount: Decimal,
    pub category: String,
    pub description: String,
    pub date: NaiveDate,
}

/// Body of a create request. The date stays a raw string so that a bad
/// value is reported as an `InvalidDateFormat` error rather than a generic
/// deserialization failure.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct NewExpense {
    pub amount: Decimal,
    pub category: String,
    #[serde(default)]
    pub description: String,
    pub date: String,
}

impl Expense {
    pub fn new(owner: &UserId, new_expense: NewExpense) -> Result<Self, ApiError> {
        if new_expense.amount < Decimal::ZERO {
            return Err(ApiError::InvalidExpense(
                "amount cannot be negative".to_string(),
            ));
        }
        let category = new_expense.category.trim();
        if category.is_empty() {
            return Err(ApiError::InvalidExpense(
                "category cannot be empty".to_string(),
            ));
        }
        let date = parse_date(&new_expense.date)?;
        Ok(Expense {
            id: ObjectId::new().to_hex(),
            owner: owner.clone(),
            amount: new_expense.amount,
            category: category.to_string(),
            description: new_expense.description,
            date,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn new_expense(amount: Decimal, category: &str, date: &str) -> NewExpense {
        NewExpense {
            amount,
            category: category.to_string(),
            description: "lunch".to_string(),
            date: date.to_string(),
        }
    }

    #[test]
    fn builds_expense_for_owner() {
        let owner = "alice".to_string();
        let expense = Expense::new(&owner, new_expense(dec!(12.50), " food ", "2024-03-01")).unwrap();
        assert_eq!(expense.owner, "alice");
        assert_eq!(expense.category, "food");
        assert_eq!(expense.amount, dec!(12.50));
        assert_eq!(expense.date, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        assert_eq!(expense.id.len(), 24);
    }

    #[test]
    fn accepts_zero_amount() {
        let owner = "alice".to_string();
        assert!(Expense::new(&owner, new_expense(dec!(0), "food", "2024-03-01")).is_ok());
    }

    #[test]
    fn rejects_negative_amount() {
        let owner = "alice".to_string();
        let err = Expense::new(&owner, new_expense(dec!(-1), "food", "2024-03-01")).unwrap_err();
        assert_eq!(err.kind(), "InvalidExpense");
    }

    #[test]
    fn rejects_blank_category() {
        let owner = "alice".to_string();
        let err = Expense::new(&owner, new_expense(dec!(1), "  ", "2024-03-01")).unwrap_err();
        assert_eq!(err.kind(), "InvalidExpense");
    }

    #[test]
    fn rejects_bad_date() {
        let owner = "alice".to_string();
        let err = Expense::new(&owner, new_expense(dec!(1), "food", "01/03/2024")).unwrap_err();
        assert_eq!(err, ApiError::InvalidDateFormat("Invalid date format. Use YYYY-MM-DD.".into()));
    }

    #[test]
    fn serializes_amount_and_date_as_strings() {
        let expense = Expense {
            id: "1".to_string(),
            owner: "alice".to_string(),
            amount: dec!(10.25),
            category: "food".to_string(),
            description: String::new(),
            date: NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
        };
        let json = serde_json::to_value(&expense).unwrap();
        assert_eq!(json["amount"], "10.25");
        assert_eq!(json["date"], "2024-01-05");
    }
}
