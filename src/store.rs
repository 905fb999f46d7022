use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::ApiError;
use crate::filter::ExpenseFilter;
use crate::schemas::{Expense, UserId};

/// Persistence for expenses. Every call is scoped to a single owner and
/// listings come back ordered by date, then id.
#[async_trait]
pub trait ExpenseStore: Send + Sync {
    async fn find(&self, owner: &UserId, filter: &ExpenseFilter) -> Result<Vec<Expense>, ApiError>;

    async fn insert(&self, expense: Expense) -> Result<Expense, ApiError>;

    /// Returns false when no expense with that id belongs to `owner`.
    async fn delete(&self, owner: &UserId, id: &str) -> Result<bool, ApiError>;
}

#[derive(Default)]
pub struct MemoryExpenseStore {
    expenses: RwLock<Vec<Expense>>,
}

#[async_trait]
impl ExpenseStore for MemoryExpenseStore {
    async fn find(&self, owner: &UserId, filter: &ExpenseFilter) -> Result<Vec<Expense>, ApiError> {
        let expenses = self.expenses.read().await;
        let mut found: Vec<Expense> = expenses
            .iter()
            .filter(|expense| expense.owner == *owner && filter.matches(expense))
            .cloned()
            .collect();
        found.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.id.cmp(&b.id)));
        Ok(found)
    }

    async fn insert(&self, expense: Expense) -> Result<Expense, ApiError> {
        self.expenses.write().await.push(expense.clone());
        Ok(expense)
    }

    async fn delete(&self, owner: &UserId, id: &str) -> Result<bool, ApiError> {
        let mut expenses = self.expenses.write().await;
        match expenses
            .iter()
            .position(|expense| expense.id == id && expense.owner == *owner)
        {
            Some(index) => {
                expenses.remove(index);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
