use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, Document},
    options::FindOptions,
    Client, Collection,
};

use crate::error::ApiError;
use crate::filter::ExpenseFilter;
use crate::schemas::{Expense, UserId};
use crate::store::ExpenseStore;

pub struct MongoExpenseStore {
    expenses: Collection<Expense>,
}

impl MongoExpenseStore {
    pub fn new(client: &Client, database: &str) -> Self {
        MongoExpenseStore {
            expenses: client.database(database).collection("Expenses"),
        }
    }
}

// Dates are stored as YYYY-MM-DD strings, which order the same way the
// dates do.
fn filter_document(owner: &UserId, filter: &ExpenseFilter) -> Document {
    let mut query = doc! { "owner": owner.as_str() };
    match filter {
        ExpenseFilter::All => {}
        ExpenseFilter::Category(category) => {
            query.insert("category", category.as_str());
        }
        ExpenseFilter::DateRange(range) => {
            query.insert(
                "date",
                doc! { "$gte": range.start().to_string(), "$lte": range.end().to_string() },
            );
        }
        ExpenseFilter::CategoryAndDateRange { category, range } => {
            query.insert("category", category.as_str());
            query.insert(
                "date",
                doc! { "$gte": range.start().to_string(), "$lte": range.end().to_string() },
            );
        }
    }
    query
}

#[async_trait]
impl ExpenseStore for MongoExpenseStore {
    async fn find(&self, owner: &UserId, filter: &ExpenseFilter) -> Result<Vec<Expense>, ApiError> {
        let options = FindOptions::builder()
            .sort(doc! { "date": 1, "id": 1 })
            .build();
        let cursor = self
            .expenses
            .find(filter_document(owner, filter), options)
            .await?;
        let expenses: Vec<Expense> = cursor.try_collect().await?;
        Ok(expenses)
    }

    async fn insert(&self, expense: Expense) -> Result<Expense, ApiError> {
        self.expenses.insert_one(&expense, None).await?;
        Ok(expense)
    }

    async fn delete(&self, owner: &UserId, id: &str) -> Result<bool, ApiError> {
        let result = self
            .expenses
            .delete_one(doc! { "id": id, "owner": owner.as_str() }, None)
            .await?;
        Ok(result.deleted_count == 1)
    }
}
