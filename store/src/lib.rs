pub mod database;
pub mod filter;
pub mod models;
pub mod quote;

use database::{DatabaseError, JsonDatabase};
use std::path::Path;

pub struct Store {
    db: JsonDatabase,
}

impl Store {
    pub fn new(db: JsonDatabase) -> Self {
        Self { db }
    }

    /// Opens the database at `path` and makes sure the quotes collection exists.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, DatabaseError> {
        let store = Self::new(JsonDatabase::open(path).await?);
        store.init_quotes().await?;
        Ok(store)
    }

    pub async fn close(&self) -> Result<(), DatabaseError> {
        self.db.close().await
    }
}
