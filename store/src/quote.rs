use crate::Store;
use crate::database::DatabaseError;
use crate::filter::{MaxAge, filter_by_age};
use crate::models::quote::Quote;
use chrono::{Local, NaiveDateTime, SubsecRound};
use serde_json::Value;

pub const QUOTES_KEY: &str = "quotes";

#[derive(Debug)]
pub struct CreateQuoteRequest {
    pub name: String,
    pub message: String,
}

#[derive(Debug, thiserror::Error)]
pub enum QuoteError {
    #[error("database error: {0}")]
    DatabaseError(#[from] DatabaseError),
}

/// Current local wall-clock time truncated to whole seconds.
pub fn now() -> NaiveDateTime {
    Local::now().naive_local().trunc_subsecs(0)
}

impl Store {
    pub(crate) async fn init_quotes(&self) -> Result<(), DatabaseError> {
        if !self.db.contains(QUOTES_KEY).await {
            log::info!("Adding {} entry to database", QUOTES_KEY);
            self.db.set(QUOTES_KEY, &Vec::<Quote>::new()).await?;
        }
        Ok(())
    }

    pub async fn create_quote(&self, request: CreateQuoteRequest) -> Result<Quote, QuoteError> {
        let quote = self
            .db
            .push_with(QUOTES_KEY, || Quote {
                name: request.name,
                message: request.message,
                time: now(),
            })
            .await?;
        Ok(quote)
    }

    /// All stored quotes in insertion order. Records that cannot be decoded are
    /// skipped with a warning instead of failing the whole read.
    pub async fn get_quotes(&self) -> Result<Vec<Quote>, QuoteError> {
        let raw = self
            .db
            .get::<Vec<Value>>(QUOTES_KEY)
            .await?
            .unwrap_or_default();

        let quotes = raw
            .into_iter()
            .enumerate()
            .filter_map(|(index, value)| match serde_json::from_value::<Quote>(value) {
                Ok(quote) => Some(quote),
                Err(e) => {
                    log::warn!("Skipping malformed quote #{}: {}", index, e);
                    None
                }
            })
            .collect();

        Ok(quotes)
    }

    pub async fn get_quotes_by_age(
        &self,
        max_age: MaxAge,
        now: NaiveDateTime,
    ) -> Result<Vec<Quote>, QuoteError> {
        let quotes = self.get_quotes().await?;
        Ok(filter_by_age(&quotes, max_age, now).into_iter().cloned().collect())
    }
}
