use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use thiserror::Error;
use uuid::Uuid;

use super::models::{Connection, DailyMetric};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0}")]
    NotFound(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Access to the `ad_accounts` table. Each call is one independent statement.
#[async_trait]
pub trait ConnectionStore: Send + Sync {
    /// All connections owned by `user_id`, newest `connected_at` first.
    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Connection>, StoreError>;

    async fn find(&self, id: Uuid) -> Result<Option<Connection>, StoreError>;

    /// Deletes by id and returns the number of rows removed.
    async fn delete(&self, id: Uuid) -> Result<u64, StoreError>;

    /// Stamps `last_sync_at` and returns the number of rows updated.
    async fn mark_synced(&self, id: Uuid, at: DateTime<Utc>) -> Result<u64, StoreError>;

    async fn health_check(&self) -> Result<(), StoreError>;
}

/// Read side of the pre-aggregated daily metrics.
#[async_trait]
pub trait MetricsSource: Send + Sync {
    /// Rows for `user_id` with `from <= day <= to`, ascending by day.
    async fn daily_metrics(&self, user_id: Uuid, from: NaiveDate, to: NaiveDate)
        -> Result<Vec<DailyMetric>, StoreError>;
}
