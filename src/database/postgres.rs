use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::time::Duration;
use tracing::info;
use uuid::Uuid;

use super::models::{Connection, DailyMetric};
use super::store::{ConnectionStore, MetricsSource, StoreError};
use crate::config::StoreConfig;

/// Postgres-backed store for connections and daily metrics.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Builds a lazily connecting pool; nothing is dialed until the first query.
    pub fn connect_lazy(config: &StoreConfig) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout))
            .connect_lazy(&config.database_url)?;

        info!("Created lazy database pool (max {} connections)", config.max_connections);
        Ok(Self { pool })
    }

    pub async fn close(&self) {
        self.pool.close().await;
        info!("Closed database pool");
    }
}

#[async_trait]
impl ConnectionStore for PgStore {
    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Connection>, StoreError> {
        let rows = sqlx::query_as::<_, Connection>(
            "SELECT id, user_id, platform, connected_at, last_sync_at
             FROM ad_accounts
             WHERE user_id = $1
             ORDER BY connected_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn find(&self, id: Uuid) -> Result<Option<Connection>, StoreError> {
        let row = sqlx::query_as::<_, Connection>(
            "SELECT id, user_id, platform, connected_at, last_sync_at
             FROM ad_accounts
             WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn delete(&self, id: Uuid) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM ad_accounts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    async fn mark_synced(&self, id: Uuid, at: DateTime<Utc>) -> Result<u64, StoreError> {
        let result = sqlx::query("UPDATE ad_accounts SET last_sync_at = $2 WHERE id = $1")
            .bind(id)
            .bind(at)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl MetricsSource for PgStore {
    async fn daily_metrics(
        &self,
        user_id: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<DailyMetric>, StoreError> {
        let rows = sqlx::query_as::<_, DailyMetric>(
            "SELECT day, platform,
                    spend::float8 AS spend,
                    revenue::float8 AS revenue,
                    leads::int8 AS leads
             FROM ad_metrics_daily
             WHERE user_id = $1 AND day >= $2 AND day <= $3
             ORDER BY day ASC, platform ASC",
        )
        .bind(user_id)
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}
