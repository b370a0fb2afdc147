use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One pre-aggregated `ad_metrics_daily` row for a user, platform and day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct DailyMetric {
    pub day: NaiveDate,
    pub platform: String,
    pub spend: f64,
    pub revenue: f64,
    pub leads: i64,
}
