//! Dashboard metrics built from pre-aggregated daily rows.
//!
//! Every section compares a window ending today with the window of equal
//! length immediately before it.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::str::FromStr;
use uuid::Uuid;

use crate::database::{DailyMetric, MetricsSource, StoreError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TimeRange {
    #[serde(rename = "7d")]
    Last7Days,
    #[default]
    #[serde(rename = "30d")]
    Last30Days,
    #[serde(rename = "90d")]
    Last90Days,
}

impl TimeRange {
    pub fn days(&self) -> i64 {
        match self {
            TimeRange::Last7Days => 7,
            TimeRange::Last30Days => 30,
            TimeRange::Last90Days => 90,
        }
    }

    /// Inclusive bounds of the window ending on `today`.
    pub fn current(&self, today: NaiveDate) -> (NaiveDate, NaiveDate) {
        (today - Duration::days(self.days() - 1), today)
    }

    /// Inclusive bounds of the window right before [`TimeRange::current`].
    pub fn previous(&self, today: NaiveDate) -> (NaiveDate, NaiveDate) {
        let (from, _) = self.current(today);
        (from - Duration::days(self.days()), from - Duration::days(1))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TimeRange::Last7Days => "7d",
            TimeRange::Last30Days => "30d",
            TimeRange::Last90Days => "90d",
        }
    }
}

impl FromStr for TimeRange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "7d" => Ok(TimeRange::Last7Days),
            "30d" => Ok(TimeRange::Last30Days),
            "90d" => Ok(TimeRange::Last90Days),
            other => Err(format!("Invalid range: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub total_spend: f64,
    pub total_revenue: f64,
    pub total_leads: i64,
    pub roas: f64,
    pub spend_change: f64,
    pub revenue_change: f64,
    pub leads_change: f64,
    pub roas_change: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalPoint {
    pub date: NaiveDate,
    pub spend: f64,
    pub revenue: f64,
    pub leads: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatformBreakdown {
    pub name: String,
    pub spend: f64,
    pub revenue: f64,
    pub roas: f64,
    pub change: f64,
}

#[derive(Debug, Clone, Copy, Default)]
struct Totals {
    spend: f64,
    revenue: f64,
    leads: i64,
}

impl Totals {
    fn of<'a>(rows: impl IntoIterator<Item = &'a DailyMetric>) -> Self {
        rows.into_iter().fold(Totals::default(), |mut acc, row| {
            acc.add(row);
            acc
        })
    }

    fn add(&mut self, row: &DailyMetric) {
        self.spend += row.spend;
        self.revenue += row.revenue;
        self.leads += row.leads;
    }

    fn roas(&self) -> f64 {
        roas(self.revenue, self.spend)
    }
}

/// Revenue per unit of spend; 0 when nothing was spent.
pub fn roas(revenue: f64, spend: f64) -> f64 {
    if spend == 0.0 {
        0.0
    } else {
        revenue / spend
    }
}

/// Percent change from `previous` to `current`; 0 when there is no baseline.
pub fn percent_change(current: f64, previous: f64) -> f64 {
    if previous == 0.0 {
        0.0
    } else {
        (current - previous) / previous * 100.0
    }
}

pub fn summarize(current: &[DailyMetric], previous: &[DailyMetric]) -> Summary {
    let now = Totals::of(current);
    let before = Totals::of(previous);

    Summary {
        total_spend: now.spend,
        total_revenue: now.revenue,
        total_leads: now.leads,
        roas: now.roas(),
        spend_change: percent_change(now.spend, before.spend),
        revenue_change: percent_change(now.revenue, before.revenue),
        leads_change: percent_change(now.leads as f64, before.leads as f64),
        roas_change: percent_change(now.roas(), before.roas()),
    }
}

/// One point per day that has data, ascending.
pub fn historical(rows: &[DailyMetric]) -> Vec<HistoricalPoint> {
    let mut by_day: BTreeMap<NaiveDate, Totals> = BTreeMap::new();
    for row in rows {
        by_day.entry(row.day).or_default().add(row);
    }

    by_day
        .into_iter()
        .map(|(date, totals)| HistoricalPoint {
            date,
            spend: totals.spend,
            revenue: totals.revenue,
            leads: totals.leads,
        })
        .collect()
}

/// Per-platform totals, highest spend first; `change` is revenue percent change.
pub fn platforms(current: &[DailyMetric], previous: &[DailyMetric]) -> Vec<PlatformBreakdown> {
    let group = |rows: &[DailyMetric]| {
        let mut map: HashMap<String, Totals> = HashMap::new();
        for row in rows {
            map.entry(row.platform.clone()).or_default().add(row);
        }
        map
    };

    let now = group(current);
    let before = group(previous);

    let mut breakdown: Vec<PlatformBreakdown> = now
        .into_iter()
        .map(|(name, totals)| {
            let previous_revenue = before.get(&name).map(|t| t.revenue).unwrap_or(0.0);
            PlatformBreakdown {
                spend: totals.spend,
                revenue: totals.revenue,
                roas: totals.roas(),
                change: percent_change(totals.revenue, previous_revenue),
                name,
            }
        })
        .collect();

    breakdown.sort_by(|a, b| b.spend.total_cmp(&a.spend).then_with(|| a.name.cmp(&b.name)));
    breakdown
}

pub async fn load_summary(
    source: &dyn MetricsSource,
    user_id: Uuid,
    range: TimeRange,
    today: NaiveDate,
) -> Result<Summary, StoreError> {
    let (current, previous) = load_windows(source, user_id, range, today).await?;
    Ok(summarize(&current, &previous))
}

pub async fn load_historical(
    source: &dyn MetricsSource,
    user_id: Uuid,
    range: TimeRange,
    today: NaiveDate,
) -> Result<Vec<HistoricalPoint>, StoreError> {
    let (from, to) = range.current(today);
    let rows = source.daily_metrics(user_id, from, to).await?;
    Ok(historical(&rows))
}

pub async fn load_platforms(
    source: &dyn MetricsSource,
    user_id: Uuid,
    range: TimeRange,
    today: NaiveDate,
) -> Result<Vec<PlatformBreakdown>, StoreError> {
    let (current, previous) = load_windows(source, user_id, range, today).await?;
    Ok(platforms(&current, &previous))
}

/// Fetches both windows in one query and splits them at the current window's start.
async fn load_windows(
    source: &dyn MetricsSource,
    user_id: Uuid,
    range: TimeRange,
    today: NaiveDate,
) -> Result<(Vec<DailyMetric>, Vec<DailyMetric>), StoreError> {
    let (previous_from, _) = range.previous(today);
    let (current_from, to) = range.current(today);
    let rows = source.daily_metrics(user_id, previous_from, to).await?;
    Ok(rows.into_iter().partition(|row| row.day >= current_from))
}
