//! "Days since" metrics used by the last-visit and last-order badges

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use super::risk::{RiskBand, RiskThresholds};

const MS_PER_DAY: i64 = 86_400_000;

/// Sort value standing in for "never happened" in staleness sorts
pub const NEVER_SORT_DAYS: i64 = 9999;

/// Whole days elapsed between `timestamp` and `now`, rounded down
pub fn days_since(now: DateTime<Utc>, timestamp: DateTime<Utc>) -> i64 {
    (now - timestamp).num_milliseconds().div_euclid(MS_PER_DAY)
}

/// Staleness sort key: `None` sorts as [`NEVER_SORT_DAYS`]
pub fn staleness_key(days: Option<i64>) -> i64 {
    days.unwrap_or(NEVER_SORT_DAYS)
}

/// Display label for a day count
pub fn days_label(days: Option<i64>) -> String {
    match days {
        None => "Never".to_string(),
        Some(1) => "1 day".to_string(),
        Some(d) => format!("{} days", d),
    }
}

/// Day count with its label and band, as rendered in a badge
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Staleness {
    pub days: Option<i64>,
    pub label: String,
    pub band: RiskBand,
}

impl Staleness {
    pub fn new(days: Option<i64>, thresholds: RiskThresholds) -> Self {
        Self {
            days,
            label: days_label(days),
            band: thresholds.band(days),
        }
    }

    pub fn since(
        now: DateTime<Utc>,
        timestamp: Option<DateTime<Utc>>,
        thresholds: RiskThresholds,
    ) -> Self {
        Self::new(timestamp.map(|ts| days_since(now, ts)), thresholds)
    }

    pub fn sort_key(&self) -> i64 {
        staleness_key(self.days)
    }
}
