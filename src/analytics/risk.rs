//! Three-tier risk banding

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum RiskBand {
    Ok,
    Warn,
    Danger,
}

/// `days < warn` is ok, `warn <= days < danger` is warn, anything else danger
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RiskThresholds {
    pub warn: i64,
    pub danger: i64,
}

impl RiskThresholds {
    pub const LAST_VISIT: RiskThresholds = RiskThresholds { warn: 7, danger: 14 };
    pub const LAST_ORDER: RiskThresholds = RiskThresholds { warn: 14, danger: 30 };

    pub fn new(warn: i64, danger: i64) -> Self {
        Self {
            warn,
            danger: danger.max(warn),
        }
    }

    /// Band for a day count; no activity at all is danger
    pub fn band(&self, days: Option<i64>) -> RiskBand {
        match days {
            None => RiskBand::Danger,
            Some(d) if d < self.warn => RiskBand::Ok,
            Some(d) if d < self.danger => RiskBand::Warn,
            Some(_) => RiskBand::Danger,
        }
    }
}
