//! Pre-aggregated report rows fetched from the backend, and the views built
//! from them

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::enums::{FlagKind, StaffRole};
use crate::analytics::{days::Staleness, leaderboard::LeaderboardMetric, risk::RiskBand};

// ---------------------------------------------------------------------------
// At-risk shops
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct AtRiskShop {
    pub shop_id: String,
    pub shop_name: String,
    pub region: Option<String>,
    pub rep_name: Option<String>,
    pub days_since_last_visit: Option<i64>,
    pub days_since_last_order: Option<i64>,
    #[schema(value_type = String)]
    pub total_order_value_30d: Decimal,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AtRiskShopView {
    #[serde(flatten)]
    pub shop: AtRiskShop,
    pub last_visit: Staleness,
    pub last_order: Staleness,
}

/// Which staleness drives the at-risk ordering
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum AtRiskSort {
    #[default]
    LastVisit,
    LastOrder,
}

#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct AtRiskQuery {
    /// Keep shops where either metric is in this band
    pub band: Option<RiskBand>,
    pub sort: Option<AtRiskSort>,
}

// ---------------------------------------------------------------------------
// Coverage
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct CoverageReportItem {
    pub rep_company_user_id: String,
    pub rep_name: String,
    pub total_assigned: u32,
    pub shops_visited: u32,
    pub total_visits: u32,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CoverageRow {
    #[serde(flatten)]
    pub item: CoverageReportItem,
    pub coverage_pct: u32,
    pub shops_missed: u32,
}

/// Date window shared by the coverage and staff reports
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct DateRangeQuery {
    /// Start date (YYYY-MM-DD)
    #[serde(rename = "dateFrom")]
    pub date_from: Option<String>,
    /// End date (YYYY-MM-DD)
    #[serde(rename = "dateTo")]
    pub date_to: Option<String>,
}

/// Parsed, ordered date window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl DateRange {
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("dateFrom", self.from.format("%Y-%m-%d").to_string()),
            ("dateTo", self.to.format("%Y-%m-%d").to_string()),
        ]
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CoverageReport {
    pub date_from: NaiveDate,
    pub date_to: NaiveDate,
    pub rows: Vec<CoverageRow>,
    /// Coverage over all reps combined
    pub overall_pct: u32,
}

// ---------------------------------------------------------------------------
// Flagged reps
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct FlaggedRep {
    pub rep_company_user_id: String,
    pub rep_name: String,
    #[schema(value_type = Vec<String>)]
    pub flags: Vec<FlagKind>,
    pub week_start: Option<NaiveDate>,
    pub exception_rate: Option<f64>,
    pub far_start_count: Option<u32>,
    pub repeated_coordinate_count: Option<u32>,
}

#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct FlaggedQuery {
    /// Only reps carrying this flag
    pub kind: Option<String>,
}

// ---------------------------------------------------------------------------
// Leaderboard
// ---------------------------------------------------------------------------

/// Per-rep counters for today, this week and month to date
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct RepStat {
    pub rep_company_user_id: String,
    pub rep_name: String,

    pub visits_today: u32,
    pub orders_today: u32,
    #[schema(value_type = String)]
    pub revenue_today: Decimal,
    pub exceptions_today: u32,
    pub verified_today: u32,
    /// Percentage, possibly fractional
    pub exception_rate_today: Option<f64>,

    pub visits_week: u32,
    pub orders_week: u32,
    #[schema(value_type = String)]
    pub revenue_week: Decimal,
    pub exceptions_week: u32,
    pub verified_week: u32,
    pub exception_rate_week: Option<f64>,

    pub visits_mtd: u32,
    pub orders_mtd: u32,
    #[schema(value_type = String)]
    pub revenue_mtd: Decimal,
    pub exceptions_mtd: u32,
    pub verified_mtd: u32,
    pub exception_rate_mtd: Option<f64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Period {
    Today,
    Week,
    #[default]
    Mtd,
}

/// Counters of one rep over one period
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct PeriodStats {
    pub visits: u32,
    pub orders: u32,
    #[schema(value_type = String)]
    pub revenue: Decimal,
    pub exceptions: u32,
    pub verified: u32,
    pub exception_rate: u32,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LeaderboardEntry {
    pub rank: usize,
    pub rep_company_user_id: String,
    pub rep_name: String,
    #[serde(flatten)]
    pub stats: PeriodStats,
}

#[derive(Debug, Default, Deserialize, Validate, IntoParams, ToSchema)]
pub struct LeaderboardQuery {
    pub period: Option<Period>,
    pub metric: Option<LeaderboardMetric>,
    #[validate(range(min = 1, max = 500, message = "limit must be between 1 and 500"))]
    pub limit: Option<usize>,
}

// ---------------------------------------------------------------------------
// Staff report
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct StaffReportRow {
    pub rep_company_user_id: String,
    pub rep_name: String,
    #[schema(value_type = Option<String>)]
    pub role: Option<StaffRole>,
    pub total_visits: u32,
    pub verified_visits: u32,
    pub exception_visits: u32,
    pub orders: u32,
    #[schema(value_type = String)]
    pub order_value: Decimal,
    /// Days with an attendance check-in in the window
    pub days_present: u32,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct StaffReportView {
    #[serde(flatten)]
    pub row: StaffReportRow,
    /// Verified visits over all visits
    pub compliance_pct: u32,
    pub exception_rate: u32,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct StaffReport {
    pub date_from: NaiveDate,
    pub date_to: NaiveDate,
    pub rows: Vec<StaffReportView>,
}
