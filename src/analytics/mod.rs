//! Pure aggregation over visit and report collections.
//!
//! Everything here is synchronous and recomputed in full from the rows
//! fetched for the current request.

pub mod days;
pub mod leaderboard;
pub mod rates;
pub mod risk;
pub mod visits;

pub use days::{days_since, Staleness};
pub use leaderboard::LeaderboardMetric;
pub use rates::{coverage_pct, exception_rate, percent};
pub use risk::{RiskBand, RiskThresholds};
pub use visits::{summarize, VisitSummary};
