//! Leaderboard ordering.
//!
//! Metrics are not sorted uniformly: a lower exception rate is better, so it
//! sorts ascending, while visits, orders, revenue and verified counts sort
//! descending.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::rates::{exception_rate, round_pct};
use crate::models::report::{LeaderboardEntry, Period, PeriodStats, RepStat};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum LeaderboardMetric {
    Visits,
    Orders,
    #[default]
    Revenue,
    Verified,
    ExceptionRate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl LeaderboardMetric {
    /// Direction that puts the best rep first
    pub fn best_first(self) -> SortDirection {
        match self {
            LeaderboardMetric::ExceptionRate => SortDirection::Ascending,
            _ => SortDirection::Descending,
        }
    }

    fn compare(self, a: &PeriodStats, b: &PeriodStats) -> Ordering {
        match self {
            LeaderboardMetric::Visits => a.visits.cmp(&b.visits),
            LeaderboardMetric::Orders => a.orders.cmp(&b.orders),
            LeaderboardMetric::Revenue => a.revenue.cmp(&b.revenue),
            LeaderboardMetric::Verified => a.verified.cmp(&b.verified),
            LeaderboardMetric::ExceptionRate => a.exception_rate.cmp(&b.exception_rate),
        }
    }
}

impl RepStat {
    /// Counters for one period. A missing exception rate is derived from the
    /// exception and visit counts.
    pub fn period(&self, period: Period) -> PeriodStats {
        let (visits, orders, revenue, exceptions, verified, rate) = match period {
            Period::Today => (
                self.visits_today,
                self.orders_today,
                self.revenue_today,
                self.exceptions_today,
                self.verified_today,
                self.exception_rate_today,
            ),
            Period::Week => (
                self.visits_week,
                self.orders_week,
                self.revenue_week,
                self.exceptions_week,
                self.verified_week,
                self.exception_rate_week,
            ),
            Period::Mtd => (
                self.visits_mtd,
                self.orders_mtd,
                self.revenue_mtd,
                self.exceptions_mtd,
                self.verified_mtd,
                self.exception_rate_mtd,
            ),
        };
        PeriodStats {
            visits,
            orders,
            revenue,
            exceptions,
            verified,
            exception_rate: rate
                .map(round_pct)
                .unwrap_or_else(|| exception_rate(exceptions, visits)),
        }
    }
}

/// Rank reps on `metric` for `period`, best first. Ties keep backend order.
pub fn rank(
    reps: Vec<RepStat>,
    period: Period,
    metric: LeaderboardMetric,
    limit: Option<usize>,
) -> Vec<LeaderboardEntry> {
    let mut rows: Vec<(RepStat, PeriodStats)> = reps
        .into_iter()
        .map(|rep| {
            let stats = rep.period(period);
            (rep, stats)
        })
        .collect();

    rows.sort_by(|(_, a), (_, b)| match metric.best_first() {
        SortDirection::Ascending => metric.compare(a, b),
        SortDirection::Descending => metric.compare(b, a),
    });

    rows.into_iter()
        .take(limit.unwrap_or(usize::MAX))
        .enumerate()
        .map(|(idx, (rep, stats))| LeaderboardEntry {
            rank: idx + 1,
            rep_company_user_id: rep.rep_company_user_id,
            rep_name: rep.rep_name,
            stats,
        })
        .collect()
}
