//! Report views: at-risk shops, coverage, flagged reps, leaderboard, staff
//! compliance and visit summaries

use chrono::{DateTime, Duration, NaiveDate, Utc};

use crate::{
    analytics::{
        self, coverage_pct, days::Staleness, exception_rate, leaderboard, percent, RiskThresholds,
        VisitSummary,
    },
    config::RiskConfig,
    error::{AppError, AppResult},
    models::{
        report::{
            AtRiskQuery, AtRiskShopView, AtRiskSort, CoverageReport, CoverageRow, DateRange,
            DateRangeQuery, FlaggedRep, LeaderboardEntry, LeaderboardQuery, StaffReport,
            StaffReportView,
        },
        visit::VisitQuery,
        FlagKind, Session,
    },
    repository::Repository,
};

/// Window used when the dashboard sends no dates: the last seven days
const DEFAULT_WINDOW_DAYS: i64 = 6;

/// Parse a `dateFrom`/`dateTo` pair, defaulting to the week ending `today`
pub fn parse_range(query: &DateRangeQuery, today: NaiveDate) -> AppResult<DateRange> {
    let parse = |field: &str, value: &Option<String>| -> AppResult<Option<NaiveDate>> {
        value
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .map(|s| {
                NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|_| {
                    AppError::Validation(format!(
                        "Invalid {} format, expected YYYY-MM-DD",
                        field
                    ))
                })
            })
            .transpose()
    };

    let to = parse("dateTo", &query.date_to)?.unwrap_or(today);
    let from = parse("dateFrom", &query.date_from)?
        .unwrap_or(to - Duration::days(DEFAULT_WINDOW_DAYS));

    if from > to {
        return Err(AppError::Validation("dateFrom must not be after dateTo".to_string()));
    }
    Ok(DateRange { from, to })
}

#[derive(Clone)]
pub struct ReportsService {
    repository: Repository,
    visit_thresholds: RiskThresholds,
    order_thresholds: RiskThresholds,
}

impl ReportsService {
    pub fn new(repository: Repository, risk: &RiskConfig) -> Self {
        Self {
            repository,
            visit_thresholds: risk.visit_thresholds(),
            order_thresholds: risk.order_thresholds(),
        }
    }

    /// At-risk shops with risk bands, stalest first
    pub async fn at_risk(
        &self,
        session: &Session,
        query: &AtRiskQuery,
    ) -> AppResult<Vec<AtRiskShopView>> {
        let shops = self.repository.reports.at_risk(session.token()).await?;

        let mut rows: Vec<AtRiskShopView> = shops
            .into_iter()
            .map(|shop| AtRiskShopView {
                last_visit: Staleness::new(shop.days_since_last_visit, self.visit_thresholds),
                last_order: Staleness::new(shop.days_since_last_order, self.order_thresholds),
                shop,
            })
            .filter(|row| match query.band {
                Some(band) => row.last_visit.band == band || row.last_order.band == band,
                None => true,
            })
            .collect();

        let sort = query.sort.unwrap_or_default();
        rows.sort_by_key(|row| {
            std::cmp::Reverse(match sort {
                AtRiskSort::LastVisit => row.last_visit.sort_key(),
                AtRiskSort::LastOrder => row.last_order.sort_key(),
            })
        });
        Ok(rows)
    }

    /// Coverage per rep over a date window
    pub async fn coverage(&self, session: &Session, range: DateRange) -> AppResult<CoverageReport> {
        let items = self.repository.reports.coverage(session.token(), &range).await?;

        let (visited, assigned) = items.iter().fold((0u32, 0u32), |(v, a), item| {
            (v.saturating_add(item.shops_visited), a.saturating_add(item.total_assigned))
        });

        let rows = items
            .into_iter()
            .map(|item| CoverageRow {
                coverage_pct: coverage_pct(item.shops_visited, item.total_assigned),
                shops_missed: item.total_assigned.saturating_sub(item.shops_visited),
                item,
            })
            .collect();

        Ok(CoverageReport {
            date_from: range.from,
            date_to: range.to,
            rows,
            overall_pct: coverage_pct(visited, assigned),
        })
    }

    /// Flagged reps, most flags first; optionally only those carrying `kind`
    pub async fn flagged(
        &self,
        session: &Session,
        kind: Option<FlagKind>,
    ) -> AppResult<Vec<FlaggedRep>> {
        let mut reps: Vec<FlaggedRep> = self
            .repository
            .reports
            .flagged(session.token())
            .await?
            .into_iter()
            .filter(|rep| match kind {
                Some(ref kind) => rep.flags.contains(kind),
                None => true,
            })
            .collect();
        reps.sort_by_key(|rep| std::cmp::Reverse(rep.flags.len()));
        Ok(reps)
    }

    /// Leaderboard ranked on one metric, best first
    pub async fn leaderboard(
        &self,
        session: &Session,
        query: &LeaderboardQuery,
    ) -> AppResult<Vec<LeaderboardEntry>> {
        let reps = self.repository.reports.leaderboard(session.token()).await?;
        Ok(leaderboard::rank(
            reps,
            query.period.unwrap_or_default(),
            query.metric.unwrap_or_default(),
            query.limit,
        ))
    }

    /// Staff report with compliance and exception rates
    pub async fn staff(&self, session: &Session, range: DateRange) -> AppResult<StaffReport> {
        let rows = self
            .repository
            .reports
            .staff(session.token(), &range)
            .await?
            .into_iter()
            .map(|row| StaffReportView {
                compliance_pct: percent(row.verified_visits, row.total_visits),
                exception_rate: exception_rate(row.exception_visits, row.total_visits),
                row,
            })
            .collect();

        Ok(StaffReport {
            date_from: range.from,
            date_to: range.to,
            rows,
        })
    }

    /// Counts, rates and per-rep compliance folded from the visit list
    pub async fn visit_summary(
        &self,
        session: &Session,
        query: &VisitQuery,
        now: DateTime<Utc>,
    ) -> AppResult<VisitSummary> {
        let visits = self.repository.visits.list(session.token(), query).await?;
        Ok(analytics::summarize(&visits, now, self.visit_thresholds))
    }
}
