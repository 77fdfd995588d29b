//! Pre-aggregated reports from `/api/manager/reports/*`

use async_trait::async_trait;
use serde::Deserialize;
use serde_with::{serde_as, DefaultOnError, VecSkipError};

use super::client::ApiClient;
use crate::{
    error::AppResult,
    models::{
        report::{AtRiskShop, CoverageReportItem, DateRange, FlaggedRep, RepStat, StaffReportRow},
        SessionToken,
    },
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReportStore: Send + Sync {
    async fn at_risk(&self, token: &SessionToken) -> AppResult<Vec<AtRiskShop>>;
    async fn coverage(
        &self,
        token: &SessionToken,
        range: &DateRange,
    ) -> AppResult<Vec<CoverageReportItem>>;
    async fn flagged(&self, token: &SessionToken) -> AppResult<Vec<FlaggedRep>>;
    async fn leaderboard(&self, token: &SessionToken) -> AppResult<Vec<RepStat>>;
    async fn staff(
        &self,
        token: &SessionToken,
        range: &DateRange,
    ) -> AppResult<Vec<StaffReportRow>>;
}

// Collections that fail to parse come back empty; bad rows are dropped.

#[serde_as]
#[derive(Debug, Default, Deserialize)]
struct AtRiskBody {
    #[serde_as(as = "DefaultOnError<VecSkipError<_>>")]
    #[serde(default)]
    shops: Vec<AtRiskShop>,
}

#[serde_as]
#[derive(Debug, Default, Deserialize)]
struct CoverageBody {
    #[serde_as(as = "DefaultOnError<VecSkipError<_>>")]
    #[serde(default)]
    report: Vec<CoverageReportItem>,
}

#[serde_as]
#[derive(Debug, Default, Deserialize)]
struct FlaggedBody {
    #[serde_as(as = "DefaultOnError<VecSkipError<_>>")]
    #[serde(default)]
    flagged: Vec<FlaggedRep>,
}

#[serde_as]
#[derive(Debug, Default, Deserialize)]
struct LeaderboardBody {
    #[serde_as(as = "DefaultOnError<VecSkipError<_>>")]
    #[serde(default)]
    reps: Vec<RepStat>,
}

#[serde_as]
#[derive(Debug, Default, Deserialize)]
struct StaffBody {
    #[serde_as(as = "DefaultOnError<VecSkipError<_>>")]
    #[serde(default)]
    rows: Vec<StaffReportRow>,
}

#[derive(Clone)]
pub struct HttpReportStore {
    client: ApiClient,
}

impl HttpReportStore {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ReportStore for HttpReportStore {
    async fn at_risk(&self, token: &SessionToken) -> AppResult<Vec<AtRiskShop>> {
        let body: AtRiskBody = self
            .client
            .get(token, &["api", "manager", "reports", "at-risk"], &[])
            .await?;
        Ok(body.shops)
    }

    async fn coverage(
        &self,
        token: &SessionToken,
        range: &DateRange,
    ) -> AppResult<Vec<CoverageReportItem>> {
        let body: CoverageBody = self
            .client
            .get(token, &["api", "manager", "reports", "coverage"], &range.to_pairs())
            .await?;
        Ok(body.report)
    }

    async fn flagged(&self, token: &SessionToken) -> AppResult<Vec<FlaggedRep>> {
        let body: FlaggedBody = self
            .client
            .get(token, &["api", "manager", "reports", "flagged"], &[])
            .await?;
        Ok(body.flagged)
    }

    async fn leaderboard(&self, token: &SessionToken) -> AppResult<Vec<RepStat>> {
        let body: LeaderboardBody = self
            .client
            .get(token, &["api", "manager", "reports", "leaderboard"], &[])
            .await?;
        Ok(body.reps)
    }

    async fn staff(
        &self,
        token: &SessionToken,
        range: &DateRange,
    ) -> AppResult<Vec<StaffReportRow>> {
        let body: StaffBody = self
            .client
            .get(token, &["api", "manager", "reports", "staff"], &range.to_pairs())
            .await?;
        Ok(body.rows)
    }
}
