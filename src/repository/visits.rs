//! Visit record store backed by `/api/manager/visits`

use async_trait::async_trait;
use serde::Deserialize;
use serde_with::{serde_as, DefaultOnError, VecSkipError};

use super::client::{ApiClient, Empty};
use crate::{
    error::AppResult,
    models::{
        visit::{ReviewPatch, Visit, VisitQuery},
        SessionToken,
    },
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VisitStore: Send + Sync {
    /// List visits in backend order
    async fn list(&self, token: &SessionToken, query: &VisitQuery) -> AppResult<Vec<Visit>>;

    /// Apply a manager decision to one visit
    async fn review(
        &self,
        token: &SessionToken,
        visit_id: &str,
        patch: &ReviewPatch,
    ) -> AppResult<()>;
}

#[serde_as]
#[derive(Debug, Default, Deserialize)]
struct VisitsBody {
    #[serde_as(as = "DefaultOnError<VecSkipError<_>>")]
    #[serde(default)]
    visits: Vec<Visit>,
}

#[derive(Clone)]
pub struct HttpVisitStore {
    client: ApiClient,
}

impl HttpVisitStore {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl VisitStore for HttpVisitStore {
    async fn list(&self, token: &SessionToken, query: &VisitQuery) -> AppResult<Vec<Visit>> {
        let body: VisitsBody = self
            .client
            .get(token, &["api", "manager", "visits"], &query.to_pairs())
            .await?;
        Ok(body.visits)
    }

    async fn review(
        &self,
        token: &SessionToken,
        visit_id: &str,
        patch: &ReviewPatch,
    ) -> AppResult<()> {
        let _: Empty = self
            .client
            .patch(token, &["api", "manager", "visits", visit_id], patch)
            .await?;
        Ok(())
    }
}
