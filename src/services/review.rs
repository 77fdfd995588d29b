//! Visit exception review service

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use unicode_normalization::UnicodeNormalization;

use crate::{
    error::{AppError, AppResult},
    models::{
        visit::{
            ClassifiedVisit, ExceptionQueue, ExceptionQueueQuery, ReviewDecision, ReviewOutcome,
            ReviewPatch, ReviewScope, Visit, VisitQuery,
        },
        Session,
    },
    repository::Repository,
};

/// Visits with a review request currently running in this process
#[derive(Clone, Default)]
struct InFlight {
    keys: Arc<Mutex<HashSet<String>>>,
}

struct InFlightGuard {
    keys: Arc<Mutex<HashSet<String>>>,
    key: String,
}

impl InFlight {
    fn begin(&self, company_id: &str, visit_id: &str) -> AppResult<InFlightGuard> {
        let key = format!("{}/{}", company_id, visit_id);
        let mut keys = self
            .keys
            .lock()
            .map_err(|_| AppError::Internal("In-flight review set poisoned".to_string()))?;
        if !keys.insert(key.clone()) {
            return Err(AppError::ReviewInProgress(visit_id.to_string()));
        }
        Ok(InFlightGuard {
            keys: self.keys.clone(),
            key,
        })
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        if let Ok(mut keys) = self.keys.lock() {
            keys.remove(&self.key);
        }
    }
}

/// Case and width insensitive form used for name and code matching
fn fold(s: &str) -> String {
    s.trim().nfkc().collect::<String>().to_lowercase()
}

#[derive(Clone)]
pub struct ReviewService {
    repository: Repository,
    in_flight: InFlight,
}

impl ReviewService {
    pub fn new(repository: Repository) -> Self {
        Self {
            repository,
            in_flight: InFlight::default(),
        }
    }

    /// List visits with their derived state, in backend order
    pub async fn list_visits(
        &self,
        session: &Session,
        query: &VisitQuery,
    ) -> AppResult<Vec<ClassifiedVisit>> {
        let visits = self.repository.visits.list(session.token(), query).await?;
        Ok(visits.into_iter().map(ClassifiedVisit::from).collect())
    }

    /// Exception review queue. Pending only unless reviewed rows are asked
    /// for; rep and reason filters never reorder rows.
    pub async fn queue(
        &self,
        session: &Session,
        query: &ExceptionQueueQuery,
    ) -> AppResult<ExceptionQueue> {
        let upstream = ReviewScope {
            shop: query.shop.clone(),
            region: query.region.clone(),
        }
        .exceptions();
        let visits = self.repository.visits.list(session.token(), &upstream).await?;
        let pending_count = pending_count(&visits);

        let rep = query.rep.as_deref().map(fold).filter(|r| !r.is_empty());
        let reason = query.reason.as_deref().map(fold).filter(|r| !r.is_empty());
        let include_reviewed = query.include_reviewed.unwrap_or(false);

        let visits = visits
            .into_iter()
            .map(ClassifiedVisit::from)
            .filter(|v| v.state.is_exception())
            .filter(|v| include_reviewed || v.reviewable)
            .filter(|v| match rep {
                Some(ref rep) => fold(&v.visit.rep_name).contains(rep.as_str()),
                None => true,
            })
            .filter(|v| match reason {
                Some(ref reason) => v
                    .visit
                    .exception_reason
                    .as_ref()
                    .map(|r| fold(r.as_str()) == *reason)
                    .unwrap_or(false),
                None => true,
            })
            .collect();

        Ok(ExceptionQueue {
            visits,
            pending_count,
        })
    }

    /// Approve a pending exception
    pub async fn approve(
        &self,
        session: &Session,
        visit_id: &str,
        note: Option<String>,
        scope: &ReviewScope,
    ) -> AppResult<ReviewOutcome> {
        self.review(session, visit_id, ReviewDecision::Approve, note, scope)
            .await
    }

    /// Flag a pending exception
    pub async fn flag(
        &self,
        session: &Session,
        visit_id: &str,
        note: Option<String>,
        scope: &ReviewScope,
    ) -> AppResult<ReviewOutcome> {
        self.review(session, visit_id, ReviewDecision::Flag, note, scope)
            .await
    }

    async fn review(
        &self,
        session: &Session,
        visit_id: &str,
        decision: ReviewDecision,
        note: Option<String>,
        scope: &ReviewScope,
    ) -> AppResult<ReviewOutcome> {
        session.require_reviewer()?;
        let _guard = self.in_flight.begin(&session.company.id, visit_id)?;

        // The pending count is taken over the same filtered queue the
        // reviewer is looking at.
        let exceptions = scope.exceptions();
        let before = self.repository.visits.list(session.token(), &exceptions).await?;
        let current = before
            .iter()
            .find(|v| v.id == visit_id)
            .ok_or_else(|| {
                AppError::NotFound(format!("Visit {} has no exception to review", visit_id))
            })?
            .state();
        let next = current.apply(decision).ok_or_else(|| {
            AppError::ActionRejected(format!("Visit {} was already reviewed", visit_id))
        })?;

        let patch = ReviewPatch::new(decision, note);
        self.repository
            .visits
            .review(session.token(), visit_id, &patch)
            .await
            .map_err(|e| match e {
                AppError::Upstream(msg) => AppError::ActionRejected(msg),
                other => other,
            })?;

        tracing::info!(
            visit_id,
            %decision,
            manager_id = %session.user.id,
            "Visit exception reviewed"
        );

        // Refresh after write; the backend copy is authoritative
        let refreshed = self.repository.visits.list(session.token(), &exceptions).await;
        let (state, pending) = match refreshed {
            Ok(after) => (
                after
                    .iter()
                    .find(|v| v.id == visit_id)
                    .map(Visit::state)
                    .unwrap_or(next),
                pending_count(&after),
            ),
            Err(e) => {
                tracing::warn!(visit_id, "Refresh after review failed: {}", e);
                (next, pending_count(&before).saturating_sub(1))
            }
        };

        Ok(ReviewOutcome {
            visit_id: visit_id.to_string(),
            decision,
            state,
            pending_count: pending,
        })
    }
}

fn pending_count(visits: &[Visit]) -> usize {
    visits.iter().filter(|v| v.state().is_pending()).count()
}
