//! Visit model, review state machine and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_with::skip_serializing_none;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::enums::ExceptionReason;

/// Visit as stored by the backend
#[skip_serializing_none]
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Visit {
    pub id: String,
    pub shop_id: String,
    #[serde(default)]
    pub shop_name: String,
    pub rep_company_user_id: String,
    #[serde(default)]
    pub rep_name: String,
    pub started_at: DateTime<Utc>,
    /// Absent while the visit is still open
    pub ended_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub is_verified: bool,

    #[serde(default, deserialize_with = "empty_reason_as_none")]
    #[schema(value_type = Option<String>)]
    pub exception_reason: Option<ExceptionReason>,
    pub exception_note: Option<String>,
    /// Distance from the geofence centre at check-in, in metres
    pub distance_m: Option<f64>,
    pub gps_accuracy_m: Option<f64>,
    pub verification_method: Option<String>,

    pub approved_by_manager_id: Option<String>,
    pub approved_at: Option<DateTime<Utc>>,
    pub flagged_by_manager_id: Option<String>,
    pub manager_note: Option<String>,
}

fn empty_reason_as_none<'de, D>(deserializer: D) -> Result<Option<ExceptionReason>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw
        .filter(|s| !s.trim().is_empty())
        .map(ExceptionReason::from))
}

/// Review classification of a visit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum VisitState {
    Verified,
    Ongoing,
    ExceptionPending,
    ExceptionApproved,
    ExceptionFlagged,
    /// Closed, not verified and no exception reason recorded
    Unverified,
}

impl VisitState {
    pub fn is_exception(self) -> bool {
        matches!(
            self,
            VisitState::ExceptionPending
                | VisitState::ExceptionApproved
                | VisitState::ExceptionFlagged
        )
    }

    /// Only pending exceptions accept a manager decision
    pub fn is_pending(self) -> bool {
        self == VisitState::ExceptionPending
    }

    /// State reached by applying `decision`, if the transition exists
    pub fn apply(self, decision: ReviewDecision) -> Option<VisitState> {
        match (self, decision) {
            (VisitState::ExceptionPending, ReviewDecision::Approve) => {
                Some(VisitState::ExceptionApproved)
            }
            (VisitState::ExceptionPending, ReviewDecision::Flag) => {
                Some(VisitState::ExceptionFlagged)
            }
            _ => None,
        }
    }
}

impl Visit {
    /// Classify the visit. Total over any input: a reason with no review
    /// fields is pending, and approval wins if both review ids are present.
    pub fn state(&self) -> VisitState {
        if self.is_verified {
            return VisitState::Verified;
        }
        if self.exception_reason.is_some() {
            if self.approved_by_manager_id.is_some() {
                return VisitState::ExceptionApproved;
            }
            if self.flagged_by_manager_id.is_some() {
                return VisitState::ExceptionFlagged;
            }
            return VisitState::ExceptionPending;
        }
        if self.ended_at.is_none() {
            VisitState::Ongoing
        } else {
            VisitState::Unverified
        }
    }
}

/// Classify a visit
pub fn classify(visit: &Visit) -> VisitState {
    visit.state()
}

/// Manager decision on a pending exception
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ReviewDecision {
    Approve,
    Flag,
}

impl std::fmt::Display for ReviewDecision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReviewDecision::Approve => write!(f, "approve"),
            ReviewDecision::Flag => write!(f, "flag"),
        }
    }
}

/// PATCH body sent to the backend. Built only from a [`ReviewDecision`], so
/// exactly one of `approve`/`flag` is ever set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReviewPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    approve: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    flag: Option<bool>,
    #[serde(rename = "managerNote", skip_serializing_if = "Option::is_none")]
    manager_note: Option<String>,
}

impl ReviewPatch {
    pub fn new(decision: ReviewDecision, note: Option<String>) -> Self {
        let note = note.map(|n| n.trim().to_string()).filter(|n| !n.is_empty());
        match decision {
            ReviewDecision::Approve => Self {
                approve: Some(true),
                flag: None,
                manager_note: note,
            },
            ReviewDecision::Flag => Self {
                approve: None,
                flag: Some(true),
                manager_note: note,
            },
        }
    }
}

/// Review request body from the dashboard
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct ReviewRequest {
    #[serde(rename = "managerNote", alias = "manager_note")]
    #[validate(length(max = 1000, message = "Manager note must be at most 1000 characters"))]
    pub manager_note: Option<String>,
}

/// Result of a successful review
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ReviewOutcome {
    pub visit_id: String,
    pub decision: ReviewDecision,
    pub state: VisitState,
    /// Pending exceptions left after the refresh
    pub pending_count: usize,
}

/// Filters understood by `GET /api/manager/visits`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VisitQuery {
    pub shop: Option<String>,
    pub region: Option<String>,
    pub exceptions_only: bool,
}

impl VisitQuery {
    /// Query string pairs in backend naming
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(ref shop) = self.shop {
            pairs.push(("shop", shop.clone()));
        }
        if self.exceptions_only {
            pairs.push(("exceptions_only", "true".to_string()));
        }
        if let Some(ref region) = self.region {
            pairs.push(("region", region.clone()));
        }
        pairs
    }
}

/// Query parameters for the visit list
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct VisitListQuery {
    pub shop: Option<String>,
    pub region: Option<String>,
    pub exceptions_only: Option<bool>,
}

impl From<VisitListQuery> for VisitQuery {
    fn from(q: VisitListQuery) -> Self {
        Self {
            shop: q.shop,
            region: q.region,
            exceptions_only: q.exceptions_only.unwrap_or(false),
        }
    }
}

/// Query parameters for the exception review queue
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct ExceptionQueueQuery {
    /// Case-insensitive match against the rep name
    pub rep: Option<String>,
    /// Exception reason code
    pub reason: Option<String>,
    pub region: Option<String>,
    pub shop: Option<String>,
    /// Also list approved and flagged exceptions
    pub include_reviewed: Option<bool>,
}

/// Queue filters a review was made under. The pending count returned after
/// the review is computed over the same filtered queue.
#[derive(Debug, Clone, Default, Deserialize, IntoParams, ToSchema)]
pub struct ReviewScope {
    pub shop: Option<String>,
    pub region: Option<String>,
}

impl ReviewScope {
    /// Exception listing restricted to this scope
    pub fn exceptions(&self) -> VisitQuery {
        VisitQuery {
            shop: self.shop.clone(),
            region: self.region.clone(),
            exceptions_only: true,
        }
    }
}

/// Visit with its derived state
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ClassifiedVisit {
    #[serde(flatten)]
    pub visit: Visit,
    pub state: VisitState,
    pub reason_label: Option<String>,
    /// Whether approve/flag may be offered
    pub reviewable: bool,
}

impl From<Visit> for ClassifiedVisit {
    fn from(visit: Visit) -> Self {
        let state = visit.state();
        Self {
            reason_label: visit.exception_reason.as_ref().map(|r| r.label().to_string()),
            reviewable: state.is_pending(),
            state,
            visit,
        }
    }
}

/// Exception review queue
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ExceptionQueue {
    pub visits: Vec<ClassifiedVisit>,
    /// Pending exceptions before the rep/reason filters are applied
    pub pending_count: usize,
}
