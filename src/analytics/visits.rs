//! Summaries folded from a classified visit list

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::Serialize;
use utoipa::ToSchema;

use super::{days::Staleness, rates::percent, risk::RiskThresholds};
use crate::models::visit::{Visit, VisitState};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct ReasonCount {
    pub reason: String,
    pub label: String,
    pub count: u32,
}

/// Verification compliance of one rep
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct RepCompliance {
    pub rep_company_user_id: String,
    pub rep_name: String,
    pub visits: u32,
    pub verified: u32,
    pub exceptions: u32,
    pub pending: u32,
    pub compliance_pct: u32,
    pub exception_rate: u32,
}

/// Most recent visit to a shop
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct ShopActivity {
    pub shop_id: String,
    pub shop_name: String,
    pub last_visit_at: DateTime<Utc>,
    pub last_visit: Staleness,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct VisitSummary {
    pub total: u32,
    pub verified: u32,
    pub ongoing: u32,
    pub unverified: u32,
    pub pending: u32,
    pub approved: u32,
    pub flagged: u32,
    pub exception_rate: u32,
    pub verified_rate: u32,
    /// Exception counts in order of first appearance
    pub by_reason: Vec<ReasonCount>,
    pub reps: Vec<RepCompliance>,
    /// Stalest shop first
    pub shops: Vec<ShopActivity>,
}

impl VisitSummary {
    pub fn exceptions(&self) -> u32 {
        self.pending + self.approved + self.flagged
    }
}

#[derive(Default)]
struct RepTally {
    name: String,
    visits: u32,
    verified: u32,
    exceptions: u32,
    pending: u32,
}

/// Fold visits into counts, rates, per-rep compliance and per-shop recency
pub fn summarize(visits: &[Visit], now: DateTime<Utc>, thresholds: RiskThresholds) -> VisitSummary {
    let mut summary = VisitSummary::default();
    let mut reasons: IndexMap<String, (String, u32)> = IndexMap::new();
    let mut reps: IndexMap<&str, RepTally> = IndexMap::new();
    let mut shops: IndexMap<&str, (&str, DateTime<Utc>)> = IndexMap::new();

    for visit in visits {
        let state = visit.state();
        summary.total += 1;
        match state {
            VisitState::Verified => summary.verified += 1,
            VisitState::Ongoing => summary.ongoing += 1,
            VisitState::Unverified => summary.unverified += 1,
            VisitState::ExceptionPending => summary.pending += 1,
            VisitState::ExceptionApproved => summary.approved += 1,
            VisitState::ExceptionFlagged => summary.flagged += 1,
        }

        // Reason counts add up to the exception count
        if let Some(reason) = visit.exception_reason.as_ref().filter(|_| state.is_exception()) {
            let entry = reasons
                .entry(reason.as_str().to_string())
                .or_insert_with(|| (reason.label().to_string(), 0));
            entry.1 += 1;
        }

        let tally = reps.entry(visit.rep_company_user_id.as_str()).or_default();
        if tally.name.is_empty() {
            tally.name = visit.rep_name.clone();
        }
        tally.visits += 1;
        if state == VisitState::Verified {
            tally.verified += 1;
        }
        if state.is_exception() {
            tally.exceptions += 1;
        }
        if state.is_pending() {
            tally.pending += 1;
        }

        let last = shops
            .entry(visit.shop_id.as_str())
            .or_insert((visit.shop_name.as_str(), visit.started_at));
        if visit.started_at > last.1 {
            *last = (visit.shop_name.as_str(), visit.started_at);
        }
    }

    summary.exception_rate = percent(summary.exceptions(), summary.total);
    summary.verified_rate = percent(summary.verified, summary.total);

    summary.by_reason = reasons
        .into_iter()
        .map(|(reason, (label, count))| ReasonCount { reason, label, count })
        .collect();

    summary.reps = reps
        .into_iter()
        .map(|(id, t)| RepCompliance {
            rep_company_user_id: id.to_string(),
            compliance_pct: percent(t.verified, t.visits),
            exception_rate: percent(t.exceptions, t.visits),
            rep_name: t.name,
            visits: t.visits,
            verified: t.verified,
            exceptions: t.exceptions,
            pending: t.pending,
        })
        .collect();

    let mut shops: Vec<ShopActivity> = shops
        .into_iter()
        .map(|(id, (name, at))| ShopActivity {
            shop_id: id.to_string(),
            shop_name: name.to_string(),
            last_visit_at: at,
            last_visit: Staleness::since(now, Some(at), thresholds),
        })
        .collect();
    shops.sort_by_key(|s| std::cmp::Reverse(s.last_visit.sort_key()));
    summary.shops = shops;

    summary
}
