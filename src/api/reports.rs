//! Report endpoints

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::Utc;
use validator::Validate;

use crate::{
    error::AppResult,
    models::{
        report::{
            AtRiskQuery, AtRiskShopView, CoverageReport, DateRangeQuery, FlaggedQuery, FlaggedRep,
            LeaderboardEntry, LeaderboardQuery, StaffReport,
        },
        FlagKind,
    },
    services::reports::parse_range,
    AppState,
};

use super::ManagerSession;

/// Shops with stale visit or order activity
#[utoipa::path(
    get,
    path = "/reports/at-risk",
    tag = "reports",
    params(AtRiskQuery),
    responses(
        (status = 200, description = "At-risk shops, stalest first", body = Vec<AtRiskShopView>)
    )
)]
pub async fn at_risk(
    State(state): State<AppState>,
    ManagerSession(session): ManagerSession,
    Query(query): Query<AtRiskQuery>,
) -> AppResult<Json<Vec<AtRiskShopView>>> {
    let shops = state.services.reports.at_risk(&session, &query).await?;
    Ok(Json(shops))
}

/// Shop coverage per rep
#[utoipa::path(
    get,
    path = "/reports/coverage",
    tag = "reports",
    params(DateRangeQuery),
    responses(
        (status = 200, description = "Coverage report", body = CoverageReport),
        (status = 400, description = "Invalid date range")
    )
)]
pub async fn coverage(
    State(state): State<AppState>,
    ManagerSession(session): ManagerSession,
    Query(query): Query<DateRangeQuery>,
) -> AppResult<Json<CoverageReport>> {
    let range = parse_range(&query, Utc::now().date_naive())?;
    let report = state.services.reports.coverage(&session, range).await?;
    Ok(Json(report))
}

/// Reps with weekly behavioural flags
#[utoipa::path(
    get,
    path = "/reports/flagged",
    tag = "reports",
    params(FlaggedQuery),
    responses(
        (status = 200, description = "Flagged reps", body = Vec<FlaggedRep>)
    )
)]
pub async fn flagged(
    State(state): State<AppState>,
    ManagerSession(session): ManagerSession,
    Query(query): Query<FlaggedQuery>,
) -> AppResult<Json<Vec<FlaggedRep>>> {
    let kind = query
        .kind
        .filter(|k| !k.trim().is_empty())
        .map(FlagKind::from);
    let reps = state.services.reports.flagged(&session, kind).await?;
    Ok(Json(reps))
}

/// Rep leaderboard
#[utoipa::path(
    get,
    path = "/reports/leaderboard",
    tag = "reports",
    params(LeaderboardQuery),
    responses(
        (status = 200, description = "Reps ranked best first", body = Vec<LeaderboardEntry>),
        (status = 400, description = "Invalid limit")
    )
)]
pub async fn leaderboard(
    State(state): State<AppState>,
    ManagerSession(session): ManagerSession,
    Query(query): Query<LeaderboardQuery>,
) -> AppResult<Json<Vec<LeaderboardEntry>>> {
    query.validate()?;
    let entries = state.services.reports.leaderboard(&session, &query).await?;
    Ok(Json(entries))
}

/// Staff report with compliance
#[utoipa::path(
    get,
    path = "/reports/staff",
    tag = "reports",
    params(DateRangeQuery),
    responses(
        (status = 200, description = "Staff report", body = StaffReport),
        (status = 400, description = "Invalid date range")
    )
)]
pub async fn staff(
    State(state): State<AppState>,
    ManagerSession(session): ManagerSession,
    Query(query): Query<DateRangeQuery>,
) -> AppResult<Json<StaffReport>> {
    let range = parse_range(&query, Utc::now().date_naive())?;
    let report = state.services.reports.staff(&session, range).await?;
    Ok(Json(report))
}
