//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::analytics::{
    days::Staleness,
    visits::{ReasonCount, RepCompliance, ShopActivity},
    LeaderboardMetric, RiskBand, VisitSummary,
};
use crate::api::{health, reports, session, visits};
use crate::models::{
    report::{
        AtRiskShop, AtRiskShopView, AtRiskSort, CoverageReport, CoverageReportItem, CoverageRow,
        FlaggedRep, LeaderboardEntry, Period, PeriodStats, StaffReport, StaffReportRow,
        StaffReportView,
    },
    session::{Company, SessionResponse, SessionUser},
    visit::{
        ClassifiedVisit, ExceptionQueue, ReviewDecision, ReviewOutcome, ReviewRequest, Visit,
        VisitState,
    },
};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Field Sales Manager API",
        version = "0.4.0",
        description = "Visit exception review, compliance, coverage and at-risk views",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Session
        session::get_session,
        session::refresh_session,
        // Visits
        visits::list_visits,
        visits::visit_summary,
        visits::exception_queue,
        visits::approve_visit,
        visits::flag_visit,
        // Reports
        reports::at_risk,
        reports::coverage,
        reports::flagged,
        reports::leaderboard,
        reports::staff,
    ),
    components(
        schemas(
            crate::error::ErrorResponse,
            health::HealthResponse,
            SessionResponse,
            SessionUser,
            Company,
            Visit,
            VisitState,
            ClassifiedVisit,
            ExceptionQueue,
            ReviewDecision,
            ReviewRequest,
            ReviewOutcome,
            VisitSummary,
            ReasonCount,
            RepCompliance,
            ShopActivity,
            Staleness,
            RiskBand,
            AtRiskShop,
            AtRiskShopView,
            AtRiskSort,
            CoverageReportItem,
            CoverageRow,
            CoverageReport,
            FlaggedRep,
            Period,
            PeriodStats,
            LeaderboardMetric,
            LeaderboardEntry,
            StaffReportRow,
            StaffReportView,
            StaffReport,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "session", description = "Manager session"),
        (name = "visits", description = "Visits and exception review"),
        (name = "reports", description = "Coverage, at-risk, leaderboard and staff reports")
    )
)]
pub struct ApiDoc;

/// Create router serving the Swagger UI and OpenAPI document
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
