//! API handlers for the manager REST endpoints

pub mod health;
pub mod openapi;
pub mod reports;
pub mod session;
pub mod visits;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::request::Parts,
    routing::{get, post},
    RequestPartsExt, Router,
};
use axum_extra::{headers::Cookie, TypedHeader};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{error::AppError, models::Session, models::SessionToken, AppState};

/// Extractor resolving the manager session from the forwarded cookie
pub struct ManagerSession(pub Session);

#[async_trait]
impl FromRequestParts<AppState> for ManagerSession {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let cookie_name = state.config.upstream.session_cookie.as_str();

        let TypedHeader(cookies) = parts
            .extract::<TypedHeader<Cookie>>()
            .await
            .map_err(|_| AppError::Authentication("Missing session cookie".to_string()))?;

        let value = cookies
            .get(cookie_name)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| AppError::Authentication("Missing session cookie".to_string()))?;

        let session = state.services.session.resolve(SessionToken::new(value)).await?;
        Ok(ManagerSession(session))
    }
}

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // API v1 routes
    let api_v1 = Router::new()
        // Health check
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        // Session
        .route("/session", get(session::get_session))
        .route("/session/refresh", post(session::refresh_session))
        // Visits and exception review
        .route("/visits", get(visits::list_visits))
        .route("/visits/summary", get(visits::visit_summary))
        .route("/visits/exceptions", get(visits::exception_queue))
        .route("/visits/:id/approve", post(visits::approve_visit))
        .route("/visits/:id/flag", post(visits::flag_visit))
        // Reports
        .route("/reports/at-risk", get(reports::at_risk))
        .route("/reports/coverage", get(reports::coverage))
        .route("/reports/flagged", get(reports::flagged))
        .route("/reports/leaderboard", get(reports::leaderboard))
        .route("/reports/staff", get(reports::staff))
        .with_state(state);

    // OpenAPI documentation
    let openapi = openapi::create_openapi_router();

    Router::new()
        .nest("/api/v1", api_v1)
        .merge(openapi)
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(cors)
}
