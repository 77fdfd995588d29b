//! Session endpoints

use axum::{extract::State, Json};

use crate::{error::AppResult, models::session::SessionResponse, AppState};

use super::ManagerSession;

/// Current session
#[utoipa::path(
    get,
    path = "/session",
    tag = "session",
    responses(
        (status = 200, description = "Signed-in user and company", body = SessionResponse),
        (status = 401, description = "No valid session cookie")
    )
)]
pub async fn get_session(ManagerSession(session): ManagerSession) -> Json<SessionResponse> {
    Json(SessionResponse::from(&session))
}

/// Resolve the session again from the backend
#[utoipa::path(
    post,
    path = "/session/refresh",
    tag = "session",
    responses(
        (status = 200, description = "Refreshed session", body = SessionResponse),
        (status = 401, description = "No valid session cookie")
    )
)]
pub async fn refresh_session(
    State(state): State<AppState>,
    ManagerSession(session): ManagerSession,
) -> AppResult<Json<SessionResponse>> {
    let refreshed = state.services.session.refresh(&session).await?;
    Ok(Json(SessionResponse::from(&refreshed)))
}
