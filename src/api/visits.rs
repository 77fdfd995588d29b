//! Visit listing and exception review endpoints

use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, Path, Query, Request, State},
    http::header,
    Json,
};
use chrono::Utc;
use validator::Validate;

use crate::{
    analytics::VisitSummary,
    error::{AppError, AppResult},
    models::visit::{
        ClassifiedVisit, ExceptionQueue, ExceptionQueueQuery, ReviewOutcome, ReviewRequest,
        ReviewScope, VisitListQuery, VisitQuery,
    },
    AppState,
};

use super::ManagerSession;

/// Review body: empty means no note, anything else must be valid JSON
pub struct ReviewBody(pub ReviewRequest);

#[async_trait]
impl<S: Send + Sync> FromRequest<S> for ReviewBody {
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| AppError::Validation(format!("Unreadable request body: {}", e)))?;

        parse_review_body(content_type.as_deref(), &bytes).map(ReviewBody)
    }
}

fn is_json_content_type(content_type: &str) -> bool {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    essence == "application/json" || essence.ends_with("+json")
}

fn parse_review_body(content_type: Option<&str>, body: &[u8]) -> AppResult<ReviewRequest> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(ReviewRequest::default());
    }
    if !content_type.map(is_json_content_type).unwrap_or(false) {
        return Err(AppError::Validation(
            "Review body must be sent as application/json".to_string(),
        ));
    }

    let request: ReviewRequest = serde_json::from_slice(body)
        .map_err(|e| AppError::Validation(format!("Invalid review body: {}", e)))?;
    request.validate()?;
    Ok(request)
}

/// List visits with their review state
#[utoipa::path(
    get,
    path = "/visits",
    tag = "visits",
    params(VisitListQuery),
    responses(
        (
            status = 200,
            description = "Classified visits in backend order",
            body = Vec<ClassifiedVisit>
        ),
        (status = 502, description = "Backend unavailable")
    )
)]
pub async fn list_visits(
    State(state): State<AppState>,
    ManagerSession(session): ManagerSession,
    Query(query): Query<VisitListQuery>,
) -> AppResult<Json<Vec<ClassifiedVisit>>> {
    let visits = state
        .services
        .review
        .list_visits(&session, &VisitQuery::from(query))
        .await?;
    Ok(Json(visits))
}

/// Visit counts, rates and per-rep compliance
#[utoipa::path(
    get,
    path = "/visits/summary",
    tag = "visits",
    params(VisitListQuery),
    responses(
        (status = 200, description = "Visit summary", body = VisitSummary)
    )
)]
pub async fn visit_summary(
    State(state): State<AppState>,
    ManagerSession(session): ManagerSession,
    Query(query): Query<VisitListQuery>,
) -> AppResult<Json<VisitSummary>> {
    let summary = state
        .services
        .reports
        .visit_summary(&session, &VisitQuery::from(query), Utc::now())
        .await?;
    Ok(Json(summary))
}

/// Exception review queue
#[utoipa::path(
    get,
    path = "/visits/exceptions",
    tag = "visits",
    params(ExceptionQueueQuery),
    responses(
        (status = 200, description = "Pending exceptions", body = ExceptionQueue)
    )
)]
pub async fn exception_queue(
    State(state): State<AppState>,
    ManagerSession(session): ManagerSession,
    Query(query): Query<ExceptionQueueQuery>,
) -> AppResult<Json<ExceptionQueue>> {
    let queue = state.services.review.queue(&session, &query).await?;
    Ok(Json(queue))
}

/// Approve a pending exception
#[utoipa::path(
    post,
    path = "/visits/{id}/approve",
    tag = "visits",
    params(("id" = String, Path, description = "Visit ID"), ReviewScope),
    request_body = ReviewRequest,
    responses(
        (status = 200, description = "Exception approved", body = ReviewOutcome),
        (status = 400, description = "Malformed review body or note too long"),
        (status = 403, description = "Role cannot review visits"),
        (status = 404, description = "Visit has no exception"),
        (status = 409, description = "Already reviewed or review in progress")
    )
)]
pub async fn approve_visit(
    State(state): State<AppState>,
    ManagerSession(session): ManagerSession,
    Path(id): Path<String>,
    Query(scope): Query<ReviewScope>,
    ReviewBody(request): ReviewBody,
) -> AppResult<Json<ReviewOutcome>> {
    let outcome = state
        .services
        .review
        .approve(&session, &id, request.manager_note, &scope)
        .await?;
    Ok(Json(outcome))
}

/// Flag a pending exception
#[utoipa::path(
    post,
    path = "/visits/{id}/flag",
    tag = "visits",
    params(("id" = String, Path, description = "Visit ID"), ReviewScope),
    request_body = ReviewRequest,
    responses(
        (status = 200, description = "Exception flagged", body = ReviewOutcome),
        (status = 400, description = "Malformed review body or note too long"),
        (status = 403, description = "Role cannot review visits"),
        (status = 404, description = "Visit has no exception"),
        (status = 409, description = "Already reviewed or review in progress")
    )
)]
pub async fn flag_visit(
    State(state): State<AppState>,
    ManagerSession(session): ManagerSession,
    Path(id): Path<String>,
    Query(scope): Query<ReviewScope>,
    ReviewBody(request): ReviewBody,
) -> AppResult<Json<ReviewOutcome>> {
    let outcome = state
        .services
        .review
        .flag(&session, &id, request.manager_note, &scope)
        .await?;
    Ok(Json(outcome))
}
