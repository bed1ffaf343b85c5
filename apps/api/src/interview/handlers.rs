//! Axum route handlers for the Interview API.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::errors::AppError;
use crate::feedback::segmenter::FeedbackReport;
use crate::interview::company_check::{check, ValidationOutcome};
use crate::interview::models::{CompanyIdentity, InterviewDetails};
use crate::interview::service::{answer, end_interview, reset, start_interview};
use crate::interview::session::InterviewSession;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct ValidateResponse {
    #[serde(flatten)]
    pub outcome: ValidationOutcome,
    /// User-facing explanation, present only for rejections.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
}

#[derive(Debug, Deserialize)]
pub struct AnswerRequest {
    pub text: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/interviews/validate
///
/// Runs the company/URL plausibility check without starting an interview.
pub async fn handle_validate(Json(request): Json<CompanyIdentity>) -> Json<ValidateResponse> {
    let outcome = check(&request.company_name, &request.company_url);
    debug!(accepted = outcome.is_accepted(), "Company check: {}", request.company_name);
    let message = match &outcome {
        ValidationOutcome::Rejected { reason } => Some(reason.user_message()),
        ValidationOutcome::Accepted { .. } => None,
    };
    Json(ValidateResponse { outcome, message })
}

/// POST /api/v1/interviews
///
/// Validates the setup form, opens a session and returns it with the first question.
pub async fn handle_start(
    State(state): State<AppState>,
    Json(details): Json<InterviewDetails>,
) -> Result<(StatusCode, Json<InterviewSession>), AppError> {
    require_field("company_name", &details.company_name)?;
    require_field("job_role", &details.job_role)?;
    require_field("company_url", &details.company_url)?;

    let session = start_interview(&state.sessions, state.model.as_ref(), details).await?;
    Ok((StatusCode::CREATED, Json(session)))
}

/// GET /api/v1/interviews/:id
pub async fn handle_get(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<InterviewSession>, AppError> {
    Ok(Json(state.sessions.get(id).await?))
}

/// POST /api/v1/interviews/:id/messages
///
/// Appends the candidate's answer and the interviewer's follow-up question.
pub async fn handle_answer(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<AnswerRequest>,
) -> Result<Json<InterviewSession>, AppError> {
    let session = answer(&state.sessions, state.model.as_ref(), id, request.text).await?;
    Ok(Json(session))
}

/// POST /api/v1/interviews/:id/feedback
///
/// Ends the interview and returns the raw and segmented feedback report.
pub async fn handle_feedback(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<FeedbackReport>, AppError> {
    let report = end_interview(&state.sessions, state.model.as_ref(), id).await?;
    Ok(Json(report))
}

/// DELETE /api/v1/interviews/:id
pub async fn handle_reset(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    reset(&state.sessions, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Mirrors the setup form's `required` fields: present and non-empty.
fn require_field(name: &str, value: &str) -> Result<(), AppError> {
    if value.is_empty() {
        return Err(AppError::Validation(format!("{name} cannot be empty")));
    }
    Ok(())
}
