//! Interview service — setup check, question/answer turns and the feedback report.
//!
//! Model failures never surface as errors to the candidate. They are logged and
//! replaced with placeholder text, except for the opening question: without it
//! there is no interview, so the session is discarded and the placeholder is
//! returned as `AppError::InterviewUnavailable`.

use tracing::{error, info};
use uuid::Uuid;

use crate::errors::AppError;
use crate::feedback::segmenter::FeedbackReport;
use crate::interview::company_check::{check, ValidationOutcome};
use crate::interview::models::{ChatMessage, InterviewDetails, InterviewState};
use crate::interview::prompts::{feedback_prompt, interviewer_system, opening_prompt};
use crate::interview::session::{InterviewSession, SessionStore};
use crate::llm_client::{ChatModel, ChatTurn};

pub const FIRST_QUESTION_FALLBACK: &str =
    "I seem to be having trouble connecting. Let's try starting over.";
pub const FOLLOW_UP_FALLBACK: &str = "An error occurred. Please try again or end the interview.";
pub const FEEDBACK_FALLBACK: &str =
    "There was an error generating your feedback. Please try again later.";

/// Validates the company, opens a session and asks the first question.
pub async fn start_interview(
    store: &SessionStore,
    model: &dyn ChatModel,
    mut details: InterviewDetails,
) -> Result<InterviewSession, AppError> {
    match check(&details.company_name, &details.company_url) {
        ValidationOutcome::Accepted { normalized_url } => details.company_url = normalized_url,
        ValidationOutcome::Rejected { reason } => {
            info!(
                company = %details.company_name,
                url = %details.company_url,
                "Company check rejected setup: {reason}"
            );
            return Err(AppError::Validation(reason.user_message().to_string()));
        }
    }

    let system = interviewer_system(&details);
    let opening = opening_prompt(&details);

    let first_question = model
        .complete(Some(&system), &[ChatTurn::user(opening.as_str())])
        .await
        .map_err(|e| {
            error!("Error getting first question: {e}");
            AppError::InterviewUnavailable(FIRST_QUESTION_FALLBACK.to_string())
        })?;

    let session = InterviewSession::opened(details, opening, first_question);
    info!(
        interview_id = %session.id,
        company = %session.details.company_name,
        role = %session.details.job_role,
        "Interview started"
    );
    store.insert(session.clone()).await;

    Ok(session)
}

/// Records the candidate's answer and returns the session with the interviewer's reply.
pub async fn answer(
    store: &SessionStore,
    model: &dyn ChatModel,
    id: Uuid,
    text: String,
) -> Result<InterviewSession, AppError> {
    if text.trim().is_empty() {
        return Err(AppError::Validation("Answer cannot be empty".to_string()));
    }

    let ((system, mut turns), guard) = store
        .begin(id, InterviewState::Interviewing, |session| {
            session.ensure_ready(InterviewState::Interviewing)?;
            session.touch();
            Ok((
                interviewer_system(&session.details),
                session.model_history.clone(),
            ))
        })
        .await?;

    turns.push(ChatTurn::user(text.as_str()));

    let reply = model.complete(Some(&system), &turns).await;

    let session = store
        .update(id, |session| {
            session.in_flight = false;
            session.transcript.push(ChatMessage::user(text.as_str()));
            match reply {
                Ok(question) => {
                    session.model_history.push(ChatTurn::user(text));
                    session.model_history.push(ChatTurn::assistant(question.as_str()));
                    session.transcript.push(ChatMessage::ai(question));
                }
                Err(e) => {
                    error!(interview_id = %id, "Error getting follow-up question: {e}");
                    session.transcript.push(ChatMessage::ai(FOLLOW_UP_FALLBACK));
                }
            }
            session.touch();
            Ok(session.clone())
        })
        .await?;
    guard.disarm();

    Ok(session)
}

/// Ends the interview and produces the segmented feedback report.
/// Once produced, the report is returned as-is on repeated calls.
pub async fn end_interview(
    store: &SessionStore,
    model: &dyn ChatModel,
    id: Uuid,
) -> Result<FeedbackReport, AppError> {
    if let Some(report) = store
        .update(id, |session| match (session.state, &session.feedback) {
            (InterviewState::Feedback, Some(report)) => Ok(Some(report.clone())),
            _ => Ok(None),
        })
        .await?
    {
        return Ok(report);
    }

    let ((details, transcript), guard) = store
        .begin(id, InterviewState::Interviewing, |session| {
            session.ensure_ready(InterviewState::Interviewing)?;
            session.state = InterviewState::LoadingFeedback;
            session.touch();
            Ok((session.details.clone(), session.transcript.clone()))
        })
        .await?;

    let prompt = feedback_prompt(&details, &transcript);
    let raw = model
        .complete(None, &[ChatTurn::user(prompt)])
        .await
        .unwrap_or_else(|e| {
            error!(interview_id = %id, "Error generating feedback: {e}");
            FEEDBACK_FALLBACK.to_string()
        });

    let report = FeedbackReport::from_raw(raw);
    info!(
        interview_id = %id,
        sections = report.sections.len(),
        "Feedback report ready"
    );

    store
        .update(id, |session| {
            session.in_flight = false;
            session.state = InterviewState::Feedback;
            session.feedback = Some(report.clone());
            session.touch();
            Ok(())
        })
        .await?;
    guard.disarm();

    Ok(report)
}

/// Discards the session so the candidate can start a new interview.
pub async fn reset(store: &SessionStore, id: Uuid) -> Result<(), AppError> {
    store.remove(id).await?;
    info!(interview_id = %id, "Interview discarded");
    Ok(())
}
