use serde::{Deserialize, Serialize};

/// What the candidate is interviewing for. `company_url` is normalized once the
/// company check accepts it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterviewDetails {
    pub company_name: String,
    pub job_role: String,
    pub company_url: String,
}

/// Input to the company/URL plausibility check.
#[derive(Debug, Clone, Deserialize)]
pub struct CompanyIdentity {
    pub company_name: String,
    pub company_url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    Ai,
    User,
}

impl Speaker {
    /// Label used when the transcript is written out for the feedback prompt.
    pub fn transcript_label(&self) -> &'static str {
        match self {
            Speaker::Ai => "Interviewer",
            Speaker::User => "Candidate",
        }
    }
}

/// One visible line of the interview transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub speaker: Speaker,
    pub text: String,
}

impl ChatMessage {
    pub fn ai(text: impl Into<String>) -> Self {
        Self {
            speaker: Speaker::Ai,
            text: text.into(),
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self {
            speaker: Speaker::User,
            text: text.into(),
        }
    }
}

/// Lifecycle of a live session. Setup has no session yet, so it has no state here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterviewState {
    Interviewing,
    LoadingFeedback,
    Feedback,
}
