use std::sync::Arc;

use crate::interview::session::SessionStore;
use crate::llm_client::ChatModel;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Pluggable conversational model. Default: `LlmClient` (Anthropic Messages API).
    pub model: Arc<dyn ChatModel>,
    /// Live interview sessions, held in memory only.
    pub sessions: SessionStore,
}
