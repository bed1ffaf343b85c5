pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::feedback::handlers as feedback;
use crate::interview::handlers as interview;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Interview API
        .route("/api/v1/interviews", post(interview::handle_start))
        .route(
            "/api/v1/interviews/validate",
            post(interview::handle_validate),
        )
        .route(
            "/api/v1/interviews/:id",
            get(interview::handle_get).delete(interview::handle_reset),
        )
        .route(
            "/api/v1/interviews/:id/messages",
            post(interview::handle_answer),
        )
        .route(
            "/api/v1/interviews/:id/feedback",
            post(interview::handle_feedback),
        )
        // Feedback API
        .route("/api/v1/feedback/segment", post(feedback::handle_segment))
        .with_state(state)
}
