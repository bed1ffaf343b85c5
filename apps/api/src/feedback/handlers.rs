//! Axum route handlers for the Feedback API.

use axum::Json;
use serde::{Deserialize, Serialize};

use crate::feedback::segmenter::{segment, RenderedSection};

#[derive(Debug, Deserialize)]
pub struct SegmentRequest {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct SegmentResponse {
    pub sections: Vec<RenderedSection>,
}

/// POST /api/v1/feedback/segment
///
/// Segments arbitrary feedback text. Never fails on any string input.
pub async fn handle_segment(Json(request): Json<SegmentRequest>) -> Json<SegmentResponse> {
    Json(SegmentResponse {
        sections: segment(&request.text),
    })
}
