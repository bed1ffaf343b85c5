// Feedback report segmentation for structured rendering.

pub mod handlers;
pub mod segmenter;
