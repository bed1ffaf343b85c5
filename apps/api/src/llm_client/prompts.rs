// Shared prompt fragments.
// Each service that needs LLM calls defines its own prompts.rs alongside it.
// This file contains cross-cutting prompt fragments.

/// Keeps interviewer turns short enough to read in a chat bubble.
pub const CONCISE_QUESTION_INSTRUCTION: &str =
    "**Keep your questions concise and to the point, ideally one to two sentences maximum.**";

/// Stops the model from decorating section content with markdown.
pub const PLAIN_TEXT_INSTRUCTION: &str = "IMPORTANT: Do not use any bolding, italics, or other \
    markdown in the content of the sections. Bolding is ONLY for the three section titles.";
