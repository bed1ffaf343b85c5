// Interview simulation: company check, session lifecycle, question/answer turns and
// the end-of-interview feedback report.
// All LLM calls go through llm_client — no direct Anthropic calls here.

pub mod company_check;
pub mod handlers;
pub mod models;
pub mod prompts;
pub mod service;
pub mod session;
