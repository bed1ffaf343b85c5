// All LLM prompt constants for the Interview module.
// Reuses cross-cutting fragments from llm_client::prompts.

use crate::interview::models::{ChatMessage, InterviewDetails};
use crate::llm_client::prompts::{CONCISE_QUESTION_INSTRUCTION, PLAIN_TEXT_INSTRUCTION};

/// Interviewer persona. Replace: {company_name}, {job_role}, {company_url},
/// {concise_instruction}
pub const INTERVIEWER_SYSTEM_TEMPLATE: &str = "You are a senior hiring manager at {company_name} with over 10 years of industry experience. Your goal is to interview a candidate for the {job_role} position.
Analyze the candidate's responses carefully and ask relevant, insightful follow-up questions to gauge their skills, experience, and cultural fit.
Maintain a professional, thoughtful, and slightly critical tone, consistent with a senior manager at a company like {company_name} (which has a website at {company_url}).
Your questions should be open-ended and dig deeper into the candidate's previous statements. Do not greet or make small talk, just ask the question.
{concise_instruction}";

/// First user turn of every interview. Replace: {job_role}, {company_name}
pub const OPENING_PROMPT_TEMPLATE: &str = "Start the interview with a strong, open-ended question relevant to the {job_role} role at {company_name}.";

/// Feedback report prompt. Replace: {job_role}, {company_name}, {plain_text_instruction},
/// {transcript}
pub const FEEDBACK_PROMPT_TEMPLATE: &str = r#"You are an expert career coach providing feedback on a job interview for a {job_role} position at {company_name}.
Based on the interview transcript below, write a comprehensive feedback report for the candidate.
Use an encouraging yet professional tone. Reference specific things the candidate said.
Format the report into three distinct sections with the exact following bolded titles.
{plain_text_instruction}

---
TRANSCRIPT:
{transcript}
---

FEEDBACK REPORT:
**Overall Assessment**
Provide a narrative summary here. The text must be plain.

**Key Strengths**
Use a bulleted list. Each bullet point MUST start with a hyphen '-'. The text for each point must be plain.

**Areas for Improvement**
Use a bulleted list. Each bullet point MUST start with a hyphen '-'. The text for each point must be plain."#;

pub fn interviewer_system(details: &InterviewDetails) -> String {
    INTERVIEWER_SYSTEM_TEMPLATE
        .replace("{company_name}", &details.company_name)
        .replace("{job_role}", &details.job_role)
        .replace("{company_url}", &details.company_url)
        .replace("{concise_instruction}", CONCISE_QUESTION_INSTRUCTION)
}

pub fn opening_prompt(details: &InterviewDetails) -> String {
    OPENING_PROMPT_TEMPLATE
        .replace("{job_role}", &details.job_role)
        .replace("{company_name}", &details.company_name)
}

pub fn feedback_prompt(details: &InterviewDetails, transcript: &[ChatMessage]) -> String {
    FEEDBACK_PROMPT_TEMPLATE
        .replace("{job_role}", &details.job_role)
        .replace("{company_name}", &details.company_name)
        .replace("{plain_text_instruction}", PLAIN_TEXT_INSTRUCTION)
        .replace("{transcript}", &format_transcript(transcript))
}

/// `Interviewer: ...` / `Candidate: ...` blocks separated by blank lines.
pub fn format_transcript(transcript: &[ChatMessage]) -> String {
    transcript
        .iter()
        .map(|msg| format!("{}: {}", msg.speaker.transcript_label(), msg.text))
        .collect::<Vec<_>>()
        .join("\n\n")
}
