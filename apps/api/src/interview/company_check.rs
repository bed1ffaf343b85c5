//! Company/URL plausibility check — a cheap pre-flight guard run before any LLM call.
//!
//! Heuristic only: a company name is accepted when one of its significant words, or
//! the acronym of those words, appears in the URL's hostname. False accepts and false
//! rejects on edge cases (short acronyms, generic hostnames) are expected.

use std::fmt;

use serde::{Serialize, Serializer};
use url::Url;

/// Words that carry no identifying signal in a company name.
const STOP_WORDS: &[&str] = &[
    "the",
    "a",
    "an",
    "and",
    "co",
    "corp",
    "corporation",
    "inc",
    "ltd",
    "llc",
    "&",
];

const DEFAULT_SCHEME_PREFIX: &str = "https://";

/// Why a company name / URL pair was rejected. Serialized as its Display text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectionReason {
    InvalidUrl,
    NameTooGeneric,
    NameUrlMismatch,
}

impl RejectionReason {
    /// Sentence shown to the user next to the setup form.
    pub fn user_message(&self) -> &'static str {
        match self {
            RejectionReason::InvalidUrl => {
                "The provided URL is not valid. Please enter a valid URL like 'https://company.com'."
            }
            RejectionReason::NameTooGeneric => "Please provide a more specific company name.",
            RejectionReason::NameUrlMismatch => {
                "The company name doesn't seem to match the URL. Please double-check the company's homepage URL."
            }
        }
    }
}

impl fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            RejectionReason::InvalidUrl => "invalid URL",
            RejectionReason::NameTooGeneric => "name too generic",
            RejectionReason::NameUrlMismatch => "name/URL mismatch",
        };
        f.write_str(reason)
    }
}

impl Serialize for RejectionReason {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Result of a single plausibility check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ValidationOutcome {
    Accepted { normalized_url: String },
    Rejected { reason: RejectionReason },
}

impl ValidationOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, ValidationOutcome::Accepted { .. })
    }
}

/// Checks whether `company_name` plausibly belongs to `company_url`.
///
/// Steps:
/// 1. Prefix `https://` when the URL has no http(s) scheme, then parse it
/// 2. Tokenize the name, dropping stop-words and single-character words
/// 3. Accept when any token is a substring of the hostname
/// 4. Accept when the acronym of 2+ tokens is a substring of the hostname
pub fn check(company_name: &str, company_url: &str) -> ValidationOutcome {
    let normalized_url = normalize_url(company_url);

    let hostname = match Url::parse(&normalized_url) {
        Ok(parsed) => parsed.host_str().unwrap_or_default().to_lowercase(),
        Err(_) => {
            return ValidationOutcome::Rejected {
                reason: RejectionReason::InvalidUrl,
            }
        }
    };

    let words = significant_words(company_name);

    if words.is_empty() && !company_name.is_empty() {
        return ValidationOutcome::Rejected {
            reason: RejectionReason::NameTooGeneric,
        };
    }

    let word_in_host = words.iter().any(|word| hostname.contains(word.as_str()));

    let acronym_in_host = words.len() > 1 && {
        let acronym: String = words.iter().filter_map(|word| word.chars().next()).collect();
        acronym.chars().count() > 1 && hostname.contains(&acronym)
    };

    if !word_in_host && !acronym_in_host && !words.is_empty() {
        return ValidationOutcome::Rejected {
            reason: RejectionReason::NameUrlMismatch,
        };
    }

    ValidationOutcome::Accepted { normalized_url }
}

/// Prepends `https://` unless the URL already starts with `http://` or `https://`.
pub fn normalize_url(company_url: &str) -> String {
    if has_http_scheme(company_url) {
        company_url.to_string()
    } else {
        format!("{DEFAULT_SCHEME_PREFIX}{company_url}")
    }
}

fn has_http_scheme(url: &str) -> bool {
    let starts_with = |prefix: &str| {
        url.get(..prefix.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
    };
    starts_with("http://") || starts_with("https://")
}

/// Lowercased name words with punctuation, stop-words and single characters removed.
fn significant_words(company_name: &str) -> Vec<String> {
    company_name
        .to_lowercase()
        .replace([',', '.'], "")
        .split_whitespace()
        .filter(|word| !STOP_WORDS.contains(word) && word.chars().count() > 1)
        .map(str::to_string)
        .collect()
}
