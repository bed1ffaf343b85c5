//! Feedback segmenter — splits a generated feedback report into titled sections.
//!
//! The report is expected to carry three bold titles in the raw text:
//! `**Overall Assessment**`, `**Key Strengths**`, `**Areas for Improvement**`.
//! Segmentation is positional: after splitting on those markers, segments at even
//! positions are titles and segments at odd positions are the body of the preceding
//! title. Nothing is looked up by name, so duplicated or reordered titles pair with
//! whatever follows them.

use serde::Serialize;

/// Section titles recognised in the raw report, in their canonical order.
pub const MARKER_TITLES: &[&str] = &["Overall Assessment", "Key Strengths", "Areas for Improvement"];

const MARKER_DELIMITER: &str = "**";

/// Title fragments whose body is rendered as a bullet list.
const BULLET_TITLE_HINTS: &[&str] = &["Strengths", "Improvement"];

const BULLET_SEPARATORS: [char; 2] = ['\n', '-'];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "body", rename_all = "snake_case")]
pub enum SectionBody {
    /// Free text, rendered with whitespace preserved.
    Narrative(String),
    BulletList(Vec<String>),
}

/// One renderable block of a feedback report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedSection {
    /// `None` only for unstructured text with no recognised markers.
    pub title: Option<String>,
    #[serde(flatten)]
    pub body: SectionBody,
}

/// A raw feedback report alongside its segmented form.
#[derive(Debug, Clone, Serialize)]
pub struct FeedbackReport {
    pub raw: String,
    pub sections: Vec<RenderedSection>,
}

impl FeedbackReport {
    pub fn from_raw(raw: String) -> Self {
        let sections = segment(&raw);
        Self { raw, sections }
    }
}

/// Byte span of one `**Title**` marker in the source text.
#[derive(Debug, Clone, Copy)]
struct MarkerSpan {
    start: usize,
    end: usize,
    title: &'static str,
}

/// Splits `text` into ordered sections. Never fails; empty input yields no sections.
pub fn segment(text: &str) -> Vec<RenderedSection> {
    let spans = locate_markers(text);

    if spans.is_empty() {
        if text.is_empty() {
            return Vec::new();
        }
        return vec![RenderedSection {
            title: None,
            body: SectionBody::Narrative(text.trim().to_string()),
        }];
    }

    interleave(text, &spans)
        .chunks(2)
        .filter_map(|pair| match pair {
            [title, body] => Some(build_section(title, body)),
            _ => None,
        })
        .collect()
}

/// Finds every marker left to right in one pass. Markers never overlap.
fn locate_markers(text: &str) -> Vec<MarkerSpan> {
    let markers: Vec<(String, &'static str)> = MARKER_TITLES
        .iter()
        .map(|&title| (format!("{MARKER_DELIMITER}{title}{MARKER_DELIMITER}"), title))
        .collect();

    let bytes = text.as_bytes();
    let mut spans = Vec::new();
    let mut pos = 0;

    while pos < bytes.len() {
        if bytes[pos] != b'*' {
            pos += 1;
            continue;
        }
        let hit = markers
            .iter()
            .find(|(marker, _)| bytes[pos..].starts_with(marker.as_bytes()));
        match hit {
            Some((marker, title)) => {
                spans.push(MarkerSpan {
                    start: pos,
                    end: pos + marker.len(),
                    title: *title,
                });
                pos += marker.len();
            }
            None => pos += 1,
        }
    }

    spans
}

/// Builds the content/title/content/... sequence, dropping blank segments.
fn interleave<'a>(text: &'a str, spans: &[MarkerSpan]) -> Vec<&'a str> {
    let mut segments = Vec::with_capacity(spans.len() * 2 + 1);
    let mut cursor = 0;

    for span in spans {
        segments.push(&text[cursor..span.start]);
        segments.push(span.title);
        cursor = span.end;
    }
    segments.push(&text[cursor..]);

    segments.retain(|part| !part.trim().is_empty());
    segments
}

fn build_section(title: &str, body: &str) -> RenderedSection {
    let body = body.trim();
    let is_bullet_section = BULLET_TITLE_HINTS.iter().any(|hint| title.contains(hint));

    let body = if is_bullet_section {
        SectionBody::BulletList(split_bullets(body))
    } else {
        SectionBody::Narrative(body.to_string())
    };

    RenderedSection {
        title: Some(title.trim().to_string()),
        body,
    }
}

/// Splits on newlines and hyphens. Hyphenated words are split too.
fn split_bullets(body: &str) -> Vec<String> {
    body.split(BULLET_SEPARATORS)
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .map(|piece| piece.strip_prefix('*').unwrap_or(piece).trim().to_string())
        .collect()
}
