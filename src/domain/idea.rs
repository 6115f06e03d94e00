use std::sync::LazyLock;

use regex::Regex;
use unicode_segmentation::UnicodeSegmentation;

pub const MAX_TITLE_LEN: usize = 255;
pub const MAX_DESCRIPTION_LEN: usize = 1000;

const UNTITLED: &str = "Untitled";
const NO_DESCRIPTION: &str = "No description provided";
const DESCRIPTION_MARKER: &str = "Description:";

static TITLE_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)title:[ \t]*([^\n]*)").expect("title pattern is valid"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueIdea {
    pub title: String,
    pub description: String,
}

impl IssueIdea {
    /// Parses free-form completion text laid out as `Title: ...` / `Description:\n...`.
    /// Missing markers fall back to placeholders instead of failing.
    pub fn extract(raw: &str) -> Self {
        Self {
            title: extract_title(raw),
            description: extract_description(raw),
        }
    }

    /// Enforces the ticket tracker's field limits. Lengths are counted in
    /// user-perceived characters (grapheme clusters).
    pub fn sanitized(self) -> Self {
        let single_line = flatten_line_breaks(&self.title);
        Self {
            title: truncate_graphemes(&single_line, MAX_TITLE_LEN),
            description: truncate_graphemes(&self.description, MAX_DESCRIPTION_LEN),
        }
    }
}

fn extract_title(raw: &str) -> String {
    TITLE_LINE
        .captures(raw)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
        .filter(|title| !title.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| UNTITLED.to_string())
}

fn extract_description(raw: &str) -> String {
    match raw.split_once(DESCRIPTION_MARKER) {
        Some((_, rest)) => rest.trim().to_string(),
        None => NO_DESCRIPTION.to_string(),
    }
}

fn flatten_line_breaks(value: &str) -> String {
    value.replace("\r\n", " ").replace(['\n', '\r'], " ")
}

fn truncate_graphemes(value: &str, max: usize) -> String {
    match value.grapheme_indices(true).nth(max) {
        Some((cut, _)) => value[..cut].to_string(),
        None => value.to_string(),
    }
}
