//! Tag-scoped extraction of model output
//!
//! Models are asked to answer as `<thinking>...</thinking>` followed by
//! `<argument>...</argument>`. Extraction never fails: when a model ignores
//! the convention the whole (trimmed) output stands in for the missing part.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static BLOCK_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)<thinking>(.*?)</thinking>|<argument>(.*?)</argument>")
        .expect("invalid block regex")
});

static ANSWER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)Answer:[ \t]*(?:<[ \t]*([A-Za-z])[ \t]*>|([A-Z])\b)")
        .expect("invalid answer regex")
});

/// Trimmed contents of every non-overlapping `<tag>...</tag>` span.
///
/// Matching is case-sensitive and spans may cross lines.
pub fn extract_tag_content(text: &str, tag: &str) -> Vec<String> {
    let pattern = format!(
        r"(?s)<{tag}>(.*?)</{tag}>",
        tag = regex::escape(tag)
    );
    match Regex::new(&pattern) {
        Ok(re) => re
            .captures_iter(text)
            .map(|caps| caps[1].trim().to_string())
            .collect(),
        Err(e) => {
            tracing::warn!(tag, error = %e, "Unusable tag name");
            Vec::new()
        }
    }
}

fn joined_or_whole(parts: Vec<String>, text: &str) -> String {
    if parts.is_empty() {
        text.trim().to_string()
    } else {
        parts.join("\n\n").trim().to_string()
    }
}

/// Private reasoning, or the whole output when untagged
pub fn extract_thinking(text: &str) -> String {
    joined_or_whole(extract_tag_content(text, "thinking"), text)
}

/// Public argument, or the whole output when untagged
pub fn extract_arguments(text: &str) -> String {
    joined_or_whole(extract_tag_content(text, "argument"), text)
}

/// Raw `<quote>` contents
pub fn extract_quotes(text: &str) -> Vec<String> {
    extract_tag_content(text, "quote")
}

/// Final `Answer: X` letter in a response, upper-cased.
///
/// Accepts `Answer: A` and `Answer: <A>`; the last occurrence wins.
/// The letter must follow on the same line and stand alone, so prose
/// such as `Answer: Based on...` carries no label.
pub fn parse_answer_label(text: &str) -> Option<String> {
    ANSWER_RE
        .captures_iter(text)
        .filter_map(|caps| caps.get(1).or_else(|| caps.get(2)))
        .last()
        .map(|m| m.as_str().to_uppercase())
}

/// Kind of a top-level output segment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentKind {
    Thinking,
    Argument,
    Text,
}

/// One top-level piece of model output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    pub kind: SegmentKind,
    pub content: String,
}

impl Segment {
    fn new(kind: SegmentKind, content: &str) -> Self {
        Self {
            kind,
            content: content.trim().to_string(),
        }
    }
}

/// Split output into ordered thinking / argument / text segments.
///
/// Untagged output becomes a single argument segment.
pub fn segments(text: &str) -> Vec<Segment> {
    let mut out = Vec::new();
    let mut cursor = 0;

    for caps in BLOCK_RE.captures_iter(text) {
        let Some(whole) = caps.get(0) else { continue };
        let between = &text[cursor..whole.start()];
        if !between.trim().is_empty() {
            out.push(Segment::new(SegmentKind::Text, between));
        }
        if let Some(thinking) = caps.get(1) {
            out.push(Segment::new(SegmentKind::Thinking, thinking.as_str()));
        } else if let Some(argument) = caps.get(2) {
            out.push(Segment::new(SegmentKind::Argument, argument.as_str()));
        }
        cursor = whole.end();
    }

    if out.is_empty() {
        return vec![Segment::new(SegmentKind::Argument, text)];
    }

    let rest = &text[cursor..];
    if !rest.trim().is_empty() {
        out.push(Segment::new(SegmentKind::Text, rest));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_arguments_fallback() {
        assert_eq!(extract_arguments("  no tags here \n"), "no tags here");
        assert_eq!(extract_arguments("<argument>X</argument>"), "X");
        assert_eq!(
            extract_arguments("<argument>X</argument><argument>Y</argument>"),
            "X\n\nY"
        );
    }

    #[test]
    fn test_extract_thinking() {
        let text = "<thinking>\n step one \n</thinking>\n<argument>claim</argument>";
        assert_eq!(extract_thinking(text), "step one");
        assert_eq!(extract_thinking("just text"), "just text");
    }

    #[test]
    fn test_tags_are_case_sensitive() {
        assert!(extract_tag_content("<Argument>x</Argument>", "argument").is_empty());
        assert_eq!(
            extract_arguments("<Argument>x</Argument>"),
            "<Argument>x</Argument>"
        );
    }

    #[test]
    fn test_multiline_content() {
        let text = "<argument>line one\nline two</argument>";
        assert_eq!(extract_tag_content(text, "argument"), vec!["line one\nline two"]);
    }

    #[test]
    fn test_extract_quotes() {
        let text = "<quote>a</quote> and <quote> b </quote>";
        assert_eq!(extract_quotes(text), vec!["a", "b"]);
    }

    #[test]
    fn test_parse_answer_label() {
        assert_eq!(parse_answer_label("...\nAnswer: B"), Some("B".to_string()));
        assert_eq!(parse_answer_label("Answer: <a>"), Some("A".to_string()));
        assert_eq!(
            parse_answer_label("Answer: A was wrong.\nAnswer: B"),
            Some("B".to_string())
        );
        assert_eq!(parse_answer_label("no verdict"), None);
    }

    #[test]
    fn test_parse_answer_label_ignores_prose() {
        assert_eq!(
            parse_answer_label("...\nAnswer: Based on the verified quotes, A"),
            None
        );
        assert_eq!(
            parse_answer_label("Answer: Both sides were weak, but A edged it"),
            None
        );
        assert_eq!(parse_answer_label("Answer:\n\nBelow is my reasoning"), None);
        assert_eq!(parse_answer_label("Answer: A."), Some("A".to_string()));
        assert_eq!(parse_answer_label("Answer: < b >"), Some("B".to_string()));
    }

    #[test]
    fn test_segments_order() {
        let text = "intro <thinking>t</thinking> mid <argument>a</argument> outro";
        let kinds: Vec<_> = segments(text).into_iter().map(|s| s.kind).collect();
        assert_eq!(
            kinds,
            vec![
                SegmentKind::Text,
                SegmentKind::Thinking,
                SegmentKind::Text,
                SegmentKind::Argument,
                SegmentKind::Text,
            ]
        );
    }

    #[test]
    fn test_segments_untagged() {
        assert_eq!(
            segments(" whole reply "),
            vec![Segment {
                kind: SegmentKind::Argument,
                content: "whole reply".to_string()
            }]
        );
    }
}
