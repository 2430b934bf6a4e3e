//! Quote verification against the scenario evidence
//!
//! Debaters wrap citations in `<quote>` tags. Each span is rewritten as
//! `<v_quote>` when its normalized text occurs in the normalized evidence,
//! and as `<u_quote>` otherwise. Normalization strips `. , ; : ! ?`,
//! lower-cases and trims; matching is plain substring search, nothing fuzzy.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

static QUOTE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<quote>(.*?)</quote>").expect("invalid quote regex"));

const STRIPPED: [char; 6] = ['.', ',', ';', ':', '!', '?'];

/// Outcome of checking one quoted span
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteCheck {
    /// Quote text as written (trimmed)
    pub quote: String,
    /// Whether it was found in the evidence
    pub verified: bool,
}

/// Strip the fixed punctuation set, lower-case, trim
pub fn normalize(text: &str) -> String {
    text.chars()
        .filter(|c| !STRIPPED.contains(c))
        .collect::<String>()
        .to_lowercase()
        .trim()
        .to_string()
}

fn is_verified(quote: &str, normalized_source: &str) -> bool {
    let needle = normalize(quote);
    // An empty quote cites nothing.
    !needle.is_empty() && normalized_source.contains(&needle)
}

/// Rewrite every `<quote>` span as `<v_quote>` or `<u_quote>`.
///
/// Text outside quote tags is returned unchanged.
pub fn validate_citations(text: &str, source: &str) -> String {
    let normalized_source = normalize(source);
    QUOTE_RE
        .replace_all(text, |caps: &Captures| {
            let quote = caps[1].trim();
            let tag = if is_verified(quote, &normalized_source) {
                "v_quote"
            } else {
                "u_quote"
            };
            format!("<{tag}>{quote}</{tag}>")
        })
        .into_owned()
}

/// Per-quote verification report, in order of appearance
pub fn check_quotes(text: &str, source: &str) -> Vec<QuoteCheck> {
    let normalized_source = normalize(source);
    QUOTE_RE
        .captures_iter(text)
        .map(|caps| {
            let quote = caps[1].trim().to_string();
            let verified = is_verified(&quote, &normalized_source);
            QuoteCheck { quote, verified }
        })
        .collect()
}
