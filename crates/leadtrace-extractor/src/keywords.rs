//! Keyword extraction from lead text
//!
//! Emits lowercase word tokens plus 2- and 3-word phrases so that both
//! single-term and phrase-level rule matching work downstream. Output order
//! follows first occurrence; duplicates are dropped.

use std::collections::HashSet;

/// Extract keywords from a text block: words plus phrases up to
/// `phrase_window` words, lowercased and deduplicated
pub fn extract_keywords(text: &str, phrase_window: usize) -> Vec<String> {
    let words = tokenize(text);

    let mut seen = HashSet::new();
    let mut keywords = Vec::new();
    let mut push = |kw: String| {
        if seen.insert(kw.clone()) {
            keywords.push(kw);
        }
    };

    for word in &words {
        push(word.clone());
    }
    for window in 2..=phrase_window.max(1) {
        for chunk in words.windows(window) {
            push(chunk.join(" "));
        }
    }

    keywords
}

/// Split text into lowercase alphanumeric word tokens
fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_string)
        .collect()
}
