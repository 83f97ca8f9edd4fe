// Text Processing Service
// Sentence, paragraph and word segmentation shared by every check

use regex::Regex;
use std::sync::OnceLock;

fn sentence_boundary_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[.!?]\s+").expect("sentence boundary regex"))
}

fn paragraph_break_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\n\s*\n").expect("paragraph break regex"))
}

/// Split text into trimmed, non-empty sentences.
///
/// A boundary is a `.`, `!` or `?` immediately followed by whitespace; the
/// punctuation stays with the sentence it closes. Order is preserved.
pub fn segment_sentences(text: &str) -> Vec<String> {
    if text.trim().is_empty() {
        return vec![];
    }

    let mut sentences = Vec::new();
    let mut cursor = 0usize;

    for m in sentence_boundary_re().find_iter(text) {
        // The punctuation mark is a single ASCII byte.
        let piece = text[cursor..m.start() + 1].trim();
        if !piece.is_empty() {
            sentences.push(piece.to_string());
        }
        cursor = m.end();
    }

    let tail = text[cursor..].trim();
    if !tail.is_empty() {
        sentences.push(tail.to_string());
    }

    sentences
}

/// Split text into paragraphs on blank lines, trimming each and dropping empty ones
pub fn split_paragraphs(text: &str) -> Vec<String> {
    if text.trim().is_empty() {
        return vec![];
    }

    paragraph_break_re()
        .split(text)
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}

/// Lowercased maximal runs of Unicode letters, in order of appearance
pub fn word_tokens(text: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();

    for ch in text.chars() {
        if ch.is_alphabetic() {
            current.extend(ch.to_lowercase());
        } else if !current.is_empty() {
            tokens.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        tokens.push(current);
    }

    tokens
}

/// Collapse every whitespace run to a single space and trim the ends
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Truncate to `max_chars` characters for log and CLI previews
pub fn preview(text: &str, max_chars: usize) -> String {
    let mut out: String = text.chars().take(max_chars).collect();
    if text.chars().count() > max_chars {
        out.push_str("...");
    }
    out.replace('\n', " ")
}
