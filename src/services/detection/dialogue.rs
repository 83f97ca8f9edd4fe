// Dialogue Loop Check
// Detects the same spoken line (dash-prefixed or quoted) recurring within one chunk

use crate::models::ReasonCode;
use crate::services::text_processor::collapse_whitespace;
use regex::Regex;
use std::collections::HashMap;
use std::sync::OnceLock;

const DIALOGUE_DASHES: [char; 2] = ['-', '\u{2014}'];
const TRAILING_PUNCT: [char; 8] = ['.', '!', '?', ',', ';', ':', '-', ' '];

fn quoted_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"["\u{201C}\u{201D}]([^"\u{201C}\u{201D}]+)["\u{201C}\u{201D}]"#)
            .expect("quoted dialogue regex")
    })
}

/// Lowercase, collapse whitespace, drop trailing punctuation
pub fn normalize_snippet(snippet: &str) -> String {
    let collapsed = collapse_whitespace(&snippet.to_lowercase());
    collapsed.trim_end_matches(&TRAILING_PUNCT[..]).trim().to_string()
}

/// Raw dialogue snippets of one line, in order: the dash remainder first, then quotes
pub fn extract_line_snippets(line: &str) -> Vec<&str> {
    let mut snippets = Vec::new();

    let trimmed = line.trim();
    if trimmed.starts_with(&DIALOGUE_DASHES[..]) {
        let rest = trimmed
            .trim_start_matches(|c: char| DIALOGUE_DASHES.contains(&c) || c.is_whitespace());
        snippets.push(rest);
    }

    for cap in quoted_re().captures_iter(line) {
        if let Some(m) = cap.get(1) {
            snippets.push(m.as_str());
        }
    }

    snippets
}

/// Fails the first time a normalized, non-empty snippet is seen twice
pub fn check_dialogue_loop(chunk: &str) -> Option<ReasonCode> {
    let mut counts: HashMap<String, usize> = HashMap::new();

    for line in chunk.lines() {
        for snippet in extract_line_snippets(line) {
            let key = normalize_snippet(snippet);
            if key.is_empty() {
                continue;
            }
            let count = counts.entry(key).or_insert(0);
            *count += 1;
            if *count >= 2 {
                return Some(ReasonCode::DialogueLoop);
            }
        }
    }

    None
}
