// Punctuation Degeneration Check
// Counts punctuation runs symptomatic of a model losing coherence

use crate::models::ReasonCode;
use regex::Regex;
use std::sync::OnceLock;

/// Dash-question combos, ellipsis runs, repeated `!`, repeated `?`
fn degenerative_patterns() -> &'static [Regex; 4] {
    static RE: OnceLock<[Regex; 4]> = OnceLock::new();
    RE.get_or_init(|| {
        [
            Regex::new(r"[-\u{2014}]{1,3}[?!]{1,3}").expect("dash question regex"),
            Regex::new(r"\.{3,}").expect("ellipsis run regex"),
            Regex::new(r"!{2,}").expect("exclamation run regex"),
            Regex::new(r"\?{2,}").expect("question run regex"),
        ]
    })
}

/// Total matches across all pattern classes, without short-circuiting
pub fn count_degenerative_punctuation(chunk: &str) -> usize {
    degenerative_patterns()
        .iter()
        .map(|re| re.find_iter(chunk).count())
        .sum()
}

/// Fails once the running match count exceeds `max_matches`
pub fn check_degenerative_punctuation(chunk: &str, max_matches: usize) -> Option<ReasonCode> {
    let mut total = 0usize;
    for re in degenerative_patterns() {
        for _ in re.find_iter(chunk) {
            total += 1;
            if total > max_matches {
                return Some(ReasonCode::DegenerativePunctuation);
            }
        }
    }
    None
}
