// Similar Sentence Repetition Check
// Flags near-duplicate sentences sitting one or two positions apart

use crate::models::ReasonCode;
use crate::services::similarity::{jaccard, WordSet};
use crate::services::text_processor::segment_sentences;

const MAX_OFFSET: usize = 2;

/// Whether sentence `i` is more similar than `threshold` to the sentences at
/// offsets +1 and +2, skipping empty sets. Stops at the first match.
fn repeats_neighbour(sets: &[WordSet], i: usize, threshold: f64) -> bool {
    let set = &sets[i];
    if set.is_empty() {
        return false;
    }
    (1..=MAX_OFFSET)
        .filter_map(|offset| sets.get(i + offset))
        .filter(|other| !other.is_empty())
        .any(|other| jaccard(set, other) > threshold)
}

fn word_sets(sentences: &[String]) -> Vec<WordSet> {
    sentences.iter().map(|s| WordSet::from_sentence(s)).collect()
}

/// Number of sentences that repeat one of their two successors. Each sentence counts at most once.
pub fn count_repeating_sentences(sentences: &[String], threshold: f64) -> usize {
    let sets = word_sets(sentences);
    (0..sets.len())
        .filter(|&i| repeats_neighbour(&sets, i, threshold))
        .count()
}

/// Fails as soon as the repeating-sentence count exceeds `repeat_limit`
pub fn check_similar_sentences(
    chunk: &str,
    threshold: f64,
    repeat_limit: usize,
) -> Option<ReasonCode> {
    let sets = word_sets(&segment_sentences(chunk));
    let mut repeating = 0usize;

    for i in 0..sets.len() {
        if !repeats_neighbour(&sets, i, threshold) {
            continue;
        }
        repeating += 1;
        if repeating > repeat_limit {
            return Some(ReasonCode::SimilarSentenceRepetition);
        }
    }

    None
}
