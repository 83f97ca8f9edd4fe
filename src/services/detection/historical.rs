// Historical Loop Check
// Detects chunk sentences that restate recent history, using term-vector cosine similarity

use crate::models::ReasonCode;
use crate::services::similarity::{cosine, TermVector};
use crate::services::text_processor::segment_sentences;

/// Thresholds for one historical scan
#[derive(Debug, Copy, Clone)]
pub struct HistoricalLoopParams {
    pub similarity_threshold: f64,
    pub repeat_threshold: usize,
    pub repeat_ratio_threshold: f64,
    pub history_sentence_count: usize,
}

/// Outcome of scanning a chunk against its history window
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct HistoricalScan {
    pub repeats: usize,
    pub chunk_sentences: usize,
    pub history_vectors: usize,
}

impl HistoricalScan {
    pub fn repeat_ratio(&self) -> f64 {
        if self.chunk_sentences == 0 {
            return 0.0;
        }
        self.repeats as f64 / self.chunk_sentences as f64
    }
}

/// Vectors of the last `count` history sentences, dropping those without words
fn history_window(history: &[String], count: usize) -> Vec<TermVector> {
    let start = history.len().saturating_sub(count);
    history[start..]
        .iter()
        .map(|s| TermVector::from_sentence(s))
        .filter(|v| !v.is_empty())
        .collect()
}

/// Count chunk sentences whose best match in the history window reaches the threshold
pub fn scan_history(chunk: &str, history: &str, params: &HistoricalLoopParams) -> HistoricalScan {
    let chunk_sentences = segment_sentences(chunk);
    let history_sentences = segment_sentences(history);
    if chunk_sentences.is_empty() || history_sentences.is_empty() {
        return HistoricalScan {
            chunk_sentences: chunk_sentences.len(),
            ..HistoricalScan::default()
        };
    }

    let window = history_window(&history_sentences, params.history_sentence_count);
    let mut scan = HistoricalScan {
        repeats: 0,
        chunk_sentences: chunk_sentences.len(),
        history_vectors: window.len(),
    };
    if window.is_empty() {
        return scan;
    }

    for sentence in &chunk_sentences {
        let vector = TermVector::from_sentence(sentence);
        if vector.is_empty() {
            continue;
        }
        let best = window
            .iter()
            .map(|h| cosine(&vector, h))
            .fold(0.0_f64, f64::max);
        if best >= params.similarity_threshold {
            scan.repeats += 1;
        }
    }

    scan
}

/// Fails when repeats reach the absolute threshold or the repeat ratio reaches its threshold.
/// The two gates are independent.
pub fn check_historical_loop(
    chunk: &str,
    history: &str,
    params: &HistoricalLoopParams,
) -> Option<ReasonCode> {
    let scan = scan_history(chunk, history, params);
    if scan.repeats == 0 {
        return None;
    }

    let over_count = scan.repeats >= params.repeat_threshold;
    let over_ratio = scan.repeat_ratio() >= params.repeat_ratio_threshold;
    (over_count || over_ratio).then_some(ReasonCode::HistoricalLoop)
}
