// Stasis Checks
// Emotional loops, missing action, and padding paragraphs, all driven by the fixed lexicons

use crate::models::ReasonCode;
use crate::services::lexicon::{contains_action, is_action_word, is_emotive_word};
use crate::services::text_processor::{segment_sentences, split_paragraphs, word_tokens};

const EMOTIONAL_WINDOW: usize = 3;

#[derive(Debug, Copy, Clone, Default)]
struct SentenceTone {
    emotive: bool,
    action: bool,
}

fn sentence_tone(sentence: &str) -> SentenceTone {
    let mut tone = SentenceTone::default();
    for token in word_tokens(sentence) {
        tone.emotive |= is_emotive_word(&token);
        tone.action |= is_action_word(&token);
        if tone.emotive && tone.action {
            break;
        }
    }
    tone
}

/// Fails when three consecutive sentences all carry an emotive word and none an action word
pub fn check_emotional_loop(chunk: &str) -> Option<ReasonCode> {
    let sentences = segment_sentences(chunk);
    if sentences.len() < EMOTIONAL_WINDOW {
        return None;
    }

    let tones: Vec<SentenceTone> = sentences.iter().map(|s| sentence_tone(s)).collect();
    let stuck = tones
        .windows(EMOTIONAL_WINDOW)
        .any(|w| w.iter().all(|t| t.emotive) && !w.iter().any(|t| t.action));

    stuck.then_some(ReasonCode::EmotionalLoop)
}

/// Fails unless the chunk contains at least one action word
pub fn check_action_presence(chunk: &str) -> Option<ReasonCode> {
    if contains_action(chunk) {
        None
    } else {
        Some(ReasonCode::NoAction)
    }
}

/// Fails once `threshold` consecutive paragraphs lack any action word
pub fn check_paragraph_action_gap(chunk: &str, threshold: usize) -> Option<ReasonCode> {
    let mut gap = 0usize;
    for paragraph in split_paragraphs(chunk) {
        if contains_action(&paragraph) {
            gap = 0;
            continue;
        }
        gap += 1;
        if gap >= threshold {
            return Some(ReasonCode::ParagraphActionGap);
        }
    }
    None
}
