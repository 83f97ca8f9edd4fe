// StoryGuard Data Models
// Verdicts returned by the detector

use serde::{Deserialize, Serialize};
use std::fmt;

// ============ Reason Codes ============

/// Why a chunk was rejected
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReasonCode {
    DegenerativePunctuation,
    DialogueLoop,
    EmotionalLoop,
    NoAction,
    SimilarSentenceRepetition,
    ParagraphActionGap,
    HistoricalLoop,
}

impl ReasonCode {
    pub fn as_str(self) -> &'static str {
        match self {
            ReasonCode::DegenerativePunctuation => "degenerative_punctuation",
            ReasonCode::DialogueLoop => "dialogue_loop",
            ReasonCode::EmotionalLoop => "emotional_loop",
            ReasonCode::NoAction => "no_action",
            ReasonCode::SimilarSentenceRepetition => "similar_sentence_repetition",
            ReasonCode::ParagraphActionGap => "paragraph_action_gap",
            ReasonCode::HistoricalLoop => "historical_loop",
        }
    }
}

impl fmt::Display for ReasonCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============ Validation Result ============

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    #[serde(rename = "isValid")]
    pub valid: bool,
    pub reason: Option<ReasonCode>,
}

impl ValidationResult {
    pub fn valid() -> Self {
        Self {
            valid: true,
            reason: None,
        }
    }

    pub fn invalid(reason: ReasonCode) -> Self {
        Self {
            valid: false,
            reason: Some(reason),
        }
    }

    pub fn from_reason(reason: Option<ReasonCode>) -> Self {
        reason.map_or_else(Self::valid, Self::invalid)
    }

    /// Short label of the failure category, `None` when valid
    pub fn reason_label(&self) -> Option<&'static str> {
        self.reason.map(ReasonCode::as_str)
    }
}

// ============ Validation Report ============

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckOutcome {
    Passed,
    Failed,
    /// Disabled in the configuration snapshot
    Skipped,
    /// An earlier check already failed
    NotRun,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckRecord {
    pub check: String,
    pub outcome: CheckOutcome,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub result: ValidationResult,
    pub checks: Vec<CheckRecord>,
    pub chunk_chars: usize,
    pub history_chars: usize,
    pub elapsed_micros: u128,
}
