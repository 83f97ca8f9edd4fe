// Detection Module
// Chunk degeneration checks organized into specialized submodules:
// - punctuation: punctuation spam (dash-question combos, ellipsis and !/? runs)
// - dialogue: repeated dash-prefixed or quoted lines
// - stasis: emotional loops, missing action, action-less paragraph runs
// - repetition: near-duplicate neighbouring sentences (Jaccard)
// - historical: chunk sentences restating recent history (cosine)
// - pipeline: ordered check list, validation façade, hot-reloadable validator

pub mod punctuation;
pub mod dialogue;
pub mod stasis;
pub mod repetition;
pub mod historical;
pub mod pipeline;

// Re-export commonly used functions
pub use punctuation::{check_degenerative_punctuation, count_degenerative_punctuation};
pub use dialogue::{check_dialogue_loop, normalize_snippet};
pub use stasis::{check_action_presence, check_emotional_loop, check_paragraph_action_gap};
pub use repetition::{check_similar_sentences, count_repeating_sentences};
pub use historical::{check_historical_loop, scan_history, HistoricalLoopParams, HistoricalScan};
pub use pipeline::{validate, validate_report, CheckKind, ChunkValidator, CHECK_ORDER};
