// StoryGuard Core Services

pub mod text_processor;
pub mod similarity;
pub mod lexicon;
pub mod config_store;
pub mod detection;

pub use text_processor::{segment_sentences, split_paragraphs, word_tokens};
pub use similarity::{cosine, jaccard, TermVector, WordSet};
pub use config_store::{ConfigError, ConfigStore, DetectorConfig, Sensitivity};

// Re-export detection module functions
pub use detection::{
    validate,
    validate_report,
    check_degenerative_punctuation,
    check_dialogue_loop,
    check_emotional_loop,
    check_action_presence,
    check_similar_sentences,
    check_paragraph_action_gap,
    check_historical_loop,
    CheckKind,
    ChunkValidator,
    HistoricalLoopParams,
};
