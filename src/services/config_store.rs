// Configuration Storage Service
// Detector options, sensitivity presets, and config file read/write with version backup

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

const CONFIG_FILE_NAME: &str = "detector.json";
const MAX_BACKUPS: usize = 10;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config IO error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] serde_json::Error),
}

fn io_err(path: &Path) -> impl FnOnce(std::io::Error) -> ConfigError + '_ {
    move |source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// How aggressively a preset rejects chunks
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Sensitivity {
    Low,
    Medium,
    High,
}

impl Sensitivity {
    pub fn from_str(val: &str) -> Self {
        match val.trim().to_lowercase().as_str() {
            "low" => Self::Low,
            "high" => Self::High,
            _ => Self::Medium,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

/// Snapshot of every detector option.
///
/// Keys serialize with the option names verbatim. Absent keys fall back to
/// the defaults below; every check is disabled unless its flag is set.
/// Counts are signed so a hand-edited negative value still parses; the
/// accessor methods clamp it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct DetectorConfig {
    pub enable_degenerative_punctuation_check: bool,
    pub max_degenerative_punctuation_matches: i64,

    pub enable_dialogue_loop_check: bool,
    pub enable_emotional_loop_check: bool,
    pub enable_action_presence_check: bool,

    pub enable_similar_sentence_repetition_check: bool,
    pub similar_sentence_similarity_threshold: f64,
    pub similar_sentence_repeat_limit: i64,

    pub enable_paragraph_action_gap_check: bool,
    pub paragraph_action_gap_threshold: i64,

    pub enable_historical_loop_detection: bool,
    pub historical_loop_similarity_threshold: f64,
    pub historical_loop_repeat_threshold: i64,
    pub historical_loop_repeat_ratio_threshold: f64,
    pub historical_loop_history_sentence_count: i64,
}

const DEFAULT_MAX_PUNCTUATION_MATCHES: i64 = 1;
const DEFAULT_SIMILAR_SENTENCE_THRESHOLD: f64 = 0.8;
const DEFAULT_SIMILAR_SENTENCE_LIMIT: i64 = 1;
const DEFAULT_PARAGRAPH_GAP: i64 = 3;
const DEFAULT_HISTORICAL_SIMILARITY: f64 = 0.85;
const DEFAULT_HISTORICAL_REPEATS: i64 = 2;
const DEFAULT_HISTORICAL_RATIO: f64 = 0.5;
const DEFAULT_HISTORY_SENTENCES: i64 = 120;

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            enable_degenerative_punctuation_check: false,
            max_degenerative_punctuation_matches: DEFAULT_MAX_PUNCTUATION_MATCHES,
            enable_dialogue_loop_check: false,
            enable_emotional_loop_check: false,
            enable_action_presence_check: false,
            enable_similar_sentence_repetition_check: false,
            similar_sentence_similarity_threshold: DEFAULT_SIMILAR_SENTENCE_THRESHOLD,
            similar_sentence_repeat_limit: DEFAULT_SIMILAR_SENTENCE_LIMIT,
            enable_paragraph_action_gap_check: false,
            paragraph_action_gap_threshold: DEFAULT_PARAGRAPH_GAP,
            enable_historical_loop_detection: false,
            historical_loop_similarity_threshold: DEFAULT_HISTORICAL_SIMILARITY,
            historical_loop_repeat_threshold: DEFAULT_HISTORICAL_REPEATS,
            historical_loop_repeat_ratio_threshold: DEFAULT_HISTORICAL_RATIO,
            historical_loop_history_sentence_count: DEFAULT_HISTORY_SENTENCES,
        }
    }
}

/// Floors a threshold at zero. Values above one stay as configured so an
/// unreachable gate remains unreachable.
fn non_negative_or(value: f64, fallback: f64) -> f64 {
    if value.is_finite() {
        value.max(0.0)
    } else {
        fallback
    }
}

fn count_at_least(value: i64, min: i64) -> usize {
    value.max(min) as usize
}

impl DetectorConfig {
    /// Every check enabled with the thresholds of the given sensitivity
    pub fn preset(sensitivity: Sensitivity) -> Self {
        let base = Self {
            enable_degenerative_punctuation_check: true,
            enable_dialogue_loop_check: true,
            enable_emotional_loop_check: true,
            enable_action_presence_check: true,
            enable_similar_sentence_repetition_check: true,
            enable_paragraph_action_gap_check: true,
            enable_historical_loop_detection: true,
            ..Self::default()
        };

        match sensitivity {
            Sensitivity::Low => Self {
                max_degenerative_punctuation_matches: 3,
                similar_sentence_similarity_threshold: 0.9,
                similar_sentence_repeat_limit: 3,
                paragraph_action_gap_threshold: 4,
                historical_loop_similarity_threshold: 0.92,
                historical_loop_repeat_threshold: 3,
                historical_loop_repeat_ratio_threshold: 0.6,
                historical_loop_history_sentence_count: 80,
                ..base
            },
            Sensitivity::Medium => base,
            Sensitivity::High => Self {
                max_degenerative_punctuation_matches: 0,
                similar_sentence_similarity_threshold: 0.7,
                similar_sentence_repeat_limit: 0,
                paragraph_action_gap_threshold: 2,
                historical_loop_similarity_threshold: 0.8,
                historical_loop_repeat_threshold: 1,
                historical_loop_repeat_ratio_threshold: 0.34,
                historical_loop_history_sentence_count: 200,
                ..base
            },
        }
    }

    /// Every check disabled; identical to `Default`
    pub fn disabled() -> Self {
        Self::default()
    }

    pub fn enabled_check_count(&self) -> usize {
        [
            self.enable_degenerative_punctuation_check,
            self.enable_dialogue_loop_check,
            self.enable_emotional_loop_check,
            self.enable_action_presence_check,
            self.enable_similar_sentence_repetition_check,
            self.enable_paragraph_action_gap_check,
            self.enable_historical_loop_detection,
        ]
        .iter()
        .filter(|on| **on)
        .count()
    }

    pub fn punctuation_match_limit(&self) -> usize {
        count_at_least(self.max_degenerative_punctuation_matches, 0)
    }

    pub fn similar_sentence_threshold(&self) -> f64 {
        non_negative_or(
            self.similar_sentence_similarity_threshold,
            DEFAULT_SIMILAR_SENTENCE_THRESHOLD,
        )
    }

    pub fn similar_sentence_limit(&self) -> usize {
        count_at_least(self.similar_sentence_repeat_limit, 0)
    }

    /// A gap of zero paragraphs is meaningless, so the floor is one
    pub fn paragraph_gap_threshold(&self) -> usize {
        count_at_least(self.paragraph_action_gap_threshold, 1)
    }

    pub fn historical_similarity_threshold(&self) -> f64 {
        non_negative_or(
            self.historical_loop_similarity_threshold,
            DEFAULT_HISTORICAL_SIMILARITY,
        )
    }

    /// Zero repeats always pass, so the floor is one
    pub fn historical_repeat_threshold(&self) -> usize {
        count_at_least(self.historical_loop_repeat_threshold, 1)
    }

    pub fn historical_ratio_threshold(&self) -> f64 {
        non_negative_or(
            self.historical_loop_repeat_ratio_threshold,
            DEFAULT_HISTORICAL_RATIO,
        )
    }

    pub fn history_sentence_window(&self) -> usize {
        count_at_least(self.historical_loop_history_sentence_count, 0)
    }

    /// Copy with every threshold clamped into its valid range.
    ///
    /// Logs a warning when anything had to change.
    pub fn normalized(&self) -> Self {
        let out = Self {
            max_degenerative_punctuation_matches: self.punctuation_match_limit() as i64,
            similar_sentence_similarity_threshold: self.similar_sentence_threshold(),
            similar_sentence_repeat_limit: self.similar_sentence_limit() as i64,
            paragraph_action_gap_threshold: self.paragraph_gap_threshold() as i64,
            historical_loop_similarity_threshold: self.historical_similarity_threshold(),
            historical_loop_repeat_threshold: self.historical_repeat_threshold() as i64,
            historical_loop_repeat_ratio_threshold: self.historical_ratio_threshold(),
            historical_loop_history_sentence_count: self.history_sentence_window() as i64,
            ..self.clone()
        };
        if out != *self {
            warn!("[config] detector thresholds out of range, clamped to safe values");
        }
        out
    }
}

pub struct ConfigStore {
    config_dir: PathBuf,
    config_file: PathBuf,
}

impl ConfigStore {
    pub fn new(config_dir: PathBuf) -> Self {
        let config_file = config_dir.join(CONFIG_FILE_NAME);
        Self { config_dir, config_file }
    }

    /// Get default config directory
    pub fn default_config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("storyguard"))
    }

    pub fn config_file(&self) -> &Path {
        &self.config_file
    }

    /// Ensure config directory exists
    pub fn ensure_dir(&self) -> Result<(), ConfigError> {
        fs::create_dir_all(&self.config_dir).map_err(io_err(&self.config_dir))
    }

    /// Load configuration from file, defaults when the file does not exist
    pub fn load(&self) -> Result<DetectorConfig, ConfigError> {
        if !self.config_file.exists() {
            return Ok(DetectorConfig::default());
        }

        let content = fs::read_to_string(&self.config_file).map_err(io_err(&self.config_file))?;
        let config = serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: self.config_file.clone(),
            source,
        })?;

        info!("[config] loaded detector config from {}", self.config_file.display());
        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self, config: &DetectorConfig) -> Result<(), ConfigError> {
        self.ensure_dir()?;

        // Create backup if file exists
        if self.config_file.exists() {
            self.create_backup()?;
        }

        let content = serde_json::to_string_pretty(config)?;
        fs::write(&self.config_file, content).map_err(io_err(&self.config_file))?;

        info!("[config] saved detector config to {}", self.config_file.display());
        Ok(())
    }

    /// Create a backup of current config
    fn create_backup(&self) -> Result<(), ConfigError> {
        let backup_dir = self.backup_dir();
        fs::create_dir_all(&backup_dir).map_err(io_err(&backup_dir))?;

        let timestamp = chrono::Utc::now().format("%Y%m%d_%H%M%S%3f");
        let backup_file = backup_dir.join(format!("detector_{}.json", timestamp));

        fs::copy(&self.config_file, &backup_file).map_err(io_err(&backup_file))?;

        self.cleanup_old_backups(&backup_dir, MAX_BACKUPS)
    }

    fn backup_dir(&self) -> PathBuf {
        self.config_dir.join("backups")
    }

    /// Remove old backups, keeping only the most recent N
    fn cleanup_old_backups(&self, backup_dir: &Path, keep: usize) -> Result<(), ConfigError> {
        let mut entries: Vec<_> = fs::read_dir(backup_dir)
            .map_err(io_err(backup_dir))?
            .filter_map(|e| e.ok())
            .filter(|e| e.path().extension().map_or(false, |ext| ext == "json"))
            .collect();

        if entries.len() <= keep {
            return Ok(());
        }

        // Timestamped names sort chronologically
        entries.sort_by_key(|e| e.file_name());

        let remove_count = entries.len() - keep;
        for entry in entries.iter().take(remove_count) {
            let _ = fs::remove_file(entry.path());
        }

        Ok(())
    }
}
