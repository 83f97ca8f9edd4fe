// Validation Pipeline
// Runs the seven checks in fixed order against one chunk/history pair and
// one configuration snapshot; the first failing enabled check decides.

use std::sync::{Arc, RwLock};
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::models::{CheckOutcome, CheckRecord, ReasonCode, ValidationReport, ValidationResult};
use crate::services::config_store::{ConfigError, ConfigStore, DetectorConfig};

use super::dialogue::check_dialogue_loop;
use super::historical::{check_historical_loop, HistoricalLoopParams};
use super::punctuation::check_degenerative_punctuation;
use super::repetition::check_similar_sentences;
use super::stasis::{check_action_presence, check_emotional_loop, check_paragraph_action_gap};

/// One stage of the pipeline
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum CheckKind {
    DegenerativePunctuation,
    DialogueLoop,
    EmotionalLoop,
    ActionPresence,
    SimilarSentenceRepetition,
    ParagraphActionGap,
    HistoricalLoop,
}

/// Evaluation order. Earlier checks win when several defects are present.
pub const CHECK_ORDER: [CheckKind; 7] = [
    CheckKind::DegenerativePunctuation,
    CheckKind::DialogueLoop,
    CheckKind::EmotionalLoop,
    CheckKind::ActionPresence,
    CheckKind::SimilarSentenceRepetition,
    CheckKind::ParagraphActionGap,
    CheckKind::HistoricalLoop,
];

impl CheckKind {
    pub fn name(self) -> &'static str {
        match self {
            CheckKind::DegenerativePunctuation => "degenerative_punctuation",
            CheckKind::DialogueLoop => "dialogue_loop",
            CheckKind::EmotionalLoop => "emotional_loop",
            CheckKind::ActionPresence => "action_presence",
            CheckKind::SimilarSentenceRepetition => "similar_sentence_repetition",
            CheckKind::ParagraphActionGap => "paragraph_action_gap",
            CheckKind::HistoricalLoop => "historical_loop",
        }
    }

    pub fn is_enabled(self, config: &DetectorConfig) -> bool {
        match self {
            CheckKind::DegenerativePunctuation => config.enable_degenerative_punctuation_check,
            CheckKind::DialogueLoop => config.enable_dialogue_loop_check,
            CheckKind::EmotionalLoop => config.enable_emotional_loop_check,
            CheckKind::ActionPresence => config.enable_action_presence_check,
            CheckKind::SimilarSentenceRepetition => config.enable_similar_sentence_repetition_check,
            CheckKind::ParagraphActionGap => config.enable_paragraph_action_gap_check,
            CheckKind::HistoricalLoop => config.enable_historical_loop_detection,
        }
    }

    /// Run this check regardless of its enable flag
    pub fn evaluate(
        self,
        chunk: &str,
        history: &str,
        config: &DetectorConfig,
    ) -> Option<ReasonCode> {
        match self {
            CheckKind::DegenerativePunctuation => {
                check_degenerative_punctuation(chunk, config.punctuation_match_limit())
            }
            CheckKind::DialogueLoop => check_dialogue_loop(chunk),
            CheckKind::EmotionalLoop => check_emotional_loop(chunk),
            CheckKind::ActionPresence => check_action_presence(chunk),
            CheckKind::SimilarSentenceRepetition => check_similar_sentences(
                chunk,
                config.similar_sentence_threshold(),
                config.similar_sentence_limit(),
            ),
            CheckKind::ParagraphActionGap => {
                check_paragraph_action_gap(chunk, config.paragraph_gap_threshold())
            }
            CheckKind::HistoricalLoop => {
                check_historical_loop(chunk, history, &historical_params(config))
            }
        }
    }
}

fn historical_params(config: &DetectorConfig) -> HistoricalLoopParams {
    HistoricalLoopParams {
        similarity_threshold: config.historical_similarity_threshold(),
        repeat_threshold: config.historical_repeat_threshold(),
        repeat_ratio_threshold: config.historical_ratio_threshold(),
        history_sentence_count: config.history_sentence_window(),
    }
}

/// Validate one chunk against its history.
///
/// Empty or whitespace-only chunks are accepted without running any check.
pub fn validate(chunk: &str, history: &str, config: &DetectorConfig) -> ValidationResult {
    if chunk.trim().is_empty() {
        return ValidationResult::valid();
    }

    let reason = CHECK_ORDER
        .iter()
        .filter(|check| check.is_enabled(config))
        .find_map(|check| {
            let reason = check.evaluate(chunk, history, config);
            debug!(
                check = check.name(),
                passed = reason.is_none(),
                "[validator] check evaluated"
            );
            reason
        });

    ValidationResult::from_reason(reason)
}

/// Same verdict as `validate`, plus the outcome of every check and timing
pub fn validate_report(chunk: &str, history: &str, config: &DetectorConfig) -> ValidationReport {
    let started = Instant::now();
    let mut checks = Vec::with_capacity(CHECK_ORDER.len());
    let mut reason = None;

    let trivial = chunk.trim().is_empty();
    for check in CHECK_ORDER {
        let outcome = if trivial || reason.is_some() {
            CheckOutcome::NotRun
        } else if !check.is_enabled(config) {
            CheckOutcome::Skipped
        } else {
            match check.evaluate(chunk, history, config) {
                Some(r) => {
                    reason = Some(r);
                    CheckOutcome::Failed
                }
                None => CheckOutcome::Passed,
            }
        };
        checks.push(CheckRecord {
            check: check.name().to_string(),
            outcome,
        });
    }

    ValidationReport {
        result: ValidationResult::from_reason(reason),
        checks,
        chunk_chars: chunk.chars().count(),
        history_chars: history.chars().count(),
        elapsed_micros: started.elapsed().as_micros(),
    }
}

/// Shared validator whose configuration can be swapped while other threads validate.
///
/// Each call works on the snapshot current when it started.
#[derive(Debug, Default)]
pub struct ChunkValidator {
    config: RwLock<Arc<DetectorConfig>>,
}

impl ChunkValidator {
    pub fn new(config: DetectorConfig) -> Self {
        Self {
            config: RwLock::new(Arc::new(config.normalized())),
        }
    }

    /// Build from a config store, falling back to defaults when the file is unreadable
    pub fn from_store(store: &ConfigStore) -> Self {
        match store.load() {
            Ok(config) => Self::new(config),
            Err(e) => {
                warn!("[validator] config load failed, using defaults: {}", e);
                Self::default()
            }
        }
    }

    pub fn snapshot(&self) -> Arc<DetectorConfig> {
        match self.config.read() {
            Ok(guard) => Arc::clone(&guard),
            Err(poisoned) => Arc::clone(&poisoned.into_inner()),
        }
    }

    pub fn update_config(&self, config: DetectorConfig) {
        let next = Arc::new(config.normalized());
        match self.config.write() {
            Ok(mut guard) => *guard = next,
            Err(poisoned) => *poisoned.into_inner() = next,
        }
    }

    /// Re-read the store; on failure the previous snapshot stays active
    pub fn reload_from(&self, store: &ConfigStore) -> Result<(), ConfigError> {
        let config = store.load().map_err(|e| {
            warn!("[validator] config reload failed, keeping previous snapshot: {}", e);
            e
        })?;
        info!(
            enabled_checks = config.enabled_check_count(),
            "[validator] config reloaded"
        );
        self.update_config(config);
        Ok(())
    }

    pub fn validate(&self, chunk: &str, history: &str) -> ValidationResult {
        let config = self.snapshot();
        let result = validate(chunk, history, &config);
        if let Some(reason) = result.reason {
            info!(reason = reason.as_str(), "[validator] chunk rejected");
        }
        result
    }

    pub fn validate_report(&self, chunk: &str, history: &str) -> ValidationReport {
        let config = self.snapshot();
        validate_report(chunk, history, &config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::config_store::Sensitivity;

    fn only(check: CheckKind) -> DetectorConfig {
        let mut config = DetectorConfig::default();
        match check {
            CheckKind::DegenerativePunctuation => {
                config.enable_degenerative_punctuation_check = true
            }
            CheckKind::DialogueLoop => config.enable_dialogue_loop_check = true,
            CheckKind::EmotionalLoop => config.enable_emotional_loop_check = true,
            CheckKind::ActionPresence => config.enable_action_presence_check = true,
            CheckKind::SimilarSentenceRepetition => {
                config.enable_similar_sentence_repetition_check = true
            }
            CheckKind::ParagraphActionGap => config.enable_paragraph_action_gap_check = true,
            CheckKind::HistoricalLoop => config.enable_historical_loop_detection = true,
        }
        config
    }

    const DEGENERATE: &str = "Cosa vuoi---?! Davvero?!?! No!!! Fermati...... ";
    const EMOTIONAL: &str =
        "Sentiva una paura profonda. Il dolore le stringeva il cuore. La tristezza non passava.";
    const STILL_PARAGRAPHS: &str =
        "Il cielo era grigio.\n\nIl silenzio regnava.\n\nIl tempo passava.";

    #[test]
    fn test_empty_chunk_is_valid_for_any_history() {
        let config = DetectorConfig::preset(Sensitivity::High);
        for history in ["", "Una storia lunga. Molto lunga.", DEGENERATE] {
            assert_eq!(validate("", history, &config), ValidationResult::valid());
            assert_eq!(validate("   \n\t", history, &config), ValidationResult::valid());
        }
    }

    #[test]
    fn test_all_checks_disabled_accepts_anything() {
        let config = DetectorConfig::disabled();
        for chunk in [
            DEGENERATE,
            "-- Non voglio andare via.\n- Non voglio andare via!",
            "Il cielo era grigio. Il silenzio regnava. Il tempo passava.",
        ] {
            assert!(validate(chunk, chunk, &config).valid);
        }
    }

    #[test]
    fn test_scenario_punctuation() {
        let config = only(CheckKind::DegenerativePunctuation);
        let result = validate(DEGENERATE, "", &config);
        assert_eq!(result.reason_label(), Some("degenerative_punctuation"));
    }

    #[test]
    fn test_scenario_dialogue_loop() {
        let config = only(CheckKind::DialogueLoop);
        let chunk = "Lei si voltò.\n-- Non voglio andare via.\n- Non voglio andare via!";
        assert_eq!(validate(chunk, "", &config).reason, Some(ReasonCode::DialogueLoop));
    }

    #[test]
    fn test_scenario_no_action() {
        let config = only(CheckKind::ActionPresence);
        let chunk = "Il cielo era grigio. Il silenzio regnava. Il tempo passava.";
        assert_eq!(validate(chunk, "", &config).reason, Some(ReasonCode::NoAction));
    }

    #[test]
    fn test_scenario_historical_loop() {
        let config = DetectorConfig {
            historical_loop_similarity_threshold: 0.8,
            historical_loop_repeat_threshold: 1,
            ..only(CheckKind::HistoricalLoop)
        };
        let result = validate(
            "Maria guardava la finestra in silenzio.",
            "Maria guardava la finestra, in silenzio.",
            &config,
        );
        assert_eq!(result, ValidationResult::invalid(ReasonCode::HistoricalLoop));
    }

    #[test]
    fn test_each_check_isolated_through_facade() {
        let cases = [
            (CheckKind::EmotionalLoop, EMOTIONAL, ReasonCode::EmotionalLoop),
            (
                CheckKind::SimilarSentenceRepetition,
                "Resta qui con me. Resta qui con me. Resta qui con me.",
                ReasonCode::SimilarSentenceRepetition,
            ),
            (
                CheckKind::ParagraphActionGap,
                "Il cielo era grigio.\n\nIl silenzio regnava.\n\nIl tempo passava.",
                ReasonCode::ParagraphActionGap,
            ),
        ];
        for (check, chunk, expected) in cases {
            let reason = validate(chunk, "", &only(check)).reason;
            assert_eq!(reason, Some(expected), "{:?}", check);
        }
    }

    #[test]
    fn test_first_failing_check_wins() {
        // Degenerate punctuation, a dialogue loop and no action at once.
        let chunk = "- Basta!!!\n- Basta!!!\nIl cielo era grigio...";
        let config = DetectorConfig::preset(Sensitivity::Medium);
        assert_eq!(
            validate(chunk, "", &config).reason,
            Some(ReasonCode::DegenerativePunctuation)
        );

        let config = DetectorConfig {
            enable_degenerative_punctuation_check: false,
            ..config
        };
        assert_eq!(validate(chunk, "", &config).reason, Some(ReasonCode::DialogueLoop));

        let config = DetectorConfig {
            enable_dialogue_loop_check: false,
            ..config
        };
        assert_eq!(validate(chunk, "", &config).reason, Some(ReasonCode::NoAction));
    }

    #[test]
    fn test_emotional_loop_reported_before_no_action() {
        let config = DetectorConfig::preset(Sensitivity::Medium);
        assert_eq!(validate(EMOTIONAL, "", &config).reason, Some(ReasonCode::EmotionalLoop));

        let config = DetectorConfig {
            enable_emotional_loop_check: false,
            ..config
        };
        assert_eq!(validate(EMOTIONAL, "", &config).reason, Some(ReasonCode::NoAction));
    }

    #[test]
    fn test_repetition_reported_before_paragraph_gap() {
        let chunk = format!(
            "Luca corse via.\n\n{}",
            "Il cielo era grigio. Il cielo era grigio. Il cielo era grigio.\n\n\
             Il silenzio regnava.\n\nIl tempo passava."
        );
        let config = DetectorConfig::preset(Sensitivity::Medium);
        assert_eq!(
            validate(&chunk, "", &config).reason,
            Some(ReasonCode::SimilarSentenceRepetition)
        );

        let config = DetectorConfig {
            enable_similar_sentence_repetition_check: false,
            ..config
        };
        assert_eq!(
            validate(&chunk, "", &config).reason,
            Some(ReasonCode::ParagraphActionGap)
        );
    }

    #[test]
    fn test_paragraph_gap_reported_before_historical_loop() {
        let chunk = format!("Luca corse via.\n\n{}", STILL_PARAGRAPHS);
        let config = DetectorConfig::preset(Sensitivity::Medium);
        assert_eq!(
            validate(&chunk, &chunk, &config).reason,
            Some(ReasonCode::ParagraphActionGap)
        );

        let config = DetectorConfig {
            enable_paragraph_action_gap_check: false,
            ..config
        };
        assert_eq!(
            validate(&chunk, &chunk, &config).reason,
            Some(ReasonCode::HistoricalLoop)
        );
    }

    #[test]
    fn test_unreachable_historical_thresholds_never_fire() {
        let chunk = "Luca corse via.";
        let config = DetectorConfig {
            historical_loop_similarity_threshold: 1.5,
            historical_loop_repeat_threshold: 1,
            ..only(CheckKind::HistoricalLoop)
        };
        assert!(validate(chunk, chunk, &config).valid);
        assert!(ChunkValidator::new(config).validate(chunk, chunk).valid);

        let config = DetectorConfig {
            historical_loop_repeat_ratio_threshold: 1.5,
            historical_loop_repeat_threshold: 100,
            ..only(CheckKind::HistoricalLoop)
        };
        assert!(validate(chunk, chunk, &config).valid);
        assert!(ChunkValidator::new(config).validate(chunk, chunk).valid);
    }

    #[test]
    fn test_clean_chunk_passes_medium_preset() {
        let config = DetectorConfig::preset(Sensitivity::Medium);
        let chunk = "Luca aprì la porta e uscì nel cortile.\n\n\
                     Il vento gli colpì il viso. Afferrò la bicicletta e corse verso il paese.\n\n\
                     - Aspettami! - gridò Anna dalla finestra.";
        let history = "La mattina era fredda. Anna preparava il caffè.";
        assert_eq!(validate(chunk, history, &config), ValidationResult::valid());
    }

    #[test]
    fn test_validation_is_deterministic() {
        let config = DetectorConfig::preset(Sensitivity::High);
        let chunk = "Maria guardava la finestra. Sentiva paura. Poi corse via!!";
        let history = "Maria guardava la finestra.";
        let first = validate(chunk, history, &config);
        for _ in 0..5 {
            assert_eq!(validate(chunk, history, &config), first);
        }
    }

    #[test]
    fn test_report_records_every_check() {
        let config = DetectorConfig {
            enable_dialogue_loop_check: false,
            ..DetectorConfig::preset(Sensitivity::Medium)
        };
        let report = validate_report("Il cielo era grigio. Il silenzio regnava.", "", &config);
        assert_eq!(report.result.reason, Some(ReasonCode::NoAction));
        let outcomes: Vec<CheckOutcome> = report.checks.iter().map(|c| c.outcome).collect();
        assert_eq!(
            outcomes,
            vec![
                CheckOutcome::Passed,
                CheckOutcome::Skipped,
                CheckOutcome::Passed,
                CheckOutcome::Failed,
                CheckOutcome::NotRun,
                CheckOutcome::NotRun,
                CheckOutcome::NotRun,
            ]
        );
        assert_eq!(report.checks[3].check, "action_presence");
    }

    #[test]
    fn test_report_matches_validate() {
        let config = DetectorConfig::preset(Sensitivity::Medium);
        for chunk in ["", DEGENERATE, "Luca corse via.", "Il cielo era grigio."] {
            assert_eq!(validate_report(chunk, "", &config).result, validate(chunk, "", &config));
        }
    }

    #[test]
    fn test_negative_thresholds_do_not_break_validation() {
        let config = DetectorConfig {
            max_degenerative_punctuation_matches: -3,
            paragraph_action_gap_threshold: -1,
            historical_loop_repeat_threshold: -2,
            historical_loop_history_sentence_count: -5,
            ..DetectorConfig::preset(Sensitivity::Medium)
        };
        let result = validate("Luca corse via. Anna lo seguì...", "Luca corse via.", &config);
        assert_eq!(result.reason, Some(ReasonCode::DegenerativePunctuation));
    }

    #[test]
    fn test_validator_hot_swaps_config() {
        let validator = ChunkValidator::new(DetectorConfig::disabled());
        let chunk = "Il cielo era grigio.";
        assert!(validator.validate(chunk, "").valid);

        validator.update_config(only(CheckKind::ActionPresence));
        assert_eq!(validator.validate(chunk, "").reason, Some(ReasonCode::NoAction));
    }

    #[test]
    fn test_validator_reload_from_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = ConfigStore::new(dir.path().to_path_buf());
        let validator = ChunkValidator::from_store(&store);
        assert_eq!(validator.snapshot().enabled_check_count(), 0);

        store.save(&only(CheckKind::ActionPresence)).unwrap();
        validator.reload_from(&store).unwrap();
        assert!(validator.snapshot().enable_action_presence_check);

        std::fs::write(store.config_file(), "broken").unwrap();
        assert!(validator.reload_from(&store).is_err());
        assert!(validator.snapshot().enable_action_presence_check);
    }

    #[test]
    fn test_validator_shared_across_threads() {
        let validator = Arc::new(ChunkValidator::new(only(CheckKind::ActionPresence)));
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let v = Arc::clone(&validator);
                std::thread::spawn(move || {
                    let chunk = if i % 2 == 0 { "Luca corse via." } else { "Il cielo era grigio." };
                    v.validate(chunk, "").valid
                })
            })
            .collect();
        let results: Vec<bool> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(results, vec![true, false, true, false]);
    }
}
