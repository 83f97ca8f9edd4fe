use anyhow::{Context, Result};
use std::path::PathBuf;
use std::process::ExitCode;
use storyguard::services::text_processor::{preview, segment_sentences};
use storyguard::{validate_report, ConfigStore, DetectorConfig, Sensitivity, ValidationReport};
use tracing::info;

const EXIT_INVALID: u8 = 2;

fn parse_arg_value(args: &[String], key: &str) -> Option<String> {
    args.iter()
        .position(|a| a == key)
        .and_then(|i| args.get(i + 1))
        .cloned()
}

fn has_flag(args: &[String], key: &str) -> bool {
    args.iter().any(|a| a == key)
}

fn read_text(path: &str) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("read {} failed", path))
}

/// `--config` wins over `--sensitivity`; with neither, the default config store is used
fn resolve_config(args: &[String]) -> Result<DetectorConfig> {
    if let Some(path) = parse_arg_value(args, "--config") {
        let path = PathBuf::from(path);
        let raw = std::fs::read_to_string(&path)
            .with_context(|| format!("read config {} failed", path.display()))?;
        let config: DetectorConfig = serde_json::from_str(&raw)
            .with_context(|| format!("parse config {} failed", path.display()))?;
        info!("[check_chunk] config from {}", path.display());
        return Ok(config);
    }

    if let Some(level) = parse_arg_value(args, "--sensitivity") {
        return Ok(DetectorConfig::preset(Sensitivity::from_str(&level)));
    }

    match ConfigStore::default_config_dir() {
        Some(dir) => Ok(ConfigStore::new(dir).load()?),
        None => Ok(DetectorConfig::preset(Sensitivity::Medium)),
    }
}

fn print_report(report: &ValidationReport, chunk: &str, show_checks: bool) {
    println!(
        "Chunk: {} chars, {} sentences  {}",
        report.chunk_chars,
        segment_sentences(chunk).len(),
        preview(chunk, 80)
    );
    println!("History: {} chars", report.history_chars);

    if show_checks {
        println!();
        for record in &report.checks {
            println!("  {:<28} {:?}", record.check, record.outcome);
        }
        println!();
    }

    match report.result.reason_label() {
        None => println!("Verdict: valid"),
        Some(reason) => println!("Verdict: invalid ({})", reason),
    }
    println!("Elapsed: {} us", report.elapsed_micros);
}

fn main() -> Result<ExitCode> {
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 || has_flag(&args, "--help") {
        eprintln!(
            "Usage:\n  check_chunk <chunk.txt> [--history <history.txt>] [--config <config.json>] [--sensitivity low|medium|high] [--report] [--out <json_path>]\n\nExit codes:\n  0 valid, 2 invalid, 1 error"
        );
        return Ok(ExitCode::SUCCESS);
    }

    // Held until main returns so the file writer flushes.
    let _log_guard = storyguard::init_logging();

    let chunk = read_text(&args[1])?;
    let history = match parse_arg_value(&args, "--history") {
        Some(path) => read_text(&path)?,
        None => String::new(),
    };
    let config = resolve_config(&args)?.normalized();
    info!(
        enabled_checks = config.enabled_check_count(),
        "[check_chunk] validating {}", args[1]
    );

    let report = validate_report(&chunk, &history, &config);
    print_report(&report, &chunk, has_flag(&args, "--report"));

    if let Some(out_path) = parse_arg_value(&args, "--out") {
        let json = serde_json::to_string_pretty(&report)?;
        std::fs::write(&out_path, json).with_context(|| format!("write {} failed", out_path))?;
        println!("Wrote JSON: {}", out_path);
    }

    if !report.result.valid {
        return Ok(ExitCode::from(EXIT_INVALID));
    }
    Ok(ExitCode::SUCCESS)
}
