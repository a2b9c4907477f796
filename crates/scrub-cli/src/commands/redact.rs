use std::path::Path;

use anyhow::{Context, Result};
use scrub_config::Config;
use scrub_engine::{Pipeline, PipelineRequest};

use crate::cli::RedactArgs;

pub fn handle(args: RedactArgs, mut config: Config) -> Result<()> {
    if let Some(threshold) = args.threshold {
        if !(0.0..=1.0).contains(&threshold) {
            anyhow::bail!("Threshold must be between 0.0 and 1.0, got {}", threshold);
        }
        config.default_confidence_threshold = threshold;
    }
    if let Some(secret) = args.secret {
        config.hmac_secret = secret;
    }
    let entities = non_empty(args.entities);
    if !entities.is_empty() {
        config.analyzer.entities = entities;
    }
    config.validate()?;

    let reader = args
        .reader
        .unwrap_or_else(|| reader_for(&args.src).to_string());
    let writer = args
        .writer
        .unwrap_or_else(|| writer_for(args.out.as_deref()).to_string());

    let mut request = PipelineRequest::new(&args.src, &reader, &writer)
        .with_preprocessors(&non_empty(args.preprocessors))
        .with_postprocessors(&non_empty(args.postprocessors));
    request.output = args.out;
    request.strategy = args.strategy;

    tracing::debug!(
        src = %request.input.display(),
        reader = %request.reader,
        writer = %request.writer,
        preprocessors = ?request.preprocessors,
        postprocessors = ?request.postprocessors,
        "Redacting"
    );

    let pipeline = Pipeline::from_config(config)?;
    let documents = pipeline
        .process(&request)
        .with_context(|| format!("Failed to redact {}", request.input.display()))?;

    let entities: u64 = documents.iter().filter_map(|d| d.redacted_entities()).sum();
    eprintln!(
        "✓ Processed {} document(s), redacted {} entities",
        documents.len(),
        entities
    );
    if let Some(output) = &request.output {
        eprintln!("  Output: {}", output.display());
    }

    Ok(())
}

/// Reader name for an input path, by extension
pub fn reader_for(path: &Path) -> &'static str {
    match extension(path).as_deref() {
        Some("csv") => "csv_file",
        Some("xlsx" | "xlsm" | "xls") => "xlsx_file",
        _ => "text_file",
    }
}

/// Writer name for an optional output path, by extension
pub fn writer_for(path: Option<&Path>) -> &'static str {
    let Some(path) = path else {
        return "stdout";
    };
    match extension(path).as_deref() {
        Some("csv") => "csv_file",
        Some("xlsx") => "xlsx_file",
        _ => "text_file",
    }
}

fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
}

fn non_empty(names: Vec<String>) -> Vec<String> {
    names
        .into_iter()
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
        .collect()
}
