//! Entity detection
//!
//! [`EntityAnalyzer`] is the seam the redactor detects through.
//! [`PatternAnalyzer`] is the bundled regex implementation: each
//! [`Recognizer`] contributes matches with a base score that is raised
//! when one of its context words appears shortly before the match.

pub mod recognizers;

use std::collections::BTreeSet;

use scrub_config::AnalyzerConfig;
use scrub_core::{Error, Result};

use crate::entity::DetectedEntity;

pub use recognizers::Recognizer;

/// Bytes before a match searched for context words
pub const CONTEXT_WINDOW: usize = 100;
/// Score added when a context word is found
pub const CONTEXT_BOOST: f64 = 0.35;

#[derive(Debug, Clone, Copy)]
pub struct AnalyzeRequest<'a> {
    /// Entity types to report; empty means all supported
    pub entities: &'a [String],
    pub language: &'a str,
    pub score_threshold: f64,
}

pub trait EntityAnalyzer: Send + Sync {
    fn analyze(&self, text: &str, request: &AnalyzeRequest<'_>) -> Result<Vec<DetectedEntity>>;

    fn supported_entities(&self) -> Vec<String>;
}

#[derive(Debug, Clone)]
pub struct PatternAnalyzer {
    recognizers: Vec<Recognizer>,
    languages: Vec<String>,
}

impl PatternAnalyzer {
    pub fn new() -> Self {
        Self {
            recognizers: recognizers::builtin(),
            languages: vec!["en".to_string()],
        }
    }

    /// Built-in recognizers plus the configured custom ones
    pub fn from_config(config: &AnalyzerConfig) -> Result<Self> {
        let mut analyzer = Self::new();
        for custom in &config.custom_recognizers {
            let context: Vec<&str> = custom.context.iter().map(String::as_str).collect();
            analyzer.add_recognizer(Recognizer::new(
                &custom.entity_type,
                &custom.pattern,
                custom.score,
                &context,
            )?);
        }
        Ok(analyzer)
    }

    pub fn add_recognizer(&mut self, recognizer: Recognizer) {
        tracing::debug!(entity_type = %recognizer.entity_type, "Adding recognizer");
        self.recognizers.push(recognizer);
    }

    fn context_boost(recognizer: &Recognizer, text: &str, start: usize) -> f64 {
        if recognizer.context.is_empty() {
            return 0.0;
        }

        let mut from = start.saturating_sub(CONTEXT_WINDOW);
        while !text.is_char_boundary(from) {
            from -= 1;
        }

        let window = text[from..start].to_lowercase();
        if recognizer.context.iter().any(|word| window.contains(word.as_str())) {
            CONTEXT_BOOST
        } else {
            0.0
        }
    }
}

impl Default for PatternAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl EntityAnalyzer for PatternAnalyzer {
    fn analyze(&self, text: &str, request: &AnalyzeRequest<'_>) -> Result<Vec<DetectedEntity>> {
        if !self.languages.iter().any(|l| l == request.language) {
            return Err(Error::Redactor(format!(
                "Unsupported analyzer language: {}",
                request.language
            )));
        }

        let wanted = |entity_type: &str| {
            request.entities.is_empty() || request.entities.iter().any(|e| e == entity_type)
        };

        let mut found = Vec::new();
        for recognizer in self.recognizers.iter().filter(|r| wanted(&r.entity_type)) {
            for caps in recognizer.regex.captures_iter(text) {
                let Some(span) = caps.get(1).or_else(|| caps.get(0)) else {
                    continue;
                };
                if span.is_empty() {
                    continue;
                }
                if let Some(validator) = recognizer.validator
                    && !validator(span.as_str())
                {
                    continue;
                }

                let score = (recognizer.score + Self::context_boost(recognizer, text, span.start()))
                    .min(1.0);
                if score < request.score_threshold {
                    continue;
                }

                found.push(DetectedEntity::new(
                    recognizer.entity_type.clone(),
                    span.start(),
                    span.end(),
                    score,
                ));
            }
        }

        found.sort_by(|a, b| a.start.cmp(&b.start).then_with(|| a.end.cmp(&b.end)));
        Ok(found)
    }

    fn supported_entities(&self) -> Vec<String> {
        self.recognizers
            .iter()
            .map(|r| r.entity_type.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}
