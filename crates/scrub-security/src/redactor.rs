//! Document redaction
//!
//! Detection goes through an [`EntityAnalyzer`], overlaps are resolved with
//! [`resolve_conflicts`], then the chosen strategy rewrites the survivors.
//! `hash` runs locally through [`EntityHasher`] so tokens stay stable across
//! documents; the other strategies are handed to an [`Anonymizer`].

use std::fmt;
use std::sync::Arc;

use scrub_config::Config;
use scrub_core::{Document, Error, Result, keys};

use crate::analyzer::{AnalyzeRequest, EntityAnalyzer, PatternAnalyzer};
use crate::anonymizer::{Anonymizer, DEFAULT_OPERATOR_KEY, Operator, OperatorConfig, OperatorEngine};
use crate::conflict::resolve_conflicts;
use crate::entity::DetectedEntity;
use crate::hashing::EntityHasher;
use crate::strategy::RedactionStrategy;

/// Literal written by the `replace` strategy
pub const REPLACEMENT_TOKEN: &str = "[REDACTED]";
/// Characters overwritten by the `mask` strategy
pub const MASK_CHARS: usize = 100;
pub const MASK_CHAR: char = '*';

#[derive(Clone)]
pub struct RedactorSettings {
    pub strategy: RedactionStrategy,
    /// Default entity filter; empty means all supported
    pub entities: Vec<String>,
    pub language: String,
    pub score_threshold: f64,
    pub secret: String,
    pub hash_length: usize,
}

impl RedactorSettings {
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self {
            strategy: config.redaction_strategy.parse()?,
            entities: config.analyzer.entities.clone(),
            language: config.analyzer.language.clone(),
            score_threshold: config.default_confidence_threshold,
            secret: config.hmac_secret.clone(),
            hash_length: config.hash_length,
        })
    }
}

impl fmt::Debug for RedactorSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedactorSettings")
            .field("strategy", &self.strategy)
            .field("entities", &self.entities)
            .field("language", &self.language)
            .field("score_threshold", &self.score_threshold)
            .field("secret", &"<redacted>")
            .field("hash_length", &self.hash_length)
            .finish()
    }
}

/// Result of redacting a bare string
#[derive(Debug, Clone, PartialEq)]
pub struct Redaction {
    pub text: String,
    /// Entities rewritten after conflict resolution
    pub entity_count: usize,
    pub entities: Vec<DetectedEntity>,
}

impl Redaction {
    fn untouched(text: &str) -> Self {
        Self {
            text: text.to_string(),
            entity_count: 0,
            entities: Vec::new(),
        }
    }
}

pub struct Redactor {
    analyzer: Arc<dyn EntityAnalyzer>,
    anonymizer: Arc<dyn Anonymizer>,
    hasher: EntityHasher,
    settings: RedactorSettings,
}

impl Redactor {
    pub fn new(analyzer: Arc<dyn EntityAnalyzer>, settings: RedactorSettings) -> Self {
        Self {
            analyzer,
            anonymizer: Arc::new(OperatorEngine::new()),
            hasher: EntityHasher::new(&settings.secret, settings.hash_length),
            settings,
        }
    }

    pub fn with_anonymizer(mut self, anonymizer: Arc<dyn Anonymizer>) -> Self {
        self.anonymizer = anonymizer;
        self
    }

    /// Redactor backed by the bundled [`PatternAnalyzer`]
    pub fn from_config(config: &Config) -> Result<Self> {
        let settings = RedactorSettings::from_config(config)?;
        let analyzer = PatternAnalyzer::from_config(&config.analyzer)?;
        Ok(Self::new(Arc::new(analyzer), settings))
    }

    pub fn settings(&self) -> &RedactorSettings {
        &self.settings
    }

    pub fn supported_entities(&self) -> Vec<String> {
        self.analyzer.supported_entities()
    }

    /// The named strategy, or the configured one when `None`
    pub fn resolve_strategy(&self, strategy: Option<&str>) -> Result<RedactionStrategy> {
        match strategy {
            Some(name) => name.parse(),
            None => Ok(self.settings.strategy),
        }
    }

    /// Redact a document's content.
    ///
    /// The returned document carries the rewritten content plus
    /// `redacted_entities` and `redaction_strategy`; every other metadata
    /// entry is kept.
    pub fn redact(
        &self,
        document: Document,
        entities: Option<&[String]>,
        strategy: Option<&str>,
    ) -> Result<Document> {
        let Some(content) = document.content.as_deref() else {
            return Err(Error::Redactor("Document must contain content".to_string()));
        };

        let strategy = self.resolve_strategy(strategy)?;
        let redaction = self.redact_text(content, entities, strategy)?;

        Ok(document
            .with_content(Some(redaction.text))
            .with_metadata(keys::REDACTED_ENTITIES, redaction.entity_count as u64)
            .with_metadata(keys::REDACTION_STRATEGY, strategy.as_str()))
    }

    pub fn redact_text(
        &self,
        text: &str,
        entities: Option<&[String]>,
        strategy: RedactionStrategy,
    ) -> Result<Redaction> {
        if text.is_empty() {
            return Ok(Redaction::untouched(text));
        }

        let request = AnalyzeRequest {
            entities: entities.unwrap_or(self.settings.entities.as_slice()),
            language: &self.settings.language,
            score_threshold: self.settings.score_threshold,
        };

        let detected = self.analyzer.analyze(text, &request)?;
        let resolved = resolve_conflicts(&detected);
        for entity in &resolved {
            entity.text_in(text)?;
        }

        tracing::debug!(
            detected = detected.len(),
            kept = resolved.len(),
            strategy = %strategy,
            "Resolved entities"
        );

        if resolved.is_empty() {
            return Ok(Redaction::untouched(text));
        }

        let redacted = match strategy {
            RedactionStrategy::Hash => self.hasher.redact(text, &resolved)?,
            other => {
                self.anonymizer
                    .anonymize(text, &resolved, &self.operators(other))?
            }
        };

        Ok(Redaction {
            text: redacted,
            entity_count: resolved.len(),
            entities: resolved,
        })
    }

    fn operators(&self, strategy: RedactionStrategy) -> OperatorConfig {
        let operator = match strategy {
            RedactionStrategy::Replace | RedactionStrategy::Hash => Operator::Replace {
                new_value: REPLACEMENT_TOKEN.to_string(),
            },
            RedactionStrategy::Mask => Operator::Mask {
                masking_char: MASK_CHAR,
                chars_to_mask: MASK_CHARS,
                from_end: false,
            },
            RedactionStrategy::Encrypt => Operator::Encrypt {
                key: self.settings.secret.clone(),
            },
        };

        OperatorConfig::from([(DEFAULT_OPERATOR_KEY.to_string(), operator)])
    }
}

impl fmt::Debug for Redactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Redactor")
            .field("hasher", &self.hasher)
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}
