//! Operator-based anonymization for the non-hash strategies

use std::collections::HashMap;
use std::fmt;

use scrub_core::{Error, Result};

use crate::encryption::EntityCipher;
use crate::entity::DetectedEntity;

/// Operator key applied to entity types without their own entry
pub const DEFAULT_OPERATOR_KEY: &str = "DEFAULT";

#[derive(Clone, PartialEq)]
pub enum Operator {
    Replace {
        new_value: String,
    },
    Mask {
        masking_char: char,
        chars_to_mask: usize,
        from_end: bool,
    },
    Encrypt {
        key: String,
    },
}

impl fmt::Debug for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Replace { new_value } => f
                .debug_struct("Replace")
                .field("new_value", new_value)
                .finish(),
            Self::Mask {
                masking_char,
                chars_to_mask,
                from_end,
            } => f
                .debug_struct("Mask")
                .field("masking_char", masking_char)
                .field("chars_to_mask", chars_to_mask)
                .field("from_end", from_end)
                .finish(),
            Self::Encrypt { .. } => f.debug_struct("Encrypt").field("key", &"<redacted>").finish(),
        }
    }
}

/// Entity type to operator, with [`DEFAULT_OPERATOR_KEY`] as fallback
pub type OperatorConfig = HashMap<String, Operator>;

pub trait Anonymizer: Send + Sync {
    fn anonymize(
        &self,
        text: &str,
        entities: &[DetectedEntity],
        operators: &OperatorConfig,
    ) -> Result<String>;
}

/// Applies operators span by span, last span first
#[derive(Debug, Default, Clone, Copy)]
pub struct OperatorEngine;

impl OperatorEngine {
    pub fn new() -> Self {
        Self
    }

    fn apply(operator: &Operator, original: &str) -> Result<String> {
        match operator {
            Operator::Replace { new_value } => Ok(new_value.clone()),
            Operator::Mask {
                masking_char,
                chars_to_mask,
                from_end,
            } => Ok(mask(original, *masking_char, *chars_to_mask, *from_end)),
            Operator::Encrypt { key } => EntityCipher::new(key)?.encrypt(original),
        }
    }
}

impl Anonymizer for OperatorEngine {
    fn anonymize(
        &self,
        text: &str,
        entities: &[DetectedEntity],
        operators: &OperatorConfig,
    ) -> Result<String> {
        let mut ordered: Vec<&DetectedEntity> = entities.iter().collect();
        ordered.sort_by(|a, b| b.start.cmp(&a.start));

        if let Some(pair) = ordered.windows(2).find(|w| w[0].overlaps(w[1])) {
            return Err(Error::Redactor(format!(
                "Overlapping entities {} at {}..{} and {} at {}..{}",
                pair[1].entity_type, pair[1].start, pair[1].end,
                pair[0].entity_type, pair[0].start, pair[0].end
            )));
        }

        let mut output = text.to_string();
        for entity in ordered {
            let operator = operators
                .get(&entity.entity_type)
                .or_else(|| operators.get(DEFAULT_OPERATOR_KEY))
                .ok_or_else(|| {
                    Error::Redactor(format!("No operator configured for {}", entity.entity_type))
                })?;

            let original = entity.text_in(text)?;
            let replacement = Self::apply(operator, original)?;
            output.replace_range(entity.start..entity.end, &replacement);
        }

        Ok(output)
    }
}

/// Replace up to `count` characters of `value` with `masking_char`
pub fn mask(value: &str, masking_char: char, count: usize, from_end: bool) -> String {
    let total = value.chars().count();
    let masked = count.min(total);

    value
        .chars()
        .enumerate()
        .map(|(i, c)| {
            let hit = if from_end { i >= total - masked } else { i < masked };
            if hit { masking_char } else { c }
        })
        .collect()
}
