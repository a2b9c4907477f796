use scrub_core::{Error, Result};
use serde::{Deserialize, Serialize};

/// A typed span reported by an entity analyzer.
///
/// `start..end` is a half-open byte range into the analyzed text and must
/// fall on `char` boundaries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectedEntity {
    pub entity_type: String,
    pub start: usize,
    pub end: usize,
    /// Confidence in `[0.0, 1.0]`
    pub score: f64,
}

impl DetectedEntity {
    pub fn new(entity_type: impl Into<String>, start: usize, end: usize, score: f64) -> Self {
        Self {
            entity_type: entity_type.into(),
            start,
            end,
            score,
        }
    }

    pub fn span_len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn overlaps(&self, other: &DetectedEntity) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// The entity's text, or an error if the span does not fit `text`
    pub fn text_in<'a>(&self, text: &'a str) -> Result<&'a str> {
        if self.start >= self.end {
            return Err(Error::Redactor(format!(
                "Empty or inverted span {}..{} for {}",
                self.start, self.end, self.entity_type
            )));
        }

        text.get(self.start..self.end).ok_or_else(|| {
            Error::Redactor(format!(
                "Span {}..{} for {} does not fit text of length {}",
                self.start,
                self.end,
                self.entity_type,
                text.len()
            ))
        })
    }
}
