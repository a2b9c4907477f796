use lazy_static::lazy_static;
use regex::Regex;
use scrub_core::{ComponentArgs, Document, Error, Postprocessor, Result};
use serde::Deserialize;

lazy_static! {
    static ref MARKER_RUN: Regex = Regex::new(r"(?:\[REDACTED\]\s*)+").unwrap();
    static ref WHITESPACE_RUN: Regex = Regex::new(r"\s+").unwrap();
    static ref SPACE_BEFORE_PUNCTUATION: Regex = Regex::new(r"\s+([.,!?;:])").unwrap();
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RedactionCleanerSettings {
    /// Collapse adjacent `[REDACTED]` markers into one
    pub merge_consecutive: bool,
}

impl Default for RedactionCleanerSettings {
    fn default() -> Self {
        Self {
            merge_consecutive: true,
        }
    }
}

/// Tidies the text left behind by the `replace` strategy
#[derive(Debug, Clone, Default)]
pub struct RedactionCleaner {
    settings: RedactionCleanerSettings,
}

impl RedactionCleaner {
    pub fn new(settings: RedactionCleanerSettings) -> Self {
        Self { settings }
    }

    pub fn create(args: &ComponentArgs) -> Result<Box<dyn Postprocessor>> {
        Ok(Box::new(Self::new(args.settings()?)))
    }

    pub fn clean(&self, text: &str) -> String {
        let merged = if self.settings.merge_consecutive {
            MARKER_RUN.replace_all(text, "[REDACTED] ")
        } else {
            text.into()
        };

        let collapsed = WHITESPACE_RUN.replace_all(&merged, " ");
        SPACE_BEFORE_PUNCTUATION
            .replace_all(collapsed.trim(), "$1")
            .into_owned()
    }
}

impl Postprocessor for RedactionCleaner {
    fn process(&self, document: Document) -> Result<Document> {
        let Some(content) = document.content.as_deref() else {
            return Err(Error::Postprocessor(
                "redaction_cleaner requires document content".to_string(),
            ));
        };

        let cleaned = self.clean(content);
        Ok(document.with_content(Some(cleaned)))
    }
}
