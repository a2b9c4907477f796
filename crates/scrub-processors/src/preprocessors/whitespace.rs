use lazy_static::lazy_static;
use regex::Regex;
use scrub_core::{ComponentArgs, Document, Error, Preprocessor, Result};
use serde::Deserialize;

lazy_static! {
    static ref PARAGRAPH_BREAK: Regex = Regex::new(r"\n{2,}").unwrap();
    static ref SPACE_RUN: Regex = Regex::new(r" {2,}").unwrap();
    static ref WHITESPACE_RUN: Regex = Regex::new(r"\s+").unwrap();
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WhitespaceSettings {
    /// Keep blank lines between paragraphs
    pub preserve_paragraphs: bool,
}

impl Default for WhitespaceSettings {
    fn default() -> Self {
        Self {
            preserve_paragraphs: true,
        }
    }
}

/// Tabs to spaces, unified line endings, collapsed space runs
#[derive(Debug, Clone, Default)]
pub struct WhitespaceNormalizer {
    settings: WhitespaceSettings,
}

impl WhitespaceNormalizer {
    pub fn new(settings: WhitespaceSettings) -> Self {
        Self { settings }
    }

    pub fn create(args: &ComponentArgs) -> Result<Box<dyn Preprocessor>> {
        Ok(Box::new(Self::new(args.settings()?)))
    }

    pub fn normalize(&self, text: &str) -> String {
        let text = text.replace('\t', " ").replace("\r\n", "\n").replace('\r', "\n");

        let normalized = if self.settings.preserve_paragraphs {
            PARAGRAPH_BREAK
                .split(&text)
                .map(|paragraph| SPACE_RUN.replace_all(paragraph, " "))
                .collect::<Vec<_>>()
                .join("\n\n")
        } else {
            WHITESPACE_RUN.replace_all(&text, " ").into_owned()
        };

        normalized.trim().to_string()
    }
}

impl Preprocessor for WhitespaceNormalizer {
    fn process(&self, document: Document) -> Result<Document> {
        let Some(content) = document.content.as_deref() else {
            return Err(Error::Preprocessor(
                "whitespace_normalizer requires document content".to_string(),
            ));
        };

        let normalized = self.normalize(content);
        Ok(document.with_content(Some(normalized)))
    }
}
