use lazy_static::lazy_static;
use regex::{Captures, Regex};
use scrub_core::{ComponentArgs, Document, Error, Preprocessor, Result};
use serde::Deserialize;

lazy_static! {
    // all C0 controls except \t \n \r, plus DEL
    static ref CONTROL_CHARS: Regex = Regex::new(r"[\x00-\x08\x0B\x0C\x0E-\x1F\x7F]").unwrap();
    static ref REPEATED_PUNCTUATION: Regex = Regex::new(r"!{2,}|\?{2,}|\.{2,}").unwrap();
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TextCleanerSettings {
    pub normalize_quotes: bool,
    pub lowercase: bool,
}

impl Default for TextCleanerSettings {
    fn default() -> Self {
        Self {
            normalize_quotes: true,
            lowercase: false,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct TextCleaner {
    settings: TextCleanerSettings,
}

impl TextCleaner {
    pub fn new(settings: TextCleanerSettings) -> Self {
        Self { settings }
    }

    pub fn create(args: &ComponentArgs) -> Result<Box<dyn Preprocessor>> {
        Ok(Box::new(Self::new(args.settings()?)))
    }

    pub fn clean(&self, text: &str) -> String {
        let mut text = CONTROL_CHARS.replace_all(text, "").into_owned();

        if self.settings.normalize_quotes {
            text = text
                .replace(['\u{201C}', '\u{201D}'], "\"")
                .replace(['\u{2018}', '\u{2019}'], "'");
        }

        if self.settings.lowercase {
            text = text.to_lowercase();
        }

        REPEATED_PUNCTUATION
            .replace_all(&text, |caps: &Captures| caps[0][..1].to_string())
            .into_owned()
    }
}

impl Preprocessor for TextCleaner {
    fn process(&self, document: Document) -> Result<Document> {
        let Some(content) = document.content.as_deref() else {
            return Err(Error::Preprocessor(
                "text_cleaner requires document content".to_string(),
            ));
        };

        let cleaned = self.clean(content);
        Ok(document.with_content(Some(cleaned)))
    }
}
