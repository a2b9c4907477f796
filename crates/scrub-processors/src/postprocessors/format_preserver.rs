use scrub_core::{ComponentArgs, Document, Postprocessor, Result};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FormatPreserverSettings {
    pub preserve_paragraphs: bool,
}

impl Default for FormatPreserverSettings {
    fn default() -> Self {
        Self {
            preserve_paragraphs: true,
        }
    }
}

/// Leaves documents as they are.
///
/// Redaction already keeps line structure intact; this stage exists so
/// pipelines configured with it keep working.
#[derive(Debug, Clone, Copy, Default)]
pub struct FormatPreserver;

impl FormatPreserver {
    pub fn create(args: &ComponentArgs) -> Result<Box<dyn Postprocessor>> {
        args.settings::<FormatPreserverSettings>()?;
        Ok(Box::new(Self))
    }
}

impl Postprocessor for FormatPreserver {
    fn process(&self, document: Document) -> Result<Document> {
        Ok(document)
    }
}
