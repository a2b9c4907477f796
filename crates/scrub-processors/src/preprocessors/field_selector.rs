use scrub_core::{ComponentArgs, Document, Fields, Preprocessor, Result, fields_to_value, keys};
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FieldSelectorSettings {
    /// Fields to redact; empty selects every field
    pub fields: Vec<String>,
}

/// Marks the fields of a structured row that should be redacted.
///
/// Rows without `original_data` pass through unchanged. Selected rows lose
/// their `content`, which routes them through per-field redaction.
#[derive(Debug, Clone, Default)]
pub struct FieldSelector {
    settings: FieldSelectorSettings,
}

impl FieldSelector {
    pub fn new(settings: FieldSelectorSettings) -> Self {
        Self { settings }
    }

    pub fn create(args: &ComponentArgs) -> Result<Box<dyn Preprocessor>> {
        Ok(Box::new(Self::new(args.settings()?)))
    }

    fn select(&self, original: &Fields) -> Vec<String> {
        if self.settings.fields.is_empty() {
            original.keys().cloned().collect()
        } else {
            self.settings
                .fields
                .iter()
                .filter(|field| original.contains_key(field.as_str()))
                .cloned()
                .collect()
        }
    }
}

impl Preprocessor for FieldSelector {
    fn process(&self, document: Document) -> Result<Document> {
        let original = match document.fields(keys::ORIGINAL_DATA) {
            Some(original) if !original.is_empty() => original,
            _ => return Ok(document),
        };

        let selected_fields = self.select(&original);
        let selected: Fields = selected_fields
            .iter()
            .filter_map(|field| original.get(field).map(|value| (field.clone(), value.clone())))
            .collect();

        tracing::debug!(selected = selected.len(), total = original.len(), "Selected fields");

        Ok(document
            .with_content(None)
            .with_metadata(keys::SELECTED_FOR_REDACTION, fields_to_value(&selected))
            .with_metadata(keys::SELECTED_FIELDS, selected_fields))
    }
}
