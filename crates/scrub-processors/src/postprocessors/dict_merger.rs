use scrub_core::{ComponentArgs, Document, Fields, Postprocessor, Result, fields_to_value, keys};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DictMergerSettings {
    /// Carry unselected fields into `redacted_data` unchanged
    pub preserve_unselected: bool,
}

impl Default for DictMergerSettings {
    fn default() -> Self {
        Self {
            preserve_unselected: true,
        }
    }
}

/// Rebuilds a full row from `original_data` and `redacted_fields`
#[derive(Debug, Clone, Default)]
pub struct DictMerger {
    settings: DictMergerSettings,
}

impl DictMerger {
    pub fn new(settings: DictMergerSettings) -> Self {
        Self { settings }
    }

    pub fn create(args: &ComponentArgs) -> Result<Box<dyn Postprocessor>> {
        Ok(Box::new(Self::new(args.settings()?)))
    }
}

impl Postprocessor for DictMerger {
    fn process(&self, document: Document) -> Result<Document> {
        let redacted = document.fields(keys::REDACTED_FIELDS);
        let selected_row = document.get(keys::ORIGINAL_DATA).is_some()
            && document.get(keys::SELECTED_FIELDS).is_some();
        // a selected row still needs redacted_data when nothing matched
        if redacted.is_none() && !selected_row {
            return Ok(document);
        }
        let redacted = redacted.unwrap_or_default();

        let mut merged = if self.settings.preserve_unselected {
            document.fields(keys::ORIGINAL_DATA).unwrap_or_default()
        } else {
            Fields::new()
        };

        let selected = document.field_names(keys::SELECTED_FIELDS).unwrap_or_default();
        for field in selected {
            if let Some(value) = redacted.get(&field) {
                merged.insert(field, value.clone());
            }
        }

        Ok(document.with_metadata(keys::REDACTED_DATA, fields_to_value(&merged)))
    }
}
