//! Document domain model

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Open metadata mapping carried by every document (insertion ordered)
pub type Metadata = serde_json::Map<String, Value>;

/// A structured row: field name to value, in column order
pub type Fields = IndexMap<String, String>;

/// Well-known metadata keys written by pipeline stages
pub mod keys {
    pub const FILENAME: &str = "filename";
    pub const PATH: &str = "path";
    pub const SOURCE: &str = "source";
    pub const ROW_NUMBER: &str = "row_number";
    pub const SHEET: &str = "sheet";
    pub const ORIGINAL_DATA: &str = "original_data";
    pub const SELECTED_FIELDS: &str = "selected_fields";
    pub const SELECTED_FOR_REDACTION: &str = "selected_for_redaction";
    pub const REDACTED_FIELDS: &str = "redacted_fields";
    pub const REDACTED_DATA: &str = "redacted_data";
    pub const REDACTED_ENTITIES: &str = "redacted_entities";
    pub const REDACTION_STRATEGY: &str = "redaction_strategy";
}

/// The unit of work flowing through the pipeline.
///
/// Stages take a document by value and hand back the next version, so a
/// clone kept by a caller never sees later changes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub content: Option<String>,
    #[serde(default)]
    pub metadata: Metadata,
}

impl Document {
    /// Prose document
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            metadata: Metadata::new(),
        }
    }

    /// Structured row awaiting field selection
    pub fn structured(original_data: &Fields) -> Self {
        Self {
            content: None,
            metadata: Metadata::new(),
        }
        .with_metadata(keys::ORIGINAL_DATA, fields_to_value(original_data))
    }

    pub fn with_content(mut self, content: Option<String>) -> Self {
        self.content = content;
        self
    }

    pub fn with_metadata(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.to_string(), value.into());
        self
    }

    pub fn set_metadata(&mut self, key: &str, value: impl Into<Value>) {
        self.metadata.insert(key.to_string(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.metadata.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).and_then(Value::as_str)
    }

    /// Read a field map stored under `key`.
    ///
    /// Non-string values are stringified (`null` becomes the empty string);
    /// a missing key or a non-object value yields `None`.
    pub fn fields(&self, key: &str) -> Option<Fields> {
        let object = self.metadata.get(key)?.as_object()?;
        Some(
            object
                .iter()
                .map(|(name, value)| (name.clone(), value_to_string(value)))
                .collect(),
        )
    }

    /// Read a list of field names stored under `key`
    pub fn field_names(&self, key: &str) -> Option<Vec<String>> {
        let list = self.metadata.get(key)?.as_array()?;
        Some(list.iter().map(value_to_string).collect())
    }

    pub fn redacted_entities(&self) -> Option<u64> {
        self.metadata
            .get(keys::REDACTED_ENTITIES)
            .and_then(Value::as_u64)
    }

    pub fn redaction_strategy(&self) -> Option<&str> {
        self.get_str(keys::REDACTION_STRATEGY)
    }
}

/// Store a field map as a JSON object, preserving field order
pub fn fields_to_value(fields: &Fields) -> Value {
    Value::Object(
        fields
            .iter()
            .map(|(name, value)| (name.clone(), Value::String(value.clone())))
            .collect(),
    )
}

fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
