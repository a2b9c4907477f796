//! Pluggable component contracts

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;

use crate::{Document, Error, Result};

/// Lazy sequence of documents produced by a reader
pub type DocumentStream<'a> = Box<dyn Iterator<Item = Result<Document>> + 'a>;

/// Produces documents from a source
pub trait Reader: Send {
    /// Start a fresh pass over the source.
    ///
    /// Documents are produced one at a time; nothing beyond the current
    /// document needs to be held in memory.
    fn documents(&self) -> Result<DocumentStream<'_>>;
}

/// Transforms a document before redaction
pub trait Preprocessor: Send + Sync {
    fn process(&self, document: Document) -> Result<Document>;
}

/// Transforms a document after redaction
pub trait Postprocessor: Send + Sync {
    fn process(&self, document: Document) -> Result<Document>;
}

/// Persists processed documents
pub trait Writer: Send {
    /// Called once per processed document, in order
    fn write(&mut self, document: &Document) -> Result<()>;

    /// Flush buffered output; called exactly once after the last document
    fn finalize(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Construction arguments forwarded by a registry to a constructor
#[derive(Debug, Clone, Default)]
pub struct ComponentArgs {
    pub path: Option<PathBuf>,
    /// The component's own configuration table
    pub settings: Option<serde_json::Value>,
}

impl ComponentArgs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn with_settings(mut self, settings: Option<serde_json::Value>) -> Self {
        self.settings = settings;
        self
    }

    pub fn require_path(&self) -> Result<&Path> {
        self.path
            .as_deref()
            .ok_or_else(|| Error::InvalidArguments("missing required argument 'path'".to_string()))
    }

    /// Deserialize the settings table, falling back to defaults when absent
    pub fn settings<T: DeserializeOwned + Default>(&self) -> Result<T> {
        match &self.settings {
            None | Some(serde_json::Value::Null) => Ok(T::default()),
            Some(value) => serde_json::from_value(value.clone())
                .map_err(|e| Error::InvalidArguments(e.to_string())),
        }
    }
}
