use std::path::PathBuf;
use std::sync::Arc;

use scrub_config::Config;
use scrub_core::{
    ComponentArgs, Document, Error, Fields, Postprocessor, Preprocessor, Result, fields_to_value,
    keys,
};
use scrub_security::{RedactionStrategy, Redactor};
use uuid::Uuid;

use crate::Registries;

/// Preprocessors built with their `[preprocessors.<name>]` table
const CONFIGURED_PREPROCESSORS: &[&str] = &["field_selector"];
/// Postprocessors built with their `[postprocessors.<name>]` table
const CONFIGURED_POSTPROCESSORS: &[&str] = &["dict_merger", "format_preserver"];

/// One run: where to read, where to write and which stages to apply
#[derive(Debug, Clone)]
pub struct PipelineRequest {
    pub input: PathBuf,
    pub output: Option<PathBuf>,
    pub reader: String,
    pub writer: String,
    pub preprocessors: Vec<String>,
    pub postprocessors: Vec<String>,
    /// Overrides the configured strategy for every document of the run
    pub strategy: Option<String>,
}

impl PipelineRequest {
    pub fn new(input: impl Into<PathBuf>, reader: &str, writer: &str) -> Self {
        Self {
            input: input.into(),
            output: None,
            reader: reader.to_string(),
            writer: writer.to_string(),
            preprocessors: Vec::new(),
            postprocessors: Vec::new(),
            strategy: None,
        }
    }

    pub fn with_output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = Some(output.into());
        self
    }

    pub fn with_preprocessors<S: AsRef<str>>(mut self, names: &[S]) -> Self {
        self.preprocessors = names.iter().map(|n| n.as_ref().to_string()).collect();
        self
    }

    pub fn with_postprocessors<S: AsRef<str>>(mut self, names: &[S]) -> Self {
        self.postprocessors = names.iter().map(|n| n.as_ref().to_string()).collect();
        self
    }

    pub fn with_strategy(mut self, strategy: impl Into<String>) -> Self {
        self.strategy = Some(strategy.into());
        self
    }
}

/// Drives documents from a reader through the processing stages into a
/// writer, one document at a time.
pub struct Pipeline {
    config: Arc<Config>,
    registries: Arc<Registries>,
    redactor: Arc<Redactor>,
}

impl Pipeline {
    pub fn new(config: Arc<Config>, registries: Arc<Registries>, redactor: Arc<Redactor>) -> Self {
        Self {
            config,
            registries,
            redactor,
        }
    }

    /// Pipeline with the built-in components and the bundled analyzer
    pub fn from_config(config: Config) -> Result<Self> {
        let redactor = Redactor::from_config(&config)?;
        Ok(Self::new(
            Arc::new(config),
            Arc::new(Registries::with_defaults()?),
            Arc::new(redactor),
        ))
    }

    pub fn registries(&self) -> &Registries {
        &self.registries
    }

    /// Run the request to completion and return the processed documents.
    ///
    /// Each document is written before the next one is read. The first
    /// failure aborts the run; documents already written stay written.
    pub fn process(&self, request: &PipelineRequest) -> Result<Vec<Document>> {
        let run_id = Uuid::new_v4();
        let span = tracing::info_span!("pipeline", run_id = %run_id);
        let _enter = span.enter();

        self.run(request).map_err(|e| {
            tracing::debug!(error = %e, "Pipeline run failed");
            wrap_error(e)
        })
    }

    fn run(&self, request: &PipelineRequest) -> Result<Vec<Document>> {
        let strategy = self.redactor.resolve_strategy(request.strategy.as_deref())?;

        let reader = self.registries.readers.create(
            &request.reader,
            &ComponentArgs::new()
                .with_path(&request.input)
                .with_settings(self.config.reader_settings(&request.reader)),
        )?;
        let preprocessors = self.preprocessors(&request.preprocessors)?;
        let postprocessors = self.postprocessors(&request.postprocessors)?;

        let writer_args = ComponentArgs {
            path: request.output.clone(),
            settings: self.config.writer_settings(&request.writer),
        };
        let mut writer = self.registries.writers.create(&request.writer, &writer_args)?;

        tracing::info!(
            reader = %request.reader,
            writer = %request.writer,
            strategy = %strategy,
            "Starting pipeline"
        );

        let mut processed = Vec::new();
        let mut entities = 0;

        for document in reader.documents()? {
            let mut document = document?;

            for preprocessor in &preprocessors {
                document = preprocessor.process(document)?;
            }

            document = if document.get(keys::SELECTED_FOR_REDACTION).is_some() {
                self.redact_fields(document, strategy)?
            } else {
                self.redactor.redact(document, None, Some(strategy.as_str()))?
            };

            for postprocessor in &postprocessors {
                document = postprocessor.process(document)?;
            }

            writer.write(&document)?;

            let count = document.redacted_entities().unwrap_or(0);
            entities += count;
            tracing::debug!(index = processed.len(), entities = count, "Processed document");
            processed.push(document);
        }

        writer.finalize()?;

        tracing::info!(documents = processed.len(), entities, "Pipeline complete");
        Ok(processed)
    }

    /// Redact each selected field on its own, leaving `content` alone
    fn redact_fields(&self, document: Document, strategy: RedactionStrategy) -> Result<Document> {
        let selected = document
            .fields(keys::SELECTED_FOR_REDACTION)
            .unwrap_or_default();

        let mut redacted = Fields::new();
        let mut total = 0;

        for (field, value) in selected {
            if value.trim().is_empty() {
                redacted.insert(field, value);
                continue;
            }

            let redaction = self.redactor.redact_text(&value, None, strategy)?;
            tracing::debug!(field = %field, entities = redaction.entity_count, "Redacted field");
            total += redaction.entity_count;
            redacted.insert(field, redaction.text);
        }

        Ok(document
            .with_metadata(keys::REDACTED_FIELDS, fields_to_value(&redacted))
            .with_metadata(keys::REDACTED_ENTITIES, total as u64)
            .with_metadata(keys::REDACTION_STRATEGY, strategy.as_str()))
    }

    fn preprocessors(&self, names: &[String]) -> Result<Vec<Box<dyn Preprocessor>>> {
        names
            .iter()
            .map(|name| {
                let settings = CONFIGURED_PREPROCESSORS
                    .contains(&name.as_str())
                    .then(|| self.config.preprocessor_settings(name))
                    .flatten();
                self.registries
                    .preprocessors
                    .create(name, &ComponentArgs::new().with_settings(settings))
            })
            .collect()
    }

    fn postprocessors(&self, names: &[String]) -> Result<Vec<Box<dyn Postprocessor>>> {
        names
            .iter()
            .map(|name| {
                let settings = CONFIGURED_POSTPROCESSORS
                    .contains(&name.as_str())
                    .then(|| self.config.postprocessor_settings(name))
                    .flatten();
                self.registries
                    .postprocessors
                    .create(name, &ComponentArgs::new().with_settings(settings))
            })
            .collect()
    }
}

/// Stage errors surface as they are; anything else becomes a pipeline error
fn wrap_error(error: Error) -> Error {
    if error.is_stage_error() {
        error
    } else {
        Error::Pipeline(format!("Pipeline processing failed: {}", error))
    }
}
