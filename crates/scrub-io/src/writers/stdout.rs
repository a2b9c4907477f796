use std::io::{self, Write};

use scrub_core::{ComponentArgs, Document, Error, Result, Writer, keys};
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StdoutSettings {
    /// Print metadata as JSON before each document
    pub show_metadata: bool,
}

/// Prints documents, one after another
pub struct StdoutWriter {
    out: Box<dyn Write + Send>,
    settings: StdoutSettings,
}

impl StdoutWriter {
    pub fn new(settings: StdoutSettings) -> Self {
        Self::with_output(Box::new(io::stdout()), settings)
    }

    /// Print somewhere other than stdout
    pub fn with_output(out: Box<dyn Write + Send>, settings: StdoutSettings) -> Self {
        Self { out, settings }
    }

    pub fn create(args: &ComponentArgs) -> Result<Box<dyn Writer>> {
        Ok(Box::new(Self::new(args.settings()?)))
    }

    fn emit(&mut self, document: &Document) -> io::Result<bool> {
        if self.settings.show_metadata {
            let metadata = serde_json::to_string(&document.metadata)?;
            writeln!(self.out, "--- Metadata: {} ---", metadata)?;
        }

        match (&document.content, document.get(keys::REDACTED_DATA)) {
            (Some(content), _) => writeln!(self.out, "{}", content)?,
            (None, Some(row)) => writeln!(self.out, "{}", row)?,
            (None, None) => return Ok(false),
        }

        Ok(true)
    }
}

impl Writer for StdoutWriter {
    fn write(&mut self, document: &Document) -> Result<()> {
        let printed = self
            .emit(document)
            .map_err(|e| Error::Writer(format!("Failed to write to stdout: {}", e)))?;

        if !printed {
            return Err(Error::Writer("Document must contain content".to_string()));
        }
        Ok(())
    }

    fn finalize(&mut self) -> Result<()> {
        self.out
            .flush()
            .map_err(|e| Error::Writer(format!("Failed to flush stdout: {}", e)))
    }
}
