use std::fs::File;
use std::path::PathBuf;

use scrub_core::{ComponentArgs, Document, Error, Result, Writer, keys};
use serde::Deserialize;

use super::{create_parent_dirs, write_error};
use crate::readers::single_byte;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CsvWriterSettings {
    pub delimiter: String,
    #[serde(alias = "quotechar")]
    pub quote: String,
    pub write_header: bool,
}

impl Default for CsvWriterSettings {
    fn default() -> Self {
        Self {
            delimiter: ",".to_string(),
            quote: "\"".to_string(),
            write_header: true,
        }
    }
}

/// Writes each document's `redacted_data` as one CSV row.
///
/// The header comes from the first row's keys. Documents without
/// `redacted_data` are skipped. The file is created on the first row.
pub struct CsvWriter {
    path: PathBuf,
    delimiter: u8,
    quote: u8,
    write_header: bool,
    header: Vec<String>,
    writer: Option<csv::Writer<File>>,
}

impl CsvWriter {
    pub fn new(path: impl Into<PathBuf>, settings: CsvWriterSettings) -> Result<Self> {
        Ok(Self {
            path: path.into(),
            delimiter: single_byte("delimiter", &settings.delimiter)?,
            quote: single_byte("quote", &settings.quote)?,
            write_header: settings.write_header,
            header: Vec::new(),
            writer: None,
        })
    }

    pub fn create(args: &ComponentArgs) -> Result<Box<dyn Writer>> {
        Ok(Box::new(Self::new(args.require_path()?, args.settings()?)?))
    }

    fn open(&mut self, columns: Vec<String>) -> Result<&mut csv::Writer<File>> {
        create_parent_dirs(&self.path)?;

        let mut writer = csv::WriterBuilder::new()
            .delimiter(self.delimiter)
            .quote(self.quote)
            .from_path(&self.path)
            .map_err(|e| write_error(&self.path, e))?;

        if self.write_header {
            writer
                .write_record(&columns)
                .map_err(|e| write_error(&self.path, e))?;
        }

        self.header = columns;
        Ok(self.writer.insert(writer))
    }
}

impl Writer for CsvWriter {
    fn write(&mut self, document: &Document) -> Result<()> {
        let Some(row) = document.fields(keys::REDACTED_DATA).filter(|row| !row.is_empty()) else {
            tracing::debug!("Skipping document without redacted_data");
            return Ok(());
        };

        if self.writer.is_none() {
            self.open(row.keys().cloned().collect())?;
        }

        let record: Vec<&str> = self
            .header
            .iter()
            .map(|column| row.get(column).map(String::as_str).unwrap_or(""))
            .collect();

        let path = self.path.clone();
        let writer = self
            .writer
            .as_mut()
            .ok_or_else(|| Error::Writer("CSV output is not open".to_string()))?;
        writer.write_record(&record).map_err(|e| write_error(&path, e))
    }

    fn finalize(&mut self) -> Result<()> {
        if let Some(writer) = self.writer.as_mut() {
            writer.flush().map_err(|e| write_error(&self.path, e))?;
        }
        Ok(())
    }
}
