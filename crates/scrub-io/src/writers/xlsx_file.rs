use std::path::PathBuf;

use rust_xlsxwriter::{Workbook, XlsxError};
use scrub_core::{ComponentArgs, Document, Result, Writer, keys};
use serde::Deserialize;

use super::{create_parent_dirs, write_error};

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct XlsxWriterSettings {
    pub sheet_name: String,
    pub write_header: bool,
}

impl Default for XlsxWriterSettings {
    fn default() -> Self {
        Self {
            sheet_name: "Redacted Data".to_string(),
            write_header: true,
        }
    }
}

/// Collects `redacted_data` rows and saves them as a workbook on finalize.
///
/// Nothing is written when no row was collected.
#[derive(Debug)]
pub struct XlsxWriter {
    path: PathBuf,
    settings: XlsxWriterSettings,
    header: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl XlsxWriter {
    pub fn new(path: impl Into<PathBuf>, settings: XlsxWriterSettings) -> Self {
        Self {
            path: path.into(),
            settings,
            header: Vec::new(),
            rows: Vec::new(),
        }
    }

    pub fn create(args: &ComponentArgs) -> Result<Box<dyn Writer>> {
        Ok(Box::new(Self::new(args.require_path()?, args.settings()?)))
    }

    fn save(&self) -> std::result::Result<(), XlsxError> {
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.set_name(&self.settings.sheet_name)?;

        let mut row_index: u32 = 0;
        if self.settings.write_header {
            for (column, name) in self.header.iter().enumerate() {
                sheet.write_string(row_index, column as u16, name)?;
            }
            row_index += 1;
        }

        for row in &self.rows {
            for (column, value) in row.iter().enumerate() {
                sheet.write_string(row_index, column as u16, value)?;
            }
            row_index += 1;
        }

        workbook.save(&self.path)
    }
}

impl Writer for XlsxWriter {
    fn write(&mut self, document: &Document) -> Result<()> {
        let Some(row) = document.fields(keys::REDACTED_DATA).filter(|row| !row.is_empty()) else {
            tracing::debug!("Skipping document without redacted_data");
            return Ok(());
        };

        if self.header.is_empty() {
            self.header = row.keys().cloned().collect();
        }

        let values = self
            .header
            .iter()
            .map(|column| row.get(column).cloned().unwrap_or_default())
            .collect();
        self.rows.push(values);
        Ok(())
    }

    fn finalize(&mut self) -> Result<()> {
        if self.rows.is_empty() {
            tracing::debug!("No rows collected, skipping {}", self.path.display());
            return Ok(());
        }

        create_parent_dirs(&self.path)?;
        self.save().map_err(|e| write_error(&self.path, e))?;

        tracing::info!("Wrote {} rows to {}", self.rows.len(), self.path.display());
        Ok(())
    }
}
