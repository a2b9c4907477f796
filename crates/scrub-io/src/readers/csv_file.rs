use std::path::PathBuf;

use scrub_core::{
    ComponentArgs, Document, DocumentStream, Error, Fields, Reader, Result, fields_to_value, keys,
};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CsvReaderSettings {
    pub delimiter: String,
    #[serde(alias = "quotechar")]
    pub quote: String,
    pub skip_empty_rows: bool,
}

impl Default for CsvReaderSettings {
    fn default() -> Self {
        Self {
            delimiter: ",".to_string(),
            quote: "\"".to_string(),
            skip_empty_rows: true,
        }
    }
}

/// Single-byte delimiter/quote settings as the csv crate expects them
pub(crate) fn single_byte(name: &str, value: &str) -> Result<u8> {
    match value.as_bytes() {
        [byte] => Ok(*byte),
        _ => Err(Error::InvalidArguments(format!(
            "{} must be a single ASCII character, got {:?}",
            name, value
        ))),
    }
}

/// Yields one structured document per data row; the first row is the header
#[derive(Debug, Clone)]
pub struct CsvReader {
    path: PathBuf,
    delimiter: u8,
    quote: u8,
    skip_empty_rows: bool,
}

impl CsvReader {
    pub fn new(path: impl Into<PathBuf>, settings: CsvReaderSettings) -> Result<Self> {
        let path = path.into();
        if !path.exists() {
            return Err(Error::Reader(format!("CSV file not found: {}", path.display())));
        }

        Ok(Self {
            path,
            delimiter: single_byte("delimiter", &settings.delimiter)?,
            quote: single_byte("quote", &settings.quote)?,
            skip_empty_rows: settings.skip_empty_rows,
        })
    }

    pub fn create(args: &ComponentArgs) -> Result<Box<dyn Reader>> {
        Ok(Box::new(Self::new(args.require_path()?, args.settings()?)?))
    }
}

impl Reader for CsvReader {
    fn documents(&self) -> Result<DocumentStream<'_>> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(self.delimiter)
            .quote(self.quote)
            .has_headers(true)
            .flexible(true)
            .from_path(&self.path)
            .map_err(|e| Error::Reader(format!("Failed to open {}: {}", self.path.display(), e)))?;

        let headers = reader
            .headers()
            .map_err(|e| Error::Reader(format!("Failed to read CSV header: {}", e)))?
            .clone();

        let source = self.path.display().to_string();
        let skip_empty = self.skip_empty_rows;

        let rows = reader
            .into_records()
            .enumerate()
            .filter_map(move |(index, record)| {
                // header is row 1
                let row_number = index + 2;
                let record = match record {
                    Ok(record) => record,
                    Err(e) => {
                        return Some(Err(Error::Reader(format!(
                            "Failed to parse {} row {}: {}",
                            source, row_number, e
                        ))));
                    }
                };

                if skip_empty && record.iter().all(|value| value.trim().is_empty()) {
                    return None;
                }

                let fields: Fields = headers
                    .iter()
                    .enumerate()
                    .map(|(column, header)| {
                        (header.to_string(), record.get(column).unwrap_or("").to_string())
                    })
                    .collect();

                Some(Ok(Document::default()
                    .with_metadata(keys::SOURCE, source.clone())
                    .with_metadata(keys::ROW_NUMBER, row_number as u64)
                    .with_metadata(keys::ORIGINAL_DATA, fields_to_value(&fields))))
            });

        Ok(Box::new(rows))
    }
}
