use std::fmt::Write as _;
use std::path::PathBuf;

use calamine::{Data, DataType, Range, Reader as _, open_workbook_auto};
use scrub_core::{
    ComponentArgs, Document, DocumentStream, Error, Fields, Reader, Result, fields_to_value, keys,
};
use chrono::format::{Item, StrftimeItems};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct XlsxReaderSettings {
    /// Sheet by position; ignored when `sheet_name` is set
    pub sheet_index: usize,
    pub sheet_name: Option<String>,
    pub skip_empty_rows: bool,
    /// chrono format for date cells
    pub date_format: String,
}

impl Default for XlsxReaderSettings {
    fn default() -> Self {
        Self {
            sheet_index: 0,
            sheet_name: None,
            skip_empty_rows: true,
            date_format: "%Y-%m-%d".to_string(),
        }
    }
}

/// Reads one worksheet; the first used row is the header
#[derive(Debug, Clone)]
pub struct XlsxReader {
    path: PathBuf,
    settings: XlsxReaderSettings,
}

impl XlsxReader {
    pub fn new(path: impl Into<PathBuf>, settings: XlsxReaderSettings) -> Result<Self> {
        let path = path.into();
        if !path.exists() {
            return Err(Error::Reader(format!("XLSX file not found: {}", path.display())));
        }
        if StrftimeItems::new(&settings.date_format).any(|item| matches!(item, Item::Error)) {
            return Err(Error::Reader(format!(
                "Invalid date_format '{}'",
                settings.date_format
            )));
        }
        Ok(Self { path, settings })
    }

    pub fn create(args: &ComponentArgs) -> Result<Box<dyn Reader>> {
        Ok(Box::new(Self::new(args.require_path()?, args.settings()?)?))
    }

    fn load_sheet(&self) -> Result<(String, Range<Data>)> {
        let mut workbook = open_workbook_auto(&self.path).map_err(|e| {
            Error::Reader(format!("Failed to load {}: {}", self.path.display(), e))
        })?;

        let names = workbook.sheet_names();
        let sheet = match &self.settings.sheet_name {
            Some(name) if names.contains(name) => name.clone(),
            Some(name) => {
                return Err(Error::Reader(format!(
                    "Sheet '{}' not found. Available: {}",
                    name,
                    names.join(", ")
                )));
            }
            None => names.get(self.settings.sheet_index).cloned().ok_or_else(|| {
                Error::Reader(format!(
                    "Sheet index {} out of range. Available: {}",
                    self.settings.sheet_index,
                    names.join(", ")
                ))
            })?,
        };

        let range = workbook
            .worksheet_range(&sheet)
            .map_err(|e| Error::Reader(format!("Failed to read sheet '{}': {}", sheet, e)))?;

        Ok((sheet, range))
    }
}

impl Reader for XlsxReader {
    fn documents(&self) -> Result<DocumentStream<'_>> {
        let (sheet, range) = self.load_sheet()?;
        if range.is_empty() {
            return Ok(Box::new(std::iter::empty()));
        }

        let date_format = self.settings.date_format.clone();
        let width = range.width();
        let first_row = range.start().map(|(row, _)| row as usize).unwrap_or(0);

        let headers: Vec<String> = (0..width)
            .map(|column| {
                let value = range
                    .get((0, column))
                    .map(|cell| format_cell(cell, &date_format))
                    .unwrap_or_default();
                if value.is_empty() {
                    format!("Column_{}", column)
                } else {
                    value
                }
            })
            .collect();

        let source = self.path.display().to_string();
        let skip_empty = self.settings.skip_empty_rows;

        let rows = (1..range.height()).filter_map(move |row| {
            let values: Vec<String> = (0..width)
                .map(|column| {
                    range
                        .get((row, column))
                        .map(|cell| format_cell(cell, &date_format))
                        .unwrap_or_default()
                })
                .collect();

            if skip_empty && values.iter().all(|value| value.trim().is_empty()) {
                return None;
            }

            let fields: Fields = headers.iter().cloned().zip(values).collect();
            // 1-based sheet row
            let row_number = first_row + row + 1;

            Some(Ok(Document::default()
                .with_metadata(keys::SOURCE, source.clone())
                .with_metadata(keys::SHEET, sheet.clone())
                .with_metadata(keys::ROW_NUMBER, row_number as u64)
                .with_metadata(keys::ORIGINAL_DATA, fields_to_value(&fields))))
        });

        Ok(Box::new(rows))
    }
}

fn format_cell(cell: &Data, date_format: &str) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => format_number(*f),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(_) => cell
            .as_datetime()
            .and_then(|dt: chrono::NaiveDateTime| {
                let mut out = String::new();
                write!(out, "{}", dt.format(date_format)).ok()?;
                Some(out)
            })
            .unwrap_or_else(|| cell.to_string()),
        Data::Error(e) => e.to_string(),
    }
}

/// Whole floats print without a fractional part, as spreadsheets show them
fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_xlsxwriter::{ExcelDateTime, Format, Workbook};
    use tempfile::TempDir;

    fn write_fixture(path: &std::path::Path) {
        let mut workbook = Workbook::new();
        let date_format = Format::new().set_num_format("yyyy-mm-dd");

        let sheet = workbook.add_worksheet();
        sheet.set_name("Patients").unwrap();
        sheet.write_string(0, 0, "ID").unwrap();
        sheet.write_string(0, 1, "Name").unwrap();
        sheet.write_string(0, 2, "Visit").unwrap();

        sheet.write_number(1, 0, 1).unwrap();
        sheet.write_string(1, 1, "John Doe").unwrap();
        let visit = ExcelDateTime::from_ymd(2024, 3, 9).unwrap();
        sheet.write_datetime_with_format(1, 2, &visit, &date_format).unwrap();

        sheet.write_number(3, 0, 2.5).unwrap();
        sheet.write_string(3, 1, "Jane Roe").unwrap();

        let other = workbook.add_worksheet();
        other.set_name("Other").unwrap();
        other.write_string(0, 0, "Only").unwrap();
        other.write_string(1, 0, "value").unwrap();

        workbook.save(path).unwrap();
    }

    fn read(path: &std::path::Path, settings: XlsxReaderSettings) -> Vec<Document> {
        XlsxReader::new(path, settings)
            .unwrap()
            .documents()
            .unwrap()
            .collect::<Result<Vec<_>>>()
            .unwrap()
    }

    #[test]
    fn test_reads_first_sheet() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("patients.xlsx");
        write_fixture(&path);

        let docs = read(&path, XlsxReaderSettings::default());
        assert_eq!(docs.len(), 2);

        let first = &docs[0];
        assert_eq!(first.get_str(keys::SHEET), Some("Patients"));
        assert_eq!(first.get(keys::ROW_NUMBER).unwrap(), 2);
        let data = first.fields(keys::ORIGINAL_DATA).unwrap();
        assert_eq!(data["ID"], "1");
        assert_eq!(data["Name"], "John Doe");
        assert_eq!(data["Visit"], "2024-03-09");

        // empty row 3 skipped
        assert_eq!(docs[1].get(keys::ROW_NUMBER).unwrap(), 4);
        assert_eq!(docs[1].fields(keys::ORIGINAL_DATA).unwrap()["ID"], "2.5");
    }

    #[test]
    fn test_sheet_by_name_and_missing_sheet() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("patients.xlsx");
        write_fixture(&path);

        let by_name = XlsxReaderSettings {
            sheet_name: Some("Other".to_string()),
            ..XlsxReaderSettings::default()
        };
        let docs = read(&path, by_name);
        assert_eq!(docs[0].fields(keys::ORIGINAL_DATA).unwrap()["Only"], "value");

        let missing = XlsxReaderSettings {
            sheet_name: Some("Nope".to_string()),
            ..XlsxReaderSettings::default()
        };
        let err = XlsxReader::new(&path, missing).unwrap().documents().err().unwrap();
        assert!(err.to_string().contains("Available: Patients, Other"));
    }

    #[test]
    fn test_invalid_date_format_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("patients.xlsx");
        write_fixture(&path);

        let settings = XlsxReaderSettings {
            date_format: "%Y-%Q".to_string(),
            ..XlsxReaderSettings::default()
        };
        let err = XlsxReader::new(&path, settings).unwrap_err();
        assert!(matches!(err, Error::Reader(_)));
        assert!(err.to_string().contains("%Y-%Q"));
    }

    #[test]
    fn test_unformattable_date_falls_back() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("patients.xlsx");
        write_fixture(&path);

        let mut workbook = open_workbook_auto(&path).unwrap();
        let range = workbook.worksheet_range("Patients").unwrap();
        let cell = range.get((1, 2)).unwrap();
        assert!(!format_cell(cell, "%Y-%Q").is_empty());
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(42.0), "42");
        assert_eq!(format_number(-3.25), "-3.25");
    }
}
