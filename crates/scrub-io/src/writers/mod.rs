//! Document sinks

mod csv_file;
mod stdout;
mod text_file;
mod xlsx_file;

pub use csv_file::{CsvWriter, CsvWriterSettings};
pub use stdout::{StdoutSettings, StdoutWriter};
pub use text_file::TextFileWriter;
pub use xlsx_file::{XlsxWriter, XlsxWriterSettings};

use std::fmt::Display;
use std::fs;
use std::path::Path;

use scrub_core::{ComponentRegistry, Error, Result, Writer};

/// Register the built-in writers
pub fn register_writers(registry: &mut ComponentRegistry<dyn Writer>) -> Result<()> {
    registry.register("text_file", TextFileWriter::create)?;
    registry.register("stdout", StdoutWriter::create)?;
    registry.register("csv_file", CsvWriter::create)?;
    registry.register("xlsx_file", XlsxWriter::create)?;
    Ok(())
}

pub(crate) fn write_error(path: &Path, e: impl Display) -> Error {
    Error::Writer(format!("Failed to write {}: {}", path.display(), e))
}

/// Create the directories leading up to an output file
pub(crate) fn create_parent_dirs(path: &Path) -> Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            fs::create_dir_all(parent).map_err(|e| write_error(path, e))
        }
        _ => Ok(()),
    }
}
