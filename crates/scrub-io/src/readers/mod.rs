//! Document sources

mod csv_file;
mod text_file;
mod xlsx_file;

pub use csv_file::{CsvReader, CsvReaderSettings};
pub use text_file::{TextFileReader, TextReaderSettings};
pub use xlsx_file::{XlsxReader, XlsxReaderSettings};

pub(crate) use csv_file::single_byte;

use scrub_core::{ComponentRegistry, Reader, Result};

/// Register the built-in readers
pub fn register_readers(registry: &mut ComponentRegistry<dyn Reader>) -> Result<()> {
    registry.register("text_file", TextFileReader::create)?;
    registry.register("csv_file", CsvReader::create)?;
    registry.register("xlsx_file", XlsxReader::create)?;
    Ok(())
}
