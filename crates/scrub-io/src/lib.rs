//! Readers and writers for text, CSV and Excel files.
//!
//! Readers turn a path into a stream of [`scrub_core::Document`]s: one per
//! text file, or one per table row with the row kept under `original_data`.
//! Writers consume the processed documents.

pub mod readers;
pub mod writers;

pub use readers::{
    CsvReader, CsvReaderSettings, TextFileReader, TextReaderSettings, XlsxReader,
    XlsxReaderSettings, register_readers,
};
pub use writers::{
    CsvWriter, CsvWriterSettings, StdoutSettings, StdoutWriter, TextFileWriter, XlsxWriter,
    XlsxWriterSettings, register_writers,
};
