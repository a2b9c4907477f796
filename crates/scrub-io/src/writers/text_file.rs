use std::fs::{self, OpenOptions};
use std::io::Write as _;
use std::path::{Path, PathBuf};

use scrub_core::{ComponentArgs, Document, Error, Result, Writer, keys};

use super::{create_parent_dirs, write_error};

/// Writes document content to one file, or one file per document into a
/// directory.
///
/// The target is a directory when it already is one or when the path ends
/// in `/`. In file mode the first document replaces the file and later ones
/// are appended after a newline.
#[derive(Debug)]
pub struct TextFileWriter {
    path: Option<PathBuf>,
    directory: bool,
    written: usize,
}

impl TextFileWriter {
    pub fn new(path: Option<PathBuf>) -> Result<Self> {
        let directory = match &path {
            Some(path) if path.is_dir() => true,
            Some(path) if path.to_string_lossy().ends_with('/') => {
                fs::create_dir_all(path).map_err(|e| write_error(path, e))?;
                true
            }
            _ => false,
        };

        Ok(Self {
            path,
            directory,
            written: 0,
        })
    }

    pub fn create(args: &ComponentArgs) -> Result<Box<dyn Writer>> {
        Ok(Box::new(Self::new(args.path.clone())?))
    }

    fn write_to_directory(&self, dir: &Path, document: &Document, content: &str) -> Result<()> {
        let filename = document.get_str(keys::FILENAME).filter(|f| !f.is_empty()).ok_or_else(|| {
            Error::Writer(
                "Document metadata must contain 'filename' when writing to a directory".to_string(),
            )
        })?;

        let target = dir.join(filename);
        fs::write(&target, content).map_err(|e| write_error(&target, e))
    }

    fn write_to_file(&self, path: &Path, content: &str) -> Result<()> {
        create_parent_dirs(path)?;

        let result = if self.written == 0 {
            fs::write(path, content)
        } else {
            OpenOptions::new()
                .append(true)
                .open(path)
                .and_then(|mut file| write!(file, "\n{}", content))
        };

        result.map_err(|e| write_error(path, e))
    }
}

impl Writer for TextFileWriter {
    fn write(&mut self, document: &Document) -> Result<()> {
        let Some(path) = self.path.clone() else {
            return Err(Error::Writer("text_file writer requires an output path".to_string()));
        };
        let Some(content) = document.content.as_deref() else {
            return Err(Error::Writer("Document must contain content".to_string()));
        };

        if self.directory {
            self.write_to_directory(&path, document, content)?;
        } else {
            self.write_to_file(&path, content)?;
        }

        self.written += 1;
        Ok(())
    }
}
