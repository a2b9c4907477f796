use std::path::{Path, PathBuf};

use scrub_core::{ComponentArgs, Document, DocumentStream, Error, Reader, Result, keys};
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TextReaderSettings {
    /// Cap on files read from a directory
    pub max_files: Option<usize>,
}

/// Reads one `.txt` file, or every `.txt` file directly inside a directory
#[derive(Debug, Clone)]
pub struct TextFileReader {
    path: PathBuf,
    settings: TextReaderSettings,
}

impl TextFileReader {
    pub fn new(path: impl Into<PathBuf>, settings: TextReaderSettings) -> Result<Self> {
        let path = path.into();
        if !path.exists() {
            return Err(Error::Reader(format!("Path not found: {}", path.display())));
        }
        Ok(Self { path, settings })
    }

    pub fn create(args: &ComponentArgs) -> Result<Box<dyn Reader>> {
        Ok(Box::new(Self::new(args.require_path()?, args.settings()?)?))
    }

    fn list_directory(&self) -> Result<Vec<PathBuf>> {
        let dir = glob::Pattern::escape(&self.path.to_string_lossy());
        let pattern = format!("{}/*.txt", dir.trim_end_matches('/'));

        let mut files = Vec::new();
        for entry in glob::glob(&pattern).map_err(|e| Error::Reader(e.to_string()))? {
            let path = entry.map_err(|e| Error::Reader(e.to_string()))?;
            if path.is_file() {
                files.push(path);
            }
        }

        if files.is_empty() {
            return Err(Error::Reader(format!(
                "No .txt files found in directory: {}",
                self.path.display()
            )));
        }

        // Sort for determinism
        files.sort();

        if let Some(max) = self.settings.max_files {
            files.truncate(max);
        }

        Ok(files)
    }
}

impl Reader for TextFileReader {
    fn documents(&self) -> Result<DocumentStream<'_>> {
        if self.path.is_file() {
            return Ok(Box::new(std::iter::once(read_file(&self.path))));
        }

        if self.path.is_dir() {
            let files = self.list_directory()?;
            tracing::debug!(dir = %self.path.display(), files = files.len(), "Reading text files");
            return Ok(Box::new(files.into_iter().map(|path| read_file(&path))));
        }

        Err(Error::Reader(format!(
            "Path is neither file nor directory: {}",
            self.path.display()
        )))
    }
}

fn read_file(path: &Path) -> Result<Document> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Reader(format!("Failed to read file {}: {}", path.display(), e)))?;

    let filename = path
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_default();
    let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());

    Ok(Document::text(content)
        .with_metadata(keys::FILENAME, filename)
        .with_metadata(keys::PATH, absolute.to_string_lossy().to_string()))
}
