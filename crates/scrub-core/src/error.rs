use thiserror::Error;

use crate::registry::ComponentKind;

#[derive(Error, Debug)]
pub enum Error {
    #[error("{0}")]
    Registration(String),

    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    #[error("Failed to instantiate {kind} '{name}': {message}")]
    Instantiation {
        kind: ComponentKind,
        name: String,
        message: String,
    },

    #[error("Reader error: {0}")]
    Reader(String),

    #[error("Writer error: {0}")]
    Writer(String),

    #[error("Preprocessor error: {0}")]
    Preprocessor(String),

    #[error("Postprocessor error: {0}")]
    Postprocessor(String),

    #[error("Redactor error: {0}")]
    Redactor(String),

    #[error("{0}")]
    Pipeline(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Other error: {0}")]
    Other(#[from] anyhow::Error),
}

impl Error {
    /// Whether this error already names the stage that produced it.
    pub fn is_stage_error(&self) -> bool {
        !matches!(self, Error::Io(_) | Error::Serialization(_) | Error::Other(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
