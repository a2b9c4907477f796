//! Core domain models and contracts for scrub
//!
//! This crate contains:
//! - The `Document` flowing through the pipeline and its metadata keys
//! - Reader / preprocessor / postprocessor / writer contracts
//! - The per-family component registry
//! - The shared error type

pub mod component;
pub mod document;
pub mod error;
pub mod registry;

pub use component::{
    ComponentArgs, DocumentStream, Postprocessor, Preprocessor, Reader, Writer,
};
pub use document::{Document, Fields, Metadata, fields_to_value, keys};
pub use error::{Error, Result};
pub use registry::{ComponentKind, ComponentRegistry, Constructor};
