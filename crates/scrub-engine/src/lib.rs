//! Pipeline orchestration for scrub
//!
//! [`Pipeline`] pulls documents from a reader, runs the configured
//! preprocessors, redacts either the whole content or each selected field
//! of a structured row, runs the postprocessors and hands the result to a
//! writer.

mod pipeline;
mod registries;

pub use pipeline::{Pipeline, PipelineRequest};
pub use registries::Registries;
