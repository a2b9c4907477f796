//! Document transforms run before redaction

mod field_selector;
mod text_cleaner;
mod whitespace;

pub use field_selector::{FieldSelector, FieldSelectorSettings};
pub use text_cleaner::{TextCleaner, TextCleanerSettings};
pub use whitespace::{WhitespaceNormalizer, WhitespaceSettings};

use scrub_core::{ComponentRegistry, Preprocessor, Result};

/// Register the built-in preprocessors
pub fn register_preprocessors(registry: &mut ComponentRegistry<dyn Preprocessor>) -> Result<()> {
    registry.register("whitespace_normalizer", WhitespaceNormalizer::create)?;
    registry.register("text_cleaner", TextCleaner::create)?;
    registry.register("field_selector", FieldSelector::create)?;
    Ok(())
}
