//! Document transforms run after redaction

mod dict_merger;
mod format_preserver;
mod redaction_cleaner;

pub use dict_merger::{DictMerger, DictMergerSettings};
pub use format_preserver::{FormatPreserver, FormatPreserverSettings};
pub use redaction_cleaner::{RedactionCleaner, RedactionCleanerSettings};

use scrub_core::{ComponentRegistry, Postprocessor, Result};

/// Register the built-in postprocessors
pub fn register_postprocessors(registry: &mut ComponentRegistry<dyn Postprocessor>) -> Result<()> {
    registry.register("redaction_cleaner", RedactionCleaner::create)?;
    registry.register("format_preserver", FormatPreserver::create)?;
    registry.register("dict_merger", DictMerger::create)?;
    Ok(())
}
