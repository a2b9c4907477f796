pub mod components;
pub mod init;
pub mod redact;

use std::path::Path;

use anyhow::{Context, Result};
use scrub_config::Config;

/// Read an explicit config file, or the user config (created on first use).
///
/// Validation is left to the command, after its flags are applied.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::read(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display())),
        None => Ok(Config::load()?),
    }
}
