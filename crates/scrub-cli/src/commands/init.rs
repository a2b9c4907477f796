use std::path::PathBuf;

use anyhow::Result;
use scrub_config::Config;

pub fn handle(path: Option<PathBuf>, force: bool) -> Result<()> {
    let path = path.unwrap_or_else(Config::config_path);

    if path.exists() && !force {
        anyhow::bail!("{} already exists (use --force to overwrite)", path.display());
    }

    Config::default().save(&path)?;

    println!("✓ Created {}", path.display());
    println!("  Set hmac_secret (or SCRUB_HMAC_SECRET) before redacting real data");

    Ok(())
}
