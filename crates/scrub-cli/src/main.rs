mod cli;
mod commands;

use std::io;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use scrub_config::Config;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Redact(args) => {
            let first_run = cli.config.is_none() && !Config::config_path().exists();
            let config = commands::load_config(cli.config.as_deref())?;
            init_tracing(cli.verbose || config.processing.verbose);
            if first_run {
                tracing::warn!(
                    path = %Config::config_path().display(),
                    "Wrote default configuration; set hmac_secret before redacting real data"
                );
            }
            commands::redact::handle(args, config)
        }
        Commands::Components => {
            init_tracing(cli.verbose);
            commands::components::handle()
        }
        Commands::Init { path, force } => {
            init_tracing(cli.verbose);
            commands::init::handle(path, force)
        }
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "scrub", &mut io::stdout());
            Ok(())
        }
    }
}

/// Log to stderr; RUST_LOG wins over the verbosity flag
fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)))
        .init();
}
