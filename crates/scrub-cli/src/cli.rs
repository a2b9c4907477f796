use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

#[derive(Parser)]
#[command(name = "scrub")]
#[command(about = "Redact personal and health identifiers from documents", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Configuration file (TOML or YAML); defaults to the user config
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Redact a file or a directory of text files
    Redact(RedactArgs),

    /// List registered readers, processors and writers
    Components,

    /// Write a default configuration file
    Init {
        /// Where to write it (default: the user config location)
        #[arg(long)]
        path: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Print shell completions
    Completions {
        shell: Shell,
    },
}

#[derive(Args)]
pub struct RedactArgs {
    /// Input file or directory
    #[arg(short, long)]
    pub src: PathBuf,

    /// Output file or directory (stdout if not specified)
    #[arg(short, long)]
    pub out: Option<PathBuf>,

    /// Reader to use (detected from the input extension if not specified)
    #[arg(long)]
    pub reader: Option<String>,

    /// Writer to use (detected from the output extension if not specified)
    #[arg(long)]
    pub writer: Option<String>,

    /// Comma-separated list of preprocessors
    #[arg(long, value_delimiter = ',')]
    pub preprocessors: Vec<String>,

    /// Comma-separated list of postprocessors
    #[arg(long, value_delimiter = ',')]
    pub postprocessors: Vec<String>,

    /// Confidence threshold override (0.0-1.0)
    #[arg(long)]
    pub threshold: Option<f64>,

    /// Redaction strategy: replace, mask, hash or encrypt
    #[arg(long)]
    pub strategy: Option<String>,

    /// Comma-separated entity types to detect (default: all supported)
    #[arg(long, value_delimiter = ',')]
    pub entities: Vec<String>,

    /// Secret keying the hash and encrypt strategies
    #[arg(long, env = "SCRUB_HMAC_SECRET", hide_env_values = true)]
    pub secret: Option<String>,
}
