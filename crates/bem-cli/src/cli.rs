//! Command-line surface.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Debug, Parser)]
#[command(name = "bemcheck", version, about = "Structure and naming lint for BEM/RSCSS stylesheets")]
pub struct Cli {
    /// Only report errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Enable debug logging.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Use this configuration file instead of the discovered ones.
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Lint stylesheet files or directories.
    Check(CheckArgs),
    /// Print the resolved configuration as TOML.
    PrintConfig,
    /// Print the JSON schema of the configuration file.
    Schema,
}

#[derive(Debug, Args)]
pub struct CheckArgs {
    /// Files or directories to lint (`.css` / `.scss`).
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}
