//! Command-line interface definitions.
//!
//! Defines all CLI arguments and subcommands using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Atelier static page builder CLI
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Project root directory
    #[arg(short, long)]
    pub root: Option<PathBuf>,

    /// Output directory path (relative to project root)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Source directory path (relative to project root)
    #[arg(short, long)]
    pub source: Option<PathBuf>,

    /// Config file name (default: atelier.toml)
    #[arg(short = 'C', long, default_value = "atelier.toml")]
    pub config: PathBuf,

    /// subcommands; a bare invocation runs one full build
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Deletes the output directory if there is one and rebuilds every page
    Build,

    /// Build once, then rebuild on source changes until terminated
    Watch,
}

impl Cli {
    pub const fn is_watch(&self) -> bool {
        matches!(self.command, Some(Commands::Watch))
    }
}
