//! CLI argument definitions for wakman

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use wak::FormatVersion;

#[derive(Parser)]
#[command(name = "wakman")]
#[command(about = "List and extract WAK asset containers", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Verbose logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Options shared by every command that reads a container
#[derive(clap::Args, Debug)]
pub struct InputArgs {
    /// Path to data.wak (guessed from config and default locations if omitted)
    pub input: Option<PathBuf>,

    /// Format version to try first (1 or 2); the other is tried on mismatch
    #[arg(long, env = "WAKMAN_FORMAT_VERSION")]
    pub format_version: Option<FormatVersion>,
}

/// Entry selection shared by list and extract
#[derive(clap::Args, Debug)]
pub struct FilterArgs {
    /// Only entries whose path contains this string (case-insensitive, repeatable, OR logic)
    #[arg(short, long)]
    pub filter: Vec<String>,

    /// Only entries with this extension (e.g. "xml", ".lua")
    #[arg(short, long)]
    pub extension: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List entries of a container
    #[command(visible_alias = "l")]
    List {
        #[command(flatten)]
        input: InputArgs,

        #[command(flatten)]
        filter: FilterArgs,

        /// Output format
        #[arg(long, value_enum, default_value = "text")]
        output_format: OutputFormat,
    },

    /// Decrypt and extract entries to a directory
    #[command(visible_alias = "x")]
    Extract {
        #[command(flatten)]
        input: InputArgs,

        #[command(flatten)]
        filter: FilterArgs,

        /// Folder to extract to (uses configured default if not provided)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Extract one entry at a time instead of in parallel
        #[arg(long)]
        sequential: bool,
    },

    /// Print a sorted path/SHA-256 listing for diffing archives
    #[command(visible_alias = "t")]
    Tree {
        #[command(flatten)]
        input: InputArgs,

        /// Write the listing to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format
        #[arg(long, value_enum, default_value = "text")]
        output_format: OutputFormat,
    },

    /// Configure default settings
    #[command(visible_alias = "c")]
    Configure {
        /// Set default data.wak path
        #[arg(long)]
        wak: Option<PathBuf>,

        /// Set default extraction folder
        #[arg(long)]
        output: Option<PathBuf>,

        /// Set default format version (1 or 2)
        #[arg(long)]
        format_version: Option<FormatVersion>,

        /// Show current configuration
        #[arg(long)]
        show: bool,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One line per entry
    Text,
    /// JSON array
    Json,
}
