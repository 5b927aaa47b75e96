use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "blog-pilot")]
#[command(author, version, about = "Validated blog post generation and publication", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(short, long, global = true, value_enum, default_value = "text")]
    pub output: OutputFormat,

    /// Working directory holding artifacts and the collection (default: current directory)
    #[arg(short = 'C', long, global = true, env = "BLOG_PILOT_DIR")]
    pub dir: Option<PathBuf>,
}

/// Output format for CLI results.
/// - Text: Human-readable text output (default)
/// - Json: Single JSON object per command
#[derive(Debug, Clone, Copy, Default, ValueEnum, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write the default configuration to .blog-pilot/config.toml
    Init,

    /// Generate a post, validate it and publish it
    Run,

    /// Validate an artifact without touching it
    Validate {
        /// Path to the post JSON
        file: PathBuf,
    },

    /// Run the publication gate on an artifact (write-back, debug copy, repair)
    Gate {
        /// Path to the post JSON
        file: PathBuf,
    },

    /// Gate an artifact and publish it when accepted
    Publish {
        /// Path to the post JSON
        file: PathBuf,
    },

    /// Repair an artifact in place
    Repair {
        /// Path to the post JSON
        file: PathBuf,
    },

    /// Search the web for research material
    Search {
        /// Search query
        query: String,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,
    /// Reset to defaults
    Reset,
}
