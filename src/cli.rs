//! Command-line definitions, shared by the binary and `xtask` man page generation.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// Long version string: package version plus build metadata.
#[cfg(not(feature = "release"))]
pub const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("VERGEN_GIT_SHA"),
    " ",
    env!("VSC_BUILD_DATE"),
    ")"
);

#[cfg(feature = "release")]
pub const LONG_VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), " (", env!("VSC_BUILD_DATE"), ")");

#[derive(Debug, Parser)]
#[command(
    name = "vsc",
    version,
    long_version = LONG_VERSION,
    about = "Reconstruct streaming-video download chunks from packet traces"
)]
pub struct Cli {
    /// Enable debug logging (overrides RUST_LOG)
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Segment one packet listing into chunks
    Segment {
        /// Packet listing (JSON lines)
        input: PathBuf,
        /// Write the chunk file here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Print the flow table as JSON instead of the chunk file format
        #[arg(long, conflicts_with = "output")]
        json: bool,
    },
    /// Summarize a chunk file
    Show {
        /// Chunk file written by `segment` or `batch`
        input: PathBuf,
        /// Print the parsed flow table as JSON
        #[arg(long)]
        json: bool,
    },
    /// Segment every packet listing in a directory
    Batch {
        /// Directory containing *.jsonl packet listings
        input_dir: PathBuf,
        /// Output directory (defaults to output.directory from config)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
    },
    /// Inspect or create configuration
    #[command(subcommand)]
    Config(ConfigCommands),
    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the effective configuration as TOML
    Show,
    /// Print the configuration file path
    Path,
    /// Write the default configuration to the config file path
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
}
