//! CLI interface using clap
//!
//! Provides the command-line interface for PackTrace

mod commands;

pub use commands::*;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// PackTrace - package fingerprinting and provenance scanning tool
#[derive(Parser, Debug)]
#[command(name = "packtrace")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format (text, json)
    #[arg(short = 'o', long, global = true, default_value = "text")]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Scan a package directory or archive
    Scan(ScanArgs),

    /// Classify an archive and list its members
    Inspect(InspectArgs),

    /// Compute the content hash of a single file
    Hash(HashArgs),

    /// Generate a unique SPDX-style identifier
    Id(IdArgs),
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Arguments for scan command
#[derive(Parser, Debug)]
pub struct ScanArgs {
    /// Package to scan (directory, tarball, or zip file)
    pub package: PathBuf,

    /// Content hash to exclude from verification codes (repeatable)
    #[arg(long = "exclude-hash", value_name = "SHA256")]
    pub exclude_hashes: Vec<String>,

    /// Skip loading packtrace.toml next to the package
    #[arg(long)]
    pub no_config: bool,
}

/// Arguments for inspect command
#[derive(Parser, Debug)]
pub struct InspectArgs {
    /// Archive file to inspect
    pub archive: PathBuf,
}

/// Arguments for hash command
#[derive(Parser, Debug)]
pub struct HashArgs {
    /// File to hash
    pub file: PathBuf,
}

/// Arguments for id command
#[derive(Parser, Debug)]
pub struct IdArgs {
    /// Name fragment for the identifier
    pub name: String,

    /// Content hash to embed a slice of
    #[arg(long)]
    pub hash: Option<String>,

    /// Category tag (e.g. Package, File)
    #[arg(long, default_value = "element")]
    pub category: String,
}

impl Cli {
    /// Parse command-line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
