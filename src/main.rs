//! PackTrace - package fingerprinting and provenance scanning tool
//!
//! Computes SPDX-style verification codes for package file trees and
//! safely extracts archive packages before analysis.

use anyhow::Result;
use packtrace::cli::{hash, id, inspect, scan, Cli, Commands};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse_args();

    // Setup logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    // Execute command
    match cli.command {
        Commands::Scan(args) => scan(&args, cli.format)?,
        Commands::Inspect(args) => inspect(&args, cli.format)?,
        Commands::Hash(args) => hash(&args)?,
        Commands::Id(args) => id(&args)?,
    }

    Ok(())
}
