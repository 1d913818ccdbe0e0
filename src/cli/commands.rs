//! Command implementations

use super::{HashArgs, IdArgs, InspectArgs, OutputFormat, ScanArgs};
use crate::archive::{classify_archive, list_members};
use crate::hash::content_hash;
use crate::ident::generate_identifier;
use crate::scan::{scan_package, PackageScan, ScanConfig};
use anyhow::{Context, Result};
use std::path::Path;

/// Scan a package and print the report
pub fn scan(args: &ScanArgs, format: OutputFormat) -> Result<()> {
    let mut config = if args.no_config {
        ScanConfig::default()
    } else {
        let config_dir = config_dir_for(&args.package);
        ScanConfig::load_or_default(config_dir)?
    };
    config
        .excluded_hashes
        .extend(args.exclude_hashes.iter().cloned());

    let report = scan_package(&args.package, &config)
        .with_context(|| format!("Failed to scan package {:?}", args.package))?;

    match format {
        OutputFormat::Json => print_scan_json(&report)?,
        OutputFormat::Text => print_scan_text(&report),
    }

    Ok(())
}

/// Classify an archive and list its raw member names
pub fn inspect(args: &InspectArgs, format: OutputFormat) -> Result<()> {
    let kind = classify_archive(&args.archive)
        .with_context(|| format!("Failed to read {:?}", args.archive))?;

    let Some(kind) = kind else {
        anyhow::bail!("{:?} is not a recognized archive container", args.archive);
    };

    let members = list_members(&args.archive)
        .with_context(|| format!("Failed to list members of {:?}", args.archive))?;

    match format {
        OutputFormat::Json => {
            let listing = serde_json::json!({
                "kind": kind.to_string(),
                "members": members,
            });
            println!("{}", serde_json::to_string_pretty(&listing)?);
        }
        OutputFormat::Text => {
            println!("Container: {}", kind);
            println!("Members: {}", members.len());
            for member in &members {
                println!("  {}", member);
            }
        }
    }

    Ok(())
}

/// Hash a single file
pub fn hash(args: &HashArgs) -> Result<()> {
    let digest = content_hash(&args.file)
        .with_context(|| format!("Failed to hash {:?}", args.file))?;
    println!("{}", digest);
    Ok(())
}

/// Generate a unique identifier
pub fn id(args: &IdArgs) -> Result<()> {
    let identifier =
        generate_identifier(&args.category, Some(&args.name), args.hash.as_deref());
    println!("{}", identifier);
    Ok(())
}

/// Print a scan report in JSON format
pub fn print_scan_json(report: &PackageScan) -> Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    println!("{}", json);
    Ok(())
}

/// Print a scan report in text format
pub fn print_scan_text(report: &PackageScan) {
    println!("Package: {}", report.name);
    println!("Identifier: {}", report.identifier);
    println!("Verification code: {}", report.verification_code);
    println!("Relative identity code: {}", report.relative_identity_code);
    println!("Files: {}", report.files.len());

    for file in &report.files {
        println!("  {}  {}  {}", file.sha256, file.kind, file.path);
    }
}

// Config sits next to an archive input, or inside a directory input.
fn config_dir_for(package: &Path) -> &Path {
    if package.is_dir() {
        package
    } else {
        package.parent().unwrap_or(package)
    }
}
