use crate::parser::{parse_snapshot, ParsedSnapshot};
use crate::source::{DumpClient, DumpSource};
use crate::utils::config::SCHEMA_VERSION;
use anyhow::{Context, Result};
use log::{info, warn};

/// Fetch and parse one dump
///
/// **Public** - shared first step of every command
pub fn load_snapshot(source: &str) -> Result<(DumpSource, ParsedSnapshot)> {
    let source = DumpSource::parse(source).context("Invalid dump source")?;
    let client = DumpClient::new().context("Failed to create HTTP client")?;
    let parsed = load_with(&client, &source)?;
    Ok((source, parsed))
}

/// Fetch and parse one dump with an existing client
pub fn load_with(client: &DumpClient, source: &DumpSource) -> Result<ParsedSnapshot> {
    let text = client
        .fetch(source)
        .with_context(|| format!("Failed to read goroutine dump from {}", source))?;

    let parsed = parse_snapshot(&text);
    report_quality(&parsed);
    Ok(parsed)
}

/// Log goroutine, error and warning counts of a parse
pub fn report_quality(parsed: &ParsedSnapshot) {
    info!(
        "Parsed {} goroutines ({} errors, {} warnings)",
        parsed.snapshot.len(),
        parsed.error_count,
        parsed.warning_count
    );
    if parsed.error_count > 0 {
        warn!(
            "{} dump lines could not be parsed; run with --verbose for details",
            parsed.error_count
        );
    }
}

/// Reject empty sources before doing any work
pub fn validate_source(source: &str) -> Result<()> {
    if source.trim().is_empty() {
        anyhow::bail!("Dump source cannot be empty");
    }
    Ok(())
}

/// Display version information
pub fn display_version() {
    println!("gostack v{}", env!("CARGO_PKG_VERSION"));
    println!("Summary Schema: v{}", SCHEMA_VERSION);
    println!();
    println!("Parse, coalesce and monitor Go goroutine stack dumps.");
}
