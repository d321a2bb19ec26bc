//! On-demand report commands.
//!
//! - `echo`: parse a dump and print it back in dump form
//! - `coalesce`: group identical stacks and print one exemplar per group

use super::models::{CoalesceArgs, EchoArgs};
use super::utils::{load_snapshot, validate_source};
use crate::aggregator::group;
use crate::output::{coalesced_report, echo_report, to_summary, write_summary};
use anyhow::{Context, Result};
use log::{debug, info};

/// Execute the echo command
///
/// **Public** - main entry point called from main.rs
pub fn execute_echo(args: EchoArgs) -> Result<()> {
    validate_source(&args.source)?;

    let (_, mut parsed) = load_snapshot(&args.source)?;
    if args.sort_by_id {
        parsed.snapshot.sort_by_id();
    }

    print!("{}", echo_report(&parsed.snapshot));
    Ok(())
}

/// Execute the coalesce command
///
/// **Public** - main entry point called from main.rs
///
/// # Errors
/// * Dump source unreadable
/// * JSON summary write errors
pub fn execute_coalesce(args: CoalesceArgs) -> Result<()> {
    validate_coalesce_args(&args)?;

    let (source, parsed) = load_snapshot(&args.source)?;
    let grouped = group(parsed.snapshot.clone());

    info!(
        "{} goroutines share {} distinct stacks",
        grouped.goroutine_count(),
        grouped.len()
    );
    debug!("Largest groups:");
    for (i, group) in grouped.ranked().iter().take(3).enumerate() {
        debug!("  {}. {} x {}", i + 1, group.len(), group.exemplar().state);
    }

    print!("{}", coalesced_report(&grouped, args.top));

    if let Some(path) = &args.output_json {
        let summary = to_summary(&source.to_string(), &parsed, &grouped);
        write_summary(&summary, path).context("Failed to write JSON summary")?;
        info!("✓ Summary written to: {}", path.display());
    }

    Ok(())
}

/// Validate coalesce arguments
pub fn validate_coalesce_args(args: &CoalesceArgs) -> Result<()> {
    validate_source(&args.source)?;

    if args.top == Some(0) {
        anyhow::bail!("top must be greater than 0");
    }

    Ok(())
}
