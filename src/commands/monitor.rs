//! Monitor command implementation.
//!
//! The monitor loop:
//! 1. Fetches a dump from the source
//! 2. Parses and groups it
//! 3. Records one collection point
//! 4. Rewrites the CSV table and legend
//! 5. Sleeps for the interval and starts over

use super::models::MonitorArgs;
use super::utils::{load_with, validate_source};
use crate::aggregator::{group, TimeSeriesStore};
use crate::source::{DumpClient, DumpSource};
use crate::utils::config::TIMESTAMP_FORMAT;
use anyhow::{Context, Result};
use chrono::Local;
use log::{info, warn};
use std::thread;

/// Execute the monitor command
///
/// **Public** - main entry point called from main.rs
///
/// Runs until `args.samples` collection cycles have happened, or forever
/// when no limit is set. A failed fetch after the first sample skips that
/// cycle; a failed save stops the monitor.
pub fn execute_monitor(args: MonitorArgs) -> Result<()> {
    validate_monitor_args(&args)?;

    let source = DumpSource::parse(&args.source).context("Invalid dump source")?;
    let client = DumpClient::new().context("Failed to create HTTP client")?;
    let store = TimeSeriesStore::new(&args.output_dir);

    info!(
        "Monitoring {} every {}s into {}",
        source,
        args.interval.as_secs(),
        store.directory().display()
    );

    let mut cycle = 0usize;
    loop {
        cycle += 1;

        match collect_sample(&client, &source, &store, args.label.as_deref()) {
            Ok(()) => info!("Sample {} saved", cycle),
            Err(err) if cycle > 1 => warn!("Sample {} skipped: {:#}", cycle, err),
            Err(err) => return Err(err),
        }

        if args.samples.is_some_and(|limit| cycle >= limit) {
            break;
        }
        thread::sleep(args.interval);
    }

    info!(
        "✓ Monitor output written to: {}",
        store.table_path().display()
    );
    Ok(())
}

/// Run one collection cycle against an existing store
///
/// **Public** - one iteration of the monitor loop
pub fn collect_sample(
    client: &DumpClient,
    source: &DumpSource,
    store: &TimeSeriesStore,
    label: Option<&str>,
) -> Result<()> {
    let parsed = load_with(client, source)?;
    let timestamp = Local::now().format(TIMESTAMP_FORMAT).to_string();

    store
        .record(timestamp, group(parsed.snapshot), label)
        .context("Failed to record sample")?;
    store.persist().context("Failed to save monitor output")?;

    Ok(())
}

/// Validate monitor arguments
pub fn validate_monitor_args(args: &MonitorArgs) -> Result<()> {
    validate_source(&args.source)?;

    if args.output_dir.as_os_str().is_empty() {
        anyhow::bail!("Output directory cannot be empty");
    }

    if args.interval.is_zero() {
        anyhow::bail!("Interval must be greater than 0");
    }

    if args.samples == Some(0) {
        anyhow::bail!("samples must be greater than 0");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::time::Duration;

    #[test]
    fn test_validate_monitor_args_valid() {
        let args = MonitorArgs {
            source: "http://localhost:6060/debug/pprof/goroutine".to_string(),
            ..Default::default()
        };
        assert!(validate_monitor_args(&args).is_ok());
    }

    #[test]
    fn test_validate_monitor_args_zero_interval() {
        let args = MonitorArgs {
            source: "dump.txt".to_string(),
            interval: Duration::ZERO,
            ..Default::default()
        };
        assert!(validate_monitor_args(&args).is_err());
    }

    #[test]
    fn test_validate_monitor_args_zero_samples() {
        let args = MonitorArgs {
            source: "dump.txt".to_string(),
            samples: Some(0),
            ..Default::default()
        };
        assert!(validate_monitor_args(&args).is_err());
    }

    #[test]
    fn test_validate_monitor_args_empty_output_dir() {
        let args = MonitorArgs {
            source: "dump.txt".to_string(),
            output_dir: PathBuf::new(),
            ..Default::default()
        };
        assert!(validate_monitor_args(&args).is_err());
    }
}
