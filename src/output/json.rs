//! JSON summary of a coalesced snapshot.
//!
//! Schema is versioned to allow future evolution.

use crate::aggregator::GroupedSnapshot;
use crate::parser::ParsedSnapshot;
use crate::utils::config::SCHEMA_VERSION;
use crate::utils::error::OutputError;
use chrono::Utc;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// Top-level summary written to JSON
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotSummary {
    /// Schema version for compatibility checking
    pub version: String,

    /// Where the dump came from (path or URL)
    pub source: String,

    pub goroutine_count: usize,
    pub error_count: usize,
    pub warning_count: usize,

    /// Largest group first
    pub groups: Vec<GroupSummary>,

    /// Timestamp when the summary was generated
    pub generated_at: String,
}

/// One distinct stack
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupSummary {
    pub count: usize,

    /// How many goroutines of the group are in each state
    pub states: BTreeMap<String, usize>,

    /// Longest wait among the group's goroutines
    pub max_wait_minutes: u64,

    /// Frames of the exemplar, call site and location joined by a tab
    pub frames: Vec<String>,
}

/// Build a summary from a parse result and its grouping
///
/// **Public** - used by the coalesce command
pub fn to_summary(
    source: &str,
    parsed: &ParsedSnapshot,
    grouped: &GroupedSnapshot,
) -> SnapshotSummary {
    let groups = grouped
        .ranked()
        .into_iter()
        .map(|group| {
            let mut states = BTreeMap::new();
            for goroutine in group.goroutines() {
                *states.entry(goroutine.state.clone()).or_insert(0) += 1;
            }

            GroupSummary {
                count: group.len(),
                states,
                max_wait_minutes: group
                    .goroutines()
                    .iter()
                    .map(|g| g.wait_minutes)
                    .max()
                    .unwrap_or(0),
                frames: group
                    .exemplar()
                    .frames
                    .iter()
                    .map(|frame| format!("{}\t{}", frame.call_site(), frame.file_line()))
                    .collect(),
            }
        })
        .collect();

    SnapshotSummary {
        version: SCHEMA_VERSION.to_string(),
        source: source.to_string(),
        goroutine_count: grouped.goroutine_count(),
        error_count: parsed.error_count,
        warning_count: parsed.warning_count,
        groups,
        generated_at: Utc::now().to_rfc3339(),
    }
}

/// Write a summary to a JSON file
///
/// # Errors
/// * `OutputError::WriteFailed` - I/O error during write
/// * `OutputError::SerializationFailed` - JSON serialization error
/// * `OutputError::InvalidPath` - Path cannot be created or is invalid
pub fn write_summary(
    summary: &SnapshotSummary,
    output_path: impl AsRef<Path>,
) -> Result<(), OutputError> {
    let output_path = output_path.as_ref();

    info!("Writing summary to: {}", output_path.display());

    super::validate_path(output_path)?;
    if let Some(parent) = output_path.parent() {
        super::ensure_dir(parent)?;
    }

    let file = File::create(output_path).map_err(OutputError::WriteFailed)?;
    let writer = BufWriter::new(file);

    serde_json::to_writer_pretty(writer, summary).map_err(OutputError::SerializationFailed)?;

    Ok(())
}

/// Read a summary from a JSON file
pub fn read_summary(input_path: impl AsRef<Path>) -> Result<SnapshotSummary, OutputError> {
    let input_path = input_path.as_ref();

    debug!("Reading summary from: {}", input_path.display());

    let file = File::open(input_path).map_err(OutputError::WriteFailed)?;
    let summary: SnapshotSummary =
        serde_json::from_reader(file).map_err(OutputError::SerializationFailed)?;

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::group;
    use crate::parser::parse_snapshot;

    const DUMP: &str = "goroutine 7 [chan receive, 3 minutes]:
main.worker(0x1)
\t/src/main.go:42 +0x10

goroutine 8 [select, 9 minutes]:
main.worker(0x2)
\t/src/main.go:42 +0x10
";

    #[test]
    fn test_summary_groups() {
        let parsed = parse_snapshot(DUMP);
        let grouped = group(parsed.snapshot.clone());
        let summary = to_summary("dump.txt", &parsed, &grouped);

        assert_eq!(summary.goroutine_count, 2);
        assert_eq!(summary.groups.len(), 1);
        assert_eq!(summary.groups[0].count, 2);
        assert_eq!(summary.groups[0].states.get("select"), Some(&1));
        assert_eq!(summary.groups[0].max_wait_minutes, 9);
        assert_eq!(summary.groups[0].frames, vec!["main.worker(0x1)\t/src/main.go:42 +0x10"]);
    }

    #[test]
    fn test_write_creates_parent_dirs() {
        let temp_dir = tempfile::tempdir().unwrap();
        let nested_path = temp_dir.path().join("nested/dirs/summary.json");

        let parsed = parse_snapshot(DUMP);
        let grouped = group(parsed.snapshot.clone());
        write_summary(&to_summary("dump.txt", &parsed, &grouped), &nested_path).unwrap();

        let loaded = read_summary(&nested_path).unwrap();
        assert_eq!(loaded.version, SCHEMA_VERSION);
        assert_eq!(loaded.source, "dump.txt");
    }
}
