//! Per-stack goroutine counts over repeated snapshots.
//!
//! Every distinct stack gets one count per collection point. Stacks first
//! seen late are backfilled with zeros, so all count vectors stay aligned
//! with the list of collection points.
//!
//! [`TimeSeriesStore`] wraps a [`TimeSeries`] with the on-disk artifacts:
//! - `gostack-monitor.csv`: `Timestamp,[Label,]Go1,Go2,...` plus one row per point
//! - `gostack-legend.txt`: the exemplar stack behind every `Go<n>` column

use super::grouping::{group, GoroutineGroup, GroupedSnapshot};
use crate::output::{commit_staged, ensure_dir, sync_dir, write_staged};
use crate::parser::{Goroutine, Snapshot};
use crate::utils::config::{
    COLUMN_ID_PREFIX, LABEL_HEADER, LEGEND_FILENAME, MONITOR_FILENAME, TIMESTAMP_HEADER,
};
use crate::utils::error::OutputError;
use log::{debug, info};
use std::borrow::Cow;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Input accepted by [`TimeSeries::record`]
#[derive(Debug, Clone)]
pub enum Observation {
    Snapshot(Snapshot),
    Grouped(GroupedSnapshot),
}

impl Observation {
    fn into_grouped(self) -> GroupedSnapshot {
        match self {
            Observation::Snapshot(snapshot) => group(snapshot),
            Observation::Grouped(grouped) => grouped,
        }
    }
}

impl From<Snapshot> for Observation {
    fn from(snapshot: Snapshot) -> Self {
        Observation::Snapshot(snapshot)
    }
}

impl From<GroupedSnapshot> for Observation {
    fn from(grouped: GroupedSnapshot) -> Self {
        Observation::Grouped(grouped)
    }
}

/// One recording event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionPoint {
    pub timestamp: String,
    pub label: Option<String>,
}

#[derive(Debug, Clone)]
struct Series {
    signature: String,
    exemplar: Goroutine,
    counts: Vec<u64>,
}

/// A stack's counts as laid out for one save
#[derive(Debug, Clone)]
pub struct Column<'a> {
    /// Opaque id such as `Go1`, only stable within one save
    pub id: String,
    pub signature: &'a str,
    pub exemplar: &'a Goroutine,
    pub counts: &'a [u64],
    pub total: u64,
}

/// In-memory time series, append-only
#[derive(Debug, Clone, Default)]
pub struct TimeSeries {
    points: Vec<CollectionPoint>,
    series: Vec<Series>,
    by_signature: HashMap<String, Vec<usize>>,
}

impl TimeSeries {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one collection point
    ///
    /// **Public** - main entry point for the monitor loop
    ///
    /// # Arguments
    /// * `timestamp` - Time of the collection, written verbatim
    /// * `observation` - Raw or already grouped snapshot
    /// * `label` - Optional free-form tag for the point (empty = none)
    pub fn record(
        &mut self,
        timestamp: impl Into<String>,
        observation: impl Into<Observation>,
        label: Option<&str>,
    ) {
        let grouped = observation.into().into_grouped();
        let point = self.points.len();

        self.points.push(CollectionPoint {
            timestamp: timestamp.into(),
            label: label.filter(|l| !l.is_empty()).map(str::to_string),
        });

        for series in &mut self.series {
            series.counts.push(0);
        }

        for group in grouped.groups() {
            let index = self.series_for(group, point);
            self.series[index].counts[point] += group.len() as u64;
        }

        debug!(
            "Recorded point {} with {} stacks ({} known)",
            point,
            grouped.len(),
            self.series.len()
        );
    }

    /// Index of the series matching `group`, created (zero-filled) if new
    fn series_for(&mut self, group: &GoroutineGroup, point: usize) -> usize {
        let candidates = self
            .by_signature
            .entry(group.signature().to_string())
            .or_default();

        let exemplar = group.exemplar();
        if let Some(index) = candidates
            .iter()
            .copied()
            .find(|&index| self.series[index].exemplar == *exemplar)
        {
            return index;
        }

        let index = self.series.len();
        candidates.push(index);
        self.series.push(Series {
            signature: group.signature().to_string(),
            exemplar: exemplar.clone(),
            counts: vec![0; point + 1],
        });
        index
    }

    pub fn points(&self) -> &[CollectionPoint] {
        &self.points
    }

    /// Number of distinct stacks seen so far
    pub fn stack_count(&self) -> usize {
        self.series.len()
    }

    /// Counts for the stack of `goroutine`, one per collection point
    pub fn counts_for(&self, goroutine: &Goroutine) -> Option<&[u64]> {
        self.by_signature
            .get(&goroutine.signature())?
            .iter()
            .map(|&index| &self.series[index])
            .find(|series| series.exemplar == *goroutine)
            .map(|series| series.counts.as_slice())
    }

    /// Does any point carry a label?
    pub fn has_labels(&self) -> bool {
        self.points.iter().any(|p| p.label.is_some())
    }

    /// Columns ordered by total count, ties in first-seen order
    pub fn columns(&self) -> Vec<Column<'_>> {
        let mut order: Vec<(usize, u64)> = self
            .series
            .iter()
            .enumerate()
            .map(|(index, series)| (index, series.counts.iter().sum()))
            .collect();
        order.sort_by(|a, b| b.1.cmp(&a.1));

        order
            .into_iter()
            .enumerate()
            .map(|(position, (index, total))| {
                let series = &self.series[index];
                Column {
                    id: format!("{}{}", COLUMN_ID_PREFIX, position + 1),
                    signature: &series.signature,
                    exemplar: &series.exemplar,
                    counts: &series.counts,
                    total,
                }
            })
            .collect()
    }

    /// CSV table for the given column layout
    pub fn render_table(&self, columns: &[Column<'_>]) -> String {
        let with_labels = self.has_labels();
        let mut out = String::new();

        let mut header: Vec<Cow<'_, str>> = vec![Cow::Borrowed(TIMESTAMP_HEADER)];
        if with_labels {
            header.push(Cow::Borrowed(LABEL_HEADER));
        }
        header.extend(columns.iter().map(|c| Cow::Borrowed(c.id.as_str())));
        push_row(&mut out, &header);

        for (point_index, point) in self.points.iter().enumerate() {
            let mut row: Vec<Cow<'_, str>> = vec![csv_field(&point.timestamp)];
            if with_labels {
                row.push(csv_field(point.label.as_deref().unwrap_or("")));
            }
            row.extend(
                columns
                    .iter()
                    .map(|c| Cow::Owned(c.counts[point_index].to_string())),
            );
            push_row(&mut out, &row);
        }

        out
    }

    /// Legend text for the given column layout
    pub fn render_legend(&self, columns: &[Column<'_>]) -> String {
        let mut out = String::new();
        for column in columns {
            out.push_str(&column.id);
            out.push_str(":\n");
            out.push_str(&column.exemplar.redacted());
            out.push('\n');
        }
        out
    }
}

fn push_row(out: &mut String, fields: &[Cow<'_, str>]) {
    out.push_str(&fields.join(","));
    out.push('\n');
}

/// Quote a CSV field when it needs it
fn csv_field(value: &str) -> Cow<'_, str> {
    if value.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", value.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(value)
    }
}

/// A [`TimeSeries`] bound to an output directory
///
/// `record` and `persist` take the same lock for their whole duration, so a
/// save never observes a half-recorded point and two saves never interleave
/// their renames.
#[derive(Debug)]
pub struct TimeSeriesStore {
    output_dir: PathBuf,
    series: Mutex<TimeSeries>,
}

impl TimeSeriesStore {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            series: Mutex::new(TimeSeries::new()),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.output_dir
    }

    pub fn table_path(&self) -> PathBuf {
        self.output_dir.join(MONITOR_FILENAME)
    }

    pub fn legend_path(&self) -> PathBuf {
        self.output_dir.join(LEGEND_FILENAME)
    }

    /// Append one collection point
    pub fn record(
        &self,
        timestamp: impl Into<String>,
        observation: impl Into<Observation>,
        label: Option<&str>,
    ) -> Result<(), OutputError> {
        let mut series = self.series.lock().map_err(|_| OutputError::LockPoisoned)?;
        series.record(timestamp, observation, label);
        Ok(())
    }

    /// Copy of the current in-memory series
    pub fn series(&self) -> Result<TimeSeries, OutputError> {
        let series = self.series.lock().map_err(|_| OutputError::LockPoisoned)?;
        Ok(series.clone())
    }

    /// Write the table and the legend
    ///
    /// **Public** - called after every recorded point
    ///
    /// Both files are staged next to their targets first. The table is
    /// renamed into place before the legend, so an interruption between the
    /// two leaves fresh counts with a stale legend rather than the reverse.
    /// On error the staged files are deleted and earlier outputs are kept.
    ///
    /// # Errors
    /// * `OutputError::InvalidPath` - output directory cannot be used
    /// * `OutputError::WriteFailed` - I/O error while staging or renaming
    /// * `OutputError::LockPoisoned` - a recording thread panicked
    pub fn persist(&self) -> Result<(), OutputError> {
        let series = self.series.lock().map_err(|_| OutputError::LockPoisoned)?;

        let table_path = self.table_path();
        let legend_path = self.legend_path();

        // A target that cannot be replaced surfaces as a failed rename.
        ensure_dir(&self.output_dir)?;

        let columns = series.columns();
        let table = series.render_table(&columns);
        let legend = series.render_legend(&columns);

        let staged_table = write_staged(&self.output_dir, table.as_bytes())?;
        let staged_legend = write_staged(&self.output_dir, legend.as_bytes())?;

        commit_staged(staged_table, &table_path)?;
        commit_staged(staged_legend, &legend_path)?;
        sync_dir(&self.output_dir);

        info!(
            "Saved {} points x {} stacks to {}",
            series.points().len(),
            columns.len(),
            self.output_dir.display()
        );

        Ok(())
    }
}
