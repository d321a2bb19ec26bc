//! Aggregation of parsed snapshots.
//!
//! This module transforms parsed snapshots into:
//! - Groups of goroutines sharing one call stack (coalescing)
//! - Per-stack goroutine counts over time (monitoring)
//! - Collapsed stack format (for flamegraph generation)

pub mod grouping;
pub mod stack_builder;
pub mod timeseries;

// Re-export main types and functions
pub use grouping::{group, merge, GoroutineGroup, GroupedSnapshot};
pub use stack_builder::{build_collapsed_stacks, CollapsedStack};
pub use timeseries::{CollectionPoint, Column, Observation, TimeSeries, TimeSeriesStore};
