//! Coalesce goroutines that share an identical call stack.
//!
//! Groups are looked up by the derived `file:line` signature, but a
//! goroutine only joins a group after a full structural comparison with the
//! group's first member, so two different stacks that happen to produce the
//! same signature still end up in separate groups.

use crate::parser::{Goroutine, Snapshot};
use log::debug;
use std::collections::HashMap;

/// Goroutines with structurally identical stacks
#[derive(Debug, Clone)]
pub struct GoroutineGroup {
    signature: String,
    goroutines: Vec<Goroutine>,
}

impl GoroutineGroup {
    fn new(signature: String, first: Goroutine) -> Self {
        Self {
            signature,
            goroutines: vec![first],
        }
    }

    pub fn signature(&self) -> &str {
        &self.signature
    }

    pub fn goroutines(&self) -> &[Goroutine] {
        &self.goroutines
    }

    /// Number of goroutines in the group (never zero)
    pub fn len(&self) -> usize {
        self.goroutines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.goroutines.is_empty()
    }

    /// First goroutine seen with this stack, shown on behalf of the group
    pub fn exemplar(&self) -> &Goroutine {
        &self.goroutines[0]
    }
}

/// A snapshot partitioned into groups of identical stacks
///
/// **Public** - built by [`group`] or [`merge`], read-only afterwards
#[derive(Debug, Clone, Default)]
pub struct GroupedSnapshot {
    groups: Vec<GoroutineGroup>,
    by_signature: HashMap<String, Vec<usize>>,
    goroutine_count: usize,
}

impl GroupedSnapshot {
    fn insert(&mut self, goroutine: Goroutine) {
        self.goroutine_count += 1;

        let signature = goroutine.signature();
        let candidates = self.by_signature.entry(signature.clone()).or_default();

        let existing = candidates
            .iter()
            .copied()
            .find(|&index| *self.groups[index].exemplar() == goroutine);

        match existing {
            Some(index) => self.groups[index].goroutines.push(goroutine),
            None => {
                candidates.push(self.groups.len());
                self.groups.push(GoroutineGroup::new(signature, goroutine));
            }
        }
    }

    /// Groups in first-seen order
    pub fn groups(&self) -> &[GoroutineGroup] {
        &self.groups
    }

    /// Groups by descending size, ties keep first-seen order
    pub fn ranked(&self) -> Vec<&GoroutineGroup> {
        let mut ranked: Vec<&GoroutineGroup> = self.groups.iter().collect();
        ranked.sort_by(|a, b| b.len().cmp(&a.len()));
        ranked
    }

    /// First group recorded under `signature`
    pub fn get(&self, signature: &str) -> Option<&GoroutineGroup> {
        self.by_signature
            .get(signature)
            .and_then(|indices| indices.first())
            .map(|&index| &self.groups[index])
    }

    /// The group a goroutine with this stack belongs to
    pub fn find(&self, goroutine: &Goroutine) -> Option<&GoroutineGroup> {
        self.by_signature
            .get(&goroutine.signature())?
            .iter()
            .map(|&index| &self.groups[index])
            .find(|group| group.exemplar() == goroutine)
    }

    /// Number of distinct stacks
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Number of goroutines across all groups
    pub fn goroutine_count(&self) -> usize {
        self.goroutine_count
    }

    /// All goroutines again, group by group
    pub fn flatten(&self) -> Snapshot {
        self.groups
            .iter()
            .flat_map(|group| group.goroutines.iter().cloned())
            .collect()
    }
}

impl From<Snapshot> for GroupedSnapshot {
    fn from(snapshot: Snapshot) -> Self {
        group(snapshot)
    }
}

/// Group a snapshot's goroutines by stack
///
/// **Public** - main entry point for coalescing
///
/// # Arguments
/// * `snapshot` - Parsed snapshot (consumed, goroutines move into groups)
///
/// # Returns
/// The grouped snapshot; group sizes sum to the snapshot's length
pub fn group(snapshot: Snapshot) -> GroupedSnapshot {
    let mut grouped = GroupedSnapshot::default();
    for goroutine in snapshot {
        grouped.insert(goroutine);
    }

    debug!(
        "Grouped {} goroutines into {} distinct stacks",
        grouped.goroutine_count,
        grouped.groups.len()
    );

    grouped
}

/// Combine groupings from several snapshots into one
///
/// **Public** - used to coalesce over a series of dumps
pub fn merge<I>(groupings: I) -> GroupedSnapshot
where
    I: IntoIterator<Item = GroupedSnapshot>,
{
    let mut merged = GroupedSnapshot::default();
    for grouping in groupings {
        for group in grouping.groups {
            for goroutine in group.goroutines {
                merged.insert(goroutine);
            }
        }
    }
    merged
}
