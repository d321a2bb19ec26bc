//! Plain-text reports.

use crate::aggregator::GroupedSnapshot;
use crate::parser::Snapshot;

/// Every goroutine back in dump form
///
/// The output parses again to an equal snapshot.
pub fn echo_report(snapshot: &Snapshot) -> String {
    snapshot.to_string()
}

/// One entry per distinct stack, largest group first
///
/// # Arguments
/// * `grouped` - Coalesced snapshot
/// * `top` - Limit on the number of groups shown (None = all)
///
/// # Example output
/// ```text
/// 2 of these:
/// goroutine <id> [<state>]:
/// main.worker(0xc000010000)
///         /src/main.go:42 +0x10
/// ```
pub fn coalesced_report(grouped: &GroupedSnapshot, top: Option<usize>) -> String {
    let limit = top.unwrap_or(usize::MAX);
    let mut out = String::new();

    for group in grouped.ranked().into_iter().take(limit) {
        out.push_str(&format!("{} of these:\n", group.len()));
        out.push_str(&group.exemplar().redacted());
        out.push('\n');
    }

    out
}
