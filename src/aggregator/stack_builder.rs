//! Build collapsed stack format from coalesced goroutines.
//!
//! Collapsed stacks are the input format for flamegraph generation.
//! Format: "root;caller;callee weight"
//!
//! Example: "main.main;main.serve;net.(*conn).Read 12"
//! This means: 12 goroutines are parked in that exact call chain.

use super::grouping::GroupedSnapshot;
use crate::parser::Goroutine;
use log::debug;

/// Frame name used for goroutines whose dump carried no frames
const NO_FRAMES: &str = "<no frames>";

/// A single collapsed stack entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollapsedStack {
    /// Stack trace as semicolon-separated string, outermost call first
    pub stack: String,

    /// Number of goroutines with this stack
    pub weight: u64,
}

impl CollapsedStack {
    pub fn new(stack: String, weight: u64) -> Self {
        Self { stack, weight }
    }

    /// Line in the folded format understood by inferno
    pub fn to_line(&self) -> String {
        format!("{} {}", self.stack, self.weight)
    }
}

/// Build collapsed stacks from a grouped snapshot
///
/// **Public** - main entry point for stack building
///
/// # Returns
/// One collapsed stack per group, heaviest first
pub fn build_collapsed_stacks(grouped: &GroupedSnapshot) -> Vec<CollapsedStack> {
    let stacks: Vec<CollapsedStack> = grouped
        .ranked()
        .into_iter()
        .map(|group| CollapsedStack::new(fold_frames(group.exemplar()), group.len() as u64))
        .collect();

    debug!("Built {} collapsed stacks", stacks.len());

    stacks
}

/// Dumps list the innermost call first; folded stacks want the root first.
fn fold_frames(goroutine: &Goroutine) -> String {
    if goroutine.frames.is_empty() {
        return NO_FRAMES.to_string();
    }

    goroutine
        .frames
        .iter()
        .rev()
        .map(|frame| frame.function.replace(';', ":"))
        .collect::<Vec<_>>()
        .join(";")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::group;
    use crate::parser::parse_snapshot;

    #[test]
    fn test_collapsed_stack_to_line() {
        let stack = CollapsedStack::new("main.main;main.run".to_string(), 3);
        assert_eq!(stack.to_line(), "main.main;main.run 3");
    }

    #[test]
    fn test_build_collapsed_stacks_root_first() {
        let dump = "goroutine 5 [select]:
main.wait(0x1)
\t/src/main.go:20 +0x5
created by main.main
\t/src/main.go:8 +0x2

goroutine 6 [select]:
main.wait(0x2)
\t/src/main.go:20 +0x5
created by main.main
\t/src/main.go:8 +0x2

goroutine 1 [running]:
";
        let grouped = group(parse_snapshot(dump).snapshot);
        let stacks = build_collapsed_stacks(&grouped);

        assert_eq!(stacks.len(), 2);
        assert_eq!(stacks[0], CollapsedStack::new("main.main;main.wait".to_string(), 2));
        assert_eq!(stacks[1].stack, NO_FRAMES);
    }
}
