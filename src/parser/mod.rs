//! Goroutine dump parsing and record definitions.
//!
//! This module handles:
//! - Parsing goroutine header lines
//! - Parsing stack frame line pairs
//! - Assembling whole dumps into snapshots
//! - Defining the parsed record types

pub mod frame;
pub mod goroutine;
pub mod schema;
pub mod snapshot;

// Re-export main types
pub use frame::{parse_file_line, parse_function_line, FileLine, FunctionLine};
pub use goroutine::{is_goroutine_line, parse_goroutine_line};
pub use schema::{Goroutine, LineKind, ParseWarning, Snapshot, StackFrame};
pub use snapshot::{parse_snapshot, ParsedSnapshot, SnapshotParser};
