//! CLI command implementations.
//!
//! Each command is implemented in its own module.
//! Commands orchestrate the various library components to perform user tasks.

pub mod flamegraph;
pub mod models;
pub mod monitor;
pub mod report;
pub mod utils;

// Re-export main command functions
pub use flamegraph::execute_flamegraph;
pub use models::{CoalesceArgs, EchoArgs, FlamegraphArgs, MonitorArgs};
pub use monitor::{collect_sample, execute_monitor};
pub use report::{execute_coalesce, execute_echo};
pub use utils::display_version;
