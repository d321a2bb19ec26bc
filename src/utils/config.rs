//! Configuration and constants for the CLI and the parsing engine.

use std::time::Duration;

/// Default timeout for fetching a dump over HTTP
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Default pause between two monitor samples
pub const DEFAULT_MONITOR_INTERVAL: Duration = Duration::from_secs(60);

/// Current JSON summary schema version
pub const SCHEMA_VERSION: &str = "1.0.0";

// Dump grammar
pub const GOROUTINE_KEYWORD: &str = "goroutine";
pub const CREATED_BY_PREFIX: &str = "created by ";
pub const LOCKED_TO_THREAD: &str = "locked to thread";
pub const WAIT_TIME_SUFFIX: &str = " minutes";
pub const ELIDED_FRAMES_MARKER: &str = "...additional frames elided...";

/// Query suffix that makes net/http/pprof return the full goroutine dump
pub const FULL_DUMP_QUERY: &str = "?debug=2";

// Monitor output files
pub const MONITOR_FILENAME: &str = "gostack-monitor.csv";
pub const LEGEND_FILENAME: &str = "gostack-legend.txt";
pub const TIMESTAMP_HEADER: &str = "Timestamp";
pub const LABEL_HEADER: &str = "Label";
pub const COLUMN_ID_PREFIX: &str = "Go";

/// Timestamp format used for monitor rows (local time)
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Header printed in place of a goroutine's id and state once it has been
/// coalesced with others (neither is part of the grouping key)
pub const REDACTED_HEADER: &str = "goroutine <id> [<state>]:";
