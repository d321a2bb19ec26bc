use crate::flamegraph::FlamegraphConfig;
use crate::utils::config::DEFAULT_MONITOR_INTERVAL;
use std::path::PathBuf;
use std::time::Duration;

/// Arguments for the echo command
#[derive(Debug, Clone, Default)]
pub struct EchoArgs {
    /// Dump file path or pprof URL
    pub source: String,

    /// Print goroutines ordered by id instead of dump order
    pub sort_by_id: bool,
}

/// Arguments for the coalesce command
#[derive(Debug, Clone, Default)]
pub struct CoalesceArgs {
    /// Dump file path or pprof URL
    pub source: String,

    /// Only show the N largest groups
    pub top: Option<usize>,

    /// Also write a JSON summary here
    pub output_json: Option<PathBuf>,
}

/// Arguments for the monitor command
#[derive(Debug, Clone)]
pub struct MonitorArgs {
    /// Dump file path or pprof URL
    pub source: String,

    /// Directory receiving the CSV table and the legend
    pub output_dir: PathBuf,

    /// Pause between samples
    pub interval: Duration,

    /// Stop after this many samples (None = run until interrupted)
    pub samples: Option<usize>,

    /// Label attached to every recorded point
    pub label: Option<String>,
}

impl Default for MonitorArgs {
    fn default() -> Self {
        Self {
            source: String::new(),
            output_dir: PathBuf::from("gostack-monitor"),
            interval: DEFAULT_MONITOR_INTERVAL,
            samples: None,
            label: None,
        }
    }
}

/// Arguments for the flamegraph command
#[derive(Debug, Clone)]
pub struct FlamegraphArgs {
    /// Dump file path or pprof URL
    pub source: String,

    /// Output path for the SVG
    pub output_svg: PathBuf,

    pub config: FlamegraphConfig,
}

impl Default for FlamegraphArgs {
    fn default() -> Self {
        Self {
            source: String::new(),
            output_svg: PathBuf::from("goroutines.svg"),
            config: FlamegraphConfig::default(),
        }
    }
}
