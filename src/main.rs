//! gostack CLI
//!
//! Reads goroutine dumps from files or pprof endpoints and prints,
//! coalesces, monitors or renders them.

use anyhow::Result;
use clap::{Parser, Subcommand};
use env_logger::Env;
use std::path::PathBuf;
use std::time::Duration;

use gostack::commands::{
    display_version, execute_coalesce, execute_echo, execute_flamegraph, execute_monitor,
    CoalesceArgs, EchoArgs, FlamegraphArgs, MonitorArgs,
};
use gostack::flamegraph::FlamegraphConfig;

/// gostack - Go goroutine dump toolkit
#[derive(Parser, Debug)]
#[command(name = "gostack")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Parse a dump and print it back
    Echo {
        /// Dump file path or pprof URL
        #[arg(short, long, env = "GOSTACK_SOURCE")]
        source: String,

        /// Order goroutines by id
        #[arg(long)]
        sort_by_id: bool,
    },

    /// Print one exemplar per group of identical stacks
    Coalesce {
        /// Dump file path or pprof URL
        #[arg(short, long, env = "GOSTACK_SOURCE")]
        source: String,

        /// Only show the N largest groups
        #[arg(long)]
        top: Option<usize>,

        /// Also write a JSON summary to this path
        #[arg(long)]
        json: Option<PathBuf>,
    },

    /// Sample a dump source periodically and track group sizes
    Monitor {
        /// Dump file path or pprof URL
        #[arg(short, long, env = "GOSTACK_SOURCE")]
        source: String,

        /// Directory for the CSV table and legend
        #[arg(short, long, default_value = "gostack-monitor")]
        output_dir: PathBuf,

        /// Seconds between samples
        #[arg(short, long, default_value = "60")]
        interval: u64,

        /// Stop after this many samples
        #[arg(long)]
        samples: Option<usize>,

        /// Label recorded with every sample
        #[arg(short, long)]
        label: Option<String>,
    },

    /// Render grouped stacks as an SVG flamegraph
    Flamegraph {
        /// Dump file path or pprof URL
        #[arg(short, long, env = "GOSTACK_SOURCE")]
        source: String,

        /// Output path for the SVG
        #[arg(short, long, default_value = "goroutines.svg")]
        output: PathBuf,

        /// Flamegraph title
        #[arg(long)]
        title: Option<String>,

        /// Flamegraph width in pixels
        #[arg(long, default_value = "1200")]
        width: usize,
    },

    /// Display version information
    Version,
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    match cli.command {
        Commands::Echo { source, sort_by_id } => {
            execute_echo(EchoArgs { source, sort_by_id })?;
        }

        Commands::Coalesce { source, top, json } => {
            execute_coalesce(CoalesceArgs {
                source,
                top,
                output_json: json,
            })?;
        }

        Commands::Monitor {
            source,
            output_dir,
            interval,
            samples,
            label,
        } => {
            execute_monitor(MonitorArgs {
                source,
                output_dir,
                interval: Duration::from_secs(interval),
                samples,
                label,
            })?;
        }

        Commands::Flamegraph {
            source,
            output,
            title,
            width,
        } => {
            let mut config = FlamegraphConfig::new().with_width(width);
            if let Some(title) = title {
                config = config.with_title(title);
            }

            execute_flamegraph(FlamegraphArgs {
                source,
                output_svg: output,
                config,
            })?;
        }

        Commands::Version => {
            display_version();
        }
    }

    Ok(())
}
