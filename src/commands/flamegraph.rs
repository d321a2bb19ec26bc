//! Flamegraph command implementation.

use super::models::FlamegraphArgs;
use super::utils::{load_snapshot, validate_source};
use crate::aggregator::{build_collapsed_stacks, group};
use crate::flamegraph::generate_flamegraph;
use crate::output::write_svg;
use anyhow::{Context, Result};
use log::info;

/// Execute the flamegraph command
///
/// **Public** - main entry point called from main.rs
pub fn execute_flamegraph(args: FlamegraphArgs) -> Result<()> {
    validate_flamegraph_args(&args)?;

    let (_, parsed) = load_snapshot(&args.source)?;
    let grouped = group(parsed.snapshot);
    let stacks = build_collapsed_stacks(&grouped);

    let svg = generate_flamegraph(&stacks, Some(&args.config))
        .context("Failed to generate flamegraph")?;
    write_svg(&svg, &args.output_svg).context("Failed to write flamegraph SVG")?;

    info!("✓ Flamegraph written to: {}", args.output_svg.display());
    Ok(())
}

/// Validate flamegraph arguments
pub fn validate_flamegraph_args(args: &FlamegraphArgs) -> Result<()> {
    validate_source(&args.source)?;

    if args.config.width == 0 {
        anyhow::bail!("width must be greater than 0");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_flamegraph_args_zero_width() {
        let mut args = FlamegraphArgs {
            source: "dump.txt".to_string(),
            ..Default::default()
        };
        args.config.width = 0;
        assert!(validate_flamegraph_args(&args).is_err());
    }
}
