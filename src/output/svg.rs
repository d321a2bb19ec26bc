//! SVG flamegraph output writer.

use crate::utils::error::OutputError;
use log::info;
use std::path::Path;

/// Write SVG content to a file
///
/// **Public** - main entry point for SVG output
///
/// The file is staged in its target directory and renamed into place, so a
/// failed write leaves any earlier flamegraph untouched.
///
/// # Errors
/// * `OutputError::WriteFailed` - I/O error during write
/// * `OutputError::InvalidPath` - Path is invalid
pub fn write_svg(svg_content: &str, output_path: impl AsRef<Path>) -> Result<(), OutputError> {
    let output_path = output_path.as_ref();

    info!("Writing SVG to: {}", output_path.display());

    super::validate_path(output_path)?;

    let dir = match output_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    super::ensure_dir(dir)?;

    let staged = super::write_staged(dir, svg_content.as_bytes())?;
    super::commit_staged(staged, output_path)?;

    let file_size = svg_content.len();
    info!(
        "SVG written successfully ({} bytes, {:.2} KB)",
        file_size,
        file_size as f64 / 1024.0
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_svg_write_creates_parent_dirs() {
        let temp_dir = tempfile::tempdir().unwrap();
        let nested_path = temp_dir.path().join("nested/dirs/flamegraph.svg");

        write_svg("<svg></svg>", &nested_path).unwrap();

        assert_eq!(std::fs::read_to_string(&nested_path).unwrap(), "<svg></svg>");
    }
}
