//! Output writers for reports, summaries and flamegraphs.
//!
//! This module handles writing data to disk in various formats:
//! - Text reports (echo and coalesced)
//! - JSON summaries
//! - SVG flamegraphs
//!
//! It also provides the staged writes used by the monitor so that a
//! half-written file never replaces a good one.

pub mod json;
pub mod report;
pub mod svg;

// Re-export main functions
pub use json::{read_summary, to_summary, write_summary, GroupSummary, SnapshotSummary};
pub use report::{coalesced_report, echo_report};
pub use svg::write_svg;

use crate::utils::error::OutputError;
use log::debug;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Common path validation for output files
pub fn validate_path(path: &Path) -> Result<(), OutputError> {
    if path.as_os_str().is_empty() {
        return Err(OutputError::InvalidPath("Path is empty".to_string()));
    }

    if path.exists() && path.is_dir() {
        return Err(OutputError::InvalidPath(format!(
            "Path is a directory: {}",
            path.display()
        )));
    }

    Ok(())
}

/// Create a directory (and its parents) if it does not exist yet
pub fn ensure_dir(dir: &Path) -> Result<(), OutputError> {
    if dir.as_os_str().is_empty() || dir.is_dir() {
        return Ok(());
    }

    if dir.exists() {
        return Err(OutputError::InvalidPath(format!(
            "Not a directory: {}",
            dir.display()
        )));
    }

    debug!("Creating directory: {}", dir.display());
    fs::create_dir_all(dir).map_err(|e| {
        OutputError::InvalidPath(format!("Cannot create directory {}: {}", dir.display(), e))
    })
}

/// Write `contents` to a fresh temporary file inside `dir` and fsync it
///
/// **Public** - first half of an atomic replace; finish with
/// [`NamedTempFile::persist`]. Dropping the returned handle deletes the file.
pub fn write_staged(dir: &Path, contents: &[u8]) -> Result<NamedTempFile, OutputError> {
    let mut staged = tempfile::Builder::new()
        .prefix(".gostack-")
        .suffix(".tmp")
        .tempfile_in(dir)?;

    staged.write_all(contents)?;
    staged.as_file().sync_all()?;

    debug!("Staged {} bytes at {}", contents.len(), staged.path().display());
    Ok(staged)
}

/// Rename a staged file over its final path
pub fn commit_staged(staged: NamedTempFile, path: &Path) -> Result<(), OutputError> {
    staged
        .persist(path)
        .map_err(|e| OutputError::WriteFailed(e.error))?;
    Ok(())
}

/// Flush a directory entry after renames (best effort)
pub fn sync_dir(dir: &Path) {
    if let Ok(handle) = File::open(dir) {
        let _ = handle.sync_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_path_empty() {
        assert!(validate_path(Path::new("")).is_err());
    }

    #[test]
    fn test_validate_path_directory() {
        let temp_dir = tempfile::tempdir().unwrap();
        assert!(validate_path(temp_dir.path()).is_err());
    }

    #[test]
    fn test_ensure_dir_rejects_file() {
        let temp_file = NamedTempFile::new().unwrap();
        assert!(ensure_dir(temp_file.path()).is_err());
    }

    #[test]
    fn test_staged_file_replaces_target() {
        let temp_dir = tempfile::tempdir().unwrap();
        let target = temp_dir.path().join("out.txt");
        std::fs::write(&target, "old").unwrap();

        let staged = write_staged(temp_dir.path(), b"new").unwrap();
        assert_eq!(std::fs::read_to_string(&target).unwrap(), "old");

        commit_staged(staged, &target).unwrap();
        assert_eq!(std::fs::read_to_string(&target).unwrap(), "new");
    }

    #[test]
    fn test_failed_commit_removes_staged_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let target = temp_dir.path().join("out.txt");
        std::fs::create_dir(&target).unwrap();
        std::fs::write(target.join("keep"), "x").unwrap();

        let staged = write_staged(temp_dir.path(), b"new").unwrap();
        let staged_path = staged.path().to_path_buf();

        assert!(matches!(
            commit_staged(staged, &target),
            Err(OutputError::WriteFailed(_))
        ));
        assert!(!staged_path.exists());
        assert!(target.join("keep").exists());
    }

    #[test]
    fn test_dropped_staged_file_is_removed() {
        let temp_dir = tempfile::tempdir().unwrap();
        let staged = write_staged(temp_dir.path(), b"partial").unwrap();
        let staged_path = staged.path().to_path_buf();
        drop(staged);
        assert!(!staged_path.exists());
    }
}
