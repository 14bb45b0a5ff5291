//! Patch materialization
//!
//! Copies the files named by a [`DiffSet`] from the source root into the
//! destination root at the same relative paths.
//!
//! The destination is destructive and non-additive: it is deleted and
//! recreated empty first, so after a run it holds only the current diff.

use crate::diff::DiffSet;
use crate::error::{Error, Result};
use std::fs;
use std::io;
use std::path::{Component, Path};
use tracing::{debug, info};

/// A diff entry that could not be copied
#[derive(Debug)]
pub struct CopyFailure {
    pub path: String,
    pub error: Error,
}

/// Outcome of a materialization
#[derive(Debug, Default)]
pub struct MaterializeReport {
    /// Paths copied, in diff order
    pub copied: Vec<String>,
    /// Paths that failed; the rest of the batch still ran
    pub failed: Vec<CopyFailure>,
    pub bytes_copied: u64,
}

impl MaterializeReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Reset `dest_root` and copy every diff entry from `source_root` into it
///
/// Failure to reset the destination is fatal. Per-file failures (for example
/// a source file deleted after the diff was computed) are collected in the
/// report and do not stop the batch.
pub fn materialize(diff: &DiffSet, source_root: &Path, dest_root: &Path) -> Result<MaterializeReport> {
    reset_dir(dest_root)?;
    info!(
        "Copying {} files from {} to {}",
        diff.len(),
        source_root.display(),
        dest_root.display()
    );

    let mut report = MaterializeReport::default();
    for rel in diff.paths() {
        match copy_entry(rel, source_root, dest_root) {
            Ok(bytes) => {
                debug!("[copy] {} ({} bytes)", rel, bytes);
                report.bytes_copied += bytes;
                report.copied.push(rel.to_string());
            }
            Err(error) => {
                debug!("Failed to copy {}: {}", rel, error);
                report.failed.push(CopyFailure {
                    path: rel.to_string(),
                    error,
                });
            }
        }
    }

    info!(
        "Copied {} files ({} bytes), {} failed",
        report.copied.len(),
        report.bytes_copied,
        report.failed.len()
    );
    Ok(report)
}

/// Remove `dir` and everything under it, then recreate it empty
fn reset_dir(dir: &Path) -> Result<()> {
    match fs::symlink_metadata(dir) {
        Ok(metadata) if metadata.is_dir() => {
            fs::remove_dir_all(dir).map_err(|e| Error::fs(dir, e))?;
        }
        Ok(_) => {
            fs::remove_file(dir).map_err(|e| Error::fs(dir, e))?;
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(Error::fs(dir, e)),
    }

    fs::create_dir_all(dir).map_err(|e| Error::fs(dir, e))?;
    Ok(())
}

fn copy_entry(rel: &str, source_root: &Path, dest_root: &Path) -> Result<u64> {
    let rel_path = Path::new(rel);
    if !is_plain_relative(rel_path) {
        return Err(Error::fs(
            rel_path,
            io::Error::new(io::ErrorKind::InvalidInput, "path escapes the tree root"),
        ));
    }

    let source = source_root.join(rel_path);
    let dest = dest_root.join(rel_path);

    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent).map_err(|e| Error::fs(parent, e))?;
    }
    // fs::copy truncates an existing destination
    fs::copy(&source, &dest).map_err(|e| Error::fs(&source, e))
}

/// Only normal components: no root, prefix, `.` or `..`
fn is_plain_relative(path: &Path) -> bool {
    path.components().count() > 0
        && path
            .components()
            .all(|component| matches!(component, Component::Normal(_)))
}
