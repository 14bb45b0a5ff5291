//! Recursive directory walker
//!
//! Enumerates every regular file under a root as a root-relative
//! [`FileRecord`]. Unreadable entries below the root are reported and
//! skipped; an inaccessible root fails the whole walk.

use crate::error::{Error, Result};
use crate::exclude::ExcludeRules;
use crate::record::FileRecord;
use filetime::FileTime;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

/// An entry the walk could not record
#[derive(Debug)]
pub struct SkippedEntry {
    pub path: PathBuf,
    pub reason: String,
}

/// Result of a walk: recorded files plus skipped entries
#[derive(Debug, Default)]
pub struct WalkOutcome {
    pub records: Vec<FileRecord>,
    pub skipped: Vec<SkippedEntry>,
}

/// Walk `root` recursively and record every regular file
///
/// Record order is unspecified.
pub fn walk(root: &Path, rules: &ExcludeRules) -> Result<WalkOutcome> {
    check_root(root)?;

    info!("Walking {}", root.display());
    let mut outcome = WalkOutcome::default();

    let entries = WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_entry(|e| {
            if e.depth() == 0 {
                return true;
            }
            match e.path().strip_prefix(root) {
                Ok(rel) => !rules.is_excluded(rel, e.file_type().is_dir()),
                Err(_) => true,
            }
        });

    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                let path = e.path().unwrap_or(root).to_path_buf();
                if e.depth() == 0 {
                    return Err(Error::fs(path, io::Error::from(e)));
                }
                debug!("Skipping {}: {}", path.display(), e);
                outcome.skipped.push(SkippedEntry {
                    path,
                    reason: e.to_string(),
                });
                continue;
            }
        };

        let file_type = entry.file_type();
        if file_type.is_dir() {
            continue;
        }

        // Symlinks count when they point at a regular file
        let metadata = if file_type.is_symlink() {
            fs::metadata(entry.path())
        } else {
            entry.metadata().map_err(io::Error::from)
        };
        let metadata = match metadata {
            Ok(metadata) => metadata,
            Err(e) => {
                debug!("Skipping {}: {}", entry.path().display(), e);
                outcome.skipped.push(SkippedEntry {
                    path: entry.path().to_path_buf(),
                    reason: e.to_string(),
                });
                continue;
            }
        };
        if !metadata.is_file() {
            continue;
        }

        let rel = match entry.path().strip_prefix(root) {
            Ok(rel) => rel,
            Err(_) => continue,
        };
        let Some(rel) = rel.to_str() else {
            debug!("Skipping {}: path is not valid UTF-8", entry.path().display());
            outcome.skipped.push(SkippedEntry {
                path: entry.path().to_path_buf(),
                reason: "path is not valid UTF-8".to_string(),
            });
            continue;
        };

        let mtime = FileTime::from_last_modification_time(&metadata);
        let Some(modified) = unix_nanos(mtime) else {
            debug!("Skipping {}: modification time out of range", entry.path().display());
            outcome.skipped.push(SkippedEntry {
                path: entry.path().to_path_buf(),
                reason: "modification time out of range".to_string(),
            });
            continue;
        };
        debug!("[file] {} ({})", rel, modified);
        outcome.records.push(FileRecord::new(rel, modified));
    }

    info!(
        "Walk of {} found {} files ({} skipped)",
        root.display(),
        outcome.records.len(),
        outcome.skipped.len()
    );
    Ok(outcome)
}

/// Modification time as whole nanoseconds since the Unix epoch
///
/// Keeps the filesystem's full precision so edits within one second
/// still change the value. Out of `i64` range past the year 2262.
pub fn unix_nanos(mtime: FileTime) -> Option<i64> {
    mtime
        .unix_seconds()
        .checked_mul(1_000_000_000)?
        .checked_add(i64::from(mtime.nanoseconds()))
}

/// Root must exist, be a directory, and be listable
fn check_root(root: &Path) -> Result<()> {
    let metadata = fs::metadata(root).map_err(|e| Error::fs(root, e))?;
    if !metadata.is_dir() {
        return Err(Error::fs(
            root,
            io::Error::new(io::ErrorKind::InvalidInput, "not a directory"),
        ));
    }
    fs::read_dir(root).map_err(|e| Error::fs(root, e))?;
    Ok(())
}
