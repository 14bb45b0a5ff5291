//! Incremental patch building for directory trees
//!
//! This crate provides:
//! - Recursive directory walking into (path, mtime) records
//! - Snapshot persistence (XML storage file, atomic writes)
//! - Timestamp-based diffing against a stored snapshot
//! - Patch materialization into a freshly reset output directory
//!
//! Deleted files are never reported and file contents are never compared.

pub mod codec;
pub mod config;
pub mod diff;
pub mod error;
pub mod exclude;
pub mod materialize;
pub mod pipeline;
pub mod record;
pub mod store;
pub mod walk;

// Re-exports
pub use config::{Config, Mode, DEFAULT_OUT_DIR, DEFAULT_STORAGE};
pub use diff::{diff, ChangeKind, DiffSet};
pub use error::{Error, ReadFailure, Result};
pub use exclude::ExcludeRules;
pub use materialize::{materialize, CopyFailure, MaterializeReport};
pub use pipeline::{compare, run, update, CompareSummary, Outcome, UpdateSummary};
pub use record::{FileRecord, Snapshot};
pub use walk::{walk, SkippedEntry, WalkOutcome};
