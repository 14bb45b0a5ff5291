//! Update and compare entry points
//!
//! Phases run strictly in sequence and hand their data to the next phase
//! by value:
//! - update:  walk -> snapshot -> write
//! - compare: read -> walk -> diff -> materialize

use crate::codec::{read_snapshot, write_snapshot};
use crate::config::{Config, Mode};
use crate::diff::{diff, DiffSet};
use crate::error::Result;
use crate::exclude::ExcludeRules;
use crate::materialize::{materialize, MaterializeReport};
use crate::record::Snapshot;
use crate::walk::{walk, SkippedEntry};
use std::path::PathBuf;
use tracing::info;

/// Result of an update run
#[derive(Debug)]
pub struct UpdateSummary {
    pub storage: PathBuf,
    pub files: usize,
    pub skipped: Vec<SkippedEntry>,
}

/// Result of a compare run
#[derive(Debug)]
pub struct CompareSummary {
    pub out_dir: PathBuf,
    pub diff: DiffSet,
    pub skipped: Vec<SkippedEntry>,
    pub report: MaterializeReport,
}

/// Result of [`run`]
#[derive(Debug)]
pub enum Outcome {
    Updated(UpdateSummary),
    Compared(CompareSummary),
}

/// Run the pipeline selected by the configured mode
pub fn run(config: &Config) -> Result<Outcome> {
    match config.mode() {
        Mode::Update => update(config).map(Outcome::Updated),
        Mode::Compare => compare(config).map(Outcome::Compared),
    }
}

/// Snapshot the input directory into the storage file
pub fn update(config: &Config) -> Result<UpdateSummary> {
    config.validate()?;
    let rules = ExcludeRules::for_config(config)?;

    let outcome = walk(config.input_dir(), &rules)?;
    let snapshot = Snapshot::from_records(outcome.records);
    write_snapshot(config.storage(), &snapshot)?;

    Ok(UpdateSummary {
        storage: config.storage().to_path_buf(),
        files: snapshot.len(),
        skipped: outcome.skipped,
    })
}

/// Diff the input directory against the storage file and build the patch
///
/// The snapshot is read before anything else touches the filesystem; a
/// missing or malformed storage file aborts the run with the output
/// directory untouched.
pub fn compare(config: &Config) -> Result<CompareSummary> {
    config.validate()?;
    let rules = ExcludeRules::for_config(config)?;

    let snapshot = read_snapshot(config.storage())?;
    let outcome = walk(config.input_dir(), &rules)?;
    let changes = diff(outcome.records, &snapshot);
    drop(snapshot);

    let report = materialize(&changes, config.input_dir(), config.out_dir())?;
    info!(
        "Patch at {} holds {} of {} changed files",
        config.out_dir().display(),
        report.copied.len(),
        changes.len()
    );

    Ok(CompareSummary {
        out_dir: config.out_dir().to_path_buf(),
        diff: changes,
        skipped: outcome.skipped,
        report,
    })
}
