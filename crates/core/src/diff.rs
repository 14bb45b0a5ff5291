//! Timestamp diff between a live walk and a stored snapshot

use crate::record::{FileRecord, Snapshot};
use std::collections::btree_map::{self, BTreeMap};
use tracing::{debug, info};

/// Why a path is in the diff
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    /// Not present in the snapshot
    New,
    /// Present in the snapshot with a different timestamp
    Modified { stored: i64, current: i64 },
}

/// Root-relative paths that are new or modified relative to a snapshot
///
/// Paths that exist only in the snapshot (deleted files) never appear here.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiffSet {
    changes: BTreeMap<String, ChangeKind>,
}

impl DiffSet {
    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn contains(&self, path: &str) -> bool {
        self.changes.contains_key(path)
    }

    pub fn get(&self, path: &str) -> Option<ChangeKind> {
        self.changes.get(path).copied()
    }

    /// Changed paths in sorted order
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.changes.keys().map(String::as_str)
    }

    /// Changed paths with their kind, in sorted order
    pub fn iter(&self) -> impl Iterator<Item = (&str, ChangeKind)> {
        self.changes.iter().map(|(path, kind)| (path.as_str(), *kind))
    }

    pub fn new_count(&self) -> usize {
        self.changes
            .values()
            .filter(|kind| matches!(kind, ChangeKind::New))
            .count()
    }

    pub fn modified_count(&self) -> usize {
        self.len() - self.new_count()
    }
}

impl IntoIterator for DiffSet {
    type Item = (String, ChangeKind);
    type IntoIter = btree_map::IntoIter<String, ChangeKind>;

    fn into_iter(self) -> Self::IntoIter {
        self.changes.into_iter()
    }
}

/// Compute the diff of `live` against `snapshot`
///
/// A live path is included if the snapshot lacks it or stores a different
/// timestamp. Equal timestamps are unchanged. Snapshot paths missing from
/// `live` are ignored.
pub fn diff(live: Vec<FileRecord>, snapshot: &Snapshot) -> DiffSet {
    let mut changes = BTreeMap::new();

    for record in live {
        let kind = match snapshot.get(&record.path) {
            None => ChangeKind::New,
            Some(stored) if stored != record.modified => ChangeKind::Modified {
                stored,
                current: record.modified,
            },
            Some(_) => continue,
        };
        debug!("{:?} {}", kind, record.path);
        changes.insert(record.path, kind);
    }

    let set = DiffSet { changes };
    info!(
        "Diff found {} changed files ({} new, {} modified)",
        set.len(),
        set.new_count(),
        set.modified_count()
    );
    set
}
