//! File records and snapshots

use ahash::AHashMap;

/// One regular file seen by a walk
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FileRecord {
    /// Root-relative path, host separator convention
    pub path: String,
    /// Last modification time in nanoseconds since the Unix epoch
    pub modified: i64,
}

impl FileRecord {
    pub fn new(path: impl Into<String>, modified: i64) -> Self {
        Self {
            path: path.into(),
            modified,
        }
    }
}

/// A directory's file set and timestamps captured at one point in time
///
/// Built once from a complete record set and never mutated afterwards.
/// A newer snapshot replaces an older one wholesale.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    entries: AHashMap<String, i64>,
}

impl Snapshot {
    /// Build a snapshot from records; a later duplicate path wins
    pub fn from_records(records: impl IntoIterator<Item = FileRecord>) -> Self {
        records.into_iter().collect()
    }

    /// Stored timestamp for a path
    pub fn get(&self, path: &str) -> Option<i64> {
        self.entries.get(path).copied()
    }

    pub fn contains(&self, path: &str) -> bool {
        self.entries.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries in no particular order
    pub fn iter(&self) -> impl Iterator<Item = (&str, i64)> {
        self.entries.iter().map(|(path, ts)| (path.as_str(), *ts))
    }

    /// Records sorted by path (deterministic for serialization)
    pub fn sorted_records(&self) -> Vec<FileRecord> {
        let mut records: Vec<FileRecord> = self
            .entries
            .iter()
            .map(|(path, ts)| FileRecord::new(path.clone(), *ts))
            .collect();
        records.sort_unstable_by(|a, b| a.path.cmp(&b.path));
        records
    }
}

impl FromIterator<FileRecord> for Snapshot {
    fn from_iter<I: IntoIterator<Item = FileRecord>>(iter: I) -> Self {
        let entries = iter
            .into_iter()
            .map(|record| (record.path, record.modified))
            .collect();
        Self { entries }
    }
}
