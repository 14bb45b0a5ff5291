//! Error taxonomy for the patch pipeline

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced to the invocation boundary
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid or missing invocation input
    #[error("{0}")]
    Argument(String),

    /// Storage file missing, unreadable or malformed
    #[error("cannot read snapshot {}: {reason}", path.display())]
    SnapshotRead {
        path: PathBuf,
        #[source]
        reason: ReadFailure,
    },

    /// Snapshot could not be persisted
    #[error("cannot write snapshot {}: {source}", path.display())]
    StorageWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Permission denied, vanished path, or other I/O failure on the tree
    #[error("{}: {source}", path.display())]
    Filesystem {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl Error {
    /// Short, stable label for the failure kind
    pub fn kind(&self) -> &'static str {
        match self {
            Error::Argument(_) => "argument",
            Error::SnapshotRead { .. } => "snapshot-read",
            Error::StorageWrite { .. } => "storage-write",
            Error::Filesystem { .. } => "filesystem",
        }
    }

    pub(crate) fn fs(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::Filesystem {
            path: path.into(),
            source,
        }
    }
}

/// Why a snapshot document was rejected
#[derive(Debug, Error)]
pub enum ReadFailure {
    #[error("file not found")]
    Missing,

    #[error(transparent)]
    Io(io::Error),

    #[error("malformed XML: {0}")]
    Xml(String),

    #[error("unexpected document shape: {0}")]
    Shape(String),
}

impl From<io::Error> for ReadFailure {
    fn from(err: io::Error) -> Self {
        if err.kind() == io::ErrorKind::NotFound {
            ReadFailure::Missing
        } else {
            ReadFailure::Io(err)
        }
    }
}
