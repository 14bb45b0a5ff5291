//! Immutable run configuration
//!
//! Constructed once at the invocation boundary and passed by reference into
//! every core call. Nothing in the core reads process-wide state.

use crate::error::{Error, Result};
use std::io;
use std::path::{Path, PathBuf};

/// Default storage file for snapshots
pub const DEFAULT_STORAGE: &str = "storage.xml";

/// Default output directory for compare mode
pub const DEFAULT_OUT_DIR: &str = "target";

/// What a run does
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Walk the input directory and overwrite the storage file
    Update,
    /// Diff the input directory against the storage file and build a patch
    Compare,
}

/// Configuration for one invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    mode: Mode,
    input_dir: PathBuf,
    storage: PathBuf,
    out_dir: PathBuf,
    exclude: Vec<String>,
}

impl Config {
    /// Create a configuration with default storage and output paths
    pub fn new(mode: Mode, input_dir: impl Into<PathBuf>) -> Self {
        Self {
            mode,
            input_dir: input_dir.into(),
            storage: PathBuf::from(DEFAULT_STORAGE),
            out_dir: PathBuf::from(DEFAULT_OUT_DIR),
            exclude: Vec::new(),
        }
    }

    pub fn with_storage(mut self, storage: impl Into<PathBuf>) -> Self {
        self.storage = storage.into();
        self
    }

    /// Output directory for compare mode
    ///
    /// Compare wipes this directory before copying: it ends up holding only
    /// the current diff, never an accumulation across runs.
    pub fn with_out_dir(mut self, out_dir: impl Into<PathBuf>) -> Self {
        self.out_dir = out_dir.into();
        self
    }

    /// Gitignore-style patterns excluded from walks
    pub fn with_exclude(mut self, patterns: impl IntoIterator<Item = String>) -> Self {
        self.exclude = patterns.into_iter().collect();
        self
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn input_dir(&self) -> &Path {
        &self.input_dir
    }

    pub fn storage(&self) -> &Path {
        &self.storage
    }

    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    pub fn exclude(&self) -> &[String] {
        &self.exclude
    }

    /// Check the configuration before any core work starts
    pub fn validate(&self) -> Result<()> {
        if self.input_dir.as_os_str().is_empty() {
            return Err(Error::Argument("input directory is not defined".into()));
        }
        if self.storage.as_os_str().is_empty() {
            return Err(Error::Argument("storage file path is empty".into()));
        }

        if self.mode == Mode::Compare {
            if self.out_dir.as_os_str().is_empty() {
                return Err(Error::Argument("output directory path is empty".into()));
            }

            // Resetting the output directory must never delete the source tree
            let input = resolve(&self.input_dir)
                .map_err(|e| Error::fs(&self.input_dir, e))?;
            let out = resolve(&self.out_dir).map_err(|e| Error::fs(&self.out_dir, e))?;
            if input.starts_with(&out) {
                return Err(Error::Argument(format!(
                    "output directory {} contains the input directory {}",
                    self.out_dir.display(),
                    self.input_dir.display()
                )));
            }

            // The snapshot must survive the output reset for the next compare
            let storage = resolve(&self.storage).map_err(|e| Error::fs(&self.storage, e))?;
            if storage.starts_with(&out) {
                return Err(Error::Argument(format!(
                    "storage file {} is inside the output directory {}",
                    self.storage.display(),
                    self.out_dir.display()
                )));
            }
        }

        Ok(())
    }
}

/// Absolute form of a path with symlinks resolved as far as it exists
pub(crate) fn resolve(path: &Path) -> io::Result<PathBuf> {
    match path.canonicalize() {
        Ok(resolved) => Ok(resolved),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            let absolute = std::path::absolute(path)?;
            match (absolute.parent(), absolute.file_name()) {
                (Some(parent), Some(name)) => Ok(resolve(parent)?.join(name)),
                _ => Ok(absolute),
            }
        }
        Err(e) => Err(e),
    }
}
