//! Exclusion rules for directory walks
//!
//! Two sources, checked in order:
//! 1. Artifact paths (storage file, output directory) that live inside the root
//! 2. Gitignore-style patterns supplied by the caller
//!
//! With neither present, nothing is excluded.

use crate::config::{self, Config};
use crate::error::{Error, Result};
use ignore::gitignore::{Gitignore, GitignoreBuilder};
use std::path::{Path, PathBuf};

/// Compiled exclusion rules for one root
#[derive(Debug)]
pub struct ExcludeRules {
    /// Root-relative paths pruned from the walk
    artifacts: Vec<PathBuf>,
    /// Compiled user patterns (None when no patterns were given)
    patterns: Option<Gitignore>,
}

impl ExcludeRules {
    /// Rules that exclude nothing
    pub fn none() -> Self {
        Self {
            artifacts: Vec::new(),
            patterns: None,
        }
    }

    /// Compile gitignore-style patterns relative to `root`
    pub fn from_patterns(root: &Path, patterns: &[String]) -> Result<Self> {
        if patterns.is_empty() {
            return Ok(Self::none());
        }

        let mut builder = GitignoreBuilder::new(root);
        for pattern in patterns {
            builder.add_line(None, pattern).map_err(|e| {
                Error::Argument(format!("invalid exclude pattern '{}': {}", pattern, e))
            })?;
        }
        let gitignore = builder
            .build()
            .map_err(|e| Error::Argument(format!("invalid exclude patterns: {}", e)))?;

        Ok(Self {
            artifacts: Vec::new(),
            patterns: Some(gitignore),
        })
    }

    /// Rules for a configured run: user patterns plus nested artifacts
    pub fn for_config(config: &Config) -> Result<Self> {
        let root = config.input_dir();
        let mut rules = Self::from_patterns(root, config.exclude())?;

        let resolved_root = config::resolve(root).map_err(|e| Error::fs(root, e))?;
        rules.exclude_artifact(&resolved_root, config.storage());
        if config.mode() == crate::config::Mode::Compare {
            rules.exclude_artifact(&resolved_root, config.out_dir());
        }

        Ok(rules)
    }

    /// Exclude `artifact` if it resolves to a location under `root`
    fn exclude_artifact(&mut self, root: &Path, artifact: &Path) {
        let Ok(resolved) = config::resolve(artifact) else {
            return;
        };
        if let Ok(rel) = resolved.strip_prefix(root) {
            if !rel.as_os_str().is_empty() {
                tracing::debug!("Excluding nested artifact {}", rel.display());
                self.artifacts.push(rel.to_path_buf());
            }
        }
    }

    /// Check if a root-relative path should be skipped
    pub fn is_excluded(&self, rel_path: &Path, is_dir: bool) -> bool {
        if self.artifacts.iter().any(|artifact| rel_path == artifact) {
            return true;
        }

        match &self.patterns {
            Some(gitignore) => gitignore.matched(rel_path, is_dir).is_ignore(),
            None => false,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty() && self.patterns.is_none()
    }
}

impl Default for ExcludeRules {
    fn default() -> Self {
        Self::none()
    }
}
