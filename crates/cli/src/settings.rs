//! Optional TOML settings file
//!
//! ```toml
//! storage = "snapshots/game.xml"
//! out_dir = "patch"
//! exclude = ["*.log", "cache/"]
//! ```
//!
//! Relative paths are resolved against the settings file's directory.
//! Command-line flags override file values; exclude lists are concatenated.

use anyhow::{Context, Result};
use pd_core::{Config, Mode};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Values read from a settings file
#[derive(Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct FileSettings {
    pub storage: Option<PathBuf>,
    pub out_dir: Option<PathBuf>,
    pub exclude: Vec<String>,
}

/// Values given on the command line
#[derive(Debug, Default)]
pub struct Overrides {
    pub storage: Option<PathBuf>,
    pub out_dir: Option<PathBuf>,
    pub exclude: Vec<String>,
}

/// Load and parse a settings file
pub fn load(path: &Path) -> Result<FileSettings> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read settings file {}", path.display()))?;
    let settings = parse(&text)
        .with_context(|| format!("Invalid settings file {}", path.display()))?;

    let base = path.parent().unwrap_or(Path::new(""));
    Ok(settings.relative_to(base))
}

/// Parse settings from TOML text
pub fn parse(text: &str) -> Result<FileSettings> {
    let settings: FileSettings = toml::from_str(text)?;
    Ok(settings)
}

impl FileSettings {
    fn relative_to(self, base: &Path) -> Self {
        let rebase = |path: PathBuf| {
            if path.is_relative() {
                base.join(path)
            } else {
                path
            }
        };

        Self {
            storage: self.storage.map(rebase),
            out_dir: self.out_dir.map(rebase),
            exclude: self.exclude,
        }
    }
}

/// Merge settings sources into the run configuration
pub fn build_config(
    mode: Mode,
    input_dir: PathBuf,
    file: FileSettings,
    overrides: Overrides,
) -> Config {
    let mut config = Config::new(mode, input_dir);

    if let Some(storage) = overrides.storage.or(file.storage) {
        config = config.with_storage(storage);
    }
    if let Some(out_dir) = overrides.out_dir.or(file.out_dir) {
        config = config.with_out_dir(out_dir);
    }

    let exclude: Vec<String> = file.exclude.into_iter().chain(overrides.exclude).collect();
    config.with_exclude(exclude)
}
