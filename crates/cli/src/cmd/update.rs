//! Record a snapshot of the input directory

use crate::util;
use anyhow::Result;
use owo_colors::OwoColorize;
use pd_core::Config;

pub fn run(config: &Config, quiet: bool) -> Result<()> {
    if !quiet {
        println!(
            "{} {}",
            "Scanning".bold(),
            config.input_dir().display().to_string().cyan()
        );
    }

    let summary = pd_core::update(config)?;

    util::print_skipped(&summary.skipped, quiet);

    if !quiet {
        println!(
            "{} Recorded {} files in {}",
            "✓".green(),
            summary.files,
            summary.storage.display()
        );
    }

    Ok(())
}
