//! Build a patch directory from files changed since the snapshot

use crate::util;
use anyhow::Result;
use owo_colors::OwoColorize;
use pd_core::{ChangeKind, Config};

pub fn run(config: &Config, quiet: bool) -> Result<()> {
    if !quiet {
        println!(
            "{} {} against {}",
            "Comparing".bold(),
            config.input_dir().display().to_string().cyan(),
            config.storage().display()
        );
    }

    let summary = pd_core::compare(config)?;

    util::print_skipped(&summary.skipped, quiet);

    if !quiet {
        for (path, kind) in summary.diff.iter() {
            match kind {
                ChangeKind::New => println!("{} {}", "[new]".green(), path),
                ChangeKind::Modified { .. } => println!("{} {}", "[mod]".yellow(), path),
            }
        }
        for path in &summary.report.copied {
            println!("{} {}", "[copy]".cyan(), path);
        }
    }

    // Copy failures are shown even in quiet mode
    for failure in &summary.report.failed {
        eprintln!("{} {}: {}", "[fail]".red(), failure.path, failure.error);
    }

    if !quiet {
        println!();
        if summary.diff.is_empty() {
            println!("{}", "No changes since the snapshot".dimmed());
        } else {
            println!(
                "{} {} new, {} modified; copied {} files ({}) to {}",
                "✓".green(),
                summary.diff.new_count(),
                summary.diff.modified_count(),
                summary.report.copied.len(),
                util::format_bytes(summary.report.bytes_copied),
                summary.out_dir.display()
            );
        }
        if !summary.report.is_complete() {
            println!(
                "{}",
                format!("{} files could not be copied", summary.report.failed.len()).yellow()
            );
        }
    }

    Ok(())
}
