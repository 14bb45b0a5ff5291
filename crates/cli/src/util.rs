//! Shared utilities for CLI commands

use owo_colors::OwoColorize;
use pd_core::SkippedEntry;

/// Byte count for patch summaries ("1 byte", "812 bytes", "3.4 MiB")
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 6] = ["KiB", "MiB", "GiB", "TiB", "PiB", "EiB"];

    match bytes {
        1 => return "1 byte".to_string(),
        0..=1023 => return format!("{} bytes", bytes),
        _ => {}
    }

    let mut value = bytes as f64 / 1024.0;
    let mut unit = 0;
    while value >= 1024.0 && unit + 1 < UNITS.len() {
        value /= 1024.0;
        unit += 1;
    }
    format!("{:.1} {}", value, UNITS[unit])
}

/// List entries the walk could not record
pub fn print_skipped(skipped: &[SkippedEntry], quiet: bool) {
    if quiet {
        return;
    }
    for entry in skipped {
        println!("{} {}: {}", "[skip]".yellow(), entry.path.display(), entry.reason.dimmed());
    }
}
