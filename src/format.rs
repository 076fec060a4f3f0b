//! Formatting helpers for human-readable byte sizes and durations.

use std::time::Duration;

/// Formats a byte count for the run summary. Map assets are small, so
/// kilobytes and megabytes are the interesting range.
#[must_use]
pub fn format_bytes(bytes: u64) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = KB * 1024.0;

    #[allow(clippy::cast_precision_loss)]
    let b = bytes as f64;
    if b >= MB {
        format!("{:.1} MB", b / MB)
    } else if b >= KB {
        format!("{:.1} KB", b / KB)
    } else {
        format!("{bytes} B")
    }
}

/// Formats a duration as an `XhYmZs` wall-clock string (e.g. "0h 1m 05s").
#[must_use]
pub fn format_duration(d: Duration) -> String {
    let secs = d.as_secs();
    format!("{}h {}m {:02}s", secs / 3600, (secs % 3600) / 60, secs % 60)
}
