//! Live counter and summary reporting for CLI runs.

use indicatif::{ProgressBar, ProgressStyle};

use crate::{Error, MapId, ProgressReporter, RunStats, format_bytes, format_duration};

const SEPARATOR: &str = "────────────────────────────────────────────────────────────";

/// Creates the single-line entry counter, overwritten in place.
pub fn make_counter() -> ProgressBar {
    let bar = ProgressBar::new_spinner();
    bar.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {pos} maps downloaded")
            .expect("progress template is valid"),
    );
    bar
}

/// Reporter that drives the live counter and prints one error block per
/// failed entry without shearing the counter line.
pub struct CliProgress {
    bar: ProgressBar,
}

impl CliProgress {
    /// Wraps a counter bar created with [`make_counter`].
    #[must_use]
    pub const fn new(bar: ProgressBar) -> Self {
        Self { bar }
    }

    /// Clears the counter once the run is over.
    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl ProgressReporter for CliProgress {
    fn on_entry_complete(&self, downloaded: usize) {
        self.bar.set_position(downloaded as u64);
    }

    fn on_entry_failed(&self, id: MapId, error: &Error) {
        self.bar.println(
            console::style(format!("Error downloading map {id}:"))
                .red()
                .bold()
                .to_string(),
        );
        self.bar.println(format!("  {error}"));
        if let Error::Entry { failed, .. } = error {
            for cause in failed {
                self.bar.println(format!("    {cause}"));
            }
        }
    }
}

/// Prints the final run summary.
pub fn print_summary(stats: &RunStats) {
    let noun = if stats.entries_downloaded == 1 {
        "map"
    } else {
        "maps"
    };

    println!("\n{SEPARATOR}");
    println!(
        "Done! Downloaded {} {noun} ({}) in {}",
        stats.entries_downloaded,
        format_bytes(stats.total_bytes),
        format_duration(stats.elapsed)
    );
    if stats.entries_failed > 0 {
        println!("  {} map(s) failed; see errors above", stats.entries_failed);
    }
    println!("{SEPARATOR}");
}
