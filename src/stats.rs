//! Run statistics types.

use std::time::{Duration, Instant};

/// Statistics for one completed mirror run.
#[derive(Debug, Clone)]
pub struct RunStats {
    /// Number of entries whose assets were all written.
    pub entries_downloaded: usize,
    /// Number of entries that failed (scrape or asset transfer).
    pub entries_failed: usize,
    /// Total bytes written across all successful entries.
    pub total_bytes: u64,
    /// Total elapsed wall time for the run.
    pub elapsed: Duration,
}

/// Builder accumulating statistics while a run is in flight.
///
/// Owned and mutated only by the scheduler; the timer starts when the
/// builder is created.
pub struct RunStatsBuilder {
    entries_downloaded: usize,
    entries_failed: usize,
    total_bytes: u64,
    start_time: Instant,
}

impl Default for RunStatsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RunStatsBuilder {
    /// Creates a builder and starts the run timer.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries_downloaded: 0,
            entries_failed: 0,
            total_bytes: 0,
            start_time: Instant::now(),
        }
    }

    /// Records a fully downloaded entry.
    pub const fn add_entry(&mut self, bytes: u64) {
        self.entries_downloaded += 1;
        self.total_bytes += bytes;
    }

    /// Records a failed entry.
    pub const fn add_failure(&mut self) {
        self.entries_failed += 1;
    }

    /// Count of entries downloaded so far.
    #[must_use]
    pub const fn downloaded(&self) -> usize {
        self.entries_downloaded
    }

    /// Stops the timer and produces the final statistics.
    #[must_use]
    pub fn build(self) -> RunStats {
        RunStats {
            entries_downloaded: self.entries_downloaded,
            entries_failed: self.entries_failed,
            total_bytes: self.total_bytes,
            elapsed: self.start_time.elapsed(),
        }
    }
}
