//! Progress reporting trait.

use crate::catalog::MapId;
use crate::error::Error;

/// Trait for receiving mirror progress updates.
///
/// Implement this trait to render progress during a run. All methods
/// have default no-op implementations for convenience.
pub trait ProgressReporter: Send + Sync {
    /// Called after an entry's assets have all been written, with the
    /// monotonically increasing count of completed entries.
    fn on_entry_complete(&self, _downloaded: usize) {}

    /// Called when an entry fails (scrape or asset transfer), tagged
    /// with its map ID. The run continues.
    fn on_entry_failed(&self, _id: MapId, _error: &Error) {}
}

/// A null progress implementation that ignores all events.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressReporter for NoProgress {}
