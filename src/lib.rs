//! aos-dl - a library for bulk-mirroring an aos.party-style map catalog.
//!
//! Walks the catalog's numeric ID space in fixed-size chunks, scrapes
//! each map's view page for its display name and preview image, and
//! downloads every map's file set concurrently with per-entry failure
//! isolation. Duplicate display names are disambiguated with version
//! suffixes so the on-disk layout stays collision-free.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use aos_dl::{CatalogUrls, HttpClient, Mirror, MirrorConfig, NoProgress};
//!
//! # async fn example() -> aos_dl::Result<()> {
//! let source = Arc::new(HttpClient::new()?);
//!
//! let mirror = Mirror::new(
//!     source,
//!     CatalogUrls::default(),
//!     MirrorConfig::default(),
//!     "AOS_Maps",
//!     Arc::new(NoProgress),
//! );
//!
//! let stats = mirror.run().await?;
//! println!("Downloaded {} maps", stats.entries_downloaded);
//! # Ok(())
//! # }
//! ```

#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

pub mod catalog;
pub mod config;
pub mod download;
pub mod error;
pub mod format;
pub mod naming;
pub mod progress;
pub mod scheduler;
pub mod source;
pub mod stats;
pub mod transfer;
pub mod url;

#[cfg(feature = "cli")]
pub mod cli;

// Re-export main types for convenience
pub use catalog::{CatalogEntry, MapId, PageOutcome};
pub use config::{MirrorConfig, PathConfig};
pub use error::{Error, Result};
pub use format::{format_bytes, format_duration};
pub use naming::{NameRegistry, ResolvedIdentity};
pub use progress::{NoProgress, ProgressReporter};
pub use scheduler::Mirror;
pub use source::{HttpClient, HttpSource};
pub use stats::RunStats;
pub use url::{CatalogUrls, FileKind, ImageKind};
