//! Error types for the aos-dl library.

use thiserror::Error;

use crate::catalog::MapId;

/// Errors that can occur while mirroring the catalog.
#[derive(Error, Debug)]
pub enum Error {
    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The server answered with a non-success status code.
    #[error("server returned {status} for {url}")]
    Status {
        /// The requested resource.
        url: String,
        /// The response status code.
        status: reqwest::StatusCode,
    },

    /// One or more of an entry's asset transfers failed.
    #[error("map {id}: {} asset transfer(s) failed", failed.len())]
    Entry {
        /// ID of the catalog entry the failures belong to.
        id: MapId,
        /// The individual asset failures, in completion order.
        failed: Vec<Error>,
    },
}

/// A specialized `Result` type for aos-dl operations.
pub type Result<T> = std::result::Result<T, Error>;
