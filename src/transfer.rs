//! Single-file transfer primitive.
//!
//! Bytes are streamed to a `.part` file and renamed into place on
//! success, so the final path never holds partial data and every
//! failure exit path removes the partial artifact.

use std::path::{Path, PathBuf};

use futures::StreamExt;
use tokio::io::AsyncWriteExt;

use crate::error::Result;
use crate::source::HttpSource;

/// Returns the `.part` file path for a given final path.
fn part_path(dest: &Path) -> PathBuf {
    let mut os = dest.as_os_str().to_owned();
    os.push(".part");
    PathBuf::from(os)
}

/// Streams `url` to `dest`, returning the number of bytes written.
///
/// # Errors
///
/// Returns an error on a non-success status, a transport failure
/// mid-stream, or a write failure. No retries; the partial artifact is
/// removed before the error is surfaced.
pub async fn transfer(source: &dyn HttpSource, url: &str, dest: &Path) -> Result<u64> {
    let part = part_path(dest);
    match stream_to(source, url, &part).await {
        Ok(written) => match tokio::fs::rename(&part, dest).await {
            Ok(()) => Ok(written),
            Err(e) => {
                let _ = tokio::fs::remove_file(&part).await;
                Err(e.into())
            }
        },
        Err(e) => {
            let _ = tokio::fs::remove_file(&part).await;
            Err(e)
        }
    }
}

async fn stream_to(source: &dyn HttpSource, url: &str, path: &Path) -> Result<u64> {
    let mut stream = source.get_stream(url).await?;
    let mut file = tokio::fs::File::create(path).await?;
    let mut written = 0u64;
    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        file.write_all(&chunk).await?;
        written += chunk.len() as u64;
    }
    file.flush().await?;
    Ok(written)
}
