//! Per-entry asset downloads.
//!
//! Every map carries a metadata file and a geometry file; maps with a
//! preview image additionally carry a full-resolution preview (with a
//! low-resolution fallback) and a top-down render. All assets for one
//! entry are fetched concurrently and failures are collected rather
//! than short-circuited, so one bad asset never cancels its siblings.

use std::path::{Path, PathBuf};

use futures::future::{BoxFuture, join_all};

use crate::catalog::MapId;
use crate::config::MirrorConfig;
use crate::error::{Error, Result};
use crate::naming::ResolvedIdentity;
use crate::source::HttpSource;
use crate::transfer::transfer;
use crate::url::{CatalogUrls, FileKind, ImageKind};

/// The directory an entry's files are written into. With folder
/// organization disabled everything lands flat in the root.
#[must_use]
pub fn entry_dir(root: &Path, config: &MirrorConfig, identity: &ResolvedIdentity) -> PathBuf {
    if config.organize_into_folders {
        root.join(&identity.directory)
    } else {
        root.to_path_buf()
    }
}

fn asset_path(dir: &Path, base: &str, extension: &str) -> PathBuf {
    dir.join(format!("{base}.{extension}"))
}

/// Downloads the full asset set for one entry into its directory
/// (which must already exist), returning the total bytes written.
///
/// # Errors
///
/// Returns [`Error::Entry`] tagged with `id` if any asset failed.
/// Assets that succeeded remain on disk; there is no entry-level
/// rollback.
pub async fn download_entry(
    source: &dyn HttpSource,
    urls: &CatalogUrls,
    root: &Path,
    config: &MirrorConfig,
    id: MapId,
    identity: &ResolvedIdentity,
    image: Option<&str>,
) -> Result<u64> {
    let dir = entry_dir(root, config, identity);
    let base = identity.file_base.as_str();

    let mut assets: Vec<BoxFuture<'_, Result<u64>>> = Vec::with_capacity(4);

    for kind in [FileKind::Metadata, FileKind::Geometry] {
        let url = urls.download(id, kind);
        let path = asset_path(&dir, base, kind.extension());
        assets.push(Box::pin(
            async move { transfer(source, &url, &path).await },
        ));
    }

    if config.download_images
        && let Some(image) = image
    {
        let primary_url = urls.image(image, ImageKind::Full);
        let primary_path = asset_path(&dir, base, "png");
        let min_url = urls.image(image, ImageKind::Min);
        let min_path = asset_path(&dir, &format!("{base}_min"), "png");
        assets.push(Box::pin(async move {
            match transfer(source, &primary_url, &primary_path).await {
                Ok(written) => Ok(written),
                Err(primary_err) => {
                    log::debug!(
                        "map {id}: full preview failed ({primary_err}), trying low-res variant"
                    );
                    transfer(source, &min_url, &min_path).await
                }
            }
        }));

        let topdown_url = urls.image(image, ImageKind::TopDown);
        let topdown_path = asset_path(&dir, &format!("{base}_topdown"), "png");
        assets.push(Box::pin(async move {
            transfer(source, &topdown_url, &topdown_path).await
        }));
    }

    let mut written = 0u64;
    let mut failed = Vec::new();
    for result in join_all(assets).await {
        match result {
            Ok(bytes) => written += bytes,
            Err(e) => failed.push(e),
        }
    }

    if failed.is_empty() {
        Ok(written)
    } else {
        Err(Error::Entry { id, failed })
    }
}
