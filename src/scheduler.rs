//! The chunked mirror run loop.
//!
//! IDs are walked in fixed-size chunks. Within a chunk the scrape phase
//! is strictly sequential (it decides registry order, and therefore
//! version suffixes, deterministically in ID order); the download phase
//! then fans out concurrently across the chunk's entries. A chunk fully
//! settles before the next chunk's scrape phase begins, so the chunk
//! size bounds concurrent connections and open file handles.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use futures::{StreamExt, stream};

use crate::catalog::{self, MapId, PageOutcome};
use crate::config::MirrorConfig;
use crate::download::{download_entry, entry_dir};
use crate::error::{Error, Result};
use crate::naming::{NameRegistry, ResolvedIdentity};
use crate::progress::ProgressReporter;
use crate::source::HttpSource;
use crate::stats::{RunStats, RunStatsBuilder};
use crate::url::CatalogUrls;

/// One scraped-and-resolved entry awaiting download.
struct Planned {
    id: MapId,
    identity: ResolvedIdentity,
    image: Option<String>,
}

/// Drives a full mirror run against one catalog.
pub struct Mirror {
    source: Arc<dyn HttpSource>,
    urls: CatalogUrls,
    config: MirrorConfig,
    dest: PathBuf,
    reporter: Arc<dyn ProgressReporter>,
}

impl Mirror {
    /// Creates a mirror run over the given transport and destination.
    #[must_use]
    pub fn new(
        source: Arc<dyn HttpSource>,
        urls: CatalogUrls,
        config: MirrorConfig,
        dest: impl Into<PathBuf>,
        reporter: Arc<dyn ProgressReporter>,
    ) -> Self {
        Self {
            source,
            urls,
            config,
            dest: dest.into(),
            reporter,
        }
    }

    /// Runs the mirror to completion and returns the run statistics.
    ///
    /// Per-entry failures (scrape or asset transfer) are logged,
    /// reported, counted, and do not stop the run. Running off the end
    /// of the catalog is the normal termination condition.
    ///
    /// # Errors
    ///
    /// Returns an error only if the destination root cannot be reset at
    /// run start.
    pub async fn run(&self) -> Result<RunStats> {
        reset_dest_root(&self.dest).await?;

        let registry = NameRegistry::new();
        let mut stats = RunStatsBuilder::new();
        let mut next_id = self.config.starting_id;

        loop {
            let (planned, exhausted) =
                self.scrape_chunk(&registry, &mut stats, &mut next_id).await;
            self.drain_chunk(planned, &mut stats).await;
            if exhausted || !self.config.loop_until_exhausted {
                break;
            }
        }

        Ok(stats.build())
    }

    /// Sequentially scrapes up to `chunk_size` IDs, resolving names and
    /// creating entry directories. Returns the planned entries and
    /// whether the end of the catalog was reached.
    async fn scrape_chunk(
        &self,
        registry: &NameRegistry,
        stats: &mut RunStatsBuilder,
        next_id: &mut MapId,
    ) -> (Vec<Planned>, bool) {
        let mut planned = Vec::with_capacity(self.config.chunk_size);
        let mut exhausted = false;

        for _ in 0..self.config.chunk_size {
            let id = *next_id;
            match catalog::fetch_entry(&*self.source, &self.urls, id).await {
                Ok(PageOutcome::Found(entry)) => {
                    *next_id += 1;
                    let identity = registry
                        .resolve(&entry.name, self.config.version_duplicate_names);
                    let dir = entry_dir(&self.dest, &self.config, &identity);
                    if let Err(e) = tokio::fs::create_dir_all(&dir).await {
                        log::error!("map {id}: cannot create {}: {e}", dir.display());
                        let err = Error::Io(e);
                        self.reporter.on_entry_failed(id, &err);
                        stats.add_failure();
                        continue;
                    }
                    planned.push(Planned {
                        id,
                        identity,
                        image: entry.image,
                    });
                }
                Ok(PageOutcome::EndOfCatalog) => {
                    log::info!("map {id} has no name, assuming end of catalog");
                    exhausted = true;
                    break;
                }
                Err(e) => {
                    // A bad page fails that ID only; enumeration goes on.
                    *next_id += 1;
                    log::error!("map {id}: page scrape failed: {e}");
                    self.reporter.on_entry_failed(id, &e);
                    stats.add_failure();
                }
            }
        }

        (planned, exhausted)
    }

    /// Downloads all planned entries of a chunk concurrently and waits
    /// for every one to settle.
    async fn drain_chunk(&self, planned: Vec<Planned>, stats: &mut RunStatsBuilder) {
        let mut results = stream::iter(planned.iter().map(|entry| async move {
            let result = download_entry(
                &*self.source,
                &self.urls,
                &self.dest,
                &self.config,
                entry.id,
                &entry.identity,
                entry.image.as_deref(),
            )
            .await;
            (entry.id, result)
        }))
        .buffer_unordered(self.config.chunk_size.max(1));

        while let Some((id, result)) = results.next().await {
            match result {
                Ok(bytes) => {
                    stats.add_entry(bytes);
                    self.reporter.on_entry_complete(stats.downloaded());
                }
                Err(e) => {
                    log::error!("map {id}: {e}");
                    self.reporter.on_entry_failed(id, &e);
                    stats.add_failure();
                }
            }
        }
    }
}

/// Clears and recreates the destination root. Absence is not an error.
async fn reset_dest_root(dest: &Path) -> Result<()> {
    match tokio::fs::remove_dir_all(dest).await {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => return Err(e.into()),
    }
    tokio::fs::create_dir_all(dest).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::NoProgress;
    use crate::source::mock::MockSource;
    use crate::url::FileKind;
    use std::sync::Mutex;
    use tempfile::TempDir;

    fn view_page(name: &str) -> String {
        format!(r#"<html><body><p><span class="header">{name}</span></p></body></html>"#)
    }

    /// Registers a named map: view page plus both file downloads.
    fn add_map(source: MockSource, urls: &CatalogUrls, id: MapId, name: &str) -> MockSource {
        source
            .page(urls.view(id), view_page(name))
            .file(urls.download(id, FileKind::Metadata), b"meta".to_vec())
            .file(urls.download(id, FileKind::Geometry), b"voxels".to_vec())
    }

    fn mirror(source: MockSource, config: MirrorConfig, dest: &Path) -> Mirror {
        Mirror::new(
            Arc::new(source),
            CatalogUrls::default(),
            config,
            dest,
            Arc::new(NoProgress),
        )
    }

    fn dir_names(root: &Path) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(root)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[tokio::test]
    async fn duplicate_names_get_versioned_directories() {
        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("maps");
        let urls = CatalogUrls::default();

        let mut source = MockSource::new();
        for (id, name) in [(0, "Alpha"), (1, "Beta"), (2, "Alpha")] {
            source = add_map(source, &urls, id, name);
        }
        source = source.page(urls.view(3), view_page(""));

        let stats = mirror(source, MirrorConfig::default().with_chunk_size(3), &dest)
            .run()
            .await
            .unwrap();

        assert_eq!(stats.entries_downloaded, 3);
        assert_eq!(stats.entries_failed, 0);
        assert_eq!(dir_names(&dest), vec!["Alpha", "Alpha_v2", "Beta"]);
        for base in ["Alpha/Alpha", "Beta/Beta", "Alpha_v2/Alpha_v2"] {
            assert!(dest.join(format!("{base}.txt")).exists(), "{base}.txt");
            assert!(dest.join(format!("{base}.vxl")).exists(), "{base}.vxl");
        }
    }

    #[tokio::test]
    async fn empty_name_terminates_after_draining_chunk() {
        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("maps");
        let urls = CatalogUrls::default();

        let source = add_map(MockSource::new(), &urls, 0, "Solo")
            .page(urls.view(1), view_page(""));

        let stats = mirror(source, MirrorConfig::default(), &dest)
            .run()
            .await
            .unwrap();

        assert_eq!(stats.entries_downloaded, 1);
        assert_eq!(stats.entries_failed, 0);
        // Only the Solo directory exists; nothing was attempted for ID 1.
        assert_eq!(dir_names(&dest), vec!["Solo"]);
    }

    #[tokio::test]
    async fn flat_layout_when_folder_organization_disabled() {
        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("maps");
        let urls = CatalogUrls::default();

        let mut source = MockSource::new();
        for (id, name) in [(0, "Alpha"), (1, "Beta")] {
            source = add_map(source, &urls, id, name);
        }
        source = source.page(urls.view(2), view_page(""));

        let config = MirrorConfig::default().with_organize_into_folders(false);
        let stats = mirror(source, config, &dest).run().await.unwrap();

        assert_eq!(stats.entries_downloaded, 2);
        assert_eq!(
            dir_names(&dest),
            vec!["Alpha.txt", "Alpha.vxl", "Beta.txt", "Beta.vxl"]
        );
    }

    #[tokio::test]
    async fn scrape_failure_is_isolated_to_one_id() {
        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("maps");
        let urls = CatalogUrls::default();

        // ID 0 has no view page at all (transport-level 404), ID 1 is
        // fine, ID 2 ends the catalog.
        let source = add_map(MockSource::new(), &urls, 1, "Survivor")
            .page(urls.view(2), view_page(""));

        let stats = mirror(source, MirrorConfig::default(), &dest)
            .run()
            .await
            .unwrap();

        assert_eq!(stats.entries_downloaded, 1);
        assert_eq!(stats.entries_failed, 1);
        assert_eq!(dir_names(&dest), vec!["Survivor"]);
    }

    #[tokio::test]
    async fn failed_entry_does_not_stop_the_batch() {
        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("maps");
        let urls = CatalogUrls::default();

        // ID 0's geometry file is missing; ID 1 is complete.
        let mut source = MockSource::new()
            .page(urls.view(0), view_page("Broken"))
            .file(urls.download(0, FileKind::Metadata), b"meta".to_vec());
        source = add_map(source, &urls, 1, "Fine").page(urls.view(2), view_page(""));

        let stats = mirror(source, MirrorConfig::default(), &dest)
            .run()
            .await
            .unwrap();

        assert_eq!(stats.entries_downloaded, 1);
        assert_eq!(stats.entries_failed, 1);
        // The failed entry's successful sibling asset stays on disk.
        assert!(dest.join("Broken/Broken.txt").exists());
        assert!(!dest.join("Broken/Broken.vxl").exists());
        assert!(dest.join("Fine/Fine.vxl").exists());
    }

    #[tokio::test]
    async fn single_pass_stops_after_one_chunk() {
        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("maps");
        let urls = CatalogUrls::default();

        let mut source = MockSource::new();
        for id in 0..5 {
            source = add_map(source, &urls, id, &format!("Map{id}"));
        }

        let config = MirrorConfig::default()
            .with_chunk_size(2)
            .with_loop_until_exhausted(false);
        let stats = mirror(source, config, &dest).run().await.unwrap();

        assert_eq!(stats.entries_downloaded, 2);
        assert_eq!(dir_names(&dest), vec!["Map0", "Map1"]);
    }

    #[tokio::test]
    async fn starting_id_offsets_the_walk() {
        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("maps");
        let urls = CatalogUrls::default();

        let source = add_map(MockSource::new(), &urls, 10, "Ten")
            .page(urls.view(11), view_page(""));

        let config = MirrorConfig::default().with_starting_id(10);
        let stats = mirror(source, config, &dest).run().await.unwrap();

        assert_eq!(stats.entries_downloaded, 1);
        assert_eq!(dir_names(&dest), vec!["Ten"]);
    }

    #[tokio::test]
    async fn destination_root_is_cleared_at_run_start() {
        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("maps");
        std::fs::create_dir_all(dest.join("stale")).unwrap();
        std::fs::write(dest.join("stale/old.txt"), b"old").unwrap();

        let urls = CatalogUrls::default();
        let source = MockSource::new().page(urls.view(0), view_page(""));

        let stats = mirror(source, MirrorConfig::default(), &dest)
            .run()
            .await
            .unwrap();

        assert_eq!(stats.entries_downloaded, 0);
        assert!(dest.exists());
        assert!(!dest.join("stale").exists());
    }

    /// Reporter that records every completion count it sees.
    #[derive(Default)]
    struct CountingReporter {
        counts: Mutex<Vec<usize>>,
        failures: Mutex<Vec<MapId>>,
    }

    impl ProgressReporter for CountingReporter {
        fn on_entry_complete(&self, downloaded: usize) {
            self.counts.lock().unwrap().push(downloaded);
        }

        fn on_entry_failed(&self, id: MapId, _error: &Error) {
            self.failures.lock().unwrap().push(id);
        }
    }

    #[tokio::test]
    async fn reporter_sees_monotonic_counts_and_tagged_failures() {
        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("maps");
        let urls = CatalogUrls::default();

        let mut source = MockSource::new();
        for (id, name) in [(0, "A"), (1, "B"), (2, "C")] {
            source = add_map(source, &urls, id, name);
        }
        // ID 3 exists but its downloads are missing.
        source = source
            .page(urls.view(3), view_page("D"))
            .page(urls.view(4), view_page(""));

        let reporter = Arc::new(CountingReporter::default());
        let stats = Mirror::new(
            Arc::new(source),
            urls,
            MirrorConfig::default(),
            &dest,
            Arc::clone(&reporter) as Arc<dyn ProgressReporter>,
        )
        .run()
        .await
        .unwrap();

        assert_eq!(stats.entries_downloaded, 3);
        assert_eq!(stats.entries_failed, 1);
        assert_eq!(*reporter.counts.lock().unwrap(), vec![1, 2, 3]);
        assert_eq!(*reporter.failures.lock().unwrap(), vec![3]);
    }
}
