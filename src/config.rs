//! Configuration types for mirror runs.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::catalog::MapId;

/// Configuration for a mirror run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MirrorConfig {
    /// First map ID to request.
    pub starting_id: MapId,
    /// Number of consecutive IDs scraped and downloaded per chunk.
    /// Also the bound on concurrent entry downloads.
    pub chunk_size: usize,
    /// Keep walking chunks until the catalog runs out of IDs.
    /// When `false`, a single chunk is processed.
    pub loop_until_exhausted: bool,
    /// Give every map its own subdirectory under the destination root.
    pub organize_into_folders: bool,
    /// Suffix repeated map names with `_v2`, `_v3`, ...
    pub version_duplicate_names: bool,
    /// Download preview images alongside metadata and geometry.
    pub download_images: bool,
}

impl Default for MirrorConfig {
    fn default() -> Self {
        Self {
            starting_id: 0,
            chunk_size: 15,
            loop_until_exhausted: true,
            organize_into_folders: true,
            version_duplicate_names: true,
            download_images: true,
        }
    }
}

impl MirrorConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the first map ID to request.
    #[must_use]
    pub const fn with_starting_id(mut self, id: MapId) -> Self {
        self.starting_id = id;
        self
    }

    /// Sets the chunk size (concurrent download bound).
    #[must_use]
    pub const fn with_chunk_size(mut self, size: usize) -> Self {
        self.chunk_size = size;
        self
    }

    /// Sets whether to keep walking chunks until the catalog ends.
    #[must_use]
    pub const fn with_loop_until_exhausted(mut self, looping: bool) -> Self {
        self.loop_until_exhausted = looping;
        self
    }

    /// Sets whether each map gets its own subdirectory.
    #[must_use]
    pub const fn with_organize_into_folders(mut self, organize: bool) -> Self {
        self.organize_into_folders = organize;
        self
    }

    /// Sets whether duplicate names receive version suffixes.
    #[must_use]
    pub const fn with_version_duplicate_names(mut self, version: bool) -> Self {
        self.version_duplicate_names = version;
        self
    }

    /// Sets whether preview images are downloaded.
    #[must_use]
    pub const fn with_download_images(mut self, images: bool) -> Self {
        self.download_images = images;
        self
    }

    /// Loads configuration from a TOML file, falling back to defaults if
    /// the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_or_default(path: &Path) -> crate::Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(text) => toml::from_str(&text).map_err(|e| {
                crate::Error::Io(std::io::Error::new(
                    std::io::ErrorKind::InvalidData,
                    format!("invalid config file {}: {e}", path.display()),
                ))
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(crate::Error::Io(e)),
        }
    }
}

/// Path configuration for the destination tree and config file.
#[derive(Debug, Clone)]
pub struct PathConfig {
    /// Root directory the mirror is written into. Cleared at run start.
    pub dest_dir: PathBuf,
    /// Directory the config file is read from.
    pub config_dir: PathBuf,
}

impl Default for PathConfig {
    fn default() -> Self {
        let config_dir = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));

        Self {
            dest_dir: PathBuf::from("AOS_Maps"),
            config_dir: config_dir.join("aos-dl"),
        }
    }
}

impl PathConfig {
    /// The config file path under the config directory.
    #[must_use]
    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join("config.toml")
    }
}
