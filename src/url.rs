//! Remote locator builders for the catalog's endpoints.
//!
//! The catalog exposes three endpoints: a per-map view page, a file
//! download endpoint keyed by ID and file kind, and image endpoints
//! keyed by an image name and a type selector.

use crate::catalog::MapId;

/// Default base URL of the map catalog.
pub const DEFAULT_BASE_URL: &str = "http://aos.party";

/// The downloadable file kinds attached to every map ID.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    /// Map metadata text file.
    Metadata,
    /// Voxel geometry file.
    Geometry,
}

impl FileKind {
    /// Query flag used by the download endpoint.
    #[must_use]
    pub const fn flag(self) -> &'static str {
        match self {
            Self::Metadata => "txt",
            Self::Geometry => "vxl",
        }
    }

    /// On-disk file extension for this kind.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        // The endpoint flag doubles as the extension.
        self.flag()
    }
}

/// The preview image variants served by the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    /// Full-resolution preview.
    Full,
    /// Lower-resolution fallback variant.
    Min,
    /// Top-down render of the map.
    TopDown,
}

impl ImageKind {
    /// Path segment selecting this variant on the image endpoint.
    #[must_use]
    pub const fn selector(self) -> &'static str {
        match self {
            Self::Full => "png",
            Self::Min => "png_min",
            Self::TopDown => "png_topdown",
        }
    }
}

/// Builds locators for the catalog's endpoints.
#[derive(Debug, Clone)]
pub struct CatalogUrls {
    base: String,
}

impl Default for CatalogUrls {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl CatalogUrls {
    /// Creates a locator builder for the given base URL.
    /// A trailing slash on the base is tolerated.
    #[must_use]
    pub fn new(base: impl Into<String>) -> Self {
        let mut base = base.into();
        while base.ends_with('/') {
            base.pop();
        }
        Self { base }
    }

    /// The per-map HTML view page.
    #[must_use]
    pub fn view(&self, id: MapId) -> String {
        format!("{}/view.php?id={id}", self.base)
    }

    /// The file download endpoint for a map ID and file kind.
    #[must_use]
    pub fn download(&self, id: MapId, kind: FileKind) -> String {
        format!("{}/dl.php?id={id}&{}=1", self.base, kind.flag())
    }

    /// The image endpoint for a named image and variant.
    #[must_use]
    pub fn image(&self, name: &str, kind: ImageKind) -> String {
        format!("{}/{}/{name}", self.base, kind.selector())
    }
}
