//! Outcome of an image resolution

use std::path::{Path, PathBuf};

/// Where a resolved image came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    /// Freshly downloaded from the given category
    Downloaded {
        /// Category the image was picked from
        category: String,
    },
    /// Picked from the local cache
    Cached,
}

/// An image on disk, ready to be displayed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedImage {
    /// Path of the image file
    pub path: PathBuf,
    /// How the image was obtained
    pub source: ImageSource,
}

impl ResolvedImage {
    /// Image picked from the cache
    pub const fn cached(path: PathBuf) -> Self {
        Self {
            path,
            source: ImageSource::Cached,
        }
    }

    /// Image downloaded from `category`
    pub fn downloaded(path: PathBuf, category: &str) -> Self {
        Self {
            path,
            source: ImageSource::Downloaded {
                category: category.to_string(),
            },
        }
    }

    /// Path of the image file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the image came from the cache
    pub const fn is_cached(&self) -> bool {
        matches!(self.source, ImageSource::Cached)
    }
}
