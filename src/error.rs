//! Error types for the cache, the remote catalog and image resolution

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Filesystem failure inside the cache directory
#[derive(Debug, Error)]
pub enum StorageError {
    /// The cache directory could not be created
    #[error("failed to create cache directory {path}: {source}")]
    Create {
        /// Directory that could not be created
        path: PathBuf,
        /// Underlying I/O error
        source: io::Error,
    },

    /// The cache directory could not be listed
    #[error("failed to read cache directory {path}: {source}")]
    Read {
        /// Directory that could not be read
        path: PathBuf,
        /// Underlying I/O error
        source: io::Error,
    },

    /// A cached file could not be written
    #[error("failed to write {path}: {source}")]
    Write {
        /// File that could not be written
        path: PathBuf,
        /// Underlying I/O error
        source: io::Error,
    },

    /// The cache directory could not be removed
    #[error("failed to remove cache directory {path}: {source}")]
    Remove {
        /// Directory that could not be removed
        path: PathBuf,
        /// Underlying I/O error
        source: io::Error,
    },

    /// The requested file name would escape the cache directory
    #[error("invalid cache file name: {0:?}")]
    InvalidName(String),
}

/// Failure talking to the remote catalog
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RemoteError {
    /// Transport failure (DNS, connect, TLS, timeout, truncated body)
    #[error("remote unreachable: {0}")]
    Unreachable(String),

    /// The body was neither an entry listing nor an API error
    #[error("malformed response: {0}")]
    Malformed(String),

    /// The API answered with an error (rate limit, not found, ...)
    #[error("API error{}: {message}", status_suffix(.status))]
    Api {
        /// Message reported by the API
        message: String,
        /// Status from the body or the HTTP response
        status: Option<u16>,
    },
}

#[allow(clippy::ref_option)]
fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" {s}")).unwrap_or_default()
}

/// Failure picking an image from the cache
#[derive(Debug, Error)]
pub enum CacheError {
    /// The cache holds no image files
    #[error("no cached images available")]
    Empty,

    /// The cache directory could not be read
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Failure resolving an image to display
#[derive(Debug, Error)]
pub enum ResolveError {
    /// The catalog root lists no categories at all
    #[error("no categories found in the remote catalog")]
    NoCategories,

    /// The chosen category has no images and the cache is empty
    #[error("no images found in category {category}")]
    NoImages {
        /// Category that had no images
        category: String,
    },

    /// Downloading the chosen image failed
    #[error("failed to download {name}: {source}")]
    Download {
        /// Remote file name of the chosen image
        name: String,
        /// Underlying remote failure
        source: RemoteError,
    },

    /// Storing the downloaded image failed
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Neither the remote catalog nor the cache produced an image
    #[error("no image available: remote catalog failed and the cache is empty")]
    Unavailable,
}

impl ResolveError {
    /// Whether this failure only means "no image could be found anywhere".
    ///
    /// Callers should carry on without an image in that case.
    pub const fn is_unavailable(&self) -> bool {
        matches!(self, Self::Unavailable | Self::NoImages { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display() {
        let err = RemoteError::Api {
            message: "API rate limit exceeded".to_string(),
            status: Some(403),
        };
        assert_eq!(err.to_string(), "API error 403: API rate limit exceeded");

        let err = RemoteError::Api {
            message: "Not Found".to_string(),
            status: None,
        };
        assert_eq!(err.to_string(), "API error: Not Found");
    }

    #[test]
    fn test_unavailable_classification() {
        assert!(ResolveError::Unavailable.is_unavailable());
        assert!(
            ResolveError::NoImages {
                category: "Rust".to_string()
            }
            .is_unavailable()
        );
        assert!(!ResolveError::NoCategories.is_unavailable());
    }
}
