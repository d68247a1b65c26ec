//! Remote catalog clients
//!
//! HTTP is behind [`HttpClient`] so the catalog logic can be exercised
//! without a network; [`UreqClient`] is the blocking implementation used
//! at runtime.

pub mod github;

use std::io::Read;
use std::time::Duration;

use crate::error::RemoteError;
use crate::models::CatalogEntry;

pub use github::RemoteCatalog;

/// Largest body accepted from the remote (listings and images)
pub const MAX_BODY_BYTES: u64 = 50 * 1024 * 1024;

/// Default timeout applied to every request
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Source of categories and images
pub trait Catalog {
    /// List the top-level categories (directories only)
    fn list_categories(&self) -> Result<Vec<CatalogEntry>, RemoteError>;

    /// List the image entries of a category
    fn list_images(&self, category: &CatalogEntry) -> Result<Vec<CatalogEntry>, RemoteError>;

    /// Fetch the raw bytes behind a download URL
    fn download(&self, locator: &str) -> Result<Vec<u8>, RemoteError>;
}

/// Status and body of a completed HTTP exchange
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// HTTP status code
    pub status: u16,
    /// Response body
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Whether the status is 2xx
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

/// Minimal blocking GET client
pub trait HttpClient {
    /// Issue a GET with extra headers.
    ///
    /// Any response that arrives, whatever its status, is `Ok`; only
    /// transport failures are `Err`.
    fn get(&self, url: &str, headers: &[(&str, &str)]) -> Result<HttpResponse, RemoteError>;
}

/// [`HttpClient`] backed by a `ureq` agent with a fixed timeout
pub struct UreqClient {
    agent: ureq::Agent,
}

impl UreqClient {
    /// Build a client whose requests time out after `timeout`
    pub fn new(timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(timeout)
            .user_agent(&format!("anifetch/{}", crate::VERSION))
            .build();
        Self { agent }
    }
}

impl Default for UreqClient {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT)
    }
}

impl HttpClient for UreqClient {
    fn get(&self, url: &str, headers: &[(&str, &str)]) -> Result<HttpResponse, RemoteError> {
        let mut request = self.agent.get(url);
        for (name, value) in headers {
            request = request.set(name, value);
        }

        let response = match request.call() {
            Ok(response) => response,
            Err(ureq::Error::Status(_, response)) => response,
            Err(ureq::Error::Transport(e)) => {
                return Err(RemoteError::Unreachable(e.to_string()));
            }
        };

        let status = response.status();
        let body = read_body(response.into_reader(), MAX_BODY_BYTES)?;

        Ok(HttpResponse { status, body })
    }
}

/// Read a whole body, refusing anything longer than `limit` bytes
fn read_body(reader: impl Read, limit: u64) -> Result<Vec<u8>, RemoteError> {
    let mut body = Vec::new();
    reader
        .take(limit.saturating_add(1))
        .read_to_end(&mut body)
        .map_err(|e| RemoteError::Unreachable(format!("Failed to read body: {e}")))?;

    if body.len() as u64 > limit {
        return Err(RemoteError::Unreachable(format!(
            "Response body exceeds {limit} bytes"
        )));
    }

    Ok(body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_read_body_within_limit() {
        assert_eq!(read_body(&b"abcd"[..], 4).unwrap(), b"abcd");
        assert_eq!(read_body(&b""[..], 4).unwrap(), b"");
    }

    #[test]
    fn test_read_body_rejects_oversized() {
        let err = read_body(&b"abcde"[..], 4).unwrap_err();
        assert!(matches!(err, RemoteError::Unreachable(msg) if msg.contains("exceeds 4 bytes")));
    }

    #[test]
    fn test_read_body_io_error() {
        struct Broken;
        impl Read for Broken {
            fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
                Err(io::Error::new(io::ErrorKind::ConnectionReset, "reset"))
            }
        }

        assert!(matches!(
            read_body(Broken, 4),
            Err(RemoteError::Unreachable(_))
        ));
    }
}
