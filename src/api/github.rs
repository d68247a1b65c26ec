//! GitHub contents API catalog

use serde::Deserialize;
use serde_json::Value;

use crate::error::RemoteError;
use crate::models::{CatalogEntry, EntryKind};

use super::{Catalog, HttpClient, HttpResponse, UreqClient};

/// Contents endpoint of the image repository
pub const DEFAULT_CATALOG_URL: &str =
    "https://api.github.com/repos/cat-milk/Anime-Girls-Holding-Programming-Books/contents";

/// Catalog backed by a repository's contents listing.
///
/// Top-level directories are categories; the files inside them are images.
pub struct RemoteCatalog<H = UreqClient> {
    http: H,
    root: String,
    token: Option<String>,
}

impl<H: HttpClient> RemoteCatalog<H> {
    /// Create a catalog rooted at `root`, authenticating with `token` if given
    pub fn new(http: H, root: &str, token: Option<&str>) -> Self {
        Self {
            http,
            root: root.trim_end_matches('/').to_string(),
            token: token.filter(|t| !t.is_empty()).map(str::to_string),
        }
    }

    /// Whether requests carry an `Authorization` header
    pub const fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// Build the URL listing one category
    fn category_url(&self, category: &str) -> String {
        format!("{}/{}", self.root, urlencoding::encode(category))
    }

    /// GET a listing URL with the API headers (and auth, if any)
    fn get_listing(&self, url: &str) -> Result<HttpResponse, RemoteError> {
        tracing::debug!("Listing {url}");

        let auth = self.token.as_ref().map(|t| format!("Bearer {t}"));
        let mut headers = vec![("Accept", "application/vnd.github+json")];
        if let Some(auth) = &auth {
            headers.push(("Authorization", auth.as_str()));
        }

        self.http.get(url, &headers)
    }
}

impl<H: HttpClient> Catalog for RemoteCatalog<H> {
    fn list_categories(&self) -> Result<Vec<CatalogEntry>, RemoteError> {
        let response = self.get_listing(&self.root)?;

        let items: Vec<ContentItem> = serde_json::from_slice(&response.body).map_err(|e| {
            RemoteError::Malformed(format!(
                "catalog root (HTTP {}): {}",
                response.status,
                describe_body(&response.body, &e)
            ))
        })?;

        Ok(items
            .into_iter()
            .map(ContentItem::into_entry)
            .filter(CatalogEntry::is_directory)
            .collect())
    }

    fn list_images(&self, category: &CatalogEntry) -> Result<Vec<CatalogEntry>, RemoteError> {
        let url = self.category_url(&category.name);
        let response = self.get_listing(&url)?;

        let entries = parse_listing(&response)?;
        Ok(entries.into_iter().filter(CatalogEntry::is_image).collect())
    }

    fn download(&self, locator: &str) -> Result<Vec<u8>, RemoteError> {
        tracing::debug!("Downloading {locator}");

        // Raw content host, no auth
        let response = self.http.get(locator, &[])?;

        if !response.is_success() {
            return Err(RemoteError::Api {
                message: format!("download of {locator} failed"),
                status: Some(response.status),
            });
        }

        Ok(response.body)
    }
}

/// Contents API item as returned on the wire
#[derive(Debug, Deserialize)]
struct ContentItem {
    name: String,
    #[serde(default)]
    path: String,
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    download_url: Option<String>,
}

impl ContentItem {
    fn into_entry(self) -> CatalogEntry {
        CatalogEntry {
            name: self.name,
            path: self.path,
            kind: EntryKind::from_type(&self.kind),
            download_url: self.download_url,
        }
    }
}

/// Classify a category listing body.
///
/// An object with a non-empty `message` is an API error (GitHub reports rate
/// limiting and missing paths this way), an array is a listing, anything
/// else is malformed.
fn parse_listing(response: &HttpResponse) -> Result<Vec<CatalogEntry>, RemoteError> {
    let value: Value = serde_json::from_slice(&response.body).map_err(|e| {
        RemoteError::Malformed(format!(
            "category listing (HTTP {}): {}",
            response.status,
            describe_body(&response.body, &e)
        ))
    })?;

    if let Some(message) = value.get("message").and_then(Value::as_str)
        && !message.is_empty()
    {
        let status = value
            .get("status")
            .and_then(parse_status)
            .or_else(|| (!response.is_success()).then_some(response.status));
        return Err(RemoteError::Api {
            message: message.to_string(),
            status,
        });
    }

    let items: Vec<ContentItem> = serde_json::from_value(value).map_err(|e| {
        RemoteError::Malformed(format!(
            "category listing (HTTP {}): {e}",
            response.status
        ))
    })?;

    Ok(items.into_iter().map(ContentItem::into_entry).collect())
}

/// GitHub sends `status` as a string; older responses used a number
fn parse_status(value: &Value) -> Option<u16> {
    match value {
        Value::Number(n) => n.as_u64().and_then(|n| u16::try_from(n).ok()),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

/// Short description of an unparseable body, preferring an API message
fn describe_body(body: &[u8], error: &serde_json::Error) -> String {
    serde_json::from_slice::<Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| error.to_string())
}
