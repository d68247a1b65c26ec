//! # anifetch
//!
//! System information for your terminal, served with a random anime girl
//! holding a programming book.
//!
//! ## Overview
//!
//! anifetch prints host statistics (OS, kernel, uptime, packages, CPU,
//! memory, disk) next to an image picked at random from the
//! [Anime-Girls-Holding-Programming-Books] repository. Downloaded images are
//! kept in a local cache, which is used whenever GitHub cannot be reached,
//! rate-limits the request or answers with something unexpected.
//!
//! [Anime-Girls-Holding-Programming-Books]: https://github.com/cat-milk/Anime-Girls-Holding-Programming-Books
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                          main                               │
//! │        CLI flags, Config + Environment, exit status         │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!          ┌───────────────────┼───────────────────┐
//!          ▼                   ▼                   ▼
//! ┌─────────────────┐ ┌─────────────────┐ ┌─────────────────┐
//! │     System      │ │     Images      │ │     Display     │
//! │                 │ │                 │ │                 │
//! │ • uname, df     │ │ • Resolver      │ │ • Viewer chain  │
//! │ • /proc files   │ │ • CacheStore    │ │ • Info block    │
//! │ • Packages      │ │ • Fallback      │ │ • ASCII art     │
//! └─────────────────┘ └─────────────────┘ └─────────────────┘
//!                              │
//!                              ▼
//!                     ┌─────────────────┐
//!                     │       API       │
//!                     │                 │
//!                     │ • GitHub        │
//!                     │ • HTTP (ureq)   │
//!                     └─────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`api`]: Remote catalog (GitHub contents API) and HTTP client
//! - [`images`]: Image cache and resolver
//! - [`display`]: Image viewers and text rendering
//! - [`system`]: Host statistics
//! - [`config`]: Configuration and process environment
//! - [`error`]: Error types
//! - [`models`]: Catalog entries and resolved images
//!
//! ## Example
//!
//! ```no_run
//! use anifetch::api::{RemoteCatalog, UreqClient};
//! use anifetch::images::{CacheStore, ImageResolver};
//!
//! fn main() -> anyhow::Result<()> {
//!     let store = CacheStore::new("/tmp/anifetch");
//!     store.ensure_ready()?;
//!
//!     let catalog = RemoteCatalog::new(
//!         UreqClient::default(),
//!         anifetch::api::github::DEFAULT_CATALOG_URL,
//!         None,
//!     );
//!     let image = ImageResolver::new(catalog, store).resolve()?;
//!     println!("{}", image.path.display());
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::option_if_let_else)]
#![allow(clippy::unused_self)]

pub mod api;
pub mod config;
pub mod display;
pub mod error;
pub mod images;
pub mod models;
pub mod paths;
pub mod system;

// Re-export main types for convenience
pub use config::{Config, Environment, ImageSize};
pub use error::{CacheError, RemoteError, ResolveError, StorageError};
pub use images::{CacheStore, ImageResolver, ImageStore};
pub use models::{CatalogEntry, EntryKind, ImageSource, ResolvedImage};
pub use system::SystemInfo;

/// ASCII logo for the application
pub const LOGO: &str = r"
                _  __      _       _
   __ _ _ __   (_)/ _| ___| |_ ___| |__
  / _` | '_ \  | | |_ / _ \ __/ __| '_ \
 | (_| | | | | | |  _|  __/ || (__| | | |
  \__,_|_| |_| |_|_|  \___|\__\___|_| |_|
";

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Repository the images come from
pub const IMAGE_REPO_URL: &str = "https://github.com/cat-milk/Anime-Girls-Holding-Programming-Books";
