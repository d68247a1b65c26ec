//! Image acquisition and caching.
//!
//! [`CacheStore`] owns the directory of downloaded images and
//! [`ImageResolver`] picks a random image from the remote catalog, falling
//! back to the cache when the remote cannot be used.

mod cache;
mod resolver;

pub use cache::{CacheStore, ImageStore};
pub use resolver::ImageResolver;
