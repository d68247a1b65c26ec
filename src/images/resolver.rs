//! Picks a random image from the remote catalog, falling back to the cache.

use rand::seq::IndexedRandom;

use crate::api::Catalog;
use crate::error::{CacheError, RemoteError, ResolveError};
use crate::models::{CatalogEntry, ResolvedImage};

use super::ImageStore;

/// Resolves one image per call.
///
/// Remote failures while choosing a category or listing its images fall
/// back to a random cached image. Once an image has been picked, download
/// and storage failures are returned as they are.
pub struct ImageResolver<C, S> {
    catalog: C,
    store: S,
}

impl<C: Catalog, S: ImageStore> ImageResolver<C, S> {
    /// Create a resolver over a catalog and an image store
    pub const fn new(catalog: C, store: S) -> Self {
        Self { catalog, store }
    }

    /// The underlying image store
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Resolve an image to display.
    pub fn resolve(&self) -> Result<ResolvedImage, ResolveError> {
        let categories = match self.catalog.list_categories() {
            Ok(categories) => categories,
            Err(e) => return self.fallback(&e),
        };

        let Some(category) = categories.choose(&mut rand::rng()) else {
            return Err(ResolveError::NoCategories);
        };
        tracing::debug!("Picked category {}", category.name);

        let images = match self.catalog.list_images(category) {
            Ok(images) => images,
            Err(e) => return self.fallback(&e),
        };

        let Some(image) = images.choose(&mut rand::rng()) else {
            tracing::warn!("No images in category {}, using cache", category.name);
            return self
                .store
                .pick_random_cached()
                .map(ResolvedImage::cached)
                .map_err(|_| ResolveError::NoImages {
                    category: category.name.clone(),
                });
        };
        tracing::debug!("Picked image {}", image.name);

        self.fetch(category, image)
    }

    /// Download `image` into the store
    fn fetch(
        &self,
        category: &CatalogEntry,
        image: &CatalogEntry,
    ) -> Result<ResolvedImage, ResolveError> {
        let download_error = |source| ResolveError::Download {
            name: image.name.clone(),
            source,
        };

        let locator = image.download_url.as_deref().ok_or_else(|| {
            download_error(RemoteError::Malformed(format!(
                "{} has no download_url",
                image.path
            )))
        })?;

        let bytes = self.catalog.download(locator).map_err(download_error)?;
        let path = self.store.store(&image.name, &mut bytes.as_slice())?;

        tracing::info!("Downloaded {} from {}", image.name, category.name);
        Ok(ResolvedImage::downloaded(path, &category.name))
    }

    /// Substitute a cached image for a failed remote step
    fn fallback(&self, cause: &RemoteError) -> Result<ResolvedImage, ResolveError> {
        tracing::warn!("Remote catalog unavailable ({cause}), using cache");

        match self.store.pick_random_cached() {
            Ok(path) => Ok(ResolvedImage::cached(path)),
            Err(CacheError::Empty) => Err(ResolveError::Unavailable),
            Err(CacheError::Storage(e)) => {
                tracing::warn!("Cache unreadable: {e}");
                Err(ResolveError::Unavailable)
            }
        }
    }
}
