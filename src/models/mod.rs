//! Data models for anifetch

mod catalog;
mod image;

pub use catalog::{CatalogEntry, EntryKind, is_image_name};
pub use image::{ImageSource, ResolvedImage};
