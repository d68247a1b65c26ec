//! On-disk cache of downloaded images.

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use rand::seq::IndexedRandom;

use crate::error::{CacheError, StorageError};
use crate::models::is_image_name;

/// Storage used by the resolver for cached images.
pub trait ImageStore {
    /// List every cached image file.
    fn list_cached(&self) -> Result<Vec<PathBuf>, StorageError>;

    /// Pick one cached image uniformly at random.
    fn pick_random_cached(&self) -> Result<PathBuf, CacheError>;

    /// Write `reader` to `<cache>/<name>`, replacing any existing file.
    fn store(&self, name: &str, reader: &mut dyn Read) -> Result<PathBuf, StorageError>;
}

/// Flat directory of previously downloaded images.
///
/// There is no eviction, size bound or integrity check: any file in the
/// directory with a `.png`, `.jpg` or `.jpeg` name is a valid candidate.
#[derive(Debug, Clone)]
pub struct CacheStore {
    dir: PathBuf,
}

impl CacheStore {
    /// Create a store rooted at `dir`. Nothing is touched on disk.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The cache directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Create the cache directory (and its parents) if missing.
    pub fn ensure_ready(&self) -> Result<(), StorageError> {
        fs::create_dir_all(&self.dir).map_err(|source| StorageError::Create {
            path: self.dir.clone(),
            source,
        })
    }

    /// Remove the cache directory and everything in it.
    ///
    /// A missing directory is not an error. The next [`ensure_ready`]
    /// recreates it.
    ///
    /// [`ensure_ready`]: CacheStore::ensure_ready
    pub fn clear(&self) -> Result<(), StorageError> {
        match fs::remove_dir_all(&self.dir) {
            Ok(()) => {
                tracing::debug!("Cleared cache directory {}", self.dir.display());
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StorageError::Remove {
                path: self.dir.clone(),
                source,
            }),
        }
    }

    fn read_error(&self, source: io::Error) -> StorageError {
        StorageError::Read {
            path: self.dir.clone(),
            source,
        }
    }
}

impl ImageStore for CacheStore {
    fn list_cached(&self) -> Result<Vec<PathBuf>, StorageError> {
        let entries = fs::read_dir(&self.dir).map_err(|e| self.read_error(e))?;

        let mut images = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| self.read_error(e))?;
            let file_type = entry.file_type().map_err(|e| self.read_error(e))?;
            if file_type.is_dir() {
                continue;
            }

            let name = entry.file_name();
            if name.to_str().is_some_and(is_image_name) {
                images.push(entry.path());
            }
        }

        Ok(images)
    }

    fn pick_random_cached(&self) -> Result<PathBuf, CacheError> {
        let images = self.list_cached()?;
        images
            .choose(&mut rand::rng())
            .cloned()
            .ok_or(CacheError::Empty)
    }

    fn store(&self, name: &str, reader: &mut dyn Read) -> Result<PathBuf, StorageError> {
        if !is_plain_file_name(name) {
            return Err(StorageError::InvalidName(name.to_string()));
        }

        let path = self.dir.join(name);
        let partial = self.dir.join(format!(".{name}.part"));
        let write_error = |source| StorageError::Write {
            path: path.clone(),
            source,
        };

        let written = match write_partial(&partial, reader) {
            Ok(written) => written,
            Err(e) => {
                let _ = fs::remove_file(&partial);
                return Err(write_error(e));
            }
        };
        if let Err(e) = fs::rename(&partial, &path) {
            let _ = fs::remove_file(&partial);
            return Err(write_error(e));
        }

        tracing::debug!("Stored {written} bytes at {}", path.display());
        Ok(path)
    }
}

/// Copy `reader` into a fresh file at `path`, flushed to disk
fn write_partial(path: &Path, reader: &mut dyn Read) -> io::Result<u64> {
    let mut file = fs::File::create(path)?;
    let written = io::copy(reader, &mut file)?;
    file.sync_all()?;
    Ok(written)
}

/// A name that stays inside the cache directory when joined onto it
fn is_plain_file_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\'])
        && Path::new(name).file_name().is_some_and(|n| n == name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::tempdir;

    fn touch(dir: &Path, name: &str) {
        fs::write(dir.join(name), b"img").unwrap();
    }

    #[test]
    fn test_ensure_ready_is_idempotent() {
        let dir = tempdir().unwrap();
        let store = CacheStore::new(dir.path().join("nested").join("cache"));

        store.ensure_ready().unwrap();
        store.ensure_ready().unwrap();
        assert!(store.dir().is_dir());
    }

    #[test]
    fn test_ensure_ready_fails_on_file_collision() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cache");
        fs::write(&path, b"not a directory").unwrap();

        let store = CacheStore::new(&path);
        assert!(matches!(
            store.ensure_ready(),
            Err(StorageError::Create { .. })
        ));
    }

    #[test]
    fn test_list_cached_filters_extensions_and_directories() {
        let dir = tempdir().unwrap();
        let store = CacheStore::new(dir.path());
        touch(dir.path(), "a.png");
        touch(dir.path(), "b.jpg");
        touch(dir.path(), "c.jpeg");
        touch(dir.path(), "d.PNG");
        touch(dir.path(), "notes.txt");
        fs::create_dir(dir.path().join("folder.png")).unwrap();

        let mut names: Vec<String> = store
            .list_cached()
            .unwrap()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        names.sort();

        assert_eq!(names, vec!["a.png", "b.jpg", "c.jpeg"]);
    }

    #[test]
    fn test_list_cached_empty_and_missing() {
        let dir = tempdir().unwrap();
        let store = CacheStore::new(dir.path());
        assert!(store.list_cached().unwrap().is_empty());

        let missing = CacheStore::new(dir.path().join("gone"));
        assert!(matches!(
            missing.list_cached(),
            Err(StorageError::Read { .. })
        ));
    }

    #[test]
    fn test_pick_random_cached_empty() {
        let dir = tempdir().unwrap();
        let store = CacheStore::new(dir.path());
        assert!(matches!(store.pick_random_cached(), Err(CacheError::Empty)));
    }

    #[test]
    fn test_pick_random_cached_is_roughly_uniform() {
        let dir = tempdir().unwrap();
        let store = CacheStore::new(dir.path());
        for name in ["a.png", "b.png", "c.jpg", "d.jpeg"] {
            touch(dir.path(), name);
        }

        let mut counts: HashMap<PathBuf, usize> = HashMap::new();
        for _ in 0..4000 {
            *counts.entry(store.pick_random_cached().unwrap()).or_default() += 1;
        }

        assert_eq!(counts.len(), 4);
        for (path, count) in counts {
            assert!(
                (700..=1300).contains(&count),
                "{} picked {count} times",
                path.display()
            );
        }
    }

    #[test]
    fn test_clear_then_ensure_ready() {
        let dir = tempdir().unwrap();
        let store = CacheStore::new(dir.path().join("cache"));
        store.ensure_ready().unwrap();
        touch(store.dir(), "a.png");

        store.clear().unwrap();
        assert!(!store.dir().exists());

        // Clearing a missing directory succeeds
        store.clear().unwrap();

        store.ensure_ready().unwrap();
        assert!(store.dir().is_dir());
        assert_eq!(fs::read_dir(store.dir()).unwrap().count(), 0);
    }

    #[test]
    fn test_store_then_list() {
        let dir = tempdir().unwrap();
        let store = CacheStore::new(dir.path());

        let path = store.store("a.png", &mut &b"first"[..]).unwrap();
        assert_eq!(path, dir.path().join("a.png"));

        // Overwrites unconditionally
        let again = store.store("a.png", &mut &b"second"[..]).unwrap();
        assert_eq!(again, path);
        assert_eq!(fs::read(&path).unwrap(), b"second");

        let listed = store.list_cached().unwrap();
        assert_eq!(listed.iter().filter(|p| **p == path).count(), 1);
    }

    #[test]
    fn test_store_rejects_path_names() {
        let dir = tempdir().unwrap();
        let store = CacheStore::new(dir.path());

        for name in ["", ".", "..", "../evil.png", "sub/a.png"] {
            assert!(
                matches!(
                    store.store(name, &mut &b"x"[..]),
                    Err(StorageError::InvalidName(_))
                ),
                "accepted {name:?}"
            );
        }
    }

    #[test]
    fn test_failed_store_leaves_nothing_behind() {
        struct Interrupted {
            sent: bool,
        }

        impl Read for Interrupted {
            fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
                if self.sent {
                    return Err(io::Error::new(io::ErrorKind::ConnectionReset, "reset"));
                }
                self.sent = true;
                buf[..4].copy_from_slice(b"\x89PNG");
                Ok(4)
            }
        }

        let dir = tempdir().unwrap();
        let store = CacheStore::new(dir.path());

        let result = store.store("half.png", &mut Interrupted { sent: false });
        assert!(matches!(result, Err(StorageError::Write { .. })));

        assert!(store.list_cached().unwrap().is_empty());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
        assert!(matches!(store.pick_random_cached(), Err(CacheError::Empty)));
    }
}
