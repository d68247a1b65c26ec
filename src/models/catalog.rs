//! Remote catalog entries

/// File extensions treated as displayable images (case-sensitive)
pub const IMAGE_EXTENSIONS: &[&str] = &[".png", ".jpg", ".jpeg"];

/// Whether a file name carries one of the recognized image extensions
pub fn is_image_name(name: &str) -> bool {
    IMAGE_EXTENSIONS.iter().any(|ext| name.ends_with(ext))
}

/// Kind of a remote listing entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EntryKind {
    /// A plain file (or anything that is not a directory)
    #[default]
    File,
    /// A directory, i.e. a selectable category
    Directory,
}

impl EntryKind {
    /// Map the GitHub contents `type` field onto an entry kind
    pub fn from_type(kind: &str) -> Self {
        match kind {
            "dir" => Self::Directory,
            _ => Self::File,
        }
    }
}

/// One item of a remote directory listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    /// Base name (`Rust`, `ferris_reading.png`)
    pub name: String,
    /// Path relative to the repository root
    pub path: String,
    /// File or directory
    pub kind: EntryKind,
    /// Raw content URL (files only)
    pub download_url: Option<String>,
}

impl CatalogEntry {
    /// Create a category (directory) entry
    pub fn directory(name: &str) -> Self {
        Self {
            name: name.to_string(),
            path: name.to_string(),
            kind: EntryKind::Directory,
            download_url: None,
        }
    }

    /// Create a file entry with a download URL
    pub fn file(name: &str, download_url: &str) -> Self {
        Self {
            name: name.to_string(),
            path: name.to_string(),
            kind: EntryKind::File,
            download_url: Some(download_url.to_string()),
        }
    }

    /// Whether this entry is a selectable category
    pub fn is_directory(&self) -> bool {
        self.kind == EntryKind::Directory
    }

    /// Whether the entry name ends in a recognized image extension
    pub fn is_image(&self) -> bool {
        is_image_name(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_extensions_are_case_sensitive() {
        assert!(is_image_name("a.png"));
        assert!(is_image_name("b.jpg"));
        assert!(is_image_name("c.jpeg"));
        assert!(!is_image_name("d.PNG"));
        assert!(!is_image_name("e.gif"));
        assert!(!is_image_name("png"));
    }

    #[test]
    fn test_entry_kind_from_type() {
        assert_eq!(EntryKind::from_type("dir"), EntryKind::Directory);
        assert_eq!(EntryKind::from_type("file"), EntryKind::File);
        assert_eq!(EntryKind::from_type("symlink"), EntryKind::File);
    }
}
