//! Filesystem media store
//!
//! Stores uploaded blobs under a root directory, namespaced per use. The
//! store hands back relative paths suitable for persisting in a database
//! column; callers resolve them back through the same store.

use crate::{Error, Result};
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Blob storage rooted at a media directory
#[derive(Debug, Clone)]
pub struct MediaStore {
    root: PathBuf,
}

impl MediaStore {
    /// Create a store over an existing root directory
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Open a store, creating the root directory if needed
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        std::fs::create_dir_all(&root)
            .map_err(|e| Error::Media(format!("Failed to create media root {}: {}", root.display(), e)))?;
        Ok(Self { root })
    }

    /// The root directory of the store
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Store a blob under the given namespace and return its relative path.
    ///
    /// The stored name is a fresh uuid carrying the extension of the original
    /// file name. Contents are opaque; no inspection or validation happens
    /// here.
    pub fn put(&self, namespace: &str, file_name: &str, bytes: &[u8]) -> Result<String> {
        let dir = self.root.join(namespace);
        std::fs::create_dir_all(&dir)
            .map_err(|e| Error::Media(format!("Failed to create {}: {}", dir.display(), e)))?;

        let stored_name = match Path::new(file_name).extension().and_then(|e| e.to_str()) {
            Some(ext) => format!("{}.{}", Uuid::new_v4(), ext),
            None => Uuid::new_v4().to_string(),
        };

        let relative = format!("{}/{}", namespace, stored_name);
        let path = self.root.join(&relative);
        std::fs::write(&path, bytes)
            .map_err(|e| Error::Media(format!("Failed to write {}: {}", path.display(), e)))?;

        tracing::debug!(path = %relative, size_bytes = bytes.len(), "Stored media blob");
        Ok(relative)
    }

    /// Delete a stored blob; a missing file is not an error
    pub fn delete(&self, relative: &str) -> Result<()> {
        let path = self.root.join(relative);
        match std::fs::remove_file(&path) {
            Ok(()) => {
                tracing::debug!(path = %relative, "Deleted media blob");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Error::Media(format!(
                "Failed to delete {}: {}",
                path.display(),
                e
            ))),
        }
    }

    /// Resolve a relative path to its absolute location on disk
    pub fn resolve(&self, relative: &str) -> PathBuf {
        self.root.join(relative)
    }

    /// Check whether a stored blob exists
    pub fn exists(&self, relative: &str) -> bool {
        self.root.join(relative).exists()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_put_and_resolve_roundtrip() {
        let temp = TempDir::new().unwrap();
        let store = MediaStore::open(temp.path()).unwrap();

        let relative = store.put("covers", "photo.png", b"png-bytes").unwrap();
        assert!(relative.starts_with("covers/"));
        assert!(relative.ends_with(".png"));

        let bytes = std::fs::read(store.resolve(&relative)).unwrap();
        assert_eq!(bytes, b"png-bytes");
    }

    #[test]
    fn test_put_without_extension() {
        let temp = TempDir::new().unwrap();
        let store = MediaStore::open(temp.path()).unwrap();

        let relative = store.put("covers", "upload", b"data").unwrap();
        assert!(!relative.contains('.'), "No extension to carry: {}", relative);
        assert!(store.exists(&relative));
    }

    #[test]
    fn test_delete_is_noop_when_absent() {
        let temp = TempDir::new().unwrap();
        let store = MediaStore::open(temp.path()).unwrap();

        store.delete("covers/never-stored.png").unwrap();
    }

    #[test]
    fn test_delete_removes_blob() {
        let temp = TempDir::new().unwrap();
        let store = MediaStore::open(temp.path()).unwrap();

        let relative = store.put("covers", "photo.jpg", b"jpg").unwrap();
        assert!(store.exists(&relative));

        store.delete(&relative).unwrap();
        assert!(!store.exists(&relative));
    }

    #[test]
    fn test_stored_names_are_unique() {
        let temp = TempDir::new().unwrap();
        let store = MediaStore::open(temp.path()).unwrap();

        let a = store.put("covers", "same.png", b"a").unwrap();
        let b = store.put("covers", "same.png", b"b").unwrap();
        assert_ne!(a, b);
        assert_eq!(std::fs::read(store.resolve(&a)).unwrap(), b"a");
        assert_eq!(std::fs::read(store.resolve(&b)).unwrap(), b"b");
    }
}
