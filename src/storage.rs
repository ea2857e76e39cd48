//! File storage for uploaded documents.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use uuid::Uuid;

use crate::domain::types::{StorageKey, TypeConstraintError};

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage io error: {0}")]
    Io(#[from] io::Error),

    #[error("invalid storage key: {0}")]
    Key(#[from] TypeConstraintError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    pub key: StorageKey,
    pub size_bytes: i64,
}

#[cfg_attr(any(test, feature = "test-mocks"), mockall::automock)]
pub trait FileStorage: Send + Sync {
    /// Copies the file at `source` into storage under a fresh key.
    fn store(&self, original_name: &str, source: &Path) -> Result<StoredFile, StorageError>;
    fn remove(&self, key: &StorageKey) -> Result<(), StorageError>;
    fn public_url(&self, key: &StorageKey) -> String;
    /// Where the stored bytes live on disk.
    fn local_path(&self, key: &StorageKey) -> PathBuf;
}

/// Stores files in a local directory; URLs are built under `url_prefix`.
pub struct LocalFileStorage {
    root: PathBuf,
    url_prefix: String,
}

impl LocalFileStorage {
    pub fn new(root: impl Into<PathBuf>, url_prefix: impl Into<String>) -> io::Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self {
            root,
            url_prefix: url_prefix.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

/// Lower-cased extension of `name` if it is short and alphanumeric.
fn safe_extension(name: &str) -> Option<String> {
    let ext = Path::new(name).extension()?.to_str()?.to_lowercase();
    if !ext.is_empty() && ext.len() <= 10 && ext.chars().all(|c| c.is_ascii_alphanumeric()) {
        Some(ext)
    } else {
        None
    }
}

impl FileStorage for LocalFileStorage {
    fn store(&self, original_name: &str, source: &Path) -> Result<StoredFile, StorageError> {
        let id = Uuid::new_v4().simple().to_string();
        let key = match safe_extension(original_name) {
            Some(ext) => StorageKey::new(format!("{id}.{ext}"))?,
            None => StorageKey::new(id)?,
        };

        let copied = fs::copy(source, self.root.join(key.as_str()))?;

        Ok(StoredFile {
            key,
            size_bytes: copied as i64,
        })
    }

    fn remove(&self, key: &StorageKey) -> Result<(), StorageError> {
        match fs::remove_file(self.root.join(key.as_str())) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }

    fn public_url(&self, key: &StorageKey) -> String {
        format!("{}/{}", self.url_prefix, key)
    }

    fn local_path(&self, key: &StorageKey) -> PathBuf {
        self.root.join(key.as_str())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn store_copies_file_and_keeps_extension() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalFileStorage::new(dir.path().join("uploads"), "/uploads/").unwrap();

        let mut source = tempfile::NamedTempFile::new().unwrap();
        source.write_all(b"hello world").unwrap();

        let stored = storage.store("Report.PDF", source.path()).unwrap();

        assert!(stored.key.as_str().ends_with(".pdf"));
        assert_eq!(stored.size_bytes, 11);
        assert!(storage.local_path(&stored.key).exists());
        assert_eq!(
            storage.public_url(&stored.key),
            format!("/uploads/{}", stored.key)
        );

        storage.remove(&stored.key).unwrap();
        assert!(!storage.root().join(stored.key.as_str()).exists());
        storage.remove(&stored.key).unwrap();
    }

    #[test]
    fn odd_extensions_are_dropped() {
        assert_eq!(safe_extension("archive.tar.gz"), Some("gz".into()));
        assert_eq!(safe_extension("noext"), None);
        assert_eq!(safe_extension("evil.p/hp"), None);
        assert_eq!(safe_extension("x.verylongextension"), None);
    }
}
