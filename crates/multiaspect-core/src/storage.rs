//! Byte retrieval for the bucket assigner.
//!
//! The assigner never opens files itself; it asks a [`Storage`] for the raw
//! bytes addressed by a path string. [`FsStorage`] reads below a root
//! directory, [`MemoryStorage`] serves from a map.

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::config::LimitsConfig;
use crate::error::StorageError;

/// Synchronous source of raw image bytes.
pub trait Storage {
    /// Return the full content addressed by `path`.
    fn read(&self, path: &str) -> Result<Vec<u8>, StorageError>;
}

impl<T: Storage + ?Sized> Storage for &T {
    fn read(&self, path: &str) -> Result<Vec<u8>, StorageError> {
        (**self).read(path)
    }
}

impl<T: Storage + ?Sized> Storage for Box<T> {
    fn read(&self, path: &str) -> Result<Vec<u8>, StorageError> {
        (**self).read(path)
    }
}

/// Reads files relative to a root directory.
#[derive(Debug, Clone)]
pub struct FsStorage {
    root: PathBuf,
    max_file_size_mb: u64,
}

impl FsStorage {
    /// Create a storage rooted at `root` with the given limits.
    pub fn new(root: impl Into<PathBuf>, limits: &LimitsConfig) -> Self {
        Self {
            root: root.into(),
            max_file_size_mb: limits.max_file_size_mb,
        }
    }

    /// Root directory all paths are resolved against.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, path: &str) -> PathBuf {
        self.root.join(path)
    }
}

impl Storage for FsStorage {
    fn read(&self, path: &str) -> Result<Vec<u8>, StorageError> {
        let full = self.resolve(path);
        let metadata = std::fs::metadata(&full).map_err(|e| match e.kind() {
            ErrorKind::NotFound => StorageError::NotFound(path.to_string()),
            _ => StorageError::Io {
                path: full.clone(),
                source: e,
            },
        })?;

        let max_bytes = self.max_file_size_mb * 1024 * 1024;
        if metadata.len() > max_bytes {
            return Err(StorageError::TooLarge {
                path: path.to_string(),
                size_mb: metadata.len() / (1024 * 1024),
                max_mb: self.max_file_size_mb,
            });
        }

        std::fs::read(&full).map_err(|e| StorageError::Io {
            path: full,
            source: e,
        })
    }
}

/// In-memory storage keyed by path string.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: HashMap<String, Vec<u8>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `bytes` under `path`, replacing any previous content.
    pub fn insert(&mut self, path: impl Into<String>, bytes: impl Into<Vec<u8>>) {
        self.entries.insert(path.into(), bytes.into());
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Storage for MemoryStorage {
    fn read(&self, path: &str) -> Result<Vec<u8>, StorageError> {
        self.entries
            .get(path)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(path.to_string()))
    }
}
