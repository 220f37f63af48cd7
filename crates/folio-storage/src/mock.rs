//! Mock storage implementation for testing.
//!
//! Provides [`MockStorage`] for unit testing without filesystem access.

use std::path::PathBuf;
use std::sync::RwLock;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::storage::{SourceFile, Storage, StorageError, StorageErrorKind};

/// Mock storage for testing.
///
/// Stores files in memory. Use the builder methods to configure the mock
/// with test data.
///
/// # Example
///
/// ```
/// use folio_storage::{MockStorage, Storage};
///
/// let storage = MockStorage::new()
///     .with_file("Spiritual/A New Earth/Notes - Overview.md", "[[Presence]] [[Ego]]");
///
/// let files = storage.scan().unwrap();
/// assert_eq!(files.len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct MockStorage {
    files: RwLock<Vec<SourceFile>>,
    fail: RwLock<bool>,
    scans: AtomicUsize,
}

impl MockStorage {
    /// Create a new empty mock storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file with the given relative path and content.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_file(self, path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        self.add_file(path, content);
        self
    }

    /// Add a file after construction (e.g., to simulate vault edits).
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn add_file(&self, path: impl Into<PathBuf>, content: impl Into<String>) {
        self.files
            .write()
            .unwrap()
            .push(SourceFile::new(path, content));
    }

    /// Make subsequent scans fail (or succeed again).
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn set_failing(&self, fail: bool) {
        *self.fail.write().unwrap() = fail;
    }

    /// Number of `scan()` calls so far.
    #[must_use]
    pub fn scan_count(&self) -> usize {
        self.scans.load(Ordering::SeqCst)
    }
}

impl Storage for MockStorage {
    fn scan(&self) -> Result<Vec<SourceFile>, StorageError> {
        self.scans.fetch_add(1, Ordering::SeqCst);
        if *self.fail.read().unwrap() {
            return Err(StorageError::new(StorageErrorKind::Other).with_backend("Mock"));
        }
        Ok(self.files.read().unwrap().clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_scan_returns_files_in_insertion_order() {
        let storage = MockStorage::new()
            .with_file("b.md", "B")
            .with_file("a.md", "A");

        let files = storage.scan().unwrap();

        assert_eq!(files.len(), 2);
        assert_eq!(files[0].path, PathBuf::from("b.md"));
        assert_eq!(files[1].content, "A");
    }

    #[test]
    fn test_mock_add_file_after_construction() {
        let storage = MockStorage::new();
        storage.add_file("late.md", "late");

        assert_eq!(storage.scan().unwrap().len(), 1);
    }

    #[test]
    fn test_mock_failing_scan() {
        let storage = MockStorage::new().with_file("a.md", "A");
        storage.set_failing(true);

        let err = storage.scan().unwrap_err();

        assert_eq!(err.kind(), &StorageErrorKind::Other);
        assert_eq!(err.to_string(), "[Mock] Error");
    }

    #[test]
    fn test_mock_counts_scans() {
        let storage = MockStorage::new();
        let _ = storage.scan();
        let _ = storage.scan();

        assert_eq!(storage.scan_count(), 2);
    }
}
