//! Filesystem storage backend.
//!
//! Discovery is split in two phases, like a scanner followed by a loader:
//! 1. Walk the vault and collect relative paths of `.md` files
//! 2. Read all collected files in parallel
//!
//! Hidden entries (dot-prefixed) are never visited. Paths containing any of
//! the configured exclude patterns are skipped.

use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::storage::{SourceFile, Storage, StorageError};

/// Backend identifier for error messages.
const BACKEND: &str = "Fs";

/// Path fragments excluded from scanning by default.
pub const DEFAULT_EXCLUDES: &[&str] = &[".obsidian", "templates", "Archive", ".trash"];

/// Filesystem-backed note vault.
///
/// # Example
///
/// ```no_run
/// use std::path::PathBuf;
/// use folio_storage::{FsStorage, Storage};
///
/// let storage = FsStorage::new(PathBuf::from("vault"))
///     .with_excludes(vec!["drafts".to_owned()]);
/// let files = storage.scan()?;
/// # Ok::<(), folio_storage::StorageError>(())
/// ```
#[derive(Debug)]
pub struct FsStorage {
    /// Root directory of the vault.
    source_dir: PathBuf,
    /// Substrings that exclude a relative path from scanning.
    excludes: Vec<String>,
}

impl FsStorage {
    /// Create a new filesystem storage with the default exclude patterns.
    #[must_use]
    pub fn new(source_dir: PathBuf) -> Self {
        Self {
            source_dir,
            excludes: DEFAULT_EXCLUDES.iter().map(|&s| s.to_owned()).collect(),
        }
    }

    /// Replace the exclude patterns.
    #[must_use]
    pub fn with_excludes(mut self, excludes: Vec<String>) -> Self {
        self.excludes = excludes;
        self
    }

    /// Vault root directory.
    #[must_use]
    pub fn source_dir(&self) -> &Path {
        &self.source_dir
    }

    fn is_excluded(&self, rel_path: &Path) -> bool {
        let path_str = rel_path.to_string_lossy();
        self.excludes
            .iter()
            .any(|pattern| !pattern.is_empty() && path_str.contains(pattern.as_str()))
    }

    /// Recursively collect relative paths of markdown files under `dir`.
    fn collect(&self, dir: &Path, rel_dir: &Path, out: &mut Vec<PathBuf>) -> Result<(), StorageError> {
        let entries = fs::read_dir(dir)
            .map_err(|e| StorageError::io(e, Some(dir.to_path_buf())).with_backend(BACKEND))?;

        for entry in entries.filter_map(Result::ok) {
            let name = entry.file_name();
            if name.to_string_lossy().starts_with('.') {
                continue;
            }

            let rel_path = rel_dir.join(&name);
            if self.is_excluded(&rel_path) {
                continue;
            }

            let is_dir = entry.file_type().is_ok_and(|t| t.is_dir());
            if is_dir {
                // Unreadable subdirectories are skipped, only the root is fatal
                if let Err(e) = self.collect(&entry.path(), &rel_path, out) {
                    tracing::warn!(path = %rel_path.display(), error = %e, "Skipping unreadable directory");
                }
            } else if rel_path.extension().is_some_and(|e| e == "md") {
                out.push(rel_path);
            }
        }

        Ok(())
    }

    fn read_file(&self, rel_path: PathBuf) -> Option<SourceFile> {
        match fs::read_to_string(self.source_dir.join(&rel_path)) {
            Ok(content) => Some(SourceFile {
                path: rel_path,
                content,
            }),
            Err(e) => {
                tracing::warn!(path = %rel_path.display(), error = %e, "Skipping unreadable note");
                None
            }
        }
    }
}

impl Storage for FsStorage {
    fn scan(&self) -> Result<Vec<SourceFile>, StorageError> {
        if !self.source_dir.exists() {
            tracing::warn!(path = %self.source_dir.display(), "Vault directory does not exist");
            return Ok(Vec::new());
        }

        let mut paths = Vec::new();
        self.collect(&self.source_dir, Path::new(""), &mut paths)?;
        paths.sort();
        tracing::debug!(count = paths.len(), "Discovered markdown files");

        // par_iter + collect keeps the sorted order
        let files = paths
            .into_par_iter()
            .filter_map(|p| self.read_file(p))
            .collect();

        Ok(files)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn test_fs_storage_is_send_sync() {
        assert_send_sync::<FsStorage>();
    }

    fn create_test_dir() -> tempfile::TempDir {
        tempfile::tempdir().unwrap()
    }

    fn scanned_paths(storage: &FsStorage) -> Vec<String> {
        storage
            .scan()
            .unwrap()
            .into_iter()
            .map(|f| f.path.to_string_lossy().replace('\\', "/"))
            .collect()
    }

    #[test]
    fn test_scan_missing_dir_returns_empty() {
        let storage = FsStorage::new(PathBuf::from("/nonexistent/vault"));

        let files = storage.scan().unwrap();

        assert!(files.is_empty());
    }

    #[test]
    fn test_scan_empty_dir() {
        let temp_dir = create_test_dir();

        let storage = FsStorage::new(temp_dir.path().to_path_buf());

        assert!(storage.scan().unwrap().is_empty());
    }

    #[test]
    fn test_scan_nested_structure_sorted() {
        let temp_dir = create_test_dir();
        let book_dir = temp_dir.path().join("Spiritual").join("A New Earth");
        fs::create_dir_all(&book_dir).unwrap();
        fs::write(book_dir.join("Presence.md"), "Presence body").unwrap();
        fs::write(book_dir.join("Ego.md"), "Ego body").unwrap();
        fs::write(temp_dir.path().join("Inbox.md"), "Inbox").unwrap();

        let storage = FsStorage::new(temp_dir.path().to_path_buf());

        assert_eq!(
            scanned_paths(&storage),
            vec![
                "Inbox.md".to_owned(),
                "Spiritual/A New Earth/Ego.md".to_owned(),
                "Spiritual/A New Earth/Presence.md".to_owned(),
            ]
        );
    }

    #[test]
    fn test_scan_reads_content() {
        let temp_dir = create_test_dir();
        fs::write(temp_dir.path().join("note.md"), "# Heading\n\n[[Link]]").unwrap();

        let storage = FsStorage::new(temp_dir.path().to_path_buf());
        let files = storage.scan().unwrap();

        assert_eq!(files.len(), 1);
        assert_eq!(files[0].content, "# Heading\n\n[[Link]]");
    }

    #[test]
    fn test_scan_skips_non_markdown() {
        let temp_dir = create_test_dir();
        fs::write(temp_dir.path().join("image.png"), "binary").unwrap();
        fs::write(temp_dir.path().join("note.md"), "text").unwrap();

        let storage = FsStorage::new(temp_dir.path().to_path_buf());

        assert_eq!(scanned_paths(&storage), vec!["note.md".to_owned()]);
    }

    #[test]
    fn test_scan_skips_hidden_entries() {
        let temp_dir = create_test_dir();
        let hidden = temp_dir.path().join(".git");
        fs::create_dir(&hidden).unwrap();
        fs::write(hidden.join("notes.md"), "hidden").unwrap();
        fs::write(temp_dir.path().join(".draft.md"), "hidden").unwrap();
        fs::write(temp_dir.path().join("visible.md"), "visible").unwrap();

        let storage = FsStorage::new(temp_dir.path().to_path_buf()).with_excludes(Vec::new());

        assert_eq!(scanned_paths(&storage), vec!["visible.md".to_owned()]);
    }

    #[test]
    fn test_scan_applies_default_excludes() {
        let temp_dir = create_test_dir();
        let templates = temp_dir.path().join("templates");
        let archive = temp_dir.path().join("Self-Help").join("Archive");
        fs::create_dir_all(&templates).unwrap();
        fs::create_dir_all(&archive).unwrap();
        fs::write(templates.join("Daily.md"), "template").unwrap();
        fs::write(archive.join("Old.md"), "old").unwrap();
        fs::write(temp_dir.path().join("Self-Help").join("Habits.md"), "habits").unwrap();

        let storage = FsStorage::new(temp_dir.path().to_path_buf());

        assert_eq!(scanned_paths(&storage), vec!["Self-Help/Habits.md".to_owned()]);
    }

    #[test]
    fn test_scan_custom_excludes() {
        let temp_dir = create_test_dir();
        let drafts = temp_dir.path().join("drafts");
        fs::create_dir(&drafts).unwrap();
        fs::write(drafts.join("wip.md"), "wip").unwrap();
        fs::write(temp_dir.path().join("done.md"), "done").unwrap();

        let storage =
            FsStorage::new(temp_dir.path().to_path_buf()).with_excludes(vec!["drafts".to_owned()]);

        assert_eq!(scanned_paths(&storage), vec!["done.md".to_owned()]);
    }

    #[test]
    fn test_is_excluded_ignores_empty_pattern() {
        let storage = FsStorage::new(PathBuf::from("vault")).with_excludes(vec![String::new()]);

        assert!(!storage.is_excluded(Path::new("note.md")));
    }
}
