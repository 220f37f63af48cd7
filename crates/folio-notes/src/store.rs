//! In-memory document store.

use std::collections::HashMap;
use std::sync::Arc;

use folio_storage::{SourceFile, Storage, StorageError};

use crate::ingest::ingest;
use crate::note::Note;

/// Immutable collection of notes with id lookup.
///
/// Notes keep the order they were ingested in; ties throughout the link
/// graph code are broken by this order.
#[derive(Debug, Default)]
pub struct NoteStore {
    notes: Vec<Arc<Note>>,
    by_id: HashMap<String, usize>,
}

impl NoteStore {
    /// Create a store from already parsed notes.
    ///
    /// When ids collide the first note keeps the id lookup.
    #[must_use]
    pub fn new(notes: Vec<Note>) -> Self {
        let notes: Vec<Arc<Note>> = notes.into_iter().map(Arc::new).collect();
        let mut by_id = HashMap::with_capacity(notes.len());
        for (i, note) in notes.iter().enumerate() {
            by_id.entry(note.id.clone()).or_insert(i);
        }
        Self { notes, by_id }
    }

    /// Parse source files into a store.
    #[must_use]
    pub fn from_files(files: &[SourceFile]) -> Self {
        Self::new(ingest(files))
    }

    /// Scan storage and parse everything found.
    ///
    /// # Errors
    ///
    /// Returns the storage error if the scan fails.
    pub fn load(storage: &dyn Storage) -> Result<Self, StorageError> {
        let files = storage.scan()?;
        Ok(Self::from_files(&files))
    }

    /// All notes in ingestion order.
    #[must_use]
    pub fn notes(&self) -> &[Arc<Note>] {
        &self.notes
    }

    /// Look up a note by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Arc<Note>> {
        self.by_id.get(id).map(|&i| &self.notes[i])
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.notes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }
}
