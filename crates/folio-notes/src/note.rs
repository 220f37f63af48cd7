//! Note data model.

use serde::Serialize;

use crate::links::unique_links;

/// A parsed markdown note.
///
/// Notes are immutable once built and shared as `Arc<Note>` between the
/// store, resolvers and trees.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Note {
    /// Unique, stable identifier (slug of category, group and title).
    pub id: String,
    /// Human-readable title derived from the file name.
    pub title: String,
    /// Full markdown body.
    pub content: String,
    /// Top-level folder (e.g., "Spiritual").
    pub category: String,
    /// Second-level folder such as a book or source (e.g., "A New Earth").
    pub group: Option<String>,
    /// Path relative to the vault root, `/`-separated.
    pub path: String,
    /// Distinct link tokens in order of first occurrence.
    pub links: Vec<String>,
    /// Number of whitespace-separated words in the body.
    pub word_count: usize,
}

impl Note {
    /// Create a note, deriving links and word count from the body.
    ///
    /// The path defaults to `{category}/{title}.md`; use
    /// [`with_path`](Self::with_path) to set the real source location.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        category: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        let title = title.into();
        let category = category.into();
        let content = content.into();
        Self {
            id: id.into(),
            path: format!("{category}/{title}.md"),
            links: unique_links(&content),
            word_count: content.split_whitespace().count(),
            title,
            content,
            category,
            group: None,
        }
    }

    /// Set the group.
    #[must_use]
    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    /// Set the relative source path.
    #[must_use]
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    /// File name including extension (last path segment).
    #[must_use]
    pub fn file_name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }

    /// File name without the `.md` extension.
    #[must_use]
    pub fn file_stem(&self) -> &str {
        let name = self.file_name();
        name.rsplit_once('.').map_or(name, |(stem, _)| stem)
    }

    /// Name of the folder directly containing the file (empty at vault root).
    #[must_use]
    pub fn parent_dir(&self) -> &str {
        self.path
            .rsplit_once('/')
            .and_then(|(dir, _)| dir.rsplit('/').next())
            .unwrap_or("")
    }

    /// Whether the note belongs to `group`.
    #[must_use]
    pub fn in_group(&self, group: &str) -> bool {
        self.group.as_deref() == Some(group)
    }
}

/// Note listing entry without the body.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NoteSummary {
    /// Note identifier.
    pub id: String,
    /// Note title.
    pub title: String,
    /// Category (top-level folder).
    pub category: String,
    /// Group (second-level folder).
    pub group: Option<String>,
    /// Relative source path.
    pub path: String,
    /// Number of words.
    pub word_count: usize,
}

impl From<&Note> for NoteSummary {
    fn from(note: &Note) -> Self {
        Self {
            id: note.id.clone(),
            title: note.title.clone(),
            category: note.category.clone(),
            group: note.group.clone(),
            path: note.path.clone(),
            word_count: note.word_count,
        }
    }
}
