//! Listing, search and statistics over notes.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;

use crate::note::Note;

/// Case-insensitive name comparison, Unicode aware.
pub(crate) fn same_name(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

/// Filters for note listings. `None` matches everything.
#[derive(Clone, Debug, Default)]
pub struct NoteFilter {
    pub category: Option<String>,
    pub group: Option<String>,
    pub limit: Option<usize>,
}

impl NoteFilter {
    fn matches(&self, note: &Note) -> bool {
        let category_ok = self
            .category
            .as_deref()
            .is_none_or(|c| same_name(&note.category, c));
        let group_ok = self.group.as_deref().is_none_or(|g| {
            note.group
                .as_deref()
                .is_some_and(|own| same_name(own, g))
        });
        category_ok && group_ok
    }
}

/// Notes matching `filter`, in store order.
#[must_use]
pub fn filter<'a>(notes: &'a [Arc<Note>], filter: &NoteFilter) -> Vec<&'a Arc<Note>> {
    notes
        .iter()
        .filter(|n| filter.matches(n))
        .take(filter.limit.unwrap_or(usize::MAX))
        .collect()
}

/// Case-insensitive search over titles and bodies.
#[must_use]
pub fn search<'a>(notes: &'a [Arc<Note>], query: &str, limit: usize) -> Vec<&'a Arc<Note>> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }

    notes
        .iter()
        .filter(|n| {
            n.title.to_lowercase().contains(&needle) || n.content.to_lowercase().contains(&needle)
        })
        .take(limit)
        .collect()
}

/// Aggregate numbers about the vault.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct NoteStats {
    pub total_notes: usize,
    pub categories: BTreeMap<String, usize>,
    pub groups: BTreeMap<String, usize>,
    pub total_words: usize,
    /// Rounded to one decimal.
    pub avg_words_per_note: f64,
}

#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn stats(notes: &[Arc<Note>]) -> NoteStats {
    let mut categories = BTreeMap::new();
    let mut groups = BTreeMap::new();
    let mut total_words = 0;

    for note in notes {
        *categories.entry(note.category.clone()).or_insert(0) += 1;
        if let Some(group) = &note.group {
            *groups.entry(group.clone()).or_insert(0) += 1;
        }
        total_words += note.word_count;
    }

    let avg_words_per_note = if notes.is_empty() {
        0.0
    } else {
        (total_words as f64 / notes.len() as f64 * 10.0).round() / 10.0
    };

    NoteStats {
        total_notes: notes.len(),
        categories,
        groups,
        total_words,
        avg_words_per_note,
    }
}

/// Distinct categories, sorted.
#[must_use]
pub fn categories(notes: &[Arc<Note>]) -> Vec<String> {
    let mut names: Vec<String> = notes.iter().map(|n| n.category.clone()).collect();
    names.sort();
    names.dedup();
    names
}

/// Distinct groups, sorted, optionally limited to one category.
#[must_use]
pub fn groups(notes: &[Arc<Note>], category: Option<&str>) -> Vec<String> {
    let mut names: Vec<String> = notes
        .iter()
        .filter(|n| category.is_none_or(|c| same_name(&n.category, c)))
        .filter_map(|n| n.group.clone())
        .collect();
    names.sort();
    names.dedup();
    names
}
