//! Link token resolution.
//!
//! Maps a `[[token]]` to the note it most likely refers to. Resolution is a
//! heuristic: strategies are tried in a fixed order and the first hit wins.
//!
//! 1. Exact title match anywhere (duplicates prefer the origin group, then
//!    the origin category)
//! 2. Case-insensitive title match in the origin group
//! 3. Case-insensitive title match in the origin category
//! 4. Case-insensitive substring of a title in the origin group
//! 5. Case-insensitive substring of a title in the origin category
//! 6. Case-insensitive file stem match in the origin category

use std::collections::HashMap;
use std::sync::Arc;

use crate::note::Note;

/// Index over a set of notes for link resolution.
///
/// Built once per tree build or query and dropped afterwards.
pub struct LinkResolver<'a> {
    notes: &'a [Arc<Note>],
    by_id: HashMap<&'a str, usize>,
    by_title: HashMap<&'a str, Vec<usize>>,
    by_title_lower: HashMap<String, Vec<usize>>,
    by_stem_lower: HashMap<String, Vec<usize>>,
    titles_lower: Vec<String>,
}

impl<'a> LinkResolver<'a> {
    /// Index `notes`. Ties are broken by slice order.
    #[must_use]
    pub fn new(notes: &'a [Arc<Note>]) -> Self {
        let mut by_id = HashMap::with_capacity(notes.len());
        let mut by_title: HashMap<&str, Vec<usize>> = HashMap::new();
        let mut by_title_lower: HashMap<String, Vec<usize>> = HashMap::new();
        let mut by_stem_lower: HashMap<String, Vec<usize>> = HashMap::new();
        let mut titles_lower = Vec::with_capacity(notes.len());

        for (i, note) in notes.iter().enumerate() {
            by_id.entry(note.id.as_str()).or_insert(i);
            by_title.entry(note.title.as_str()).or_default().push(i);
            let lower = note.title.to_lowercase();
            by_title_lower.entry(lower.clone()).or_default().push(i);
            by_stem_lower
                .entry(note.file_stem().to_lowercase())
                .or_default()
                .push(i);
            titles_lower.push(lower);
        }

        Self {
            notes,
            by_id,
            by_title,
            by_title_lower,
            by_stem_lower,
            titles_lower,
        }
    }

    /// Look up a note by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&'a Arc<Note>> {
        self.by_id.get(id).map(|&i| &self.notes[i])
    }

    /// Resolve a link token written in a note of `category`/`group`.
    ///
    /// Returns `None` for blank tokens and tokens nothing matches.
    #[must_use]
    pub fn resolve(
        &self,
        token: &str,
        category: &str,
        group: Option<&str>,
    ) -> Option<&'a Arc<Note>> {
        let token = token.trim();
        if token.is_empty() {
            return None;
        }

        let in_group = |i: &usize| group.is_some() && self.notes[*i].group.as_deref() == group;
        let in_category = |i: &usize| self.notes[*i].category == category;

        if let Some(candidates) = self.by_title.get(token) {
            let pick = candidates
                .iter()
                .find(|i| in_group(i))
                .or_else(|| candidates.iter().find(|i| in_category(i)))
                .or_else(|| candidates.first());
            if let Some(&i) = pick {
                return Some(&self.notes[i]);
            }
        }

        let lower = token.to_lowercase();

        if let Some(candidates) = self.by_title_lower.get(&lower) {
            if group.is_some()
                && let Some(&i) = candidates.iter().find(|i| in_group(i))
            {
                return Some(&self.notes[i]);
            }
            if let Some(&i) = candidates.iter().find(|i| in_category(i)) {
                return Some(&self.notes[i]);
            }
        }

        let contains = |i: &usize| self.titles_lower[*i].contains(&lower);
        if group.is_some()
            && let Some(i) = (0..self.notes.len()).find(|i| in_group(i) && contains(i))
        {
            return Some(&self.notes[i]);
        }
        if let Some(i) = (0..self.notes.len()).find(|i| in_category(i) && contains(i)) {
            return Some(&self.notes[i]);
        }

        self.by_stem_lower
            .get(&lower)
            .and_then(|candidates| candidates.iter().find(|i| in_category(i)))
            .map(|&i| &self.notes[i])
    }
}
