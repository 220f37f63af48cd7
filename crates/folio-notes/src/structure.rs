//! Category and group overview with one tree per root.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;

use crate::note::Note;
use crate::roots::RootDetector;
use crate::tree::{NoteTree, TreeBuilder};

/// Group key for notes without a group.
pub const UNGROUPED: &str = "(ungrouped)";

/// Trees of one group.
#[derive(Clone, Debug, Serialize)]
pub struct GroupStructure {
    pub note_count: usize,
    pub trees: Vec<NoteTree>,
    /// True when at least one heuristic root was detected.
    pub has_tree: bool,
    /// True when the single tree is rooted at a fallback note.
    pub fallback_root: bool,
}

/// Category -> group -> trees, both levels sorted by name.
#[derive(Clone, Debug, Default, Serialize)]
#[serde(transparent)]
pub struct Structure(BTreeMap<String, BTreeMap<String, GroupStructure>>);

impl Structure {
    #[must_use]
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Groups of one category.
    #[must_use]
    pub fn category(&self, name: &str) -> Option<&BTreeMap<String, GroupStructure>> {
        self.0.get(name)
    }

    /// Find a named group anywhere, matching the name case-insensitively.
    ///
    /// The first category holding the group wins. The [`UNGROUPED`] key is
    /// never matched.
    #[must_use]
    pub fn find_group(&self, name: &str) -> Option<(&str, &GroupStructure)> {
        let needle = name.to_lowercase();
        self.0
            .values()
            .flat_map(BTreeMap::iter)
            .find(|(group, _)| group.as_str() != UNGROUPED && group.to_lowercase() == needle)
            .map(|(group, structure)| (group.as_str(), structure))
    }

    /// Number of trees across all groups.
    #[must_use]
    pub fn tree_count(&self) -> usize {
        self.0
            .values()
            .flat_map(BTreeMap::values)
            .map(|g| g.trees.len())
            .sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Build the structure for all `notes`.
///
/// Each group gets one tree per detected root, or a single tree from the
/// fallback root. Links resolve against the whole note set.
#[must_use]
pub fn build_structure(notes: &[Arc<Note>], detector: &RootDetector) -> Structure {
    let mut grouped: BTreeMap<&str, BTreeMap<&str, Vec<Arc<Note>>>> = BTreeMap::new();
    for note in notes {
        grouped
            .entry(note.category.as_str())
            .or_default()
            .entry(note.group.as_deref().unwrap_or(UNGROUPED))
            .or_default()
            .push(Arc::clone(note));
    }

    let builder = TreeBuilder::new(notes);
    let mut structure = BTreeMap::new();

    for (category, groups) in grouped {
        let mut entries = BTreeMap::new();
        for (group, members) in groups {
            let selection = detector.select_roots(&members);
            let trees: Vec<NoteTree> = selection.roots.iter().map(|r| builder.build(r)).collect();
            if selection.fallback {
                tracing::debug!(category, group, "No root detected, using fallback");
            }
            entries.insert(
                group.to_owned(),
                GroupStructure {
                    note_count: members.len(),
                    has_tree: !selection.fallback && !trees.is_empty(),
                    fallback_root: selection.fallback,
                    trees,
                },
            );
        }
        structure.insert(category.to_owned(), entries);
    }

    Structure(structure)
}
