//! Heuristic detection of table-of-contents notes.
//!
//! A root is a note that acts as the entry point of a group: usually an
//! "Overview"-style file with a handful of links and little prose.

use std::sync::Arc;

use crate::links::extract_links;
use crate::note::Note;

/// Thresholds for [`RootDetector`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RootHeuristics {
    /// Substring the lowercase file name must contain.
    pub marker: String,
    /// Lowercase parent folder names that never hold roots.
    pub excluded_dirs: Vec<String>,
    /// Minimum number of distinct link tokens for a short note to qualify.
    pub min_links: usize,
    /// Body length (in characters) a link-based root must stay below.
    pub max_body_chars: usize,
    /// Lowercase file name prefixes that qualify regardless of links.
    pub prefixes: Vec<String>,
}

impl Default for RootHeuristics {
    fn default() -> Self {
        Self {
            marker: "notes".to_owned(),
            excluded_dirs: vec!["files".to_owned(), "zfiles".to_owned(), "file".to_owned()],
            min_links: 2,
            max_body_chars: 1000,
            prefixes: vec!["notes ".to_owned(), "notes-".to_owned(), "a ".to_owned()],
        }
    }
}

impl RootHeuristics {
    /// Lowercase every name pattern so configured values match regardless of case.
    fn lowercased(self) -> Self {
        Self {
            marker: self.marker.to_lowercase(),
            excluded_dirs: lowercase_all(&self.excluded_dirs),
            prefixes: lowercase_all(&self.prefixes),
            ..self
        }
    }
}

fn lowercase_all(values: &[String]) -> Vec<String> {
    values.iter().map(|v| v.to_lowercase()).collect()
}

/// Roots chosen for one group.
#[derive(Clone, Debug)]
pub struct RootSelection {
    /// Roots in input order.
    pub roots: Vec<Arc<Note>>,
    /// True when no heuristic root existed and the most-linked note was used.
    pub fallback: bool,
}

/// Decides which notes are navigation roots.
#[derive(Clone, Debug, Default)]
pub struct RootDetector {
    heuristics: RootHeuristics,
}

impl RootDetector {
    /// Name patterns in `heuristics` are matched case-insensitively.
    #[must_use]
    pub fn new(heuristics: RootHeuristics) -> Self {
        Self {
            heuristics: heuristics.lowercased(),
        }
    }

    #[must_use]
    pub fn heuristics(&self) -> &RootHeuristics {
        &self.heuristics
    }

    /// Check whether `note` looks like a table of contents.
    #[must_use]
    pub fn is_root(&self, note: &Note) -> bool {
        let h = &self.heuristics;
        let file_name = note.file_name().to_lowercase();
        if !file_name.contains(&h.marker) {
            return false;
        }

        let parent = note.parent_dir().to_lowercase();
        if h.excluded_dirs.iter().any(|dir| *dir == parent) {
            return false;
        }

        if note.links.len() >= h.min_links && note.content.chars().count() < h.max_body_chars {
            return true;
        }

        h.prefixes.iter().any(|prefix| file_name.starts_with(prefix))
    }

    /// Filter `notes` down to roots, keeping input order.
    #[must_use]
    pub fn find_roots(&self, notes: &[Arc<Note>]) -> Vec<Arc<Note>> {
        notes.iter().filter(|n| self.is_root(n)).cloned().collect()
    }

    /// Roots of a group, falling back to the note with the most link tokens.
    ///
    /// Ties go to the earlier note. Only an empty input yields no roots.
    #[must_use]
    pub fn select_roots(&self, notes: &[Arc<Note>]) -> RootSelection {
        let roots = self.find_roots(notes);
        if !roots.is_empty() {
            return RootSelection {
                roots,
                fallback: false,
            };
        }

        let mut best: Option<(&Arc<Note>, usize)> = None;
        for note in notes {
            let count = extract_links(&note.content).len();
            if best.is_none_or(|(_, top)| count > top) {
                best = Some((note, count));
            }
        }

        RootSelection {
            roots: best.map(|(note, _)| Arc::clone(note)).into_iter().collect(),
            fallback: best.is_some(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn note(path: &str, content: &str) -> Note {
        let stem = path.rsplit('/').next().unwrap().trim_end_matches(".md");
        Note::new(stem, stem, "X", content).with_path(path)
    }

    #[test]
    fn test_short_linked_note_is_root() {
        let detector = RootDetector::default();

        assert!(detector.is_root(&note("X/B/Book Notes.md", "[[One]] [[Two]]")));
    }

    #[test]
    fn test_marker_required() {
        let detector = RootDetector::default();

        assert!(!detector.is_root(&note("X/B/Overview.md", "[[One]] [[Two]]")));
    }

    #[test]
    fn test_excluded_parent_dir() {
        let detector = RootDetector::default();

        assert!(!detector.is_root(&note("X/B/Files/Notes about.md", "[[One]] [[Two]]")));
        assert!(!detector.is_root(&note("X/B/zfiles/notes - x.md", "[[One]] [[Two]]")));
    }

    #[test]
    fn test_single_link_is_not_enough() {
        let detector = RootDetector::default();

        assert!(!detector.is_root(&note("X/B/Chapter notes.md", "[[One]] [[One|again]]")));
    }

    #[test]
    fn test_long_body_rejected_without_prefix() {
        let detector = RootDetector::default();
        let body = format!("[[One]] [[Two]] {}", "x".repeat(1000));

        assert!(!detector.is_root(&note("X/B/Chapter notes.md", &body)));
    }

    #[test]
    fn test_configured_patterns_ignore_case() {
        let detector = RootDetector::new(RootHeuristics {
            marker: "Index".to_owned(),
            excluded_dirs: vec!["Files".to_owned()],
            prefixes: vec!["Index - ".to_owned()],
            ..RootHeuristics::default()
        });

        assert!(detector.is_root(&note("X/G/Index.md", "[[One]] [[Two]]")));
        assert!(!detector.is_root(&note("X/G/Files/Index.md", "[[One]] [[Two]]")));
        assert!(detector.is_root(&note("X/G/index - long.md", &"x".repeat(2000))));
        assert_eq!(detector.heuristics().marker, "index");
    }

    #[test]
    fn test_prefix_accepts_long_body() {
        let detector = RootDetector::default();
        let body = "x".repeat(2000);

        assert!(detector.is_root(&note("X/B/Notes - Overview.md", &body)));
        assert!(detector.is_root(&note("X/B/notes-index.md", &body)));
        assert!(detector.is_root(&note("X/B/A notes summary.md", &body)));
    }

    #[test]
    fn test_custom_heuristics() {
        let detector = RootDetector::new(RootHeuristics {
            marker: "index".to_owned(),
            min_links: 1,
            ..RootHeuristics::default()
        });

        assert!(detector.is_root(&note("X/B/index.md", "[[One]]")));
        assert!(!detector.is_root(&note("X/B/Notes.md", "[[One]] [[Two]]")));
    }

    #[test]
    fn test_find_roots_keeps_order() {
        let detector = RootDetector::default();
        let notes: Vec<_> = [
            note("X/B/Second notes.md", "[[A]] [[B]]"),
            note("X/B/Plain.md", "[[A]] [[B]]"),
            note("X/B/First notes.md", "[[A]] [[B]]"),
        ]
        .into_iter()
        .map(Arc::new)
        .collect();

        let roots = detector.find_roots(&notes);

        let ids: Vec<_> = roots.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["Second notes", "First notes"]);
    }

    #[test]
    fn test_fallback_picks_most_link_tokens() {
        let detector = RootDetector::default();
        let notes: Vec<_> = [
            note("X/B/a.md", "[[One]]"),
            note("X/B/b.md", "[[One]] [[One]] [[Two]]"),
            note("X/B/c.md", "[[One]] [[Two]] [[Three]]"),
        ]
        .into_iter()
        .map(Arc::new)
        .collect();

        let selection = detector.select_roots(&notes);

        assert!(selection.fallback);
        assert_eq!(selection.roots.len(), 1);
        assert_eq!(selection.roots[0].id, "b");
    }

    #[test]
    fn test_fallback_without_links_uses_first() {
        let detector = RootDetector::default();
        let notes: Vec<_> = [note("X/B/a.md", "text"), note("X/B/b.md", "more")]
            .into_iter()
            .map(Arc::new)
            .collect();

        let selection = detector.select_roots(&notes);

        assert_eq!(selection.roots[0].id, "a");
    }

    #[test]
    fn test_select_roots_empty() {
        let selection = RootDetector::default().select_roots(&[]);

        assert!(selection.roots.is_empty());
        assert!(!selection.fallback);
    }
}
