//! Turning vault source files into [`Note`]s.
//!
//! Folder layout carries the metadata: the first path component is the
//! category, the second (when the file is nested two folders deep) is the
//! group. Titles come from the file stem.

use std::collections::HashSet;
use std::path::Component;
use std::sync::LazyLock;

use folio_storage::SourceFile;
use md5::{Digest, Md5};
use regex::Regex;

use crate::links::unique_links;
use crate::note::Note;

/// Category assigned to files at the vault root.
pub const DEFAULT_CATEGORY: &str = "General";

const TITLE_PREFIX: &str = "Notes - ";
const MAX_ID_LEN: usize = 100;
const TRUNCATED_ID_LEN: usize = 80;

static NON_SLUG_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\s-]").expect("invalid slug regex"));
static SLUG_SEPARATORS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[-\s]+").expect("invalid separator regex"));

/// Convert text to a URL-friendly slug.
///
/// Lowercases, drops everything except word characters, whitespace and `-`,
/// collapses separator runs into a single `-` and trims `-` from the ends.
pub fn slugify(text: &str) -> String {
    let lower = text.to_lowercase();
    let cleaned = NON_SLUG_CHARS.replace_all(&lower, "");
    let joined = SLUG_SEPARATORS.replace_all(cleaned.trim(), "-");
    joined.trim_matches('-').to_owned()
}

/// Build a note id from its category, group and title.
///
/// Ids longer than 100 characters are shortened to 80 characters followed by
/// `_` and the first 8 hex digits of the MD5 of the full id.
pub fn note_id(category: &str, group: Option<&str>, title: &str) -> String {
    let id = [Some(category), group, Some(title)]
        .into_iter()
        .flatten()
        .map(slugify)
        .filter(|slug| !slug.is_empty())
        .collect::<Vec<_>>()
        .join("_");

    if id.chars().count() <= MAX_ID_LEN {
        return id;
    }

    let digest = hex::encode(Md5::digest(id.as_bytes()));
    let head: String = id.chars().take(TRUNCATED_ID_LEN).collect();
    format!("{head}_{}", &digest[..8])
}

/// Parse a single source file.
///
/// Returns `None` for blank files and paths without a usable file name.
pub fn parse_note(file: &SourceFile) -> Option<Note> {
    if file.content.trim().is_empty() {
        return None;
    }

    let parts: Vec<String> = file
        .path
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();
    let (file_name, dirs) = parts.split_last()?;

    let stem = file_name
        .rsplit_once('.')
        .map_or(file_name.as_str(), |(stem, _)| stem);
    let title = stem.strip_prefix(TITLE_PREFIX).unwrap_or(stem).trim();
    if title.is_empty() {
        return None;
    }

    let category = dirs.first().map_or(DEFAULT_CATEGORY, String::as_str);
    let group = dirs.get(1).map(String::as_str);

    Some(Note {
        id: note_id(category, group, title),
        title: title.to_owned(),
        category: category.to_owned(),
        group: group.map(str::to_owned),
        path: parts.join("/"),
        links: unique_links(&file.content),
        word_count: file.content.split_whitespace().count(),
        content: file.content.clone(),
    })
}

/// Parse every source file, keeping ids unique.
///
/// A colliding id gets a `-2`, `-3`, ... suffix in input order.
pub fn ingest(files: &[SourceFile]) -> Vec<Note> {
    let mut seen = HashSet::new();
    let mut notes = Vec::with_capacity(files.len());

    for file in files {
        let Some(mut note) = parse_note(file) else {
            tracing::debug!(path = %file.path.display(), "Skipping empty note");
            continue;
        };

        if seen.contains(&note.id) {
            let base = note.id.clone();
            let mut n = 2;
            while seen.contains(&format!("{base}-{n}")) {
                n += 1;
            }
            note.id = format!("{base}-{n}");
            tracing::warn!(path = %note.path, id = %note.id, "Duplicate note id, renamed");
        }

        seen.insert(note.id.clone());
        notes.push(note);
    }

    notes
}
