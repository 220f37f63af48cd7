//! Quote extraction.
//!
//! Quotes are blockquote lines and quoted passages that are long enough to
//! stand on their own. Links, URLs and code are skipped.

use std::sync::{Arc, LazyLock};

use rand::Rng;
use rand::seq::IndexedRandom;
use regex::Regex;
use serde::Serialize;

use crate::note::Note;
use crate::query::same_name;

const MIN_QUOTE_CHARS: usize = 30;
const MAX_QUOTE_CHARS: usize = 500;

static QUOTE_PATTERNS: LazyLock<[Regex; 3]> = LazyLock::new(|| {
    [
        Regex::new(r"(?m)^>\s*(.+)$").expect("invalid blockquote regex"),
        Regex::new(r#""([^"]{20,200})""#).expect("invalid double quote regex"),
        Regex::new(r"'([^']{20,200})'").expect("invalid single quote regex"),
    ]
});

/// A quote and where it came from.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Quote {
    pub text: String,
    /// Title of the source note.
    pub source: String,
    pub group: Option<String>,
    pub category: String,
}

fn is_quotable(text: &str) -> bool {
    let len = text.chars().count();
    (MIN_QUOTE_CHARS..=MAX_QUOTE_CHARS).contains(&len)
        && !text.starts_with("http")
        && !text.contains("```")
        && !text.contains("[[")
}

/// Extract quotes from one note, pattern by pattern.
#[must_use]
pub fn extract_quotes(note: &Note) -> Vec<Quote> {
    QUOTE_PATTERNS
        .iter()
        .flat_map(|pattern| pattern.captures_iter(&note.content))
        .filter_map(|caps| {
            let text = caps.get(1)?.as_str().trim();
            is_quotable(text).then(|| Quote {
                text: text.to_owned(),
                source: note.title.clone(),
                group: note.group.clone(),
                category: note.category.clone(),
            })
        })
        .collect()
}

/// Extract quotes from every note.
#[must_use]
pub fn collect_quotes(notes: &[Arc<Note>]) -> Vec<Quote> {
    let quotes: Vec<Quote> = notes.iter().flat_map(|n| extract_quotes(n)).collect();
    tracing::info!(quotes = quotes.len(), notes = notes.len(), "Extracted quotes");
    quotes
}

/// Distinct quote categories, sorted.
#[must_use]
pub fn quote_categories(quotes: &[Quote]) -> Vec<String> {
    let mut names: Vec<String> = quotes.iter().map(|q| q.category.clone()).collect();
    names.sort();
    names.dedup();
    names
}

/// Quotes whose category matches case-insensitively.
#[must_use]
pub fn quotes_in_category<'a>(quotes: &'a [Quote], category: &str) -> Vec<&'a Quote> {
    quotes
        .iter()
        .filter(|q| same_name(&q.category, category))
        .collect()
}

/// Pick a random quote, optionally from one category.
pub fn random_quote<'a, R: Rng + ?Sized>(
    quotes: &'a [Quote],
    category: Option<&str>,
    rng: &mut R,
) -> Option<&'a Quote> {
    match category {
        Some(category) => quotes_in_category(quotes, category).choose(rng).copied(),
        None => quotes.choose(rng),
    }
}
