//! Wiki link extraction.
//!
//! A link token is the reference part of a `[[...]]` occurrence: for
//! `[[Target|Shown text]]` the token is `Target`. Tokens are trimmed and
//! blank tokens are dropped.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

static WIKI_LINK_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[\[([^\]]+)\]\]").expect("invalid wiki link regex"));

/// Extract all link tokens in body order, duplicates included.
pub fn extract_links(content: &str) -> Vec<String> {
    WIKI_LINK_PATTERN
        .captures_iter(content)
        .filter_map(|caps| {
            let inner = caps.get(1)?.as_str();
            let reference = inner.split('|').next().unwrap_or(inner).trim();
            (!reference.is_empty()).then(|| reference.to_owned())
        })
        .collect()
}

/// Extract distinct link tokens in order of first occurrence.
pub fn unique_links(content: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    extract_links(content)
        .into_iter()
        .filter(|link| seen.insert(link.clone()))
        .collect()
}
