//! Note graph for Folio.
//!
//! This crate provides:
//! - [`NoteStore`]: parsed notes from a [`Storage`](folio_storage::Storage) backend
//! - [`LinkResolver`]: best-effort resolution of `[[wiki links]]`
//! - [`RootDetector`]: heuristic table-of-contents detection
//! - [`TreeBuilder`]: cycle-safe navigation trees
//! - [`navigate`]: breadcrumbs, siblings and children within a tree
//! - [`Vault`]: cached snapshots with structure, search, stats and quotes
//!
//! # Quick Start
//!
//! ```no_run
//! use std::path::PathBuf;
//! use std::sync::Arc;
//! use folio_notes::{Vault, VaultOptions};
//! use folio_storage::FsStorage;
//!
//! let storage = Arc::new(FsStorage::new(PathBuf::from("vault")));
//! let vault = Vault::new(storage, VaultOptions::default());
//!
//! let snapshot = vault.snapshot();
//! let structure = snapshot.structure();
//! let nav = snapshot.navigation_for("spiritual_a-new-earth_presence");
//! ```

mod ingest;
mod links;
mod navigation;
mod note;
mod query;
mod quotes;
mod resolver;
mod roots;
mod store;
mod structure;
mod tree;
mod vault;

pub use ingest::{DEFAULT_CATEGORY, ingest, note_id, parse_note, slugify};
pub use links::{extract_links, unique_links};
pub use navigation::{Breadcrumb, NavigationContext, NoteLink, navigate};
pub use note::{Note, NoteSummary};
pub use query::{NoteFilter, NoteStats, categories, filter, groups, search, stats};
pub use quotes::{
    Quote, collect_quotes, extract_quotes, quote_categories, quotes_in_category, random_quote,
};
pub use resolver::LinkResolver;
pub use roots::{RootDetector, RootHeuristics, RootSelection};
pub use store::NoteStore;
pub use structure::{GroupStructure, Structure, UNGROUPED, build_structure};
pub use tree::{NoteTree, TreeBuilder, TreeNode, build_tree};
pub use vault::{GroupTree, Snapshot, Vault, VaultOptions};
