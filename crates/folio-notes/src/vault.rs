//! Cached access to a vault.
//!
//! # Thread Safety
//!
//! `Vault` is designed for concurrent access:
//! - `snapshot()` returns `Arc<Snapshot>` with minimal locking (just Arc clone)
//! - reloads use double-checked locking so only one request rebuilds
//! - `invalidate()` is lock-free (atomic flag)
//!
//! Derived artifacts (structure, quotes) are computed on first use and live
//! as long as the snapshot they belong to.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, OnceLock, RwLock};
use std::time::{Duration, Instant};

use folio_storage::Storage;
use serde::Serialize;

use crate::navigation::{NavigationContext, navigate};
use crate::note::Note;
use crate::query::{self, NoteFilter, NoteStats};
use crate::quotes::{Quote, collect_quotes};
use crate::roots::{RootDetector, RootHeuristics};
use crate::store::NoteStore;
use crate::structure::{Structure, UNGROUPED, build_structure};
use crate::tree::NoteTree;

/// Settings for [`Vault`].
#[derive(Clone, Debug)]
pub struct VaultOptions {
    /// Reuse snapshots between calls.
    ///
    /// When disabled every call rescans storage.
    pub cache_enabled: bool,
    /// How long a snapshot stays fresh when caching is enabled.
    pub ttl: Duration,
    /// Root detection thresholds.
    pub heuristics: RootHeuristics,
}

impl Default for VaultOptions {
    fn default() -> Self {
        Self {
            cache_enabled: true,
            ttl: Duration::from_secs(300),
            heuristics: RootHeuristics::default(),
        }
    }
}

/// Tree view of a single group.
#[derive(Debug, Serialize)]
pub struct GroupTree<'a> {
    /// Group name as stored (original casing).
    pub group: &'a str,
    pub has_tree: bool,
    pub fallback_root: bool,
    /// First tree of the group.
    pub tree: Option<&'a NoteTree>,
}

/// Immutable state of the vault at one point in time.
pub struct Snapshot {
    store: NoteStore,
    detector: RootDetector,
    loaded_at: Instant,
    structure: OnceLock<Structure>,
    quotes: OnceLock<Vec<Quote>>,
}

impl Snapshot {
    fn new(store: NoteStore, detector: RootDetector) -> Self {
        Self {
            store,
            detector,
            loaded_at: Instant::now(),
            structure: OnceLock::new(),
            quotes: OnceLock::new(),
        }
    }

    #[must_use]
    pub fn store(&self) -> &NoteStore {
        &self.store
    }

    #[must_use]
    pub fn notes(&self) -> &[Arc<Note>] {
        self.store.notes()
    }

    /// Category/group structure, built on first access.
    pub fn structure(&self) -> &Structure {
        self.structure.get_or_init(|| {
            let start = Instant::now();
            let structure = build_structure(self.store.notes(), &self.detector);
            tracing::info!(
                trees = structure.tree_count(),
                elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
                "Built note structure"
            );
            structure
        })
    }

    /// All quotes, extracted on first access.
    pub fn quotes(&self) -> &[Quote] {
        self.quotes.get_or_init(|| collect_quotes(self.store.notes()))
    }

    /// Tree of a group, matched case-insensitively.
    pub fn group_tree(&self, group: &str) -> Option<GroupTree<'_>> {
        let (name, entry) = self.structure().find_group(group)?;
        Some(GroupTree {
            group: name,
            has_tree: entry.has_tree,
            fallback_root: entry.fallback_root,
            tree: entry.trees.first(),
        })
    }

    /// Navigation context of a note within its group's trees.
    ///
    /// Returns the first non-empty context, or `None` when the note is not
    /// reachable from any root of its group.
    pub fn navigation_for(&self, id: &str) -> Option<NavigationContext> {
        let note = self.store.get(id)?;
        let groups = self.structure().category(&note.category)?;
        let entry = groups.get(note.group.as_deref().unwrap_or(UNGROUPED))?;

        entry
            .trees
            .iter()
            .map(|tree| navigate(id, tree))
            .find(|ctx| !ctx.is_empty())
    }

    fn cached_artifacts(&self) -> usize {
        1 + usize::from(self.structure.get().is_some()) + usize::from(self.quotes.get().is_some())
    }
}

/// Note vault backed by a [`Storage`], with snapshot caching.
///
/// # Thread Safety
///
/// This struct is designed for concurrent access without external locking:
/// - Uses internal `RwLock<Arc<Snapshot>>` for the current snapshot
/// - Uses `Mutex<()>` for serializing reload operations
/// - Uses `AtomicBool` for cache validity tracking
pub struct Vault {
    storage: Arc<dyn Storage>,
    detector: RootDetector,
    cache_enabled: bool,
    ttl: Duration,
    /// Mutex for serializing reload operations.
    reload_lock: Mutex<()>,
    /// Current snapshot (atomically swappable).
    current: RwLock<Arc<Snapshot>>,
    /// Cache validity flag.
    cache_valid: AtomicBool,
}

impl Vault {
    /// Create a vault. Nothing is loaded until first access.
    #[must_use]
    pub fn new(storage: Arc<dyn Storage>, options: VaultOptions) -> Self {
        let detector = RootDetector::new(options.heuristics);
        let initial = Arc::new(Snapshot::new(NoteStore::default(), detector.clone()));
        Self {
            storage,
            detector,
            cache_enabled: options.cache_enabled,
            ttl: options.ttl,
            reload_lock: Mutex::new(()),
            current: RwLock::new(initial),
            cache_valid: AtomicBool::new(false),
        }
    }

    fn current(&self) -> Arc<Snapshot> {
        self.current.read().unwrap().clone()
    }

    fn is_fresh(&self, snapshot: &Snapshot) -> bool {
        self.cache_enabled
            && self.cache_valid.load(Ordering::Acquire)
            && snapshot.loaded_at.elapsed() < self.ttl
    }

    /// Current snapshot, reloading from storage when stale.
    ///
    /// Uses double-checked locking:
    /// 1. Fast path: return the current snapshot if it is still fresh
    /// 2. Slow path: acquire `reload_lock`, recheck, then reload
    ///
    /// A failed reload keeps serving the previous snapshot.
    ///
    /// # Panics
    ///
    /// Panics if internal locks are poisoned.
    pub fn snapshot(&self) -> Arc<Snapshot> {
        let snapshot = self.current();
        if self.is_fresh(&snapshot) {
            return snapshot;
        }

        let _guard = self.reload_lock.lock().unwrap();

        let snapshot = self.current();
        if self.is_fresh(&snapshot) {
            return snapshot;
        }

        let start = Instant::now();
        match NoteStore::load(self.storage.as_ref()) {
            Ok(store) => {
                tracing::info!(
                    notes = store.len(),
                    elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "Vault loaded"
                );
                let fresh = Arc::new(Snapshot::new(store, self.detector.clone()));
                *self.current.write().unwrap() = Arc::clone(&fresh);
                if self.cache_enabled {
                    self.cache_valid.store(true, Ordering::Release);
                }
                fresh
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to load vault, serving previous snapshot");
                snapshot
            }
        }
    }

    /// Mark the cache stale.
    ///
    /// Returns the number of cached artifacts dropped (the note set plus any
    /// structure or quotes computed from it), or 0 if nothing was cached.
    /// Current readers keep their existing `Arc<Snapshot>`.
    ///
    /// # Panics
    ///
    /// Panics if the internal `RwLock` is poisoned.
    pub fn invalidate(&self) -> usize {
        if !self.cache_valid.swap(false, Ordering::AcqRel) {
            return 0;
        }
        let cleared = self.current().cached_artifacts();
        tracing::info!(cleared, "Vault cache invalidated");
        cleared
    }

    /// Notes matching `filter`.
    pub fn list(&self, filter: &NoteFilter) -> Vec<Arc<Note>> {
        let snapshot = self.snapshot();
        query::filter(snapshot.notes(), filter)
            .into_iter()
            .cloned()
            .collect()
    }

    pub fn get(&self, id: &str) -> Option<Arc<Note>> {
        self.snapshot().store().get(id).cloned()
    }

    /// Case-insensitive search over titles and bodies.
    pub fn search(&self, query: &str, limit: usize) -> Vec<Arc<Note>> {
        let snapshot = self.snapshot();
        query::search(snapshot.notes(), query, limit)
            .into_iter()
            .cloned()
            .collect()
    }

    pub fn stats(&self) -> NoteStats {
        query::stats(self.snapshot().notes())
    }

    pub fn categories(&self) -> Vec<String> {
        query::categories(self.snapshot().notes())
    }

    pub fn groups(&self, category: Option<&str>) -> Vec<String> {
        query::groups(self.snapshot().notes(), category)
    }
}
