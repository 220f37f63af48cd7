//! Application state.
//!
//! Shared state for all request handlers.

use std::sync::Arc;

use folio_notes::Vault;

use crate::handlers::contact::ContactInbox;

/// Application state shared across all handlers.
pub(crate) struct AppState {
    /// Note vault with snapshot caching.
    pub(crate) vault: Arc<Vault>,
    /// Contact form submissions (memory only).
    pub(crate) inbox: ContactInbox,
    /// Application version reported by `GET /`.
    pub(crate) version: String,
}

impl AppState {
    pub(crate) fn new(vault: Arc<Vault>, version: String) -> Self {
        Self {
            vault,
            inbox: ContactInbox::default(),
            version,
        }
    }
}
