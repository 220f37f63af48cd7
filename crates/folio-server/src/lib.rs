//! HTTP server for Folio.
//!
//! This crate provides a JSON API over a note vault using axum:
//! - Notes: listing, search, stats, structure, group trees, navigation
//! - Quotes: random and per-category quotes extracted from notes
//! - Contact: an in-memory contact form inbox
//!
//! # Quick Start
//!
//! ```ignore
//! use std::path::PathBuf;
//! use folio_server::{ServerConfig, run_server};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = ServerConfig {
//!         source_dir: PathBuf::from("vault"),
//!         version: "0.1.0".to_owned(),
//!         ..ServerConfig::default()
//!     };
//!
//!     run_server(config).await.unwrap();
//! }
//! ```
//!
//! # Architecture
//!
//! ```text
//! Client ──HTTP──► axum router (folio-server)
//!                      │
//!                      ├─► /api/notes, /api/quotes ──► Vault (folio-notes)
//!                      │                                   │
//!                      │                                   └─► Storage (folio-storage)
//!                      │
//!                      └─► /api/contact ──► ContactInbox (in memory)
//! ```

mod app;
mod error;
mod handlers;
mod middleware;
mod state;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use folio_notes::{RootHeuristics, Vault, VaultOptions};
use folio_storage::{FsStorage, Storage};
use state::AppState;

pub use error::ServerError;

/// Server configuration.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Host address to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Vault source directory.
    pub source_dir: PathBuf,
    /// Exclude patterns (`None` uses storage defaults).
    pub exclude: Option<Vec<String>>,
    /// Reuse parsed snapshots between requests.
    pub cache_enabled: bool,
    /// Snapshot time-to-live.
    pub cache_ttl: Duration,
    /// Allowed CORS origins (`*` allows any).
    pub cors_origins: Vec<String>,
    /// Root detection thresholds.
    pub heuristics: RootHeuristics,
    /// Application version reported by `GET /`.
    pub version: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 8000,
            source_dir: PathBuf::from("vault"),
            exclude: None,
            cache_enabled: true,
            cache_ttl: Duration::from_secs(300),
            cors_origins: vec!["http://localhost:3000".to_owned()],
            heuristics: RootHeuristics::default(),
            version: String::new(),
        }
    }
}

/// Create a vault for the configured source directory.
#[must_use]
pub fn create_vault(config: &ServerConfig) -> Arc<Vault> {
    let mut storage = FsStorage::new(config.source_dir.clone());
    if let Some(exclude) = &config.exclude {
        storage = storage.with_excludes(exclude.clone());
    }
    let storage: Arc<dyn Storage> = Arc::new(storage);

    Arc::new(Vault::new(
        storage,
        VaultOptions {
            cache_enabled: config.cache_enabled,
            ttl: config.cache_ttl,
            heuristics: config.heuristics.clone(),
        },
    ))
}

/// Run the server.
///
/// # Arguments
///
/// * `config` - Server configuration
///
/// # Errors
///
/// Returns an error if the server fails to start.
pub async fn run_server(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let vault = create_vault(&config);

    // Warm the cache so the first request doesn't pay for the scan
    let notes = vault.snapshot().store().len();
    tracing::info!(source_dir = %config.source_dir.display(), notes, "Vault ready");

    let state = Arc::new(AppState::new(vault, config.version.clone()));
    let app = app::create_router(state, &config.cors_origins);

    let addr = SocketAddr::from_str(&format!("{}:{}", config.host, config.port))?;
    tracing::info!(address = %addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Wait for shutdown signal (Ctrl-C).
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received, stopping server...");
}

/// Root detection thresholds from the `[roots]` section, defaults filled in.
#[must_use]
pub fn heuristics_from_config(roots: &folio_config::RootsConfig) -> RootHeuristics {
    let defaults = RootHeuristics::default();
    RootHeuristics {
        marker: roots.marker.clone().unwrap_or(defaults.marker),
        excluded_dirs: roots.excluded_dirs.clone().unwrap_or(defaults.excluded_dirs),
        min_links: roots.min_links.unwrap_or(defaults.min_links),
        max_body_chars: roots.max_body_chars.unwrap_or(defaults.max_body_chars),
        prefixes: roots.prefixes.clone().unwrap_or(defaults.prefixes),
    }
}

/// Create server configuration from Folio config.
///
/// # Arguments
///
/// * `config` - Folio configuration
/// * `version` - Application version
#[must_use]
pub fn server_config_from_config(config: &folio_config::Config, version: String) -> ServerConfig {
    ServerConfig {
        host: config.server.host.clone(),
        port: config.server.port,
        source_dir: config.vault_resolved.source_dir.clone(),
        exclude: config.vault_resolved.exclude.clone(),
        cache_enabled: config.cache.enabled,
        cache_ttl: Duration::from_secs(config.cache.ttl_secs),
        cors_origins: config.cors.origins.clone(),
        heuristics: heuristics_from_config(&config.roots),
        version,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_heuristics_from_empty_roots_config() {
        let heuristics = heuristics_from_config(&folio_config::RootsConfig::default());

        assert_eq!(heuristics, RootHeuristics::default());
    }

    #[test]
    fn test_heuristics_overrides() {
        let roots = folio_config::RootsConfig {
            marker: Some("index".to_owned()),
            min_links: Some(3),
            ..folio_config::RootsConfig::default()
        };

        let heuristics = heuristics_from_config(&roots);

        assert_eq!(heuristics.marker, "index");
        assert_eq!(heuristics.min_links, 3);
        assert_eq!(heuristics.max_body_chars, 1000);
    }

    #[test]
    fn test_server_config_from_default_config() {
        let config = folio_config::Config::default();

        let server = server_config_from_config(&config, "1.2.3".to_owned());

        assert_eq!(server.port, 8000);
        assert_eq!(server.host, "127.0.0.1");
        assert!(server.cache_enabled);
        assert_eq!(server.cache_ttl, Duration::from_secs(300));
        assert_eq!(server.cors_origins, vec!["http://localhost:3000"]);
        assert_eq!(server.version, "1.2.3");
    }
}
