//! Storage abstraction for Folio note vaults.
//!
//! This crate provides a [`Storage`] trait for abstracting how markdown notes
//! are discovered and read. This enables:
//!
//! - **Unit testing** without touching the real filesystem
//! - **Clean separation** between note ingestion logic and I/O operations
//!
//! # Architecture
//!
//! The crate provides:
//! - [`Storage`] trait with a single `scan()` method returning [`SourceFile`]s
//! - [`FsStorage`] implementation walking a vault directory on disk
//! - [`MockStorage`] for testing (behind `mock` feature flag)
//!
//! # Example
//!
//! ```no_run
//! use std::path::PathBuf;
//! use folio_storage::{FsStorage, Storage};
//!
//! let storage = FsStorage::new(PathBuf::from("vault"));
//! for file in storage.scan().unwrap_or_default() {
//!     tracing::info!(path = %file.path.display(), "found note");
//! }
//! ```

mod fs;
#[cfg(feature = "mock")]
mod mock;
mod storage;

pub use fs::{DEFAULT_EXCLUDES, FsStorage};
#[cfg(feature = "mock")]
pub use mock::MockStorage;
pub use storage::{SourceFile, Storage, StorageError, StorageErrorKind};
