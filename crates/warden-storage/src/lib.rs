//! Warden Storage - rule store backends, audit log, and rule cache.
//!
//! This crate persists the moderation rule document and the audit trail
//! behind backend-agnostic contracts:
//!
//! - [`RuleStore`]: durable singleton rule document with read-modify-write
//!   mutations; implemented by [`JsonFileStore`] (watched local document)
//!   and [`SqliteStore`] (shared database with a revision counter).
//! - [`AuditLog`]: capped, newest-first record of moderation actions;
//!   implemented by [`JsonFileAuditLog`] and [`SqliteStore`].
//! - [`RuleCache`]: atomic in-memory snapshot over a store, refreshed by
//!   marker polling and after the process's own writes.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use warden_core::RuleCategory;
//! use warden_storage::{JsonFileStore, RuleCache, RuleStore};
//!
//! let store = Arc::new(JsonFileStore::open_default().unwrap());
//! store.add_pattern(RuleCategory::Global, "spam").unwrap();
//!
//! let cache = RuleCache::new(store);
//! assert!(cache.current().contains(RuleCategory::Global, "spam"));
//! ```

pub mod audit;
mod cache;
pub mod error;
mod file;
mod sqlite;
mod store;

pub use audit::{
    create_snippet, AuditEntry, AuditLog, JsonFileAuditLog, DEFAULT_RETENTION, SNIPPET_MAX_LEN,
};
pub use cache::RuleCache;
pub use error::{Result, StorageError};
pub use file::JsonFileStore;
pub use sqlite::SqliteStore;
pub use store::RuleStore;
