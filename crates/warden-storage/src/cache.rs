//! In-memory rule snapshot cache.
//!
//! Readers get the last successfully loaded [`RuleSet`] as a cheap
//! `Arc` clone without touching the backend; reloads swap the whole
//! snapshot atomically so a reader sees either the old or the new rules in
//! full, never a mix. External edits are picked up by polling the store's
//! change marker; the process's own writes are made visible by calling
//! [`RuleCache::refresh`] right after the store write completes.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use arc_swap::ArcSwap;
use tracing::debug;

use warden_core::RuleSet;

use crate::store::RuleStore;

/// Atomic snapshot cache over a [`RuleStore`].
pub struct RuleCache {
    store: Arc<dyn RuleStore>,
    snapshot: ArcSwap<RuleSet>,
    /// Last change marker observed from the store; 0 = none seen.
    last_marker: AtomicU64,
}

impl RuleCache {
    /// Creates a cache, performing the first load synchronously.
    pub fn new(store: Arc<dyn RuleStore>) -> Self {
        let rules = store.load();
        let marker = store.change_marker().unwrap_or(0);
        Self {
            store,
            snapshot: ArcSwap::from_pointee(rules),
            last_marker: AtomicU64::new(marker),
        }
    }

    /// Returns the current snapshot. Never performs I/O.
    pub fn current(&self) -> Arc<RuleSet> {
        self.snapshot.load_full()
    }

    /// The underlying store, for mutation paths.
    pub fn store(&self) -> &Arc<dyn RuleStore> {
        &self.store
    }

    /// Reloads from the store and swaps the snapshot atomically.
    pub fn refresh(&self) {
        // Sample the marker before loading: a write that lands in between
        // moves the marker past what we record, so the next poll reloads
        // again instead of missing it.
        let marker = self.store.change_marker().unwrap_or(0);
        let rules = self.store.load();
        self.last_marker.store(marker, Ordering::Release);
        self.snapshot.store(Arc::new(rules));
    }

    /// Reloads only if the store's change marker moved since the last
    /// observation. Returns true if a reload happened.
    pub fn refresh_if_changed(&self) -> bool {
        let marker = match self.store.change_marker() {
            Some(marker) => marker,
            None => return false,
        };
        if marker == self.last_marker.load(Ordering::Acquire) {
            return false;
        }
        debug!("rule document changed externally, reloading");
        self.refresh();
        true
    }
}
