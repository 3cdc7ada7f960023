//! Short-lived per-admin pending keyword edits.
//!
//! A `/block ...edit` invocation registers the admin's next plain-text
//! message as the keyword to add to the chosen category. Entries expire
//! after a TTL; the expiry check happens under the same lock as
//! consumption, so a consumer never observes an expired entry.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

use tracing::debug;

use crate::rules::RuleCategory;

/// Default time-to-live for a pending edit.
pub const DEFAULT_PENDING_TTL: Duration = Duration::from_secs(5 * 60);

/// A registered pending edit.
#[derive(Debug, Clone)]
pub struct PendingEdit {
    /// Category the follow-up keyword will be added to.
    pub category: RuleCategory,
    /// Chat the originating command was issued in.
    pub chat_id: i64,
    registered_at: Instant,
}

impl PendingEdit {
    fn is_expired(&self, ttl: Duration) -> bool {
        self.registered_at.elapsed() >= ttl
    }
}

/// Registry of pending edits, at most one per admin.
pub struct PendingEditRegistry {
    ttl: Duration,
    entries: Mutex<HashMap<i64, PendingEdit>>,
}

impl PendingEditRegistry {
    /// Creates a registry with the default 5-minute TTL.
    pub fn new() -> Self {
        Self::with_ttl(DEFAULT_PENDING_TTL)
    }

    /// Creates a registry with a custom TTL.
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<i64, PendingEdit>> {
        match self.entries.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Registers a pending edit for an admin, replacing any existing one.
    pub fn register(&self, admin_id: i64, category: RuleCategory, chat_id: i64) {
        let entry = PendingEdit {
            category,
            chat_id,
            registered_at: Instant::now(),
        };
        if self.lock().insert(admin_id, entry).is_some() {
            debug!(admin_id, "replaced existing pending edit");
        }
    }

    /// Atomically fetches and removes the admin's pending edit.
    ///
    /// Returns `None` if there is no entry or the entry has expired;
    /// expired entries are dropped.
    pub fn consume(&self, admin_id: i64) -> Option<PendingEdit> {
        let mut entries = self.lock();
        let entry = entries.remove(&admin_id)?;
        if entry.is_expired(self.ttl) {
            debug!(admin_id, "pending edit expired before consumption");
            None
        } else {
            Some(entry)
        }
    }

    /// Drops all expired entries, returning how many were removed.
    pub fn purge_expired(&self) -> usize {
        let mut entries = self.lock();
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired(self.ttl));
        before - entries.len()
    }

    /// Number of live and not-yet-purged entries.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns true if no entries are registered.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

impl Default for PendingEditRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn consume_is_exactly_once() {
        let registry = PendingEditRegistry::new();
        registry.register(7, RuleCategory::VideoPhoto, 100);

        let edit = registry.consume(7).unwrap();
        assert_eq!(edit.category, RuleCategory::VideoPhoto);
        assert_eq!(edit.chat_id, 100);

        assert!(registry.consume(7).is_none());
    }

    #[test]
    fn new_registration_overwrites_old() {
        let registry = PendingEditRegistry::new();
        registry.register(7, RuleCategory::VideoPhoto, 100);
        registry.register(7, RuleCategory::Sticker, 100);

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.consume(7).unwrap().category, RuleCategory::Sticker);
    }

    #[test]
    fn entries_are_per_admin() {
        let registry = PendingEditRegistry::new();
        registry.register(1, RuleCategory::Global, 100);
        registry.register(2, RuleCategory::Animation, 100);

        assert_eq!(registry.consume(2).unwrap().category, RuleCategory::Animation);
        assert_eq!(registry.consume(1).unwrap().category, RuleCategory::Global);
    }

    #[test]
    fn expired_entries_are_never_consumed() {
        let registry = PendingEditRegistry::with_ttl(Duration::from_millis(10));
        registry.register(7, RuleCategory::Global, 100);

        std::thread::sleep(Duration::from_millis(25));
        assert!(registry.consume(7).is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn purge_drops_only_expired_entries() {
        let registry = PendingEditRegistry::with_ttl(Duration::from_millis(40));
        registry.register(1, RuleCategory::Global, 100);
        std::thread::sleep(Duration::from_millis(55));
        registry.register(2, RuleCategory::Sticker, 100);

        assert_eq!(registry.purge_expired(), 1);
        assert_eq!(registry.len(), 1);
        assert!(registry.consume(2).is_some());
    }
}
