//! The rule store contract.
//!
//! A [`RuleStore`] owns the durable rule document. Mutations are
//! read-modify-write cycles against a freshly loaded document so that
//! index-based edits and duplicate checks always validate against current
//! state, and the whole document is replaced atomically on save
//! (last-write-wins). The default method implementations carry that cycle,
//! so the mutation logic exists once and every backend, and every caller
//! including the external management surface, goes through the same
//! validation.

use warden_core::{AddOutcome, RuleCategory, RuleError, RuleSet};

use crate::error::Result;

/// Durable persistence for the singleton rule document.
pub trait RuleStore: Send + Sync {
    /// Loads the current rule document.
    ///
    /// Never fails: an absent or corrupt source is logged and yields a
    /// valid empty document.
    fn load(&self) -> RuleSet;

    /// Replaces the whole stored document.
    fn save(&self, rules: &RuleSet) -> Result<()>;

    /// An opaque marker that changes when another writer modifies the
    /// backend, used by the cache's poll loop. `None` when the backend
    /// cannot provide one (e.g. the file does not exist yet).
    fn change_marker(&self) -> Option<u64>;

    /// Idempotently adds a value to a category.
    ///
    /// The value is trimmed and must be non-empty. Duplicate comparison is
    /// case-insensitive for keyword categories and exact for identity
    /// lists; a duplicate leaves the stored document untouched.
    fn add_pattern(&self, category: RuleCategory, value: &str) -> Result<AddOutcome> {
        let value = value.trim();
        if value.is_empty() {
            return Err(RuleError::EmptyValue.into());
        }

        let mut rules = self.load();
        let outcome = rules.add(category, value);
        if outcome.was_added() {
            self.save(&rules)?;
        }
        Ok(outcome)
    }

    /// Removes the entry at `index` in a category.
    ///
    /// Bounds are validated against a fresh read; returns `false` and
    /// leaves the document unchanged when the index is out of range.
    fn remove_pattern_at(&self, category: RuleCategory, index: usize) -> Result<bool> {
        let mut rules = self.load();
        let list = rules.list_mut(category);
        if index >= list.len() {
            return Ok(false);
        }
        list.remove(index);
        self.save(&rules)?;
        Ok(true)
    }

    /// Replaces the entry at `index` in a category with a new value.
    ///
    /// The value is trimmed and must be non-empty; returns `false` when
    /// the index is out of range.
    fn replace_pattern_at(&self, category: RuleCategory, index: usize, value: &str) -> Result<bool> {
        let value = value.trim();
        if value.is_empty() {
            return Err(RuleError::EmptyValue.into());
        }

        let mut rules = self.load();
        let list = rules.list_mut(category);
        if index >= list.len() {
            return Ok(false);
        }
        list[index] = value.to_string();
        self.save(&rules)?;
        Ok(true)
    }
}
