//! Append-only audit trail of moderation actions.
//!
//! Appends are fire-and-forget from the moderation path: a failed append is
//! logged and never fails the action that was already taken. Retention is a
//! ring-buffer cap enforced at append time.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::error::Result;

/// Maximum stored content snippet length, in characters.
pub const SNIPPET_MAX_LEN: usize = 100;

/// Default ring-buffer retention cap.
pub const DEFAULT_RETENTION: usize = 1000;

/// One recorded moderation action. Immutable once written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEntry {
    /// When the action was taken.
    pub timestamp: DateTime<Utc>,
    /// Identity of the user whose message was acted on.
    pub user_id: i64,
    /// Username or display-name fallback at the time of the action.
    pub username: String,
    /// Media kind label.
    pub media_type: String,
    /// Human-readable reason for the action.
    pub reason: String,
    /// Truncated content snippet.
    pub content: String,
}

impl AuditEntry {
    /// Creates an entry timestamped now, truncating the content snippet.
    pub fn new(
        user_id: i64,
        username: impl Into<String>,
        media_type: impl Into<String>,
        reason: impl Into<String>,
        content: &str,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            user_id,
            username: username.into(),
            media_type: media_type.into(),
            reason: reason.into(),
            content: create_snippet(content),
        }
    }
}

/// Truncates text to [`SNIPPET_MAX_LEN`] characters on a char boundary.
pub fn create_snippet(text: &str) -> String {
    if text.chars().count() <= SNIPPET_MAX_LEN {
        text.to_string()
    } else {
        text.chars().take(SNIPPET_MAX_LEN).collect()
    }
}

/// Append-only store of moderation actions.
pub trait AuditLog: Send + Sync {
    /// Records an entry. Failures are logged internally and never surface
    /// to the caller.
    fn append(&self, entry: AuditEntry);

    /// Returns up to `limit` entries, newest first.
    fn list(&self, limit: usize) -> Result<Vec<AuditEntry>>;

    /// Removes all entries.
    fn clear(&self) -> Result<()>;
}

/// Persisted layout of the file-backed log.
#[derive(Debug, Default, Serialize, Deserialize)]
struct AuditDocument {
    /// Entries, newest first.
    #[serde(default)]
    entries: Vec<AuditEntry>,
}

/// Audit log backed by a local JSON document, capped at append time.
#[derive(Debug, Clone)]
pub struct JsonFileAuditLog {
    path: PathBuf,
    retention: usize,
}

impl JsonFileAuditLog {
    /// Creates a log at the given path with the default retention cap.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            retention: DEFAULT_RETENTION,
        }
    }

    /// Overrides the retention cap.
    pub fn with_retention(mut self, retention: usize) -> Self {
        self.retention = retention;
        self
    }

    /// The document path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load_document(&self) -> AuditDocument {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) => serde_json::from_str(&contents).unwrap_or_else(|e| {
                error!("audit document at {:?} is corrupt: {e}", self.path);
                AuditDocument::default()
            }),
            Err(_) => AuditDocument::default(),
        }
    }

    fn save_document(&self, doc: &AuditDocument) -> Result<()> {
        let json = serde_json::to_string_pretty(doc)?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl AuditLog for JsonFileAuditLog {
    fn append(&self, entry: AuditEntry) {
        let mut doc = self.load_document();
        doc.entries.insert(0, entry);
        doc.entries.truncate(self.retention);
        if let Err(e) = self.save_document(&doc) {
            error!("failed to append audit entry: {e}");
        }
    }

    fn list(&self, limit: usize) -> Result<Vec<AuditEntry>> {
        let mut doc = self.load_document();
        doc.entries.truncate(limit);
        Ok(doc.entries)
    }

    fn clear(&self) -> Result<()> {
        self.save_document(&AuditDocument::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_log(retention: usize) -> (tempfile::TempDir, JsonFileAuditLog) {
        let dir = tempfile::tempdir().unwrap();
        let log = JsonFileAuditLog::new(dir.path().join("audit.json")).with_retention(retention);
        (dir, log)
    }

    fn entry(reason: &str) -> AuditEntry {
        AuditEntry::new(42, "alice", "photo", reason, "some caption")
    }

    #[test]
    fn entries_come_back_newest_first() {
        let (_dir, log) = temp_log(10);
        log.append(entry("first"));
        log.append(entry("second"));

        let entries = log.list(10).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].reason, "second");
        assert_eq!(entries[1].reason, "first");
    }

    #[test]
    fn retention_cap_is_enforced_at_append() {
        let (_dir, log) = temp_log(3);
        for i in 0..5 {
            log.append(entry(&format!("r{i}")));
        }

        let entries = log.list(100).unwrap();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].reason, "r4");
        assert_eq!(entries[2].reason, "r2");
    }

    #[test]
    fn list_respects_limit() {
        let (_dir, log) = temp_log(10);
        for i in 0..4 {
            log.append(entry(&format!("r{i}")));
        }
        assert_eq!(log.list(2).unwrap().len(), 2);
    }

    #[test]
    fn clear_empties_the_log() {
        let (_dir, log) = temp_log(10);
        log.append(entry("gone"));
        log.clear().unwrap();
        assert!(log.list(10).unwrap().is_empty());
    }

    #[test]
    fn snippet_truncates_on_char_boundary() {
        let short = "abc";
        assert_eq!(create_snippet(short), "abc");

        let long: String = "é".repeat(150);
        let snippet = create_snippet(&long);
        assert_eq!(snippet.chars().count(), SNIPPET_MAX_LEN);
    }

    #[test]
    fn entry_constructor_truncates_content() {
        let long: String = "x".repeat(250);
        let e = AuditEntry::new(1, "bob", "video", "spam", &long);
        assert_eq!(e.content.len(), SNIPPET_MAX_LEN);
    }
}
