//! SQLite rule store and audit log backend.
//!
//! A single database holds the rule document (one row with a revision
//! counter bumped on every save) and the audit trail. This is the backend
//! for deployments where the live process and the management surface share
//! one database rather than a watched file; the revision counter is the
//! change marker the cache polls.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use directories::ProjectDirs;
use rusqlite::{params, Connection};
use tracing::{error, info};

use warden_core::RuleSet;

use crate::audit::{AuditEntry, AuditLog, DEFAULT_RETENTION};
use crate::error::{Result, StorageError};
use crate::store::RuleStore;

/// Rule store and audit log backed by SQLite.
///
/// The connection is Mutex-protected; for a single moderation process with
/// occasional admin writes this is adequate concurrency.
#[derive(Clone)]
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
    retention: usize,
}

impl SqliteStore {
    /// Opens (or creates) a database at the given path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        info!("Opening moderation database at: {:?}", path);
        let conn = Connection::open(path)?;
        Self::from_connection(conn)
    }

    /// Opens the database at the default per-user data location.
    pub fn open_default() -> Result<Self> {
        Self::open(Self::default_path()?)
    }

    /// Creates an in-memory database (for testing).
    pub fn in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    /// Default database path.
    pub fn default_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("com", "warden", "warden")
            .ok_or_else(|| StorageError::Config("could not determine app data directory".into()))?;
        Ok(proj_dirs.data_dir().join("warden.db"))
    }

    /// Overrides the audit retention cap.
    pub fn with_retention(mut self, retention: usize) -> Self {
        self.retention = retention;
        self
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;",
        )?;
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS rule_document (
                 id       INTEGER PRIMARY KEY CHECK (id = 1),
                 document TEXT NOT NULL,
                 revision INTEGER NOT NULL DEFAULT 0
             );
             CREATE TABLE IF NOT EXISTS audit_log (
                 id         INTEGER PRIMARY KEY AUTOINCREMENT,
                 timestamp  TEXT NOT NULL,
                 user_id    INTEGER NOT NULL,
                 username   TEXT NOT NULL,
                 media_type TEXT NOT NULL,
                 reason     TEXT NOT NULL,
                 content    TEXT NOT NULL
             );",
        )?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            retention: DEFAULT_RETENTION,
        })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| StorageError::Config("database connection poisoned".into()))
    }

    fn try_append(&self, entry: &AuditEntry) -> Result<()> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO audit_log (timestamp, user_id, username, media_type, reason, content)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                entry.timestamp.to_rfc3339(),
                entry.user_id,
                entry.username,
                entry.media_type,
                entry.reason,
                entry.content,
            ],
        )?;
        conn.execute(
            "DELETE FROM audit_log WHERE id NOT IN
                 (SELECT id FROM audit_log ORDER BY id DESC LIMIT ?1)",
            [self.retention as i64],
        )?;
        Ok(())
    }
}

impl RuleStore for SqliteStore {
    fn load(&self) -> RuleSet {
        let document: Option<String> = match self.conn() {
            Ok(conn) => conn
                .query_row("SELECT document FROM rule_document WHERE id = 1", [], |row| {
                    row.get(0)
                })
                .ok(),
            Err(e) => {
                error!("could not read rule document: {e}");
                None
            }
        };

        match document {
            Some(json) => serde_json::from_str(&json).unwrap_or_else(|e| {
                error!("stored rule document is corrupt: {e}");
                RuleSet::new()
            }),
            None => RuleSet::new(),
        }
    }

    fn save(&self, rules: &RuleSet) -> Result<()> {
        let json = serde_json::to_string(rules)?;
        self.conn()?.execute(
            "INSERT INTO rule_document (id, document, revision) VALUES (1, ?1, 1)
             ON CONFLICT(id) DO UPDATE
                 SET document = excluded.document,
                     revision = rule_document.revision + 1",
            [json],
        )?;
        Ok(())
    }

    fn change_marker(&self) -> Option<u64> {
        self.conn()
            .ok()?
            .query_row("SELECT revision FROM rule_document WHERE id = 1", [], |row| {
                row.get::<_, i64>(0)
            })
            .ok()
            .map(|rev| rev as u64)
    }
}

impl AuditLog for SqliteStore {
    fn append(&self, entry: AuditEntry) {
        if let Err(e) = self.try_append(&entry) {
            error!("failed to append audit entry: {e}");
        }
    }

    fn list(&self, limit: usize) -> Result<Vec<AuditEntry>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT timestamp, user_id, username, media_type, reason, content
             FROM audit_log ORDER BY id DESC LIMIT ?1",
        )?;

        let entries = stmt
            .query_map([limit as i64], |row| {
                Ok(AuditEntry {
                    timestamp: parse_datetime(&row.get::<_, String>(0)?),
                    user_id: row.get(1)?,
                    username: row.get(2)?,
                    media_type: row.get(3)?,
                    reason: row.get(4)?,
                    content: row.get(5)?,
                })
            })?
            .filter_map(|r| r.ok())
            .collect();

        Ok(entries)
    }

    fn clear(&self) -> Result<()> {
        self.conn()?.execute("DELETE FROM audit_log", [])?;
        Ok(())
    }
}

/// Parse a stored timestamp, falling back to now on malformed rows.
fn parse_datetime(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}
