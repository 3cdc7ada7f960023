//! JSON-file rule store backend.
//!
//! Persists the rule document as a single pretty-printed JSON file, the
//! layout an operator edits by hand or through the management surface.
//! Saves replace the document atomically (write-temp-then-rename) so a
//! concurrent reader never observes a torn file; external edits are
//! detected through the file's modification time.

use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;

use directories::ProjectDirs;
use tracing::{error, info, warn};

use warden_core::RuleSet;

use crate::error::{Result, StorageError};
use crate::store::RuleStore;

/// Rule store backed by a local JSON document.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Creates a store for the given document path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Creates a store at the default per-user data location, creating
    /// parent directories as needed.
    pub fn open_default() -> Result<Self> {
        let path = Self::default_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        info!("Rule document at: {:?}", path);
        Ok(Self::new(path))
    }

    /// Default rule document path.
    pub fn default_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("com", "warden", "warden")
            .ok_or_else(|| StorageError::Config("could not determine app data directory".into()))?;
        Ok(proj_dirs.data_dir().join("rules.json"))
    }

    /// The document path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RuleStore for JsonFileStore {
    fn load(&self) -> RuleSet {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(rules) => rules,
                Err(e) => {
                    error!("rule document at {:?} is corrupt: {e}", self.path);
                    RuleSet::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!("rule document {:?} not found, starting empty", self.path);
                RuleSet::new()
            }
            Err(e) => {
                error!("could not read rule document {:?}: {e}", self.path);
                RuleSet::new()
            }
        }
    }

    fn save(&self, rules: &RuleSet) -> Result<()> {
        let json = serde_json::to_string_pretty(rules)?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    fn change_marker(&self) -> Option<u64> {
        let modified = std::fs::metadata(&self.path).and_then(|m| m.modified());
        match modified {
            Ok(time) => time
                .duration_since(UNIX_EPOCH)
                .ok()
                .map(|d| d.as_nanos() as u64),
            Err(e) => {
                if e.kind() != std::io::ErrorKind::NotFound {
                    warn!("could not stat rule document {:?}: {e}", self.path);
                }
                None
            }
        }
    }
}
