//! Persisted form state.
//!
//! The front end keeps its last-edited roster and rule rows between
//! sessions. Server-side that is a plain JSON document with explicit
//! read/write calls: loaded once when the store opens, rewritten on
//! every save. Nothing here feeds the generator implicitly.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::dto::PairingDto;

/// Saved form state: team size, player slots, and both rule lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Preferences {
    pub team_size: usize,
    pub players: Vec<String>,
    pub same_team: Vec<PairingDto>,
    pub diff_team: Vec<PairingDto>,
}

impl Default for Preferences {
    /// A blank 5v5 form.
    fn default() -> Self {
        Self {
            team_size: 5,
            players: vec![String::new(); 10],
            same_team: Vec::new(),
            diff_team: Vec::new(),
        }
    }
}

/// File-backed preference store with an in-memory snapshot.
pub struct PrefStore {
    path: PathBuf,
    current: RwLock<Preferences>,
}

impl PrefStore {
    /// Opens the store, loading the saved document when present.
    ///
    /// A missing file yields defaults silently; an unreadable or corrupt
    /// one yields defaults with a warning, so a bad document never takes
    /// the service down.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let current = match fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str(&raw) {
                Ok(prefs) => prefs,
                Err(err) => {
                    warn!(error = %err, path = %path.display(), "ignoring corrupt preferences file");
                    Preferences::default()
                }
            },
            Err(err) if err.kind() == io::ErrorKind::NotFound => Preferences::default(),
            Err(err) => {
                warn!(error = %err, path = %path.display(), "failed to read preferences file");
                Preferences::default()
            }
        };

        Self {
            path,
            current: RwLock::new(current),
        }
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Snapshot of the current preferences.
    pub fn get(&self) -> Preferences {
        self.current.read().clone()
    }

    /// Persists new preferences and replaces the in-memory snapshot.
    ///
    /// The snapshot is only replaced after the write succeeds, so a
    /// failed save leaves the store consistent with the file.
    pub fn set(&self, prefs: Preferences) -> io::Result<()> {
        let json = serde_json::to_string_pretty(&prefs)?;
        fs::write(&self.path, json)?;
        *self.current.write() = prefs;
        Ok(())
    }
}
