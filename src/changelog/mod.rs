//! Per-root write journal
//!
//! Each synchronized root carries a journal of what this tool wrote into it
//! and when, persisted as `.msync_journal.json` under the root. The journal
//! is what lets the decision engine tell "I wrote this" apart from "this
//! changed independently": without it, a bidirectional run would recopy its
//! own writes forever.

use crate::types::SyncError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Backing-store filename, reserved from traversal.
pub const JOURNAL_FILE_NAME: &str = ".msync_journal.json";

/// One persisted write record: this tool wrote `path` at `written_at`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeLogEntry {
    pub path: PathBuf,
    pub written_at: DateTime<Utc>,
}

/// Write journal for exactly one root.
///
/// Held as a map from path to write timestamp, so at most one entry per path
/// exists structurally. A journal is always read from and written back to the
/// root it describes, never exchanged across roots.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChangeLog {
    entries: BTreeMap<PathBuf, DateTime<Utc>>,
}

impl ChangeLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Backing-store path for a root.
    pub fn store_path(root: &Path) -> PathBuf {
        root.join(JOURNAL_FILE_NAME)
    }

    /// Load the journal persisted under `root`.
    ///
    /// A missing store means "no history" and yields an empty journal; an
    /// unparseable store is a reported error.
    pub fn load(root: &Path) -> Result<Self, SyncError> {
        let store = Self::store_path(root);
        let raw = match fs::read_to_string(&store) {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Self::new()),
            Err(err) => return Err(SyncError::Io(err)),
        };

        let records: Vec<ChangeLogEntry> =
            serde_json::from_str(&raw).map_err(|err| SyncError::Journal {
                path: store,
                message: err.to_string(),
            })?;

        Ok(Self {
            entries: records
                .into_iter()
                .map(|record| (record.path, record.written_at))
                .collect(),
        })
    }

    /// When this tool last wrote `path`, if it did.
    pub fn written_at(&self, path: &Path) -> Option<DateTime<Utc>> {
        self.entries.get(path).copied()
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.entries.contains_key(path)
    }

    /// Drop the entry for `path`. Returns whether one existed.
    pub fn remove(&mut self, path: &Path) -> bool {
        self.entries.remove(path).is_some()
    }

    /// Record a write, replacing any prior entry for the same path.
    pub fn record_write(&mut self, path: PathBuf, written_at: DateTime<Utc>) {
        self.entries.insert(path, written_at);
    }

    /// Remove every entry whose path no longer exists on disk.
    ///
    /// Called once per journal at session start, before any decision is made,
    /// so stale history never influences decisions. Returns the number of
    /// entries removed.
    pub fn prune_stale(&mut self) -> usize {
        let before = self.entries.len();
        self.entries.retain(|path, _| path.exists());
        before - self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Write the journal back to its root's backing store.
    ///
    /// A non-empty journal overwrites the store; an empty journal deletes the
    /// store file if one exists, so no empty-state cruft is left behind.
    /// Called once per root at the very end of a session.
    pub fn persist(&self, root: &Path) -> Result<(), SyncError> {
        let store = Self::store_path(root);

        if self.entries.is_empty() {
            return match fs::remove_file(&store) {
                Ok(()) => Ok(()),
                Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
                Err(err) => Err(SyncError::Io(err)),
            };
        }

        let records: Vec<ChangeLogEntry> = self
            .entries
            .iter()
            .map(|(path, written_at)| ChangeLogEntry {
                path: path.clone(),
                written_at: *written_at,
            })
            .collect();

        let json = serde_json::to_string_pretty(&records).map_err(|err| SyncError::Journal {
            path: store.clone(),
            message: err.to_string(),
        })?;

        fs::write(&store, json).map_err(SyncError::Io)
    }
}
