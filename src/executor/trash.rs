//! Recoverable trash
//!
//! Pruned entries are moved under `.msync_trash/<timestamp>/` in the target
//! root with their original relative paths preserved. A manifest per snapshot
//! is updated for recovery/audit. One prune pass fills exactly one snapshot
//! directory.

use crate::executor::copy::copy_file_atomic;
use crate::types::SyncError;
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/// Trash directory name, reserved from traversal.
pub const TRASH_DIR_NAME: &str = ".msync_trash";

/// One trashed entry in a snapshot manifest
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrashedEntry {
    /// Relative path from the target root (original location)
    pub original_path: String,
    /// ISO 8601 timestamp when the entry was trashed
    pub deleted_at: String,
    /// "file" or "directory"
    pub kind: String,
}

/// Manifest tracking every entry moved into one trash snapshot
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrashManifest {
    pub entries: Vec<TrashedEntry>,
}

impl TrashManifest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, entry: TrashedEntry) {
        self.entries.push(entry);
    }
}

/// Snapshot directory name for one prune pass.
///
/// Computed once per pass and passed to every `move_to_trash` call, so a pass
/// spanning a second boundary still lands all its entries (and one manifest)
/// in a single snapshot directory.
pub fn snapshot_name() -> String {
    Local::now().format("%Y-%m-%d_%H%M%S").to_string()
}

/// Move a file or directory into the trash instead of deleting it.
///
/// The original is never removed unless it has safely arrived in the trash:
/// the fast path is a rename, with a copy-then-remove fallback when the trash
/// lands on a different device.
pub fn move_to_trash(
    target_path: &Path,
    dest_root: &Path,
    relative_path: &Path,
    snapshot: &str,
) -> Result<(), SyncError> {
    let trash_root = dest_root.join(TRASH_DIR_NAME).join(snapshot);
    let trash_entry_path = trash_root.join(relative_path);

    if let Some(parent) = trash_entry_path.parent() {
        fs::create_dir_all(parent).map_err(SyncError::Io)?;
    }

    let metadata = fs::symlink_metadata(target_path).map_err(SyncError::Io)?;
    let is_dir = metadata.file_type().is_dir();

    match fs::rename(target_path, &trash_entry_path) {
        Ok(()) => {}
        Err(err) if err.kind() == ErrorKind::CrossesDevices => {
            if is_dir {
                copy_dir_recursive(target_path, &trash_entry_path)?;
                fs::remove_dir_all(target_path).map_err(SyncError::Io)?;
            } else {
                copy_file_atomic(target_path, &trash_entry_path)?;
                fs::remove_file(target_path).map_err(SyncError::Io)?;
            }
        }
        Err(err) => return Err(SyncError::Io(err)),
    }

    append_manifest(&trash_root, relative_path, is_dir)
}

fn copy_dir_recursive(src: &Path, dest: &Path) -> Result<(), SyncError> {
    fs::create_dir_all(dest).map_err(SyncError::Io)?;
    for entry in fs::read_dir(src).map_err(SyncError::Io)? {
        let entry = entry.map_err(SyncError::Io)?;
        let child_dest = dest.join(entry.file_name());
        if entry.file_type().map_err(SyncError::Io)?.is_dir() {
            copy_dir_recursive(&entry.path(), &child_dest)?;
        } else {
            copy_file_atomic(&entry.path(), &child_dest)?;
        }
    }
    Ok(())
}

// Manifest writes use a read-modify-write flow and are not transactional.
fn append_manifest(trash_root: &Path, relative_path: &Path, is_dir: bool) -> Result<(), SyncError> {
    let manifest_path = trash_root.join("MANIFEST.json");

    let mut manifest = if manifest_path.exists() {
        let raw = fs::read_to_string(&manifest_path).map_err(SyncError::Io)?;
        serde_json::from_str(&raw).map_err(|err| SyncError::Journal {
            path: manifest_path.clone(),
            message: err.to_string(),
        })?
    } else {
        TrashManifest::new()
    };

    manifest.add(TrashedEntry {
        original_path: relative_path.to_string_lossy().to_string(),
        deleted_at: Local::now().to_rfc3339(),
        kind: if is_dir { "directory" } else { "file" }.to_string(),
    });

    let json = serde_json::to_string_pretty(&manifest).map_err(|err| SyncError::Journal {
        path: manifest_path.clone(),
        message: err.to_string(),
    })?;

    fs::write(&manifest_path, json).map_err(SyncError::Io)
}
