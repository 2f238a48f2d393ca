//! Mirror pruner
//!
//! After a mirror-mode forward pass, the target tree is walked and every
//! directory or file with no same-relative-path counterpart in the source is
//! moved to the trash. Decisions are purely existence-based; the journal is
//! never consulted.

use crate::executor::trash::{move_to_trash, snapshot_name};
use crate::scanner::TreeWalk;
use crate::types::{EntryKind, FileEntry, SyncError};
use std::path::{Path, PathBuf};

/// Counters reported by a prune pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PruneStats {
    pub dirs_deleted: u64,
    pub files_deleted: u64,
}

/// Remove everything under `target_root` that is not under `source_root`.
///
/// The target tree is snapshotted before any mutation, so trashing a
/// directory cannot disturb the traversal. All entries of one pass land in a
/// single trash snapshot, even across a second boundary. Entries beneath an
/// already-trashed directory are skipped, not double-counted. `on_trash`
/// observes each trashed entry.
pub fn prune_target(
    source_root: &Path,
    target_root: &Path,
    mut on_trash: impl FnMut(&Path, EntryKind),
) -> Result<PruneStats, SyncError> {
    let snapshot: Vec<FileEntry> = TreeWalk::new(target_root)?.collect::<Result<_, _>>()?;
    let trash_snapshot = snapshot_name();

    let mut stats = PruneStats::default();
    let mut trashed_dirs: Vec<PathBuf> = Vec::new();

    for entry in snapshot {
        if entry.is_root() {
            continue;
        }
        if trashed_dirs.iter().any(|dir| entry.relative.starts_with(dir)) {
            continue;
        }
        if source_root.join(&entry.relative).exists() {
            continue;
        }

        move_to_trash(&entry.path, target_root, &entry.relative, &trash_snapshot)?;
        on_trash(&entry.relative, entry.kind);

        match entry.kind {
            EntryKind::Directory => {
                stats.dirs_deleted += 1;
                trashed_dirs.push(entry.relative.clone());
            }
            EntryKind::File => stats.files_deleted += 1,
        }
    }

    Ok(stats)
}
