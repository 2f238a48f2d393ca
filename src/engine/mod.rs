//! Per-file decision engine
//!
//! `decide` is a pure function over immutable snapshots: the source entry,
//! the target's filesystem state, and the consulted journal. It never touches
//! the filesystem and never mutates the journal, which is why the counting
//! pass and the execution pass can share it and always agree.

use crate::changelog::ChangeLog;
use crate::types::{FileEntry, OverwritePolicy, SyncDecision, SyncError, TimestampBasis};
use chrono::{DateTime, Utc};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use std::time::SystemTime;

/// Timestamp snapshot of an existing target path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetState {
    pub modified: SystemTime,
    pub created: SystemTime,
}

impl TargetState {
    /// Snapshot the target path, or `None` when it does not exist.
    pub fn probe(path: &Path) -> Result<Option<Self>, SyncError> {
        let metadata = match fs::metadata(path) {
            Ok(metadata) => metadata,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(SyncError::Io(err)),
        };

        let modified = metadata.modified()?;
        Ok(Some(Self {
            modified,
            created: metadata.created().unwrap_or(modified),
        }))
    }
}

/// Decide what to do with one candidate file.
///
/// The candidate has already passed extension filtering. `journal` is the
/// journal of the pass's *source* root: it records what this tool previously
/// wrote into that root, and is authoritative over raw timestamps once an
/// entry exists — it disambiguates "I wrote this" from "this changed
/// independently".
///
/// Order matters:
/// 1. A missing target is always `CopyNew`, whatever the journal says.
/// 2. A journal entry decides next: the source was edited after our write
///    (overwrite) or it still is our write (skip).
/// 3. With no history, fall back to a raw timestamp comparison on the
///    configured basis; only a strictly newer source wins.
pub fn decide(
    source: &FileEntry,
    target: Option<&TargetState>,
    journal: &ChangeLog,
    policy: OverwritePolicy,
    basis: TimestampBasis,
) -> SyncDecision {
    let Some(target) = target else {
        return SyncDecision::CopyNew;
    };

    if let Some(written_at) = journal.written_at(&source.path) {
        if DateTime::<Utc>::from(source.modified) > written_at {
            return overwrite_for(policy);
        }
        return SyncDecision::Skip;
    }

    let (source_ts, target_ts) = match basis {
        TimestampBasis::Modified => (source.modified, target.modified),
        TimestampBasis::Created => (source.created, target.created),
    };

    if source_ts > target_ts {
        overwrite_for(policy)
    } else {
        SyncDecision::Skip
    }
}

fn overwrite_for(policy: OverwritePolicy) -> SyncDecision {
    match policy {
        OverwritePolicy::Replace => SyncDecision::Overwrite,
        OverwritePolicy::KeepOld => SyncDecision::OverwriteKeepOld,
    }
}
