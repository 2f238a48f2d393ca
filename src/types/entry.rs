//! FileEntry - a single directory or file seen during traversal

use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Kind of filesystem entry reported by the walker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
}

/// A directory or file produced by the tree walker.
///
/// Entries are transient: they describe the filesystem snapshot at traversal
/// time and are never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct FileEntry {
    /// Absolute path on disk
    pub path: PathBuf,

    /// Path relative to the walked root (empty for the root itself)
    pub relative: PathBuf,

    /// File or directory
    pub kind: EntryKind,

    /// Last modification time
    pub modified: SystemTime,

    /// Creation time; equals `modified` on filesystems that do not report it
    pub created: SystemTime,
}

impl FileEntry {
    /// Create a new FileEntry
    pub fn new(
        path: PathBuf,
        relative: PathBuf,
        kind: EntryKind,
        modified: SystemTime,
        created: SystemTime,
    ) -> Self {
        Self {
            path,
            relative,
            kind,
            modified,
            created,
        }
    }

    pub fn is_file(&self) -> bool {
        self.kind == EntryKind::File
    }

    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Directory
    }

    /// True when this entry is the walked root itself.
    pub fn is_root(&self) -> bool {
        self.relative.as_os_str().is_empty()
    }

    /// Join this entry's relative path onto another root.
    pub fn path_under(&self, root: &Path) -> PathBuf {
        root.join(&self.relative)
    }
}
