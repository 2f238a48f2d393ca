//! Lazy depth-first directory traversal

use crate::changelog::JOURNAL_FILE_NAME;
use crate::executor::copy::PART_FILE_NAME;
use crate::executor::trash::TRASH_DIR_NAME;
use crate::types::{EntryKind, FileEntry, SyncError};
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

/// OS metadata files that are never sync candidates.
const OS_METADATA_NAMES: [&str; 3] = [".DS_Store", "Thumbs.db", "desktop.ini"];

/// Whether a file name is reserved for the tool itself or OS bookkeeping.
///
/// Reserved names are invisible to traversal and therefore to copy and prune
/// candidacy: the journal backing store, the trash directory, the in-flight
/// copy temporary, and OS metadata files.
pub fn is_reserved_name(name: &OsStr) -> bool {
    name == JOURNAL_FILE_NAME
        || name == TRASH_DIR_NAME
        || name == PART_FILE_NAME
        || OS_METADATA_NAMES.iter().any(|reserved| name == *reserved)
}

/// Depth-first walk over one tree.
///
/// Yields every directory and file under the root, directories before the
/// files they contain, siblings in file-name order. The root itself is
/// reported first with an empty relative path. The walk is lazy and
/// restartable: construct a new `TreeWalk` to traverse again.
pub struct TreeWalk {
    root: PathBuf,
    inner: ignore::Walk,
}

impl TreeWalk {
    /// Start a walk at `root`.
    ///
    /// Fails with `SyncError::MissingRoot` when the root does not exist or is
    /// not a directory; this is fatal for the whole session.
    pub fn new(root: &Path) -> Result<Self, SyncError> {
        let metadata = fs::metadata(root).map_err(|_| SyncError::MissingRoot {
            path: root.to_path_buf(),
        })?;
        if !metadata.is_dir() {
            return Err(SyncError::MissingRoot {
                path: root.to_path_buf(),
            });
        }

        // Standard ignore-file filters are disabled: this tool syncs
        // everything except its own reserved names.
        let inner = ignore::WalkBuilder::new(root)
            .standard_filters(false)
            .follow_links(false)
            .sort_by_file_name(|a, b| a.cmp(b))
            .filter_entry(|entry| !is_reserved_name(entry.file_name()))
            .build();

        Ok(Self {
            root: root.to_path_buf(),
            inner,
        })
    }
}

impl Iterator for TreeWalk {
    type Item = Result<FileEntry, SyncError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let entry = match self.inner.next()? {
                Ok(entry) => entry,
                Err(err) => {
                    let io = err
                        .into_io_error()
                        .unwrap_or_else(|| std::io::Error::other("directory traversal failed"));
                    return Some(Err(SyncError::Io(io)));
                }
            };

            let kind = match entry.file_type() {
                Some(ft) if ft.is_dir() => EntryKind::Directory,
                Some(ft) if ft.is_file() => EntryKind::File,
                // Symlinks and special files (pipes, sockets, devices) are
                // not sync candidates.
                _ => continue,
            };

            let metadata = match entry.metadata() {
                Ok(metadata) => metadata,
                Err(err) => {
                    let io = err
                        .into_io_error()
                        .unwrap_or_else(|| std::io::Error::other("failed to read metadata"));
                    return Some(Err(SyncError::Io(io)));
                }
            };

            let modified = match metadata.modified() {
                Ok(modified) => modified,
                Err(err) => return Some(Err(SyncError::Io(err))),
            };
            let created = metadata.created().unwrap_or(modified);

            let relative = match entry.path().strip_prefix(&self.root) {
                Ok(relative) => relative.to_path_buf(),
                // A path outside the root indicates a walker bug; skip it.
                Err(_) => continue,
            };

            return Some(Ok(FileEntry::new(
                entry.path().to_path_buf(),
                relative,
                kind,
                modified,
                created,
            )));
        }
    }
}
