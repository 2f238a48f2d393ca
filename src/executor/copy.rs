//! Atomic file copy

use crate::types::SyncError;
use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::Path;

/// In-flight copy file name, reserved from traversal.
///
/// A fixed reserved name (rather than one derived from the target, like
/// `name.part`) can never collide with a payload file in the tree. Execution
/// is single-threaded, so one in-flight name per directory is enough.
pub const PART_FILE_NAME: &str = ".msync_part";

/// Copy a file atomically using the write-then-rename strategy.
///
/// The payload is streamed to a temporary reserved-name sibling, flushed to
/// disk, given the source's permissions and modification time, and renamed
/// into place. A crash mid-copy leaves at worst a stray temporary file, never
/// a half-written target. Returns the number of bytes copied.
pub fn copy_file_atomic(src: &Path, dest: &Path) -> Result<u64, SyncError> {
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent).map_err(SyncError::Io)?;
    }

    let part_path = dest.with_file_name(PART_FILE_NAME);

    let mut src_file = File::open(src).map_err(SyncError::Io)?;
    let mut part_file = File::create(&part_path).map_err(SyncError::Io)?;

    let mut buffer = vec![0u8; 128 * 1024];
    let mut total_bytes = 0u64;

    loop {
        let bytes_read = src_file.read(&mut buffer).map_err(SyncError::Io)?;
        if bytes_read == 0 {
            break;
        }

        part_file
            .write_all(&buffer[0..bytes_read])
            .map_err(SyncError::Io)?;
        total_bytes += bytes_read as u64;
    }

    part_file.sync_all().map_err(SyncError::Io)?;

    // Drop the handle before rename (required on Windows).
    drop(part_file);

    let src_metadata = fs::metadata(src).map_err(SyncError::Io)?;
    fs::set_permissions(&part_path, src_metadata.permissions()).map_err(SyncError::Io)?;

    // Preserve the source mtime: copies must compare equal to their source,
    // not newer, or the no-history fallback would keep recopying them.
    let mtime = src_metadata.modified().map_err(SyncError::Io)?;
    filetime::set_file_mtime(&part_path, filetime::FileTime::from_system_time(mtime))
        .map_err(SyncError::Io)?;

    fs::rename(&part_path, dest).map_err(SyncError::Io)?;

    Ok(total_bytes)
}
