//! Decision execution: copy, keep-old rename, trash, prune

pub mod copy;
pub mod prune;
pub mod trash;

pub use copy::{copy_file_atomic, PART_FILE_NAME};
pub use prune::{prune_target, PruneStats};
pub use trash::{move_to_trash, snapshot_name, TRASH_DIR_NAME};

use crate::types::{SyncDecision, SyncError};
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

/// The renamed path an existing target gets under the keep-old policy.
///
/// `-old` is inserted before the final extension (`notes.txt` →
/// `notes-old.txt`); a name without an extension gets `-old` appended to the
/// whole name (`README` → `README-old`).
pub fn keep_old_path(target: &Path) -> PathBuf {
    let mut name = target
        .file_stem()
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from(target.as_os_str()));
    name.push("-old");
    if let Some(ext) = target.extension() {
        name.push(".");
        name.push(ext);
    }
    target.with_file_name(name)
}

/// Execute one decision for a source/target file pair.
///
/// `OverwriteKeepOld` renames the existing target aside before copying, so
/// the prior version survives. Returns the number of bytes copied.
pub fn apply_decision(
    decision: SyncDecision,
    source: &Path,
    target: &Path,
) -> Result<u64, SyncError> {
    match decision {
        SyncDecision::Skip => Ok(0),
        SyncDecision::CopyNew | SyncDecision::Overwrite => copy_file_atomic(source, target),
        SyncDecision::OverwriteKeepOld => {
            fs::rename(target, keep_old_path(target)).map_err(SyncError::Io)?;
            copy_file_atomic(source, target)
        }
    }
}

/// One per-file failure recorded during an execution pass.
#[derive(Debug)]
pub struct FailureRecord {
    pub path: PathBuf,
    pub error: SyncError,
}

/// Aggregate failures into a short summary for the final error.
pub fn summarize_failures(failures: &[FailureRecord]) -> String {
    let preview = failures
        .iter()
        .take(3)
        .map(|failure| format!("{}: {}", failure.path.display(), failure.error))
        .collect::<Vec<_>>()
        .join("; ");

    if failures.len() > 3 {
        format!("Example failures: {}; ... {} more", preview, failures.len() - 3)
    } else {
        format!("Failures: {}", preview)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Error as IoError, ErrorKind};
    use tempfile::TempDir;

    #[test]
    fn test_keep_old_path_inserts_suffix_before_extension() {
        assert_eq!(
            keep_old_path(Path::new("/dst/notes.txt")),
            PathBuf::from("/dst/notes-old.txt")
        );
        assert_eq!(
            keep_old_path(Path::new("/dst/archive.tar.gz")),
            PathBuf::from("/dst/archive.tar-old.gz")
        );
    }

    #[test]
    fn test_keep_old_path_without_extension_appends_suffix() {
        assert_eq!(
            keep_old_path(Path::new("/dst/README")),
            PathBuf::from("/dst/README-old")
        );
    }

    #[test]
    fn test_apply_skip_touches_nothing() {
        let temp = TempDir::new().expect("create temp dir");
        let target = temp.path().join("absent.txt");

        let bytes = apply_decision(SyncDecision::Skip, &temp.path().join("src.txt"), &target)
            .expect("skip");

        assert_eq!(bytes, 0);
        assert!(!target.exists());
    }

    #[test]
    fn test_apply_copy_new_writes_target() {
        let temp = TempDir::new().expect("create temp dir");
        let source = temp.path().join("src.txt");
        let target = temp.path().join("dst.txt");
        std::fs::write(&source, b"fresh").expect("write source");

        let bytes = apply_decision(SyncDecision::CopyNew, &source, &target).expect("copy");

        assert_eq!(bytes, 5);
        assert_eq!(std::fs::read(&target).expect("read target"), b"fresh");
    }

    #[test]
    fn test_apply_keep_old_preserves_previous_target() {
        let temp = TempDir::new().expect("create temp dir");
        let source = temp.path().join("src.txt");
        let target = temp.path().join("notes.txt");
        std::fs::write(&source, b"new-version").expect("write source");
        std::fs::write(&target, b"old-version").expect("write target");

        apply_decision(SyncDecision::OverwriteKeepOld, &source, &target).expect("keep-old");

        assert_eq!(std::fs::read(&target).expect("read target"), b"new-version");
        assert_eq!(
            std::fs::read(temp.path().join("notes-old.txt")).expect("read old"),
            b"old-version"
        );
    }

    #[test]
    fn test_summarize_failures_previews_first_three() {
        let failures: Vec<FailureRecord> = (0..5)
            .map(|i| FailureRecord {
                path: PathBuf::from(format!("f{i}.txt")),
                error: SyncError::Io(IoError::new(ErrorKind::NotFound, "gone")),
            })
            .collect();

        let summary = summarize_failures(&failures);
        assert!(summary.contains("f0.txt"));
        assert!(summary.contains("f2.txt"));
        assert!(!summary.contains("f3.txt"));
        assert!(summary.contains("2 more"));
    }
}
