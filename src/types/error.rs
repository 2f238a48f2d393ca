//! Error types for msync

use std::path::PathBuf;
use thiserror::Error;

/// Error types for msync operations
#[derive(Debug, Error)]
pub enum SyncError {
    /// Standard IO error (automatically converted via #[from])
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A sync root is missing or not a directory; fatal before any traversal
    #[error("root does not exist or is not a directory: {path}")]
    MissingRoot { path: PathBuf },

    /// Invalid configuration
    #[error("configuration error: {0}")]
    Config(String),

    /// The journal backing store exists but cannot be parsed
    #[error("journal store {path} is unreadable: {message}")]
    Journal { path: PathBuf, message: String },

    /// One or more per-file operations failed; the rest of the run completed
    #[error("sync completed with {failed} failure(s). {summary}")]
    Partial { failed: usize, summary: String },
}

impl SyncError {
    /// Fatal precondition errors abort the session before any mutation.
    pub fn is_precondition(&self) -> bool {
        matches!(self, SyncError::MissingRoot { .. } | SyncError::Config(_))
    }

    /// True when the run completed but some files failed.
    pub fn is_partial(&self) -> bool {
        matches!(self, SyncError::Partial { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Error as IoError, ErrorKind};

    #[test]
    fn test_io_error_automatic_conversion() {
        let io_error = IoError::new(ErrorKind::NotFound, "file not found");
        let err: SyncError = io_error.into();

        assert!(matches!(err, SyncError::Io(_)));
        assert!(err.to_string().contains("IO error"));
    }

    #[test]
    fn test_io_error_from_function() {
        fn returns_io_error() -> Result<(), SyncError> {
            let _file = std::fs::File::open("/nonexistent/path/file.txt")?;
            Ok(())
        }

        let result = returns_io_error();
        assert!(matches!(result.unwrap_err(), SyncError::Io(_)));
    }

    #[test]
    fn test_missing_root_is_precondition() {
        let err = SyncError::MissingRoot {
            path: PathBuf::from("/missing/src"),
        };
        assert!(err.is_precondition());
        assert!(err.to_string().contains("/missing/src"));
    }

    #[test]
    fn test_config_error_is_precondition() {
        let err = SyncError::Config("source and target cannot be the same".to_string());
        assert!(err.is_precondition());
        assert!(err.to_string().contains("configuration error"));
    }

    #[test]
    fn test_journal_error_reports_store_path() {
        let err = SyncError::Journal {
            path: PathBuf::from("/dst/.msync_journal.json"),
            message: "expected value at line 1".to_string(),
        };
        assert!(!err.is_precondition());
        assert!(err.to_string().contains(".msync_journal.json"));
        assert!(err.to_string().contains("expected value"));
    }

    #[test]
    fn test_partial_error() {
        let err = SyncError::Partial {
            failed: 2,
            summary: "a.txt: IO error".to_string(),
        };
        assert!(err.is_partial());
        assert!(err.to_string().contains("2 failure(s)"));
    }

    #[test]
    fn test_result_propagation() {
        fn inner() -> Result<(), SyncError> {
            Err(SyncError::Config("bad".to_string()))
        }

        fn outer() -> Result<(), SyncError> {
            inner()?;
            Ok(())
        }

        assert!(matches!(outer().unwrap_err(), SyncError::Config(_)));
    }
}
