//! Core types shared across the crate

pub mod decision;
pub mod entry;
pub mod error;

pub use decision::{ExtensionFilter, OverwritePolicy, SyncDecision, SyncMode, TimestampBasis};
pub use entry::{EntryKind, FileEntry};
pub use error::SyncError;
