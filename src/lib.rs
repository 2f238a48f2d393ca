//! # msync - Incremental Directory Synchronizer
//!
//! Copies only what changed, and remembers what it wrote.
//!
//! Each destination root carries a journal of the tool's own writes, so a
//! later pass in the opposite direction can tell "I put this here" apart from
//! "someone edited this" and skip the ping-pong recopies naive mtime
//! comparison produces.

// Module declarations
pub mod changelog;
pub mod commands;
pub mod config;
pub mod engine;
pub mod executor;
pub mod scanner;
pub mod session;
pub mod types;
pub mod ui;

// Re-export commonly used types
pub use changelog::ChangeLog;
pub use config::Config;
pub use session::{SyncReport, SyncSession};
pub use types::{
    EntryKind, ExtensionFilter, FileEntry, OverwritePolicy, SyncDecision, SyncError, SyncMode,
    TimestampBasis,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
