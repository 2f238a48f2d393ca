//! Decision vocabulary for the sync engine

use std::collections::BTreeSet;
use std::path::Path;

/// Per-file outcome produced by the decision engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncDecision {
    /// Target already reflects the source state
    Skip,

    /// Target path does not exist; plain copy
    CopyNew,

    /// Source is newer; replace target in place
    Overwrite,

    /// Source is newer; rename target with a `-old` suffix, then copy
    OverwriteKeepOld,
}

impl SyncDecision {
    pub fn is_skip(&self) -> bool {
        matches!(self, SyncDecision::Skip)
    }

    /// True for every decision that results in a write to the target.
    pub fn is_copy(&self) -> bool {
        !self.is_skip()
    }

    /// Short label used in progress output.
    pub fn label(&self) -> &'static str {
        match self {
            SyncDecision::Skip => "skip",
            SyncDecision::CopyNew => "copy",
            SyncDecision::Overwrite => "overwrite",
            SyncDecision::OverwriteKeepOld => "keep-old",
        }
    }
}

/// Direction plan for a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SyncMode {
    /// Source to target only
    #[default]
    Simple,

    /// Source to target, then target to source with the journal roles swapped
    Bidirectional,

    /// Source to target, then prune target entries absent from the source
    Mirror,
}

/// What to do with an existing target file that must be replaced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverwritePolicy {
    /// Overwrite in place
    #[default]
    Replace,

    /// Preserve the old target under a `-old` renamed path
    KeepOld,
}

/// Which raw timestamp the no-history fallback comparison uses.
///
/// Journal comparisons always use the source modification time; this only
/// selects the fallback when a path has no journal history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimestampBasis {
    #[default]
    Modified,

    /// Creation time; insensitive to metadata-only touches
    Created,
}

/// Extension-based candidate filter.
///
/// Applies to files only. A file without a recognizable extension is eligible
/// under `None` and `Exclusive` and ineligible under `Inclusive`, since it
/// cannot match any listed extension.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ExtensionFilter {
    #[default]
    None,

    /// Copy everything except files with these extensions
    Exclusive(BTreeSet<String>),

    /// Copy only files with these extensions
    Inclusive(BTreeSet<String>),
}

impl ExtensionFilter {
    /// Parse a comma-separated extension list (`"wav,aif,.mp3"`).
    ///
    /// Entries are trimmed, lowercased, and stripped of a leading dot; empty
    /// entries are dropped.
    pub fn parse_list(raw: &str) -> BTreeSet<String> {
        raw.split(',')
            .map(|ext| ext.trim().trim_start_matches('.').to_ascii_lowercase())
            .filter(|ext| !ext.is_empty())
            .collect()
    }

    /// Whether a file path is a sync candidate under this filter.
    pub fn allows(&self, path: &Path) -> bool {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);

        match self {
            ExtensionFilter::None => true,
            ExtensionFilter::Exclusive(set) => ext.map_or(true, |e| !set.contains(&e)),
            ExtensionFilter::Inclusive(set) => ext.map_or(false, |e| set.contains(&e)),
        }
    }
}
