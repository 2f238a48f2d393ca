//! Configuration management

use crate::types::{ExtensionFilter, OverwritePolicy, SyncError, SyncMode, TimestampBasis};
use clap::Parser;
use std::path::PathBuf;

/// Command-line interface
#[derive(Debug, Parser)]
#[command(name = "msync", version, about = "Incremental directory synchronizer")]
pub struct Cli {
    /// Source directory
    pub source: PathBuf,

    /// Target directory (created if missing)
    pub target: PathBuf,

    /// Sync in both directions
    #[arg(short = 'c', long = "bidirectional")]
    pub bidirectional: bool,

    /// Mirror mode: trash target entries absent from the source
    #[arg(short = 'd', long = "mirror", conflicts_with = "bidirectional")]
    pub mirror: bool,

    /// Keep the previous version as `name-old.ext` instead of overwriting
    #[arg(short = 'k', long = "keep-old")]
    pub keep_old: bool,

    /// Comma-separated extensions to skip (e.g. "tmp,log")
    #[arg(short = 'e', long = "exclude", value_name = "EXTS")]
    pub exclude: Option<String>,

    /// Comma-separated extensions to copy exclusively
    #[arg(short = 'i', long = "include", value_name = "EXTS", conflicts_with = "exclude")]
    pub include: Option<String>,

    /// Compare creation times instead of modification times
    #[arg(long = "ctime")]
    pub ctime: bool,

    /// Show what would be copied without touching anything
    #[arg(short = 'n', long = "dry-run")]
    pub dry_run: bool,
}

/// Global configuration for a sync run
#[derive(Debug, Clone)]
pub struct Config {
    /// Source directory
    pub source: PathBuf,

    /// Target directory
    pub target: PathBuf,

    /// Pass orchestration mode
    pub mode: SyncMode,

    /// How overwrites treat the previous target version
    pub policy: OverwritePolicy,

    /// Extension-based file filter
    pub filter: ExtensionFilter,

    /// Which timestamp the no-history comparison reads
    pub basis: TimestampBasis,

    /// Count and report, copy nothing
    pub dry_run: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source: PathBuf::new(),
            target: PathBuf::new(),
            mode: SyncMode::Simple,
            policy: OverwritePolicy::Replace,
            filter: ExtensionFilter::None,
            basis: TimestampBasis::Modified,
            dry_run: false,
        }
    }
}

impl TryFrom<Cli> for Config {
    type Error = SyncError;

    fn try_from(cli: Cli) -> Result<Self, Self::Error> {
        let mode = if cli.bidirectional {
            SyncMode::Bidirectional
        } else if cli.mirror {
            SyncMode::Mirror
        } else {
            SyncMode::Simple
        };

        let filter = if let Some(list) = &cli.exclude {
            ExtensionFilter::Exclusive(ExtensionFilter::parse_list(list))
        } else if let Some(list) = &cli.include {
            ExtensionFilter::Inclusive(ExtensionFilter::parse_list(list))
        } else {
            ExtensionFilter::None
        };

        let config = Config {
            source: cli.source,
            target: cli.target,
            mode,
            policy: if cli.keep_old {
                OverwritePolicy::KeepOld
            } else {
                OverwritePolicy::Replace
            },
            filter,
            basis: if cli.ctime {
                TimestampBasis::Created
            } else {
                TimestampBasis::Modified
            },
            dry_run: cli.dry_run,
        };

        config.validate()?;
        Ok(config)
    }
}

impl Config {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), SyncError> {
        match std::fs::metadata(&self.source) {
            Ok(metadata) if metadata.is_dir() => {}
            _ => {
                return Err(SyncError::MissingRoot {
                    path: self.source.clone(),
                })
            }
        }

        if self.source == self.target {
            return Err(SyncError::Config(
                "source and target cannot be the same directory".to_string(),
            ));
        }

        // Nesting check is best-effort: the target may not exist yet.
        if let (Ok(source), Ok(target)) = (self.source.canonicalize(), self.target.canonicalize()) {
            if source == target {
                return Err(SyncError::Config(
                    "source and target cannot be the same directory".to_string(),
                ));
            }
            if target.starts_with(&source) || source.starts_with(&target) {
                return Err(SyncError::Config(
                    "source and target cannot be nested within each other".to_string(),
                ));
            }
        }

        Ok(())
    }
}
