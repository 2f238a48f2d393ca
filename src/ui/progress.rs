//! Progress reporting
//!
//! A bar sized by the counting pass, with one styled line per copy,
//! overwrite, or trashed entry printed above it.

use crate::types::{EntryKind, SyncDecision};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;

/// Progress reporter for sync runs
pub struct ProgressReporter {
    bar: ProgressBar,
}

impl ProgressReporter {
    /// Create a reporter sized by the candidate count.
    pub fn new(candidates: u64) -> Self {
        let bar = ProgressBar::new(candidates);
        if let Ok(style) = ProgressStyle::with_template("{bar:30.cyan/blue} {pos}/{len} files | {msg}")
        {
            bar.set_style(style.progress_chars("=>-"));
        }
        Self { bar }
    }

    /// Announce one direction of the run.
    pub fn pass_started(&self, source: &Path, target: &Path) {
        self.bar.println(format!(
            "{} {} -> {}",
            style("sync").bold(),
            source.display(),
            target.display()
        ));
    }

    pub fn dir_created(&self, relative: &Path) {
        self.bar
            .println(format!("  mkdir {}", style(relative.display()).dim()));
    }

    /// Record one completed copy and advance the bar.
    pub fn file_copied(&self, relative: &Path, decision: SyncDecision) {
        let line = match decision {
            SyncDecision::Overwrite => {
                format!("  {} {}", style("overwrite").red(), relative.display())
            }
            SyncDecision::OverwriteKeepOld => {
                format!("  {} {}", style("keep-old").cyan(), relative.display())
            }
            _ => format!("  {} {}", style("copy").cyan(), relative.display()),
        };
        self.bar.println(line);
        self.bar.inc(1);
        self.bar.set_message(relative.display().to_string());
    }

    /// Surface a per-file failure without stopping the bar.
    pub fn file_failed(&self, relative: &Path, message: &str) {
        self.bar.println(format!(
            "  {} {}: {}",
            style("FAILED").red().bold(),
            relative.display(),
            message
        ));
        self.bar.inc(1);
    }

    pub fn prune_started(&self) {
        self.bar
            .println(format!("{} removing stale target entries", style("prune").bold()));
    }

    pub fn entry_trashed(&self, relative: &Path, kind: EntryKind) {
        let label = match kind {
            EntryKind::Directory => "trash dir",
            EntryKind::File => "trash",
        };
        self.bar.println(format!(
            "  {} {}",
            style(label).yellow(),
            relative.display()
        ));
    }

    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}
