//! Main sync command

use crate::executor::summarize_failures;
use crate::session::{SyncEvent, SyncReport, SyncSession};
use crate::types::{SyncError, SyncMode};
use crate::ui::ProgressReporter;
use crate::Config;
use console::style;
use std::path::Path;
use std::sync::Mutex;

/// Run the sync operation
pub fn run(config: Config) -> Result<(), SyncError> {
    let mode = config.mode;
    let session = SyncSession::prepare(config)?;

    if session.config().dry_run {
        let breakdown = session.count_breakdown()?;
        println!("{}", format_dry_run_summary(&breakdown));
        return Ok(());
    }

    // The reporter is created lazily once the counting pass has sized the
    // run; before that there is nothing sensible to draw.
    let reporter: Mutex<Option<ProgressReporter>> = Mutex::new(None);
    let callback = |event: &SyncEvent<'_>| {
        if let Ok(mut slot) = reporter.lock() {
            match event {
                SyncEvent::Planned { candidates } => {
                    if *candidates > 0 {
                        *slot = Some(ProgressReporter::new(*candidates));
                    }
                }
                SyncEvent::PassStarted { source, target } => {
                    if let Some(progress) = slot.as_ref() {
                        progress.pass_started(source, target);
                    }
                }
                SyncEvent::DirCreated { relative } => {
                    if let Some(progress) = slot.as_ref() {
                        progress.dir_created(relative);
                    }
                }
                SyncEvent::Copied { relative, decision } => {
                    if let Some(progress) = slot.as_ref() {
                        progress.file_copied(relative, *decision);
                    }
                }
                SyncEvent::Failed { relative, message } => {
                    if let Some(progress) = slot.as_ref() {
                        progress.file_failed(relative, message);
                    }
                }
                SyncEvent::PruneStarted => {
                    if let Some(progress) = slot.as_ref() {
                        progress.prune_started();
                    }
                }
                SyncEvent::Trashed { relative, kind } => {
                    if let Some(progress) = slot.as_ref() {
                        progress.entry_trashed(relative, *kind);
                    }
                }
            }
        }
    };

    let report = session.run(Some(&callback))?;

    if let Ok(mut slot) = reporter.lock() {
        if let Some(progress) = slot.take() {
            progress.finish();
        }
    }

    println!("{}", format_run_summary(&report, mode));

    if !report.failures.is_empty() {
        return Err(SyncError::Partial {
            failed: report.failures.len(),
            summary: summarize_failures(&report.failures),
        });
    }

    Ok(())
}

fn format_dry_run_summary(breakdown: &[(&Path, &Path, u64)]) -> String {
    let total: u64 = breakdown.iter().map(|(_, _, count)| count).sum();
    if total == 0 {
        return "--- no files to copy ---".to_string();
    }

    let mut lines = vec![format!(
        "{} {} file(s) would be copied",
        style("plan:").bold(),
        total
    )];
    if breakdown.len() > 1 {
        for (source, target, count) in breakdown {
            lines.push(format!(
                "  {} -> {}: {} file(s)",
                source.display(),
                target.display(),
                count
            ));
        }
    }
    lines.push("Dry-run mode: no changes were made.".to_string());
    lines.join("\n")
}

fn format_run_summary(report: &SyncReport, mode: SyncMode) -> String {
    if report.nothing_to_copy() {
        return "--- no files to copy ---".to_string();
    }

    let mut lines = vec![format!(
        "Done in {:.1}s: {} file(s) copied, {} dir(s) created",
        report.elapsed.as_secs_f64(),
        report.files_copied,
        report.dirs_created
    )];

    if mode == SyncMode::Mirror {
        lines.push(format!(
            "Pruned: {} file(s), {} dir(s) moved to trash",
            report.files_deleted, report.dirs_deleted
        ));
    }

    if !report.failures.is_empty() {
        lines.push(format!(
            "{} {} file(s) failed to copy",
            style("WARNING:").red().bold(),
            report.failures.len()
        ));
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn report(candidates: u64, copied: u64) -> SyncReport {
        SyncReport {
            candidates,
            files_copied: copied,
            dirs_created: 1,
            elapsed: Duration::from_millis(1_500),
            ..Default::default()
        }
    }

    #[test]
    fn test_zero_candidates_prints_no_files_banner() {
        assert_eq!(
            format_run_summary(&report(0, 0), SyncMode::Simple),
            "--- no files to copy ---"
        );
        assert_eq!(
            format_dry_run_summary(&[(Path::new("/a"), Path::new("/b"), 0)]),
            "--- no files to copy ---"
        );
    }

    #[test]
    fn test_run_summary_contains_counts_and_elapsed() {
        let summary = format_run_summary(&report(3, 3), SyncMode::Simple);
        assert!(summary.contains("3 file(s) copied"));
        assert!(summary.contains("1 dir(s) created"));
        assert!(summary.contains("1.5s"));
        assert!(!summary.contains("Pruned"));
    }

    #[test]
    fn test_mirror_summary_includes_prune_counts() {
        let mut mirror_report = report(2, 2);
        mirror_report.files_deleted = 4;
        mirror_report.dirs_deleted = 1;

        let summary = format_run_summary(&mirror_report, SyncMode::Mirror);
        assert!(summary.contains("4 file(s), 1 dir(s) moved to trash"));
    }

    #[test]
    fn test_dry_run_summary_totals_single_direction() {
        let summary = format_dry_run_summary(&[(Path::new("/a"), Path::new("/b"), 5)]);
        assert!(summary.contains("5 file(s) would be copied"));
        assert!(summary.contains("no changes were made"));
        // No per-direction lines when there is only one direction.
        assert!(!summary.contains("/a -> /b"));
    }

    #[test]
    fn test_dry_run_summary_breaks_down_both_directions() {
        let summary = format_dry_run_summary(&[
            (Path::new("/a"), Path::new("/b"), 2),
            (Path::new("/b"), Path::new("/a"), 3),
        ]);
        assert!(summary.contains("5 file(s) would be copied"));
        assert!(summary.contains("/a -> /b: 2 file(s)"));
        assert!(summary.contains("/b -> /a: 3 file(s)"));
    }
}
