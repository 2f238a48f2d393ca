//! Session orchestration
//!
//! A `SyncSession` owns everything one run needs: the configuration, both
//! per-root journals, and the running counters. Passes run strictly in
//! sequence per the configured mode; journals persist exactly once at the
//! very end, so an interrupted run performs real copies but records none of
//! them (the next run safely re-derives those decisions from raw timestamps).

use crate::changelog::ChangeLog;
use crate::config::Config;
use crate::engine::{decide, TargetState};
use crate::executor::{apply_decision, prune_target, FailureRecord};
use crate::scanner::TreeWalk;
use crate::types::{EntryKind, SyncDecision, SyncError, SyncMode};
use chrono::Utc;
use std::fs;
use std::path::Path;
use std::time::{Duration, Instant};

/// Counters and failures accumulated across all passes of one run
#[derive(Debug, Default)]
pub struct SyncReport {
    /// Candidate count from the counting pass, across every direction
    pub candidates: u64,
    pub dirs_created: u64,
    pub files_copied: u64,
    pub dirs_deleted: u64,
    pub files_deleted: u64,
    pub failures: Vec<FailureRecord>,
    pub elapsed: Duration,
}

impl SyncReport {
    pub fn nothing_to_copy(&self) -> bool {
        self.candidates == 0
    }
}

/// Observational progress events; no feedback into decisions.
#[derive(Debug)]
pub enum SyncEvent<'a> {
    /// Counting pass complete; sizes the progress display
    Planned { candidates: u64 },
    PassStarted { source: &'a Path, target: &'a Path },
    DirCreated { relative: &'a Path },
    Copied {
        relative: &'a Path,
        decision: SyncDecision,
    },
    Failed { relative: &'a Path, message: String },
    Trashed { relative: &'a Path, kind: EntryKind },
    PruneStarted,
}

pub type EventCallback<'a> = dyn Fn(&SyncEvent<'_>) + 'a;

/// One sync run: configuration, both journals, counters.
pub struct SyncSession {
    config: Config,
    source_journal: ChangeLog,
    target_journal: ChangeLog,
}

impl SyncSession {
    /// Validate roots and load both journals.
    ///
    /// A missing source root is fatal before any traversal. A missing target
    /// root is created (uncounted), unless this is a dry run, which must not
    /// touch the filesystem at all. Both journals are pruned of entries whose
    /// paths no longer exist, so stale history never influences decisions.
    pub fn prepare(config: Config) -> Result<Self, SyncError> {
        match fs::metadata(&config.source) {
            Ok(metadata) if metadata.is_dir() => {}
            _ => {
                return Err(SyncError::MissingRoot {
                    path: config.source.clone(),
                })
            }
        }

        if !config.dry_run && !config.target.exists() {
            fs::create_dir_all(&config.target).map_err(SyncError::Io)?;
        }

        let mut source_journal = ChangeLog::load(&config.source)?;
        let mut target_journal = ChangeLog::load(&config.target)?;
        source_journal.prune_stale();
        target_journal.prune_stale();

        Ok(Self {
            config,
            source_journal,
            target_journal,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Per-direction candidate counts, in pass order.
    ///
    /// Uses the same decision function as execution and mutates nothing, so
    /// counting twice, or counting then executing, sees identical decisions.
    pub fn count_breakdown(&self) -> Result<Vec<(&Path, &Path, u64)>, SyncError> {
        let config = &self.config;
        let mut rows = vec![(
            config.source.as_path(),
            config.target.as_path(),
            count_pass(&config.source, &config.target, &self.source_journal, config)?,
        )];
        if config.mode == SyncMode::Bidirectional {
            // A target root that does not exist yet (dry run skips creating
            // it) is an empty tree: the reverse direction has no candidates.
            let reverse = if config.target.is_dir() {
                count_pass(&config.target, &config.source, &self.target_journal, config)?
            } else {
                0
            };
            rows.push((config.target.as_path(), config.source.as_path(), reverse));
        }
        Ok(rows)
    }

    /// Total candidate count across every direction the mode will run.
    pub fn count_candidates(&self) -> Result<u64, SyncError> {
        Ok(self
            .count_breakdown()?
            .iter()
            .map(|(_, _, count)| count)
            .sum())
    }

    /// Execute the run and consume the session.
    ///
    /// Zero candidates short-circuits execution entirely (the pruned journals
    /// still persist). Per-file copy failures are recorded in the report and
    /// the run continues; everything else propagates.
    pub fn run(mut self, on_event: Option<&EventCallback>) -> Result<SyncReport, SyncError> {
        let started = Instant::now();
        let mut report = SyncReport {
            candidates: self.count_candidates()?,
            ..Default::default()
        };
        emit(
            on_event,
            &SyncEvent::Planned {
                candidates: report.candidates,
            },
        );

        if report.nothing_to_copy() {
            self.persist()?;
            report.elapsed = started.elapsed();
            return Ok(report);
        }

        let config = self.config.clone();
        match config.mode {
            SyncMode::Simple => {
                run_pass(
                    &config.source,
                    &config.target,
                    &mut self.source_journal,
                    &mut self.target_journal,
                    &config,
                    &mut report,
                    on_event,
                )?;
            }
            SyncMode::Bidirectional => {
                run_pass(
                    &config.source,
                    &config.target,
                    &mut self.source_journal,
                    &mut self.target_journal,
                    &config,
                    &mut report,
                    on_event,
                )?;
                run_pass(
                    &config.target,
                    &config.source,
                    &mut self.target_journal,
                    &mut self.source_journal,
                    &config,
                    &mut report,
                    on_event,
                )?;
            }
            SyncMode::Mirror => {
                run_pass(
                    &config.source,
                    &config.target,
                    &mut self.source_journal,
                    &mut self.target_journal,
                    &config,
                    &mut report,
                    on_event,
                )?;
                emit(on_event, &SyncEvent::PruneStarted);
                let stats = prune_target(&config.source, &config.target, |relative, kind| {
                    emit(on_event, &SyncEvent::Trashed { relative, kind });
                })?;
                report.dirs_deleted = stats.dirs_deleted;
                report.files_deleted = stats.files_deleted;
            }
        }

        self.persist()?;
        report.elapsed = started.elapsed();
        Ok(report)
    }

    fn persist(&self) -> Result<(), SyncError> {
        self.source_journal.persist(&self.config.source)?;
        self.target_journal.persist(&self.config.target)
    }
}

fn emit(on_event: Option<&EventCallback>, event: &SyncEvent<'_>) {
    if let Some(callback) = on_event {
        callback(event);
    }
}

/// Tally how many files one direction would copy, without mutating anything.
fn count_pass(
    source_root: &Path,
    target_root: &Path,
    journal: &ChangeLog,
    config: &Config,
) -> Result<u64, SyncError> {
    let mut count = 0;
    for item in TreeWalk::new(source_root)? {
        let entry = item?;
        if !entry.is_file() || !config.filter.allows(&entry.path) {
            continue;
        }

        let target_path = entry.path_under(target_root);
        let target = TargetState::probe(&target_path)?;
        if decide(&entry, target.as_ref(), journal, config.policy, config.basis).is_copy() {
            count += 1;
        }
    }
    Ok(count)
}

/// Execute one direction.
///
/// `consulted` is the journal of this pass's source root; `recording` is the
/// journal of its destination root and receives a fresh entry for every
/// completed write. Missing target directories are created eagerly as the
/// walk reaches them, independent of file-level decisions.
fn run_pass(
    source_root: &Path,
    target_root: &Path,
    consulted: &mut ChangeLog,
    recording: &mut ChangeLog,
    config: &Config,
    report: &mut SyncReport,
    on_event: Option<&EventCallback>,
) -> Result<(), SyncError> {
    emit(
        on_event,
        &SyncEvent::PassStarted {
            source: source_root,
            target: target_root,
        },
    );

    for item in TreeWalk::new(source_root)? {
        let entry = item?;
        if entry.is_root() {
            continue;
        }

        let target_path = entry.path_under(target_root);

        if entry.is_dir() {
            if !target_path.exists() {
                fs::create_dir_all(&target_path).map_err(SyncError::Io)?;
                report.dirs_created += 1;
                emit(
                    on_event,
                    &SyncEvent::DirCreated {
                        relative: &entry.relative,
                    },
                );
            }
            continue;
        }

        if !config.filter.allows(&entry.path) {
            continue;
        }

        let target = TargetState::probe(&target_path)?;
        let decision = decide(&entry, target.as_ref(), consulted, config.policy, config.basis);
        if decision.is_skip() {
            continue;
        }

        // The source was edited after our own write into it; that history
        // entry is stale now.
        if matches!(
            decision,
            SyncDecision::Overwrite | SyncDecision::OverwriteKeepOld
        ) {
            consulted.remove(&entry.path);
        }

        match apply_decision(decision, &entry.path, &target_path) {
            Ok(_bytes) => {
                recording.record_write(target_path, Utc::now());
                report.files_copied += 1;
                emit(
                    on_event,
                    &SyncEvent::Copied {
                        relative: &entry.relative,
                        decision,
                    },
                );
            }
            Err(error) => {
                emit(
                    on_event,
                    &SyncEvent::Failed {
                        relative: &entry.relative,
                        message: error.to_string(),
                    },
                );
                report.failures.push(FailureRecord {
                    path: entry.path.clone(),
                    error,
                });
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::changelog::JOURNAL_FILE_NAME;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn config_for(source: &Path, target: &Path) -> Config {
        Config {
            source: source.to_path_buf(),
            target: target.to_path_buf(),
            ..Config::default()
        }
    }

    #[test]
    fn test_prepare_missing_source_is_fatal() {
        let temp = TempDir::new().expect("create temp dir");
        let config = config_for(&temp.path().join("absent"), &temp.path().join("dst"));

        let result = SyncSession::prepare(config);
        assert!(matches!(result, Err(SyncError::MissingRoot { .. })));
    }

    #[test]
    fn test_prepare_creates_missing_target_root() {
        let source = TempDir::new().expect("create source");
        let temp = TempDir::new().expect("create temp dir");
        let target = temp.path().join("fresh-target");

        SyncSession::prepare(config_for(source.path(), &target)).expect("prepare");

        assert!(target.is_dir());
    }

    #[test]
    fn test_zero_candidates_short_circuits_but_persists_pruning() {
        let source = TempDir::new().expect("create source");
        let target = TempDir::new().expect("create target");

        // A journal entry for a path that no longer exists: pruning must
        // still reach disk even though nothing is copied.
        let mut stale = ChangeLog::new();
        stale.record_write(target.path().join("gone.txt"), Utc::now());
        stale.persist(target.path()).expect("seed journal");

        let session = SyncSession::prepare(config_for(source.path(), target.path()))
            .expect("prepare");
        let report = session.run(None).expect("run");

        assert!(report.nothing_to_copy());
        assert_eq!(report.files_copied, 0);
        // Journal became empty after pruning, so its store is deleted.
        assert!(!target.path().join(JOURNAL_FILE_NAME).exists());
    }

    #[test]
    fn test_simple_run_copies_and_records_journal() {
        let source = TempDir::new().expect("create source");
        let target = TempDir::new().expect("create target");
        std::fs::create_dir(source.path().join("sub")).expect("create sub");
        std::fs::write(source.path().join("sub/a.txt"), b"data").expect("write a");

        let session = SyncSession::prepare(config_for(source.path(), target.path()))
            .expect("prepare");
        let report = session.run(None).expect("run");

        assert_eq!(report.candidates, 1);
        assert_eq!(report.files_copied, 1);
        assert_eq!(report.dirs_created, 1);
        assert!(report.failures.is_empty());
        assert_eq!(
            std::fs::read(target.path().join("sub/a.txt")).expect("read copy"),
            b"data"
        );

        // The destination journal records the write, keyed by target path.
        let journal = ChangeLog::load(target.path()).expect("load journal");
        assert!(journal.contains(&target.path().join("sub/a.txt")));
    }

    #[test]
    fn test_events_are_emitted_in_order() {
        let source = TempDir::new().expect("create source");
        let target = TempDir::new().expect("create target");
        std::fs::write(source.path().join("a.txt"), b"x").expect("write a");

        let events = std::cell::RefCell::new(Vec::new());
        let callback = |event: &SyncEvent<'_>| {
            let label = match event {
                SyncEvent::Planned { .. } => "planned",
                SyncEvent::PassStarted { .. } => "pass",
                SyncEvent::DirCreated { .. } => "dir",
                SyncEvent::Copied { .. } => "copied",
                SyncEvent::Failed { .. } => "failed",
                SyncEvent::Trashed { .. } => "trashed",
                SyncEvent::PruneStarted => "prune",
            };
            events.borrow_mut().push(label);
        };

        let session = SyncSession::prepare(config_for(source.path(), target.path()))
            .expect("prepare");
        session.run(Some(&callback)).expect("run");

        assert_eq!(*events.borrow(), vec!["planned", "pass", "copied"]);
    }

    #[test]
    fn test_dry_run_bidirectional_counts_against_missing_target() {
        let source = TempDir::new().expect("create source");
        let temp = TempDir::new().expect("create temp dir");
        let target = temp.path().join("not-yet-created");
        std::fs::write(source.path().join("a.txt"), b"a").expect("write a");

        let mut config = config_for(source.path(), &target);
        config.mode = SyncMode::Bidirectional;
        config.dry_run = true;

        let session = SyncSession::prepare(config).expect("prepare");
        // Dry run did not create the target root; the reverse direction is
        // an empty tree, not an error.
        assert!(!target.exists());
        let breakdown = session.count_breakdown().expect("count breakdown");

        assert_eq!(breakdown.len(), 2);
        assert_eq!(breakdown[0].2, 1);
        assert_eq!(breakdown[1].2, 0);
        assert_eq!(session.count_candidates().expect("total"), 1);
    }

    #[test]
    fn test_count_candidates_is_repeatable() {
        let source = TempDir::new().expect("create source");
        let target = TempDir::new().expect("create target");
        std::fs::write(source.path().join("a.txt"), b"a").expect("write a");
        std::fs::write(source.path().join("b.txt"), b"b").expect("write b");

        let session = SyncSession::prepare(config_for(source.path(), target.path()))
            .expect("prepare");

        assert_eq!(session.count_candidates().expect("first count"), 2);
        assert_eq!(session.count_candidates().expect("second count"), 2);
    }

    #[test]
    fn test_failed_copy_is_recorded_and_run_continues() {
        let source = TempDir::new().expect("create source");
        let target = TempDir::new().expect("create target");
        std::fs::write(source.path().join("good.txt"), b"ok").expect("write good");
        // A directory where the engine expects a copyable target file forces
        // the copy (part-file rename over a directory) to fail.
        std::fs::write(source.path().join("bad.txt"), b"nope").expect("write bad");
        std::fs::create_dir(target.path().join("bad.txt")).expect("create blocking dir");
        filetime::set_file_mtime(
            source.path().join("bad.txt"),
            filetime::FileTime::from_system_time(
                std::time::SystemTime::now() + Duration::from_secs(3_600),
            ),
        )
        .expect("bump bad mtime");

        let session = SyncSession::prepare(config_for(source.path(), target.path()))
            .expect("prepare");
        let report = session.run(None).expect("run");

        assert_eq!(report.files_copied, 1);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].path, source.path().join("bad.txt"));
        assert_eq!(
            std::fs::read(target.path().join("good.txt")).expect("read good"),
            b"ok"
        );
    }

    #[test]
    fn test_report_paths_are_relative_in_events() {
        let source = TempDir::new().expect("create source");
        let target = TempDir::new().expect("create target");
        std::fs::create_dir(source.path().join("sub")).expect("create sub");
        std::fs::write(source.path().join("sub/a.txt"), b"x").expect("write a");

        let copied = std::cell::RefCell::new(Vec::new());
        let callback = |event: &SyncEvent<'_>| {
            if let SyncEvent::Copied { relative, .. } = event {
                copied.borrow_mut().push(relative.to_path_buf());
            }
        };

        let session = SyncSession::prepare(config_for(source.path(), target.path()))
            .expect("prepare");
        session.run(Some(&callback)).expect("run");

        assert_eq!(*copied.borrow(), vec![PathBuf::from("sub/a.txt")]);
    }
}
