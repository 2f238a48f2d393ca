//! Binary-level CLI tests

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn msync() -> Command {
    Command::cargo_bin("msync").expect("binary built")
}

#[test]
fn test_missing_arguments_is_a_usage_error() {
    msync()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn test_missing_source_root_fails_before_any_copy() {
    let temp = TempDir::new().expect("create temp dir");

    msync()
        .arg(temp.path().join("absent"))
        .arg(temp.path().join("dst"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not exist"));

    assert!(!temp.path().join("dst").exists());
}

#[test]
fn test_mirror_and_bidirectional_are_mutually_exclusive() {
    msync()
        .args(["src", "dst", "--mirror", "--bidirectional"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used with"));
}

#[test]
fn test_simple_sync_copies_files() {
    let source = TempDir::new().expect("create source");
    let target = TempDir::new().expect("create target");
    fs::write(source.path().join("a.txt"), b"payload").expect("write a");

    msync()
        .arg(source.path())
        .arg(target.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("1 file(s) copied"));

    assert_eq!(
        fs::read(target.path().join("a.txt")).expect("read copy"),
        b"payload"
    );
}

#[test]
fn test_empty_source_prints_no_files_banner() {
    let source = TempDir::new().expect("create source");
    let target = TempDir::new().expect("create target");

    msync()
        .arg(source.path())
        .arg(target.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("no files to copy"));
}

#[test]
fn test_dry_run_reports_without_copying() {
    let source = TempDir::new().expect("create source");
    let target = TempDir::new().expect("create target");
    fs::write(source.path().join("a.txt"), b"payload").expect("write a");

    msync()
        .arg(source.path())
        .arg(target.path())
        .arg("--dry-run")
        .assert()
        .success()
        .stdout(predicate::str::contains("no changes were made"));

    assert!(!target.path().join("a.txt").exists());
}
