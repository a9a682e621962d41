//! End-to-end tests for the `ctrack` binary
//!
//! Every test runs against its own base directory through
//! `CURRENCY_TRACKER_DIR`.

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn ctrack(base: &Path) -> Command {
    let mut cmd = Command::cargo_bin("ctrack").unwrap();
    cmd.env("CURRENCY_TRACKER_DIR", base).env_remove("RUST_LOG");
    cmd
}

fn setup() -> TempDir {
    let base = TempDir::new().unwrap();
    ctrack(base.path()).arg("init").assert().success();
    ctrack(base.path())
        .args(["character", "set", "Alphinaud", "Omega"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Alphinaud@Omega"));
    base
}

fn add(base: &Path, args: &[&str]) {
    ctrack(base)
        .args(["log", "add"])
        .args(args)
        .assert()
        .success();
}

#[test]
fn test_init_creates_settings() {
    let base = TempDir::new().unwrap();
    ctrack(base.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialization complete"));

    assert!(base.path().join("config.json").exists());

    ctrack(base.path())
        .args(["currency", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Gil"));
}

#[test]
fn test_log_requires_active_character() {
    let base = TempDir::new().unwrap();
    ctrack(base.path()).arg("init").assert().success();

    ctrack(base.path())
        .args(["log", "list", "Gil"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No data folder"));
}

#[test]
fn test_add_and_list() {
    let base = setup();
    add(base.path(), &["Gil", "1000", "--location", "Limsa Lominsa"]);
    add(base.path(), &["Gil", "900", "--location", "Limsa Lominsa", "--note", "Repair"]);

    let log = base.path().join("Alphinaud_Omega").join("Gil.txt");
    assert_eq!(fs::read_to_string(&log).unwrap().lines().count(), 2);

    ctrack(base.path())
        .args(["log", "list", "gil"])
        .assert()
        .success()
        .stdout(predicate::str::contains("+1000"))
        .stdout(predicate::str::contains("-100"))
        .stdout(predicate::str::contains("Repair"));

    ctrack(base.path())
        .args(["log", "latest", "Gil"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Amount:   900"));
}

#[test]
fn test_retainer_log_is_separate() {
    let base = setup();
    add(base.path(), &["Gil", "10", "--target", "retainer:42"]);

    assert!(base
        .path()
        .join("Alphinaud_Omega")
        .join("Gil_42.txt")
        .exists());
    assert!(!base.path().join("Alphinaud_Omega").join("Gil.txt").exists());
}

#[test]
fn test_edit_and_merge() {
    let base = setup();
    add(base.path(), &["Gil", "1000", "--location", "Ul'dah"]);
    add(base.path(), &["Gil", "990", "--location", "Ul'dah"]);
    add(base.path(), &["Gil", "995", "--location", "Ul'dah"]);

    ctrack(base.path())
        .args(["log", "edit", "Gil", "3", "--note", "tip"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Edited 1 record(s)"));

    ctrack(base.path())
        .args(["log", "merge", "Gil", "--threshold", "5000"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Merged 4 record(s)"));

    ctrack(base.path())
        .args(["log", "list", "Gil"])
        .assert()
        .success()
        .stdout(predicate::str::contains("merged 3"))
        .stdout(predicate::str::contains("(1 records)"));
}

#[test]
fn test_merge_selected_needs_two_records() {
    let base = setup();
    add(base.path(), &["Gil", "100"]);
    add(base.path(), &["Gil", "50"]);

    ctrack(base.path())
        .args(["log", "merge-selected", "Gil", "1", "--location", "Kugane"])
        .assert()
        .success()
        .stdout(predicate::str::contains("at least two"));

    ctrack(base.path())
        .args(["log", "merge-selected", "Gil", "1,2", "--location", "Kugane"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Merged 2 record(s)"));

    ctrack(base.path())
        .args(["log", "list", "Gil"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Kugane"))
        .stdout(predicate::str::contains("+50"));
}

#[test]
fn test_export() {
    let base = setup();
    add(base.path(), &["Gil", "1000"]);

    ctrack(base.path())
        .args(["export", "Gil", "--format", "md", "--name", "weekly"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported 1 record(s)"));

    let exported: Vec<_> = fs::read_dir(base.path().join("Alphinaud_Omega").join("Exported"))
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(exported.len(), 1);
    assert!(exported[0].starts_with("weekly_Gil_"));
    assert!(exported[0].ends_with(".md"));

    ctrack(base.path())
        .args(["export", "Gil", "--format", "xlsx"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unsupported export format"));
}

#[test]
fn test_backup_create_and_list() {
    let base = setup();
    add(base.path(), &["Gil", "1000"]);

    ctrack(base.path())
        .args(["backup", "create", "--max", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Backup created: Backup_"));

    ctrack(base.path())
        .args(["backup", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains(".tar.gz"));
}

#[test]
fn test_config_updates_settings() {
    let base = TempDir::new().unwrap();
    ctrack(base.path())
        .args(["config", "--max-backups", "3", "--export-format", "markdown"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Max backups:      3"))
        .stdout(predicate::str::contains("Export format:    markdown"));

    let saved = fs::read_to_string(base.path().join("config.json")).unwrap();
    assert!(saved.contains("\"max_backup_files_count\": 3"));
}
