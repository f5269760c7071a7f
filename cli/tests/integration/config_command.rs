//! Integration tests for `qsm config`.

#![allow(clippy::expect_used)]

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn qsm(home: &TempDir) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("qsm"));
    cmd.env("NO_COLOR", "1").env("QSM_HOME", home.path());
    cmd
}

#[test]
fn test_config_prints_data_dir_and_creates_layout() {
    let home = TempDir::new().expect("tempdir");
    let expected = home.path().join("data");

    qsm(&home)
        .args(["config", "data_dir"])
        .assert()
        .success()
        .stdout(predicate::str::contains(expected.display().to_string()));

    assert!(home.path().join("qsm.conf").is_file());
    assert!(home.path().join("plugins").is_dir());
}

#[test]
fn test_config_reads_an_existing_file() {
    let home = TempDir::new().expect("tempdir");
    std::fs::write(
        home.path().join("qsm.conf"),
        r#"{"data_dir": "/srv/qsm", "plugins_dir": "/srv/qsm/plugins"}"#,
    )
    .expect("write config");

    qsm(&home)
        .args(["config", "plugins_dir"])
        .assert()
        .success()
        .stdout("/srv/qsm/plugins\n");
}

#[test]
fn test_config_rejects_unknown_option() {
    let home = TempDir::new().expect("tempdir");
    qsm(&home)
        .args(["config", "cache_dir"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("unknown option 'cache_dir'"));
}

#[test]
fn test_config_reports_unparseable_file() {
    let home = TempDir::new().expect("tempdir");
    std::fs::write(home.path().join("qsm.conf"), "data_dir = nope").expect("write config");
    qsm(&home)
        .args(["config", "data_dir"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("cannot parse"));
}
