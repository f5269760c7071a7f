//! Integration tests for argument parsing and input rejection.

#![allow(clippy::expect_used)]

use assert_cmd::Command;
use predicates::prelude::*;

fn qsm() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("qsm"));
    cmd.env("NO_COLOR", "1").env_remove("QSM_LOG");
    cmd
}

// --- Help and version tests ---

#[test]
fn test_cli_no_args_shows_help() {
    // clap with arg_required_else_help shows help on stderr and exits 2
    qsm().assert().code(2).stderr(predicate::str::contains(
        "Lifecycle management for Qubes domains and templates",
    ));
}

#[test]
fn test_cli_help_flag_lists_commands() {
    qsm()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("install"))
        .stdout(predicate::str::contains("remove"));
}

#[test]
fn test_cli_version_flag_shows_version() {
    qsm()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(concat!("qsm ", env!("CARGO_PKG_VERSION"))));
}

#[test]
fn test_stop_help_shows_default_timeout() {
    qsm()
        .args(["stop", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[default: 120]"));
}

// --- Argument errors ---

#[test]
fn test_unknown_command_fails() {
    qsm()
        .arg("frobnicate")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("unrecognized subcommand"));
}

#[test]
fn test_install_requires_packages() {
    qsm()
        .args(["install", "work"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("<PACKAGES>"));
}

#[test]
fn test_stop_rejects_non_numeric_timeout() {
    qsm()
        .args(["stop", "work", "--timeout", "soon"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("invalid value"));
}

// --- Validation before anything is spawned ---

#[test]
fn test_install_rejects_shell_metacharacters() {
    qsm()
        .args(["install", "work", "vim;reboot"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("invalid packages"));
}

#[test]
fn test_host_install_rejects_option_like_packages() {
    qsm()
        .args(["install", "dom0", "--", "--nogpgcheck"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("invalid packages"));
}

#[test]
fn test_update_rejects_malformed_domain_name() {
    qsm()
        .args(["update", "work vm"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("invalid domain"));
}

#[test]
fn test_remove_with_yes_still_validates_the_name() {
    qsm()
        .args(["--yes", "remove", "bad/name"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("invalid domain"));
}

#[test]
fn test_pull_requires_an_absolute_store() {
    qsm()
        .args(["pull", "work", "https://example.org/qsm.git", "qsm", "--store", "repos"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("invalid store_dir"));
}
