//! Executor behaviour seen from the process layer: command wrapping, the
//! probe exit-code protocol and capture vs. pass-through.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use qsm_cli::application::NullObserver;
use qsm_cli::application::services::vm::{lifecycle, packages, predicates};
use qsm_cli::domain::{DomainError, Outcome, SkipReason};
use qsm_cli::infra::executor::QubesExecutor;
use qsm_cli::infra::scripts::ShellPackageScripts;

use crate::mocks::{ScriptedRunner, domain_error};

#[tokio::test]
async fn probes_map_exit_codes_to_answers() {
    let runner = ScriptedRunner::new()
        .exits("qvm-check --quiet ghost", 2)
        .exits("qvm-check --quiet --running work", 1)
        .exits("qvm-check --quiet --template work", 1);
    let exec = QubesExecutor::new(&runner);

    assert!(predicates::exists(&exec, "work").await.unwrap());
    assert!(!predicates::exists(&exec, "ghost").await.unwrap());
    assert!(!predicates::is_running(&exec, "work").await.unwrap());
    assert!(!predicates::is_template(&exec, "work").await.unwrap());
    assert!(predicates::is_template(&exec, "fedora-40").await.unwrap());
}

#[tokio::test]
async fn probes_are_captured_and_elevated() {
    let runner = ScriptedRunner::new();
    let exec = QubesExecutor::new(&runner);
    predicates::is_running(&exec, "work").await.unwrap();

    let call = runner.calls().pop().unwrap();
    assert_eq!(call.program, "sudo");
    assert_eq!(
        call.args,
        ["--user=root", "--", "qvm-check", "--quiet", "--running", "work"]
    );
    assert!(call.captured);
}

#[tokio::test]
async fn unrecognised_probe_code_is_not_a_boolean() {
    let runner = ScriptedRunner::new().exits("qvm-check", 127);
    let exec = QubesExecutor::new(&runner);
    let err = predicates::exists(&exec, "work").await.unwrap_err();
    assert_eq!(
        domain_error(&err),
        DomainError::ProcessFailed {
            command: "qvm-check --quiet work".to_string(),
            code: 127
        }
    );

    // 2 means "not found" only for the existence probe
    let runner = ScriptedRunner::new().exits("--running", 2);
    let exec = QubesExecutor::new(&runner);
    let err = predicates::is_running(&exec, "work").await.unwrap_err();
    assert!(matches!(
        domain_error(&err),
        DomainError::ProcessFailed { code: 2, .. }
    ));
}

#[tokio::test]
async fn invalid_names_never_reach_a_process() {
    let runner = ScriptedRunner::new();
    let exec = QubesExecutor::new(&runner);
    for name in ["", "-rf", "work; reboot", "1work"] {
        let err = predicates::exists(&exec, name).await.unwrap_err();
        assert!(matches!(
            domain_error(&err),
            DomainError::ValidationFailed { .. }
        ));
    }
    assert!(runner.calls().is_empty());
}

#[tokio::test]
async fn mutations_pass_output_through() {
    let runner = ScriptedRunner::new();
    let exec = QubesExecutor::new(&runner);
    lifecycle::start(&exec, &NullObserver, "work").await.unwrap();

    let start = runner.calls().pop().unwrap();
    assert_eq!(
        start.line(),
        "sudo --user=root -- qvm-start --skip-if-running work"
    );
    assert!(!start.captured);
}

#[tokio::test]
async fn existing_domain_absorbs_only_the_create_exit_code() {
    let runner = ScriptedRunner::new().exits("qvm-create", 1);
    let exec = QubesExecutor::new(&runner);
    let outcome = lifecycle::create(&exec, &NullObserver, "work", "red", &[], true)
        .await
        .unwrap();
    assert_eq!(outcome, Outcome::Skipped(SkipReason::AlreadyExists));

    let runner = ScriptedRunner::new().exits("qvm-create", 3);
    let exec = QubesExecutor::new(&runner);
    let err = lifecycle::create(&exec, &NullObserver, "work", "red", &[], true)
        .await
        .unwrap_err();
    assert!(matches!(
        domain_error(&err),
        DomainError::ProcessFailed { code: 3, .. }
    ));
}

#[tokio::test]
async fn guest_package_scripts_use_the_relay_as_root() {
    let runner = ScriptedRunner::new();
    let exec = QubesExecutor::new(&runner);
    packages::install(&exec, &ShellPackageScripts, &NullObserver, "work", &["vim"])
        .await
        .unwrap();

    let relay = runner.calls().pop().unwrap();
    assert_eq!(relay.program, "qvm-run");
    assert_eq!(
        relay.args[..5],
        ["--autostart", "--user", "root", "--pass-io", "work"]
    );
    let payload = relay.args.last().unwrap();
    assert!(payload.starts_with("sh -c '"), "{payload}");
    assert!(payload.contains("vim"), "{payload}");
}
