//! Multi-command flows through the real executor: idempotent stop and
//! remove, workflow preconditions and resuming after a failed step.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::cell::RefCell;

use qsm_cli::application::{LifecycleObserver, NullObserver};
use qsm_cli::application::services::vm::lifecycle::{self, DEFAULT_STOP_TIMEOUT};
use qsm_cli::application::services::vm::provision::{
    TemplateRequest, VmRequest, create_template, create_vm, resume_vm,
};
use qsm_cli::domain::{
    DomainError, LifecycleEvent, Operation, Outcome, Phase, PrefsBuilder, SkipReason, StepFailed,
};
use qsm_cli::infra::executor::QubesExecutor;
use qsm_cli::infra::scripts::ShellPackageScripts;

use crate::mocks::{ScriptedRunner, domain_error};

#[derive(Default)]
struct Events(RefCell<Vec<LifecycleEvent>>);

impl LifecycleObserver for Events {
    fn notify(&self, event: &LifecycleEvent) {
        self.0.borrow_mut().push(event.clone());
    }
}

fn sudo(line: &str) -> String {
    format!("sudo --user=root -- {line}")
}

// ── stop / remove ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn stopping_a_stopped_domain_only_probes() {
    let runner = ScriptedRunner::new().exits("--running work", 1);
    let exec = QubesExecutor::new(&runner);
    let events = Events::default();

    let outcome = lifecycle::stop(&exec, &events, "work", DEFAULT_STOP_TIMEOUT)
        .await
        .unwrap();
    assert_eq!(outcome, Outcome::Skipped(SkipReason::AlreadyStopped));
    assert!(runner.mutations().is_empty());
    assert_eq!(
        events.0.borrow().last().unwrap().phase,
        Phase::Skipped(SkipReason::AlreadyStopped)
    );
}

#[tokio::test]
async fn remove_with_shutdown_stops_first() {
    let runner = ScriptedRunner::new();
    let exec = QubesExecutor::new(&runner);
    lifecycle::remove(&exec, &NullObserver, "work", true)
        .await
        .unwrap();
    assert_eq!(
        runner.mutations(),
        [
            sudo("qvm-shutdown --wait --timeout 120 work"),
            sudo("qvm-remove --quiet --force work"),
        ]
    );
}

#[tokio::test]
async fn remove_refuses_a_running_domain() {
    let runner = ScriptedRunner::new();
    let exec = QubesExecutor::new(&runner);
    let err = lifecycle::remove(&exec, &NullObserver, "work", false)
        .await
        .unwrap_err();
    assert_eq!(domain_error(&err), DomainError::IsRunning("work".into()));
    assert!(runner.mutations().is_empty());
}

#[tokio::test]
async fn removing_a_missing_domain_is_a_no_op() {
    let runner = ScriptedRunner::new().exits("qvm-check --quiet ghost", 2);
    let exec = QubesExecutor::new(&runner);
    let outcome = lifecycle::remove(&exec, &NullObserver, "ghost", false)
        .await
        .unwrap();
    assert_eq!(outcome, Outcome::Skipped(SkipReason::NotFound));
    assert!(runner.mutations().is_empty());
}

// ── workflows ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn clone_from_a_missing_source_issues_nothing() {
    let runner = ScriptedRunner::new().exits("qvm-check --quiet fedora-40", 2);
    let exec = QubesExecutor::new(&runner);
    let request = VmRequest::new("dev", "red").clone_from("fedora-40");
    let err = create_vm(&exec, &NullObserver, request).await.unwrap_err();
    assert_eq!(domain_error(&err), DomainError::DoesNotExist("fedora-40".into()));
    assert!(err.downcast_ref::<StepFailed>().is_none());
    assert!(runner.mutations().is_empty());
}

#[tokio::test]
async fn failed_step_reports_its_index_and_resume_skips_earlier_steps() {
    let runner = ScriptedRunner::new().exits("qvm-service", 1);
    let exec = QubesExecutor::new(&runner);
    let request = || {
        VmRequest::new("dev", "red")
            .clone_from("fedora-40")
            .prefs(PrefsBuilder::new().build().unwrap())
            .services(&["crond"])
    };

    // clone (0) and preferences (1) already ran; services (2) fail
    let err = resume_vm(&exec, &NullObserver, request(), 1)
        .await
        .unwrap_err();
    let failed = err.downcast_ref::<StepFailed>().unwrap();
    assert_eq!(failed.index, 2);
    assert_eq!(failed.step, "enable services");
    assert!(matches!(
        domain_error(&err),
        DomainError::ProcessFailed { code: 1, .. }
    ));
    assert_eq!(
        runner.mutations(),
        [
            sudo("qvm-prefs -s dev label red"),
            sudo("qvm-prefs -s dev maxmem 1000"),
            sudo("qvm-prefs -s dev memory 400"),
            sudo("qvm-service --enable dev crond"),
        ]
    );
}

#[tokio::test]
async fn resume_past_the_end_is_rejected() {
    let runner = ScriptedRunner::new();
    let exec = QubesExecutor::new(&runner);
    let request = VmRequest::new("dev", "red");
    let steps = request.plan().len();
    let err = resume_vm(&exec, &NullObserver, request, steps + 1)
        .await
        .unwrap_err();
    assert!(matches!(
        domain_error(&err),
        DomainError::PreconditionFailed(_)
    ));
    assert!(runner.calls().is_empty());
}

#[tokio::test]
async fn template_source_must_be_a_template() {
    let runner = ScriptedRunner::new().exits("--template work", 1);
    let exec = QubesExecutor::new(&runner);
    let events = Events::default();
    let request = TemplateRequest::new("tpl-dev", "work");

    let err = create_template(&exec, &ShellPackageScripts, &events, &request)
        .await
        .unwrap_err();
    assert_eq!(domain_error(&err), DomainError::IsNotTemplate("work".into()));
    assert!(runner.mutations().is_empty());

    let events = events.0.borrow();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].operation, Operation::CreateTemplate);
    assert!(matches!(events[1].phase, Phase::Failed(_)));
}
