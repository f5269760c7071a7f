//! Application services — use-case orchestration.
//!
//! Each service module implements a single use-case by composing domain logic
//! with port trait calls. Services import only from `crate::domain` and
//! `crate::application::ports` — never from `crate::infra`, `crate::commands`,
//! or `crate::output`.

pub mod config_service;
pub mod host;
pub mod vm;

use anyhow::Result;

use crate::application::ports::LifecycleObserver;
use crate::domain::{LifecycleEvent, Operation, Outcome, Phase};

/// One observed operation: emits `Started` on creation and the terminal
/// phase when finished.
pub(crate) struct Tracked<'a, O: LifecycleObserver> {
    observer: &'a O,
    operation: Operation,
    domain: &'a str,
}

impl<'a, O: LifecycleObserver> Tracked<'a, O> {
    pub(crate) fn begin(observer: &'a O, operation: Operation, domain: &'a str) -> Self {
        let tracked = Self {
            observer,
            operation,
            domain,
        };
        tracked.emit(Phase::Started);
        tracked
    }

    pub(crate) fn progress(&self, detail: impl Into<String>) {
        self.emit(Phase::Progress(detail.into()));
    }

    pub(crate) fn finish(self, result: Result<Outcome>) -> Result<Outcome> {
        self.emit(match &result {
            Ok(Outcome::Applied) => Phase::Succeeded,
            Ok(Outcome::Skipped(reason)) => Phase::Skipped(*reason),
            Err(e) => Phase::Failed(format!("{e:#}")),
        });
        result
    }

    fn emit(&self, phase: Phase) {
        self.observer
            .notify(&LifecycleEvent::new(self.operation, self.domain, phase));
    }
}
