//! Shared test helpers for VM service tests.
//!
//! `FakeControlPlane` implements `Executor` over an in-memory domain table,
//! answering probes with the real exit codes and recording every call.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};

use anyhow::Result;

use crate::application::ports::{
    CommandResult, ExecutionTarget, Executor, Invocation, LifecycleObserver,
};
use crate::domain::error::DomainError;
use crate::domain::events::LifecycleEvent;
use crate::domain::exit_codes::{
    QVM_CHECK_IS_NOT_RUNNING, QVM_CHECK_IS_NOT_TEMPLATE, QVM_CHECK_NOT_FOUND,
    QVM_CREATE_ALREADY_EXISTS,
};

/// Generic failure code the fake uses for invalid mutations.
const FAILURE: i32 = 1;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub argv: Vec<String>,
    /// Guest domain for relayed commands, `None` on the host.
    pub guest: Option<String>,
    pub user: String,
    pub quiet: bool,
}

impl Call {
    pub fn line(&self) -> String {
        self.argv.join(" ")
    }

    pub fn program(&self) -> &str {
        self.argv.first().map_or("", String::as_str)
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct FakeDomain {
    running: bool,
    template: bool,
}

#[derive(Default)]
pub struct FakeControlPlane {
    domains: RefCell<BTreeMap<String, FakeDomain>>,
    calls: RefCell<Vec<Call>>,
    failures: HashMap<String, i32>,
}

impl FakeControlPlane {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_domain(self, name: &str) -> Self {
        self.domains
            .borrow_mut()
            .entry(name.to_string())
            .or_default();
        self
    }

    pub fn with_running(self, name: &str) -> Self {
        self.domains
            .borrow_mut()
            .entry(name.to_string())
            .or_default()
            .running = true;
        self
    }

    pub fn with_template(self, name: &str) -> Self {
        self.domains
            .borrow_mut()
            .entry(name.to_string())
            .or_default()
            .template = true;
        self
    }

    /// Make the command whose argv joins to `line` exit with `code`.
    pub fn fail_when(mut self, line: &str, code: i32) -> Self {
        self.failures.insert(line.to_string(), code);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    /// Calls other than state probes.
    pub fn mutations(&self) -> Vec<Call> {
        self.calls
            .borrow()
            .iter()
            .filter(|c| c.program() != "qvm-check")
            .cloned()
            .collect()
    }

    pub fn count(&self, program: &str) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|c| c.program() == program)
            .count()
    }

    pub fn exists(&self, name: &str) -> bool {
        self.domains.borrow().contains_key(name)
    }

    pub fn running(&self, name: &str) -> bool {
        self.domains.borrow().get(name).is_some_and(|d| d.running)
    }

    fn host(&self, argv: &[&str]) -> std::result::Result<(), i32> {
        let mut domains = self.domains.borrow_mut();
        let last = argv.last().copied().unwrap_or_default();
        match argv.first().copied().unwrap_or_default() {
            "qvm-check" => {
                let Some(d) = domains.get(last) else {
                    return Err(QVM_CHECK_NOT_FOUND);
                };
                if argv.contains(&"--running") && !d.running {
                    return Err(QVM_CHECK_IS_NOT_RUNNING);
                }
                if argv.contains(&"--template") && !d.template {
                    return Err(QVM_CHECK_IS_NOT_TEMPLATE);
                }
                Ok(())
            }
            "qvm-create" => {
                if domains.contains_key(last) {
                    return Err(QVM_CREATE_ALREADY_EXISTS);
                }
                domains.insert(last.to_string(), FakeDomain::default());
                Ok(())
            }
            "qvm-clone" => {
                let source = argv[argv.len() - 2];
                let template = domains.get(source).ok_or(FAILURE)?.template;
                if domains.contains_key(last) {
                    return Err(FAILURE);
                }
                domains.insert(
                    last.to_string(),
                    FakeDomain {
                        running: false,
                        template,
                    },
                );
                Ok(())
            }
            "qvm-start" => {
                domains.get_mut(last).ok_or(FAILURE)?.running = true;
                Ok(())
            }
            "qvm-shutdown" => {
                domains.get_mut(last).ok_or(FAILURE)?.running = false;
                Ok(())
            }
            "qvm-remove" => match domains.get(last) {
                Some(d) if !d.running => {
                    domains.remove(last);
                    Ok(())
                }
                _ => Err(FAILURE),
            },
            "qvm-prefs" | "qvm-service" => {
                domains.get(argv[2]).ok_or(FAILURE).map(|_| ())
            }
            "qvm-firewall" => domains.get(argv[1]).ok_or(FAILURE).map(|_| ()),
            _ => Ok(()),
        }
    }

    fn guest(&self, domain: &str) -> std::result::Result<(), i32> {
        // the relay auto-starts the guest
        self.domains
            .borrow_mut()
            .get_mut(domain)
            .ok_or(FAILURE)?
            .running = true;
        Ok(())
    }
}

impl Executor for FakeControlPlane {
    async fn execute(&self, invocation: &Invocation<'_>) -> Result<CommandResult> {
        let argv: Vec<String> = invocation.command.iter().map(|s| (*s).to_string()).collect();
        let guest = match invocation.target {
            ExecutionTarget::HostPrivileged => None,
            ExecutionTarget::GuestDomain(d) => Some(d.to_string()),
        };
        let line = argv.join(" ");
        self.calls.borrow_mut().push(Call {
            argv,
            guest: guest.clone(),
            user: invocation.user.to_string(),
            quiet: invocation.quiet,
        });

        let outcome = match self.failures.get(&line) {
            Some(code) => Err(*code),
            None => match guest {
                Some(domain) => self.guest(&domain),
                None => self.host(invocation.command),
            },
        };
        match outcome {
            Ok(()) => Ok(CommandResult::SUCCESS),
            Err(code) => Err(DomainError::ProcessFailed {
                command: line,
                code,
            }
            .into()),
        }
    }
}

/// Observer that keeps every event.
#[derive(Default)]
pub struct RecordingObserver {
    events: RefCell<Vec<LifecycleEvent>>,
}

impl RecordingObserver {
    pub fn events(&self) -> Vec<LifecycleEvent> {
        self.events.borrow().clone()
    }
}

impl LifecycleObserver for RecordingObserver {
    fn notify(&self, event: &LifecycleEvent) {
        self.events.borrow_mut().push(event.clone());
    }
}

/// The `DomainError` at the root of `err`.
pub fn domain_error(err: &anyhow::Error) -> DomainError {
    err.downcast_ref::<DomainError>()
        .cloned()
        .expect("error should carry a DomainError")
}
