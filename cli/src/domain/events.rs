//! Lifecycle events and operation outcomes.
//!
//! Services report progress by emitting [`LifecycleEvent`]s to an injected
//! observer; they never print.

use std::fmt;

/// Operations the lifecycle services perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Create,
    Clone,
    Start,
    Stop,
    Remove,
    SetPreferences,
    EnableServices,
    DisableServices,
    Firewall,
    Update,
    Install,
    Uninstall,
    CreateVm,
    CreateTemplate,
    VerifyRepoStore,
    GitPull,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Create => "create",
            Self::Clone => "clone",
            Self::Start => "start",
            Self::Stop => "stop",
            Self::Remove => "remove",
            Self::SetPreferences => "set preferences",
            Self::EnableServices => "enable services",
            Self::DisableServices => "disable services",
            Self::Firewall => "add firewall rule",
            Self::Update => "update",
            Self::Install => "install packages",
            Self::Uninstall => "uninstall packages",
            Self::CreateVm => "create vm",
            Self::CreateTemplate => "create template",
            Self::VerifyRepoStore => "verify repo store",
            Self::GitPull => "git pull",
        })
    }
}

/// Why an operation had nothing to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    AlreadyExists,
    AlreadyStopped,
    NotFound,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::AlreadyExists => "already exists, using that",
            Self::AlreadyStopped => "already stopped",
            Self::NotFound => "doesn't exist, continuing",
        })
    }
}

/// Result of an idempotent operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The mutation was issued.
    Applied,
    /// The desired state already held; no mutation was issued.
    Skipped(SkipReason),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    Started,
    /// One item of a multi-item operation, e.g. `memory: 400`.
    Progress(String),
    Succeeded,
    Skipped(SkipReason),
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LifecycleEvent {
    pub operation: Operation,
    /// Domain name, or `dom0` for host operations.
    pub domain: String,
    pub phase: Phase,
}

impl LifecycleEvent {
    pub fn new(operation: Operation, domain: &str, phase: Phase) -> Self {
        Self {
            operation,
            domain: domain.to_string(),
            phase,
        }
    }
}
