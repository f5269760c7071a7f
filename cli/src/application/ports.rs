//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain` — never from `crate::infra`,
//! `crate::commands`, or `crate::output`.

use std::path::PathBuf;
use std::process::{ExitStatus, Output};

use anyhow::Result;

use crate::domain::{GitRepo, LifecycleEvent, QsmConfig, RepoStore};

// ── Constants ─────────────────────────────────────────────────────────────────

/// The privileged host context, as named by the control plane.
pub const HOST_DOMAIN: &str = "dom0";

/// User that runs control-plane commands and package managers.
pub const ROOT_USER: &str = "root";

// ── Value Types ───────────────────────────────────────────────────────────────

/// Where a command runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionTarget<'a> {
    /// Directly on the host, with privilege elevation.
    HostPrivileged,
    /// Inside the named guest, through the relay. Starts the guest if needed.
    GuestDomain(&'a str),
}

/// One command to execute. Struct-based so executors and test doubles
/// don't break when a field is added.
#[derive(Debug, Clone, Copy)]
pub struct Invocation<'a> {
    /// Argument vector; `command[0]` is the program.
    pub command: &'a [&'a str],
    pub target: ExecutionTarget<'a>,
    /// User the command runs as on the target.
    pub user: &'a str,
    /// Capture output instead of passing it through. Used for probes.
    pub quiet: bool,
}

impl<'a> Invocation<'a> {
    /// A command run as root on the host.
    #[must_use]
    pub fn host(command: &'a [&'a str]) -> Self {
        Self {
            command,
            target: ExecutionTarget::HostPrivileged,
            user: ROOT_USER,
            quiet: false,
        }
    }

    /// A command run as `user` inside `domain`.
    #[must_use]
    pub fn guest(domain: &'a str, user: &'a str, command: &'a [&'a str]) -> Self {
        Self {
            command,
            target: ExecutionTarget::GuestDomain(domain),
            user,
            quiet: false,
        }
    }

    #[must_use]
    pub fn quiet(mut self) -> Self {
        self.quiet = true;
        self
    }
}

/// Result of a command that exited successfully.
///
/// Exit status is the only success signal; a non-zero exit is returned
/// as an error, never as a `CommandResult`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandResult {
    pub exit_code: i32,
    pub succeeded: bool,
}

impl CommandResult {
    pub const SUCCESS: Self = Self {
        exit_code: 0,
        succeeded: true,
    };
}

// ── Executor Port ─────────────────────────────────────────────────────────────

/// Runs commands on the host or inside a guest.
#[allow(async_fn_in_trait)]
pub trait Executor {
    /// Execute `invocation` and wait for it to finish.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::ProcessFailed` carrying the exit code when the
    /// process exits non-zero, or an error if it cannot be spawned or is
    /// killed by a signal.
    async fn execute(&self, invocation: &Invocation<'_>) -> Result<CommandResult>;
}

// ── Command Runner Port ───────────────────────────────────────────────────────

/// Abstracts process execution so infrastructure can be swapped or mocked.
///
/// Programs are spawned from argument vectors; no shell is involved.
#[allow(async_fn_in_trait)]
pub trait CommandRunner {
    /// Run a program and capture its output.
    async fn run(&self, program: &str, args: &[&str]) -> Result<Output>;
    /// Run a program with inherited stdio and return only its exit status.
    async fn run_status(&self, program: &str, args: &[&str]) -> Result<ExitStatus>;
}

// ── Lifecycle Observer Port ───────────────────────────────────────────────────

/// Receives lifecycle events so services can report progress without
/// depending on the Presentation layer. Sync trait — no async needed.
#[cfg_attr(test, mockall::automock)]
pub trait LifecycleObserver {
    fn notify(&self, event: &LifecycleEvent);
}

/// Observer that drops every event.
pub struct NullObserver;

impl LifecycleObserver for NullObserver {
    fn notify(&self, _: &LifecycleEvent) {}
}

// ── Guest Script Port ─────────────────────────────────────────────────────────

/// Produces package-manager script bodies run inside guests.
///
/// Payloads are handed to the executor verbatim; packages are already
/// validated.
pub trait PackageScripts {
    fn update(&self) -> String;
    fn install(&self, packages: &[&str]) -> String;
    fn remove(&self, packages: &[&str]) -> String;
}

/// Produces git repository script bodies run inside guests.
///
/// Inputs are already validated.
pub trait RepoScripts {
    /// Create the store and its `dist/` directory unless it exists.
    fn verify_store(&self, store: &RepoStore<'_>) -> String;
    /// Pull `repo` inside the store, cloning it first if it is missing.
    fn pull(&self, store: &RepoStore<'_>, repo: &GitRepo<'_>) -> String;
}

// ── Config Port ───────────────────────────────────────────────────────────────

/// Abstracts configuration persistence.
pub trait ConfigStore {
    /// Load the configuration, initialising it on first use.
    ///
    /// # Errors
    ///
    /// Returns an error if the directories or file cannot be created or read.
    fn load(&self) -> Result<QsmConfig>;
    /// Path of the configuration file.
    fn path(&self) -> PathBuf;
}
