//! Executor adapter over the Qubes command-line tools.
//!
//! Host commands run through `sudo --user=<user> --`, guest commands through
//! the `qvm-run` relay. Both are spawned as argument vectors. Only the relay
//! payload is a shell string, and every word in it is single-quoted.

use std::process::ExitStatus;

use anyhow::Result;

use crate::application::ports::{
    CommandResult, CommandRunner, ExecutionTarget, Executor, Invocation,
};
use crate::domain::DomainError;
use crate::domain::quote;

/// Privilege elevation on the host.
pub const ELEVATE: &str = "sudo";

/// Relay that delivers a command into a guest, starting it if needed.
pub const GUEST_RELAY: &str = "qvm-run";

/// Program and arguments that run `invocation` on its target.
#[must_use]
pub fn command_line(invocation: &Invocation<'_>) -> (&'static str, Vec<String>) {
    match invocation.target {
        ExecutionTarget::HostPrivileged => {
            let mut args = vec![format!("--user={}", invocation.user), "--".to_string()];
            args.extend(invocation.command.iter().map(|s| (*s).to_string()));
            (ELEVATE, args)
        }
        ExecutionTarget::GuestDomain(domain) => (
            GUEST_RELAY,
            vec![
                "--autostart".to_string(),
                "--user".to_string(),
                invocation.user.to_string(),
                "--pass-io".to_string(),
                domain.to_string(),
                quote::join(invocation.command),
            ],
        ),
    }
}

/// Map an exit status to the executor contract: zero succeeds, any other
/// code is a `ProcessFailed`, and a signal is neither.
fn interpret(command: &[&str], status: ExitStatus) -> Result<CommandResult> {
    match status.code() {
        Some(0) => Ok(CommandResult::SUCCESS),
        Some(code) => Err(DomainError::ProcessFailed {
            command: quote::join(command),
            code,
        }
        .into()),
        None => anyhow::bail!("{} was terminated by a signal", quote::join(command)),
    }
}

/// `Executor` for a Qubes host, generic over how processes are spawned.
pub struct QubesExecutor<R: CommandRunner> {
    runner: R,
}

impl<R: CommandRunner> QubesExecutor<R> {
    pub fn new(runner: R) -> Self {
        Self { runner }
    }
}

impl<R: CommandRunner> Executor for QubesExecutor<R> {
    async fn execute(&self, invocation: &Invocation<'_>) -> Result<CommandResult> {
        anyhow::ensure!(!invocation.command.is_empty(), "empty command");
        let (program, args) = command_line(invocation);
        let args: Vec<&str> = args.iter().map(String::as_str).collect();
        tracing::debug!(program, ?args, target = ?invocation.target, quiet = invocation.quiet, "exec");

        let status = if invocation.quiet {
            let output = self.runner.run(program, &args).await?;
            if !output.status.success() {
                tracing::trace!(stderr = %String::from_utf8_lossy(&output.stderr), "probe stderr");
            }
            output.status
        } else {
            self.runner.run_status(program, &args).await?
        };
        interpret(invocation.command, status)
    }
}
