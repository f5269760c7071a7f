//! Application context — unified state passed to every command handler.
//!
//! Constructed once in `Cli::run()`; command handlers take `&AppContext`
//! instead of building their own executor, scripts and output context.

use anyhow::Result;

use crate::infra::command_runner::TokioCommandRunner;
use crate::infra::executor::QubesExecutor;
use crate::infra::repo_scripts::ShellRepoScripts;
use crate::infra::scripts::ShellPackageScripts;
use crate::output::{OutputContext, TerminalReporter};

/// Output rendering flags.
pub struct OutputFlags {
    /// Disable ANSI color output.
    pub no_color: bool,
    /// Suppress non-error output.
    pub quiet: bool,
}

/// Behaviour flags.
pub struct BehaviourFlags {
    /// Skip interactive prompts (also set by `CI` / `QSM_YES` env vars).
    pub yes: bool,
}

/// Flags passed from the top-level CLI to `AppContext::new`.
pub struct AppFlags {
    pub output: OutputFlags,
    pub behaviour: BehaviourFlags,
}

/// Unified application context passed to every command handler.
pub struct AppContext {
    /// Terminal output context (colors, quiet mode).
    pub output: OutputContext,
    /// Runs control-plane commands on the host and in guests.
    pub executor: QubesExecutor<TokioCommandRunner>,
    /// Package-manager scripts for guests.
    pub scripts: ShellPackageScripts,
    /// Git repository store scripts for guests.
    pub repo_scripts: ShellRepoScripts,
    /// When `true`, skip interactive prompts and assume yes.
    ///
    /// Set when `--yes` / `-y` is passed, or when the `CI` or `QSM_YES`
    /// environment variables are present.
    pub non_interactive: bool,
}

impl AppContext {
    /// Construct an `AppContext` from top-level CLI flags.
    #[must_use]
    pub fn new(flags: &AppFlags) -> Self {
        let ci_env = std::env::var_os("CI").is_some() || std::env::var_os("QSM_YES").is_some();
        Self {
            output: OutputContext::new(flags.output.no_color, flags.output.quiet),
            executor: QubesExecutor::new(TokioCommandRunner::new()),
            scripts: ShellPackageScripts,
            repo_scripts: ShellRepoScripts,
            non_interactive: flags.behaviour.yes || ci_env,
        }
    }

    /// Lifecycle observer that prints to the terminal.
    #[must_use]
    pub fn reporter(&self) -> TerminalReporter<'_> {
        TerminalReporter::new(&self.output)
    }

    /// Ask the user to confirm a destructive action.
    ///
    /// When `non_interactive` is `true` (CI, `--yes` flag, or `QSM_YES` env),
    /// returns `true` without prompting. Interactively the default is no.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal prompt fails (e.g. no TTY available).
    pub fn confirm(&self, prompt: &str) -> Result<bool> {
        if self.non_interactive {
            return Ok(true);
        }
        let confirmed = dialoguer::Confirm::new()
            .with_prompt(prompt)
            .default(false)
            .interact()?;
        Ok(confirmed)
    }
}
