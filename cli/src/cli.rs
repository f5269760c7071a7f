//! CLI argument parsing with clap derive

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::app::{AppContext, AppFlags, BehaviourFlags, OutputFlags};
use crate::commands;

/// Lifecycle management for Qubes domains and templates
#[derive(Parser)]
#[command(
    name = "qsm",
    version,
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// Assume yes for confirmation prompts
    #[arg(short = 'y', long, global = true)]
    pub yes: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Update all packages in a domain (or dom0)
    Update(commands::TargetArgs),

    /// Install packages in a domain (or dom0)
    Install(commands::PackagesArgs),

    /// Uninstall packages from a domain (or dom0)
    Uninstall(commands::PackagesArgs),

    /// Start a domain
    Start(commands::DomainArgs),

    /// Shut a domain down
    Stop(commands::stop::StopArgs),

    /// Remove a domain
    Remove(commands::remove::RemoveArgs),

    /// Clone or update a git repository inside a domain
    Pull(commands::pull::PullArgs),

    /// Print a configuration value
    Config(commands::config::ConfigArgs),
}

impl Cli {
    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error if the command fails.
    pub async fn run(self) -> Result<()> {
        let Cli {
            quiet,
            no_color,
            yes,
            command,
        } = self;
        let app = AppContext::new(&AppFlags {
            output: OutputFlags { no_color, quiet },
            behaviour: BehaviourFlags { yes },
        });
        match command {
            Command::Update(args) => commands::update::run(&app, &args).await,
            Command::Install(args) => commands::install::run(&app, &args).await,
            Command::Uninstall(args) => commands::uninstall::run(&app, &args).await,
            Command::Start(args) => commands::start::run(&app, &args).await,
            Command::Stop(args) => commands::stop::run(&app, &args).await,
            Command::Remove(args) => commands::remove::run(&app, &args).await,
            Command::Pull(args) => commands::pull::run(&app, &args).await,
            Command::Config(args) => commands::config::run(&args),
        }
    }
}
