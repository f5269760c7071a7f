//! Command implementations

pub mod config;
pub mod install;
pub mod pull;
pub mod remove;
pub mod start;
pub mod stop;
pub mod uninstall;
pub mod update;

use clap::Args;

use crate::application::HOST_DOMAIN;

/// A domain name, or `dom0` for the privileged host.
#[derive(Args)]
pub struct TargetArgs {
    /// Domain to operate on (`dom0` for the host)
    pub target: String,
}

impl TargetArgs {
    /// Whether the command targets the host rather than a guest.
    #[must_use]
    pub fn is_host(&self) -> bool {
        self.target == HOST_DOMAIN
    }
}

/// Arguments for the install and uninstall commands.
#[derive(Args)]
pub struct PackagesArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Packages to operate on
    #[arg(required = true)]
    pub packages: Vec<String>,
}

impl PackagesArgs {
    pub(crate) fn packages(&self) -> Vec<&str> {
        self.packages.iter().map(String::as_str).collect()
    }
}

/// Arguments for commands that act on a single guest domain.
#[derive(Args)]
pub struct DomainArgs {
    /// Domain name
    pub domain: String,
}
