//! Package-manager scripts run inside guests.
//!
//! The scripts are POSIX `sh` and pick `dnf` or `apt-get`, whichever the
//! guest has. Package names are single-quoted.

use crate::application::ports::PackageScripts;
use crate::domain::quote::shell_quote;

#[derive(Debug, Default, Clone, Copy)]
pub struct ShellPackageScripts;

fn quoted(packages: &[&str]) -> String {
    packages
        .iter()
        .map(|p| shell_quote(p))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Dispatch on the available package manager.
fn by_manager(dnf: &str, apt: &str) -> String {
    format!(
        "if command -v dnf >/dev/null 2>&1; then\n  \
         {dnf}\n\
         elif command -v apt-get >/dev/null 2>&1; then\n  \
         {apt}\n\
         else\n  \
         echo 'no supported package manager found' >&2\n  \
         exit 1\n\
         fi\n"
    )
}

impl PackageScripts for ShellPackageScripts {
    fn update(&self) -> String {
        by_manager(
            "dnf upgrade -y --refresh",
            "apt-get update && DEBIAN_FRONTEND=noninteractive apt-get upgrade -y",
        )
    }

    fn install(&self, packages: &[&str]) -> String {
        let packages = quoted(packages);
        by_manager(
            &format!("dnf install -y {packages}"),
            &format!(
                "apt-get update && DEBIAN_FRONTEND=noninteractive apt-get install -y {packages}"
            ),
        )
    }

    fn remove(&self, packages: &[&str]) -> String {
        let packages = quoted(packages);
        by_manager(
            &format!("dnf remove -y {packages}"),
            &format!("DEBIAN_FRONTEND=noninteractive apt-get remove -y {packages}"),
        )
    }
}
