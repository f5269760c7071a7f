//! `qsm update` — upgrade every package in a domain or on the host.

use anyhow::Result;

use crate::app::AppContext;
use crate::application::services::{host, vm::packages};
use crate::commands::TargetArgs;

/// Run `qsm update`.
///
/// # Errors
///
/// Returns an error if the domain does not exist or the package manager fails.
pub async fn run(app: &AppContext, args: &TargetArgs) -> Result<()> {
    let reporter = app.reporter();
    if args.is_host() {
        host::update(&app.executor, &reporter).await?;
    } else {
        packages::update(&app.executor, &app.scripts, &reporter, &args.target).await?;
    }
    Ok(())
}
