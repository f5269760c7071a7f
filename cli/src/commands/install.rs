//! `qsm install` — install packages in a domain or on the host.

use anyhow::Result;

use crate::app::AppContext;
use crate::application::services::{host, vm::packages};
use crate::commands::PackagesArgs;

/// Run `qsm install`.
///
/// # Errors
///
/// Returns an error if a package name is rejected, the domain does not exist
/// or the package manager fails.
pub async fn run(app: &AppContext, args: &PackagesArgs) -> Result<()> {
    let reporter = app.reporter();
    let names = args.packages();
    if args.target.is_host() {
        host::install(&app.executor, &reporter, &names).await?;
    } else {
        packages::install(
            &app.executor,
            &app.scripts,
            &reporter,
            &args.target.target,
            &names,
        )
        .await?;
    }
    Ok(())
}
