//! `qsm start` — start a domain.

use anyhow::Result;

use crate::app::AppContext;
use crate::application::services::vm::lifecycle;
use crate::commands::DomainArgs;

/// Run `qsm start`.
///
/// # Errors
///
/// Returns an error if the domain does not exist or fails to start.
pub async fn run(app: &AppContext, args: &DomainArgs) -> Result<()> {
    lifecycle::start(&app.executor, &app.reporter(), &args.domain).await?;
    Ok(())
}
