//! `qsm remove` — delete a domain.

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::services::vm::lifecycle;
use crate::output::LineKind;

/// Arguments for the remove command.
#[derive(Args)]
pub struct RemoveArgs {
    /// Domain name
    pub domain: String,

    /// Shut the domain down first if it is running
    #[arg(long)]
    pub shutdown: bool,
}

/// Run `qsm remove`.
///
/// Asks for confirmation unless running non-interactively.
///
/// # Errors
///
/// Returns an error if the domain is running without `--shutdown`, or the
/// control plane refuses the removal.
pub async fn run(app: &AppContext, args: &RemoveArgs) -> Result<()> {
    let prompt = format!("Remove {} and all of its data?", args.domain);
    if !app.confirm(&prompt)? {
        app.output.print(LineKind::Warning, "Cancelled.");
        return Ok(());
    }
    lifecycle::remove(&app.executor, &app.reporter(), &args.domain, args.shutdown).await?;
    Ok(())
}
