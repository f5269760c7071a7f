//! `qsm stop` — shut a domain down and wait for it.

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::services::vm::lifecycle::{self, DEFAULT_STOP_TIMEOUT};

/// Arguments for the stop command.
#[derive(Args)]
pub struct StopArgs {
    /// Domain name
    pub domain: String,

    /// Seconds to wait for the shutdown to complete
    #[arg(long, default_value_t = DEFAULT_STOP_TIMEOUT)]
    pub timeout: u32,
}

/// Run `qsm stop`.
///
/// A domain that is already stopped is reported and left alone.
///
/// # Errors
///
/// Returns an error if the domain does not exist or the shutdown times out.
pub async fn run(app: &AppContext, args: &StopArgs) -> Result<()> {
    lifecycle::stop(&app.executor, &app.reporter(), &args.domain, args.timeout).await?;
    Ok(())
}
