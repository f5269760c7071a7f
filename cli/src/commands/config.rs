//! `qsm config` — print the resolved path of a configuration option.

use anyhow::Result;
use clap::Args;

use crate::application::services::config_service::config_value;
use crate::infra::config::JsonConfigStore;

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    /// Option to print (`data_dir` or `plugins_dir`)
    pub option: String,
}

/// Run `qsm config`.
///
/// Creates the configuration root and default file on first use.
///
/// # Errors
///
/// Returns an error for an unknown option or if the configuration cannot be
/// read or created.
pub fn run(args: &ConfigArgs) -> Result<()> {
    let store = JsonConfigStore::new()?;
    let value = config_value(&store, &args.option)?;
    println!("{}", value.display());
    Ok(())
}
