//! Application service — configuration use-cases.

use std::path::PathBuf;

use anyhow::Result;

use crate::application::ports::ConfigStore;
use crate::domain::config::QsmConfig;

/// Load configuration, initialising it on first use.
///
/// # Errors
///
/// Returns an error if the store cannot be initialised or read.
pub fn load_config(store: &impl ConfigStore) -> Result<QsmConfig> {
    store.load()
}

/// Value of a single configuration option.
///
/// # Errors
///
/// Returns `ValidationFailed` for an unknown option, or a store error.
pub fn config_value(store: &impl ConfigStore, option: &str) -> Result<PathBuf> {
    let config = store.load()?;
    Ok(config.value(option)?.to_path_buf())
}
