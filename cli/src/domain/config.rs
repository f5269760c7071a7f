//! Domain types and validators for qsm configuration.
//!
//! Pure functions only — no I/O, no async, no filesystem access.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::error::DomainError;

pub const CONFIG_FILE_NAME: &str = "qsm.conf";
pub const VALID_CONFIG_OPTIONS: &[&str] = &["data_dir", "plugins_dir"];

/// Configuration stored in `~/.qsm/qsm.conf`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QsmConfig {
    pub data_dir: PathBuf,
    pub plugins_dir: PathBuf,
}

impl QsmConfig {
    /// Default layout under the configuration root.
    #[must_use]
    pub fn under(root: &Path) -> Self {
        Self {
            data_dir: root.join("data"),
            plugins_dir: root.join("plugins"),
        }
    }

    /// Value of a single option.
    ///
    /// # Errors
    ///
    /// Returns `ValidationFailed` for an unknown option.
    pub fn value(&self, option: &str) -> Result<&Path, DomainError> {
        match option {
            "data_dir" => Ok(&self.data_dir),
            "plugins_dir" => Ok(&self.plugins_dir),
            other => Err(DomainError::invalid(
                "option",
                format!(
                    "unknown option '{other}', valid options: {}",
                    VALID_CONFIG_OPTIONS.join(", ")
                ),
            )),
        }
    }
}
