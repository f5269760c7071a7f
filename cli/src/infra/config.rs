//! Infrastructure implementation of the `ConfigStore` port.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::application::ports::ConfigStore;
use crate::domain::config::{CONFIG_FILE_NAME, QsmConfig};

/// Overrides the configuration root (default `~/.qsm`).
pub const QSM_HOME_ENV: &str = "QSM_HOME";

const DIR_MODE: u32 = 0o750;
const FILE_MODE: u32 = 0o640;

/// `ConfigStore` backed by a JSON file under the configuration root.
pub struct JsonConfigStore {
    root: PathBuf,
}

impl JsonConfigStore {
    /// Store rooted at `$QSM_HOME`, or `~/.qsm`.
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn new() -> Result<Self> {
        if let Some(root) = std::env::var_os(QSM_HOME_ENV).filter(|v| !v.is_empty()) {
            return Ok(Self::with_root(PathBuf::from(root)));
        }
        let home = dirs::home_dir().context("cannot determine home directory")?;
        Ok(Self::with_root(home.join(".qsm")))
    }

    /// Store rooted at an explicit directory. Used by tests.
    #[must_use]
    pub fn with_root(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

fn create_dir(path: &Path) -> Result<()> {
    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(DIR_MODE);
    }
    builder
        .create(path)
        .with_context(|| format!("cannot create {}", path.display()))
}

/// Write `config` to a new file; an existing file is left untouched.
fn create_file(path: &Path, config: &QsmConfig) -> Result<()> {
    let mut options = fs::OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(FILE_MODE);
    }
    let mut file = match options.open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => return Ok(()),
        Err(e) => return Err(e).with_context(|| format!("cannot create {}", path.display())),
    };
    let content = serde_json::to_string_pretty(config).context("cannot serialize config")?;
    file.write_all(content.as_bytes())
        .and_then(|()| file.write_all(b"\n"))
        .with_context(|| format!("cannot write {}", path.display()))
}

impl ConfigStore for JsonConfigStore {
    fn load(&self) -> Result<QsmConfig> {
        let defaults = QsmConfig::under(&self.root);
        create_dir(&self.root)?;
        create_dir(&defaults.data_dir)?;
        create_dir(&defaults.plugins_dir)?;
        let path = self.path();
        create_file(&path, &defaults)?;

        let content = fs::read_to_string(&path)
            .with_context(|| format!("cannot read {}", path.display()))?;
        serde_json::from_str(&content).with_context(|| format!("cannot parse {}", path.display()))
    }

    fn path(&self) -> PathBuf {
        self.root.join(CONFIG_FILE_NAME)
    }
}
