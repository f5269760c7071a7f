//! Git repository stores inside guests.
//!
//! A store is a directory owned by an unprivileged guest user that holds
//! cloned repositories next to a `dist/` directory for build output.

use std::sync::LazyLock;

use regex::Regex;

use crate::domain::error::DomainError;

/// Owner of a store unless another is given; the default guest user.
pub const DEFAULT_STORE_USER: &str = "user";
pub const DEFAULT_STORE_MODE: u32 = 0o750;

/// Subdirectory created alongside the repositories.
pub const DIST_DIR: &str = "dist";

/// POSIX user and group names.
static ACCOUNT_RE: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(r"^[a-z_][a-z0-9_-]{0,31}$").expect("valid regex")
});

/// A repository directory name: one path component, never `.` or `..`.
static REPO_NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(r"^[A-Za-z0-9_][A-Za-z0-9._-]*$").expect("valid regex")
});

/// Where repositories live inside a guest and who owns them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RepoStore<'a> {
    /// Absolute path of the store directory.
    pub dir: &'a str,
    pub user: &'a str,
    pub group: &'a str,
    pub mode: u32,
}

impl<'a> RepoStore<'a> {
    #[must_use]
    pub fn new(dir: &'a str) -> Self {
        Self {
            dir,
            user: DEFAULT_STORE_USER,
            group: DEFAULT_STORE_USER,
            mode: DEFAULT_STORE_MODE,
        }
    }

    #[must_use]
    pub fn owned_by(mut self, user: &'a str, group: &'a str) -> Self {
        self.user = user;
        self.group = group;
        self
    }

    #[must_use]
    pub fn mode(mut self, mode: u32) -> Self {
        self.mode = mode;
        self
    }

    /// # Errors
    ///
    /// Returns `ValidationFailed` for a relative or malformed directory, an
    /// invalid owner, or a mode outside `0o777`.
    pub fn validate(&self) -> Result<(), DomainError> {
        if !self.dir.starts_with('/') || self.dir.chars().any(char::is_control) {
            return Err(DomainError::invalid(
                "store_dir",
                format!("'{}' must be an absolute path", self.dir),
            ));
        }
        for (field, name) in [("user", self.user), ("group", self.group)] {
            if !ACCOUNT_RE.is_match(name) {
                return Err(DomainError::invalid(
                    field,
                    format!("'{name}' is not a valid account name"),
                ));
            }
        }
        if self.mode > 0o777 {
            return Err(DomainError::invalid(
                "mode",
                format!("{:o} is not a permission mode", self.mode),
            ));
        }
        Ok(())
    }

    /// Path of `name` inside the store.
    #[must_use]
    pub fn path_of(&self, name: &str) -> String {
        format!("{}/{name}", self.dir.trim_end_matches('/'))
    }
}

/// A remote repository and the directory it is cloned into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GitRepo<'a> {
    pub url: &'a str,
    pub name: &'a str,
}

impl GitRepo<'_> {
    /// # Errors
    ///
    /// Returns `ValidationFailed` for an empty or option-like URL, or a name
    /// that is not a single path component.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.url.trim().is_empty()
            || self.url.starts_with('-')
            || self.url.chars().any(char::is_whitespace)
        {
            return Err(DomainError::invalid(
                "repo",
                format!("'{}' is not a repository URL", self.url),
            ));
        }
        if !REPO_NAME_RE.is_match(self.name) {
            return Err(DomainError::invalid(
                "repo_name",
                format!("'{}' must be a single directory name", self.name),
            ));
        }
        Ok(())
    }
}
