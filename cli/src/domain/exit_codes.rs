//! Exit-code protocol of the control-plane tools.
//!
//! The probe commands report state only through their exit status, and the
//! codes are not uniform across checks. Every code the services rely on is
//! named here; nothing else may compare against integer literals.

/// `qvm-check`: the domain does not exist.
pub const QVM_CHECK_NOT_FOUND: i32 = 2;
/// `qvm-check --running`: the domain exists but is not running.
pub const QVM_CHECK_IS_NOT_RUNNING: i32 = 1;
/// `qvm-check --template`: the domain exists but is not a template.
pub const QVM_CHECK_IS_NOT_TEMPLATE: i32 = 1;
/// `qvm-create`: a domain with that name already exists.
pub const QVM_CREATE_ALREADY_EXISTS: i32 = 1;

/// A read-only state query answered by exit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Probe {
    Exists,
    Running,
    Template,
}

impl Probe {
    /// The exit code meaning "the queried property does not hold".
    #[must_use]
    pub const fn negative_code(self) -> i32 {
        match self {
            Self::Exists => QVM_CHECK_NOT_FOUND,
            Self::Running => QVM_CHECK_IS_NOT_RUNNING,
            Self::Template => QVM_CHECK_IS_NOT_TEMPLATE,
        }
    }

    /// Map an exit code to the answer of the probe.
    ///
    /// `None` means the code carries no state signal and the failure must
    /// be propagated unchanged.
    #[must_use]
    pub const fn interpret(self, code: i32) -> Option<bool> {
        if code == 0 {
            Some(true)
        } else if code == self.negative_code() {
            Some(false)
        } else {
            None
        }
    }

    /// Flag added to `qvm-check` for this probe, if any.
    #[must_use]
    pub const fn flag(self) -> Option<&'static str> {
        match self {
            Self::Exists => None,
            Self::Running => Some("--running"),
            Self::Template => Some("--template"),
        }
    }
}
