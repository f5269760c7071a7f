//! Typed domain error enums.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All error types implement `thiserror::Error` and convert to `anyhow::Error`
//! via the `?` operator.

use thiserror::Error;

/// Outcomes of a domain operation that the caller can tell apart.
///
/// Services return `anyhow::Result`; match on a failure with
/// `err.downcast_ref::<DomainError>()`. Context attached further up the
/// chain does not hide the variant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("{0} doesn't exist")]
    DoesNotExist(String),

    #[error("{0} already exists")]
    AlreadyExists(String),

    #[error("{0} is running")]
    IsRunning(String),

    #[error("{0} is not running")]
    IsStopped(String),

    #[error("{0} is a template")]
    IsTemplate(String),

    #[error("{0} is not a template")]
    IsNotTemplate(String),

    #[error("{command} exited with status {code}")]
    ProcessFailed { command: String, code: i32 },

    #[error("precondition failed: {0}")]
    PreconditionFailed(String),

    #[error("invalid {field}: {reason}")]
    ValidationFailed { field: String, reason: String },
}

impl DomainError {
    /// Shorthand for a `ValidationFailed` on `field`.
    pub fn invalid(field: &str, reason: impl Into<String>) -> Self {
        Self::ValidationFailed {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

/// Context attached to the failure of one step of a composite workflow.
///
/// `index` is the cursor to resume from once the cause is fixed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("step {index} ({step}) failed")]
pub struct StepFailed {
    pub index: usize,
    pub step: String,
}

/// Exit code of a `ProcessFailed` anywhere in the error chain.
pub fn exit_code_of(err: &anyhow::Error) -> Option<i32> {
    match err.downcast_ref::<DomainError>() {
        Some(DomainError::ProcessFailed { code, .. }) => Some(*code),
        _ => None,
    }
}
