//! Domain layer — pure types, validation and the exit-code protocol.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, or `std::process`.
//! All functions are synchronous and take data in, returning data out.

pub mod config;
pub mod error;
pub mod events;
pub mod exit_codes;
pub mod firewall;
pub mod prefs;
pub mod quote;
pub mod repo;
pub mod validate;

pub use config::QsmConfig;
pub use error::{DomainError, StepFailed, exit_code_of};
pub use events::{LifecycleEvent, Operation, Outcome, Phase, SkipReason};
pub use firewall::{FirewallRequest, FirewallRule};
pub use prefs::{PrefValue, PreferenceSet, PrefsBuilder};
pub use repo::{GitRepo, RepoStore};
