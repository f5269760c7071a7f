//! Application services for domain state, lifecycle, packages and
//! provisioning workflows.
//!
//! Each module imports only from `crate::domain` and
//! `crate::application::ports`.

pub mod lifecycle;
pub mod packages;
pub mod predicates;
pub mod provision;
pub mod repo;

#[cfg(test)]
pub(crate) mod test_support;
