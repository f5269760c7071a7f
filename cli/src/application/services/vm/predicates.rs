//! Domain state predicates derived from probe exit codes.
//!
//! State is never cached: every query runs a fresh probe. The `*_or_fail`
//! variants turn a false answer into the matching `DomainError`.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.

use anyhow::Result;

use crate::application::ports::{Executor, Invocation};
use crate::domain::error::{DomainError, exit_code_of};
use crate::domain::exit_codes::Probe;
use crate::domain::validate::validate_domain_name;

/// Run `qvm-check` for `probe` and interpret its exit code.
///
/// Codes the probe does not recognise are propagated as the original
/// `ProcessFailed`, never coerced to a boolean.
async fn check(exec: &impl Executor, probe: Probe, domain: &str) -> Result<bool> {
    validate_domain_name(domain)?;
    let mut argv = vec!["qvm-check", "--quiet"];
    argv.extend(probe.flag());
    argv.push(domain);

    match exec.execute(&Invocation::host(&argv).quiet()).await {
        Ok(_) => Ok(true),
        Err(err) => match exit_code_of(&err).and_then(|code| probe.interpret(code)) {
            Some(answer) => Ok(answer),
            None => Err(err),
        },
    }
}

/// `true` if `domain` exists.
///
/// # Errors
///
/// Returns an error if the probe fails with an unrecognised exit code.
pub async fn exists(exec: &impl Executor, domain: &str) -> Result<bool> {
    check(exec, Probe::Exists, domain).await
}

/// # Errors
///
/// Returns `DomainError::DoesNotExist` if `domain` is missing.
pub async fn exists_or_fail(exec: &impl Executor, domain: &str) -> Result<()> {
    if exists(exec, domain).await? {
        Ok(())
    } else {
        Err(DomainError::DoesNotExist(domain.to_string()).into())
    }
}

/// # Errors
///
/// Returns `DomainError::AlreadyExists` if `domain` exists.
pub async fn not_exists_or_fail(exec: &impl Executor, domain: &str) -> Result<()> {
    if exists(exec, domain).await? {
        Err(DomainError::AlreadyExists(domain.to_string()).into())
    } else {
        Ok(())
    }
}

/// `true` if `domain` is running. A missing domain is a probe failure.
///
/// # Errors
///
/// Returns an error if the probe fails with an unrecognised exit code.
pub async fn is_running(exec: &impl Executor, domain: &str) -> Result<bool> {
    check(exec, Probe::Running, domain).await
}

/// # Errors
///
/// Returns `DomainError::IsStopped` if `domain` is not running.
pub async fn is_running_or_fail(exec: &impl Executor, domain: &str) -> Result<()> {
    if is_running(exec, domain).await? {
        Ok(())
    } else {
        Err(DomainError::IsStopped(domain.to_string()).into())
    }
}

/// # Errors
///
/// Returns `DomainError::IsRunning` if `domain` is running.
pub async fn is_stopped_or_fail(exec: &impl Executor, domain: &str) -> Result<()> {
    if is_running(exec, domain).await? {
        Err(DomainError::IsRunning(domain.to_string()).into())
    } else {
        Ok(())
    }
}

/// `true` if `domain` is a template.
///
/// # Errors
///
/// Returns an error if the probe fails with an unrecognised exit code.
pub async fn is_template(exec: &impl Executor, domain: &str) -> Result<bool> {
    check(exec, Probe::Template, domain).await
}

/// Requires `domain` to exist and be a template.
///
/// # Errors
///
/// Returns `DomainError::DoesNotExist` or `DomainError::IsNotTemplate`.
pub async fn is_template_or_fail(exec: &impl Executor, domain: &str) -> Result<()> {
    exists_or_fail(exec, domain).await?;
    if is_template(exec, domain).await? {
        Ok(())
    } else {
        Err(DomainError::IsNotTemplate(domain.to_string()).into())
    }
}

/// Requires `domain` not to be a template.
///
/// With `must_exist = false` a missing domain passes, since it is trivially
/// not a template.
///
/// # Errors
///
/// Returns `DomainError::DoesNotExist` (only with `must_exist`) or
/// `DomainError::IsTemplate`.
pub async fn is_not_template_or_fail(
    exec: &impl Executor,
    domain: &str,
    must_exist: bool,
) -> Result<()> {
    if must_exist {
        exists_or_fail(exec, domain).await?;
    } else if !exists(exec, domain).await? {
        return Ok(());
    }
    if is_template(exec, domain).await? {
        Err(DomainError::IsTemplate(domain.to_string()).into())
    } else {
        Ok(())
    }
}
