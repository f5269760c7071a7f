//! Domain lifecycle operations: create, clone, start, stop, remove,
//! preferences, services and firewall rules.
//!
//! Every operation re-probes state before mutating; nothing is cached.
//! Multi-item operations (preferences, services) apply one command per item
//! and stop at the first failure without rolling back.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.

use anyhow::Result;

use super::predicates::{
    exists, exists_or_fail, is_running, is_stopped_or_fail, not_exists_or_fail,
};
use crate::application::ports::{Executor, Invocation, LifecycleObserver};
use crate::application::services::Tracked;
use crate::domain::error::exit_code_of;
use crate::domain::exit_codes::QVM_CREATE_ALREADY_EXISTS;
use crate::domain::prefs::validate_label;
use crate::domain::validate::{
    validate_create_options, validate_domain_name, validate_service_name,
};
use crate::domain::{FirewallRequest, FirewallRule, Operation, Outcome, PreferenceSet, SkipReason};

/// Seconds `stop` waits for a graceful shutdown unless told otherwise.
pub const DEFAULT_STOP_TIMEOUT: u32 = 120;

/// Create a domain.
///
/// With `exists_ok` the create command is attempted directly and only the
/// "already exists" exit code is absorbed. Without it, existence is asserted
/// first and nothing is issued for an existing domain. `options` are extra
/// `qvm-create` arguments, placed before the name; they must open with an
/// option and may not contain whitespace.
///
/// # Errors
///
/// Returns `ValidationFailed` for a bad name, label or option, `AlreadyExists` when
/// `exists_ok` is false and the domain exists, or `ProcessFailed`.
pub async fn create(
    exec: &impl Executor,
    observer: &impl LifecycleObserver,
    name: &str,
    label: &str,
    options: &[&str],
    exists_ok: bool,
) -> Result<Outcome> {
    let op = Tracked::begin(observer, Operation::Create, name);
    op.finish(create_domain(exec, name, label, options, exists_ok).await)
}

async fn create_domain(
    exec: &impl Executor,
    name: &str,
    label: &str,
    options: &[&str],
    exists_ok: bool,
) -> Result<Outcome> {
    validate_domain_name(name)?;
    validate_label(label)?;
    validate_create_options(options)?;
    let mut argv = vec!["qvm-create", "--quiet", "--label", label];
    argv.extend_from_slice(options);
    argv.push(name);
    // the expected failure of an existing name stays off the terminal
    let invocation = Invocation::host(&argv).quiet();

    if !exists_ok {
        not_exists_or_fail(exec, name).await?;
        exec.execute(&invocation).await?;
        return Ok(Outcome::Applied);
    }
    match exec.execute(&invocation).await {
        Ok(_) => Ok(Outcome::Applied),
        Err(err) if exit_code_of(&err) == Some(QVM_CREATE_ALREADY_EXISTS) => {
            Ok(Outcome::Skipped(SkipReason::AlreadyExists))
        }
        Err(err) => Err(err),
    }
}

/// Clone `source` into a new domain `target`.
///
/// # Errors
///
/// Returns `DoesNotExist` for a missing source or `AlreadyExists` for an
/// existing target, in both cases before anything is cloned.
pub async fn clone(
    exec: &impl Executor,
    observer: &impl LifecycleObserver,
    source: &str,
    target: &str,
) -> Result<Outcome> {
    let op = Tracked::begin(observer, Operation::Clone, target);
    op.finish(clone_domain(exec, source, target).await)
}

async fn clone_domain(exec: &impl Executor, source: &str, target: &str) -> Result<Outcome> {
    exists_or_fail(exec, source).await?;
    not_exists_or_fail(exec, target).await?;
    exec.execute(&Invocation::host(&["qvm-clone", "--quiet", source, target]).quiet())
        .await?;
    Ok(Outcome::Applied)
}

/// Start `domain`. Starting a running domain is left to the control plane,
/// which skips it.
///
/// # Errors
///
/// Returns `DoesNotExist` or `ProcessFailed`.
pub async fn start(
    exec: &impl Executor,
    observer: &impl LifecycleObserver,
    domain: &str,
) -> Result<Outcome> {
    let op = Tracked::begin(observer, Operation::Start, domain);
    op.finish(start_domain(exec, domain).await)
}

async fn start_domain(exec: &impl Executor, domain: &str) -> Result<Outcome> {
    exists_or_fail(exec, domain).await?;
    exec.execute(&Invocation::host(&["qvm-start", "--skip-if-running", domain]))
        .await?;
    Ok(Outcome::Applied)
}

/// Shut `domain` down, waiting at most `timeout` seconds.
///
/// A stopped domain is a no-op; only the probes run.
///
/// # Errors
///
/// Returns `DoesNotExist` or `ProcessFailed`.
pub async fn stop(
    exec: &impl Executor,
    observer: &impl LifecycleObserver,
    domain: &str,
    timeout: u32,
) -> Result<Outcome> {
    let op = Tracked::begin(observer, Operation::Stop, domain);
    op.finish(stop_domain(exec, domain, timeout).await)
}

async fn stop_domain(exec: &impl Executor, domain: &str, timeout: u32) -> Result<Outcome> {
    exists_or_fail(exec, domain).await?;
    if !is_running(exec, domain).await? {
        return Ok(Outcome::Skipped(SkipReason::AlreadyStopped));
    }
    let timeout = timeout.to_string();
    exec.execute(&Invocation::host(&[
        "qvm-shutdown",
        "--wait",
        "--timeout",
        timeout.as_str(),
        domain,
    ]))
    .await?;
    Ok(Outcome::Applied)
}

/// Remove `domain`. A missing domain is a successful no-op.
///
/// With `shutdown_ok` a running domain is stopped first; without it a
/// running domain is refused.
///
/// # Errors
///
/// Returns `IsRunning` when the domain runs and `shutdown_ok` is false, or
/// `ProcessFailed`.
pub async fn remove(
    exec: &impl Executor,
    observer: &impl LifecycleObserver,
    domain: &str,
    shutdown_ok: bool,
) -> Result<Outcome> {
    let op = Tracked::begin(observer, Operation::Remove, domain);
    op.finish(remove_domain(exec, observer, domain, shutdown_ok).await)
}

async fn remove_domain(
    exec: &impl Executor,
    observer: &impl LifecycleObserver,
    domain: &str,
    shutdown_ok: bool,
) -> Result<Outcome> {
    if !exists(exec, domain).await? {
        return Ok(Outcome::Skipped(SkipReason::NotFound));
    }
    if shutdown_ok {
        stop(exec, observer, domain, DEFAULT_STOP_TIMEOUT).await?;
    } else {
        is_stopped_or_fail(exec, domain).await?;
    }
    exec.execute(&Invocation::host(&["qvm-remove", "--quiet", "--force", domain]))
        .await?;
    Ok(Outcome::Applied)
}

/// Apply every preference in `prefs`, one `qvm-prefs` call each.
///
/// # Errors
///
/// Returns `DoesNotExist`, or the first `ProcessFailed`; preferences applied
/// before it stay applied.
pub async fn set_preferences(
    exec: &impl Executor,
    observer: &impl LifecycleObserver,
    domain: &str,
    prefs: &PreferenceSet,
) -> Result<Outcome> {
    let op = Tracked::begin(observer, Operation::SetPreferences, domain);
    let result = apply_preferences(exec, &op, domain, prefs).await;
    op.finish(result)
}

async fn apply_preferences<O: LifecycleObserver>(
    exec: &impl Executor,
    op: &Tracked<'_, O>,
    domain: &str,
    prefs: &PreferenceSet,
) -> Result<Outcome> {
    exists_or_fail(exec, domain).await?;
    for (key, value) in prefs.iter() {
        let value = value.to_string();
        exec.execute(&Invocation::host(&["qvm-prefs", "-s", domain, key, value.as_str()]))
            .await?;
        op.progress(format!("{key}: {value}"));
    }
    Ok(Outcome::Applied)
}

/// # Errors
///
/// Returns `ValidationFailed` for a bad service name (before anything runs),
/// `DoesNotExist`, or the first `ProcessFailed`.
pub async fn enable_services(
    exec: &impl Executor,
    observer: &impl LifecycleObserver,
    domain: &str,
    services: &[&str],
) -> Result<Outcome> {
    let op = Tracked::begin(observer, Operation::EnableServices, domain);
    let result = toggle_services(exec, &op, domain, services, "--enable").await;
    op.finish(result)
}

/// # Errors
///
/// Returns `ValidationFailed` for a bad service name (before anything runs),
/// `DoesNotExist`, or the first `ProcessFailed`.
pub async fn disable_services(
    exec: &impl Executor,
    observer: &impl LifecycleObserver,
    domain: &str,
    services: &[&str],
) -> Result<Outcome> {
    let op = Tracked::begin(observer, Operation::DisableServices, domain);
    let result = toggle_services(exec, &op, domain, services, "--disable").await;
    op.finish(result)
}

async fn toggle_services<O: LifecycleObserver>(
    exec: &impl Executor,
    op: &Tracked<'_, O>,
    domain: &str,
    services: &[&str],
    flag: &str,
) -> Result<Outcome> {
    for service in services {
        validate_service_name(service)?;
    }
    exists_or_fail(exec, domain).await?;
    for service in services {
        exec.execute(&Invocation::host(&["qvm-service", flag, domain, service]))
            .await?;
        op.progress(*service);
    }
    Ok(Outcome::Applied)
}

/// Validate `request` and add it to the firewall of `domain`.
///
/// # Errors
///
/// Returns `ValidationFailed` before any command is issued, then
/// `DoesNotExist` or `ProcessFailed`.
pub async fn firewall_rule(
    exec: &impl Executor,
    observer: &impl LifecycleObserver,
    domain: &str,
    request: &FirewallRequest<'_>,
) -> Result<Outcome> {
    let op = Tracked::begin(observer, Operation::Firewall, domain);
    op.finish(add_firewall_rule(exec, domain, request).await)
}

async fn add_firewall_rule(
    exec: &impl Executor,
    domain: &str,
    request: &FirewallRequest<'_>,
) -> Result<Outcome> {
    let rule = FirewallRule::try_from(request)?;
    exists_or_fail(exec, domain).await?;
    let args = rule.to_args();
    let mut argv = vec!["qvm-firewall", domain, "add"];
    argv.extend(args.iter().map(String::as_str));
    exec.execute(&Invocation::host(&argv)).await?;
    Ok(Outcome::Applied)
}
