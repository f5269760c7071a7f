//! Package management inside guest domains.
//!
//! Script bodies come from the `PackageScripts` port and are run with
//! `sh -c` as root through the guest relay, which starts the guest if it is
//! not running.

use anyhow::Result;

use super::predicates::exists_or_fail;
use crate::application::ports::{
    Executor, Invocation, LifecycleObserver, PackageScripts, ROOT_USER,
};
use crate::application::services::Tracked;
use crate::domain::validate::validate_packages;
use crate::domain::{Operation, Outcome};

async fn run_script(exec: &impl Executor, domain: &str, script: &str) -> Result<Outcome> {
    exists_or_fail(exec, domain).await?;
    exec.execute(&Invocation::guest(domain, ROOT_USER, &["sh", "-c", script]))
        .await?;
    Ok(Outcome::Applied)
}

/// Upgrade every package in `domain`.
///
/// # Errors
///
/// Returns `DoesNotExist` or `ProcessFailed`.
pub async fn update(
    exec: &impl Executor,
    scripts: &impl PackageScripts,
    observer: &impl LifecycleObserver,
    domain: &str,
) -> Result<Outcome> {
    let op = Tracked::begin(observer, Operation::Update, domain);
    op.finish(run_script(exec, domain, &scripts.update()).await)
}

/// # Errors
///
/// Returns `ValidationFailed` for an empty or malformed package list,
/// `DoesNotExist`, or `ProcessFailed`.
pub async fn install(
    exec: &impl Executor,
    scripts: &impl PackageScripts,
    observer: &impl LifecycleObserver,
    domain: &str,
    packages: &[&str],
) -> Result<Outcome> {
    let op = Tracked::begin(observer, Operation::Install, domain);
    let result = match validate_packages(packages) {
        Ok(()) => run_script(exec, domain, &scripts.install(packages)).await,
        Err(e) => Err(e.into()),
    };
    op.finish(result)
}

/// # Errors
///
/// Returns `ValidationFailed` for an empty or malformed package list,
/// `DoesNotExist`, or `ProcessFailed`.
pub async fn uninstall(
    exec: &impl Executor,
    scripts: &impl PackageScripts,
    observer: &impl LifecycleObserver,
    domain: &str,
    packages: &[&str],
) -> Result<Outcome> {
    let op = Tracked::begin(observer, Operation::Uninstall, domain);
    let result = match validate_packages(packages) {
        Ok(()) => run_script(exec, domain, &scripts.remove(packages)).await,
        Err(e) => Err(e.into()),
    };
    op.finish(result)
}
