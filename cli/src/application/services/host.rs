//! Package management on the privileged host.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.

use anyhow::Result;

use crate::application::ports::{Executor, HOST_DOMAIN, Invocation, LifecycleObserver};
use crate::application::services::Tracked;
use crate::domain::validate::validate_packages;
use crate::domain::{Operation, Outcome};

const DOM0_UPDATE: &str = "qubes-dom0-update";

async fn dom0_update(exec: &impl Executor, extra: &[&str], packages: &[&str]) -> Result<Outcome> {
    let mut argv = vec![DOM0_UPDATE];
    argv.extend_from_slice(extra);
    argv.push("-y");
    argv.extend_from_slice(packages);
    exec.execute(&Invocation::host(&argv)).await?;
    Ok(Outcome::Applied)
}

/// Update the host.
///
/// # Errors
///
/// Returns `ProcessFailed` if the updater fails.
pub async fn update(exec: &impl Executor, observer: &impl LifecycleObserver) -> Result<Outcome> {
    let op = Tracked::begin(observer, Operation::Update, HOST_DOMAIN);
    op.finish(dom0_update(exec, &[], &[]).await)
}

/// # Errors
///
/// Returns `ValidationFailed` for an empty or malformed package list, or
/// `ProcessFailed`.
pub async fn install(
    exec: &impl Executor,
    observer: &impl LifecycleObserver,
    packages: &[&str],
) -> Result<Outcome> {
    let op = Tracked::begin(observer, Operation::Install, HOST_DOMAIN);
    let result = match validate_packages(packages) {
        Ok(()) => dom0_update(exec, &[], packages).await,
        Err(e) => Err(e.into()),
    };
    op.finish(result)
}

/// # Errors
///
/// Returns `ValidationFailed` for an empty or malformed package list, or
/// `ProcessFailed`.
pub async fn uninstall(
    exec: &impl Executor,
    observer: &impl LifecycleObserver,
    packages: &[&str],
) -> Result<Outcome> {
    let op = Tracked::begin(observer, Operation::Uninstall, HOST_DOMAIN);
    let result = match validate_packages(packages) {
        Ok(()) => dom0_update(exec, &["--action=remove"], packages).await,
        Err(e) => Err(e.into()),
    };
    op.finish(result)
}
