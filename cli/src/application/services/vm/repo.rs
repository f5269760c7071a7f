//! Git repository stores inside guest domains.
//!
//! The store is prepared as root (it is chowned to its owner); pulls run as
//! the store owner so checkouts are never root-owned.

use anyhow::Result;

use super::predicates::exists_or_fail;
use crate::application::ports::{
    Executor, Invocation, LifecycleObserver, ROOT_USER, RepoScripts,
};
use crate::application::services::Tracked;
use crate::domain::{GitRepo, Operation, Outcome, RepoStore};

async fn run_script(exec: &impl Executor, domain: &str, user: &str, script: &str) -> Result<Outcome> {
    exists_or_fail(exec, domain).await?;
    exec.execute(&Invocation::guest(domain, user, &["sh", "-c", script]))
        .await?;
    Ok(Outcome::Applied)
}

/// Create `store` in `domain` unless it exists.
///
/// # Errors
///
/// Returns `ValidationFailed`, `DoesNotExist` or `ProcessFailed`.
pub async fn verify_store(
    exec: &impl Executor,
    scripts: &impl RepoScripts,
    observer: &impl LifecycleObserver,
    domain: &str,
    store: &RepoStore<'_>,
) -> Result<Outcome> {
    let op = Tracked::begin(observer, Operation::VerifyRepoStore, domain);
    let result = match store.validate() {
        Ok(()) => run_script(exec, domain, ROOT_USER, &scripts.verify_store(store)).await,
        Err(e) => Err(e.into()),
    };
    op.finish(result)
}

/// Pull `repo` into `store`, cloning it on first use. The store must exist;
/// see [`verify_store`].
///
/// # Errors
///
/// Returns `ValidationFailed`, `DoesNotExist` or `ProcessFailed`.
pub async fn pull(
    exec: &impl Executor,
    scripts: &impl RepoScripts,
    observer: &impl LifecycleObserver,
    domain: &str,
    store: &RepoStore<'_>,
    repo: &GitRepo<'_>,
) -> Result<Outcome> {
    let op = Tracked::begin(observer, Operation::GitPull, domain);
    let result = match store.validate().and_then(|()| repo.validate()) {
        Ok(()) => run_script(exec, domain, store.user, &scripts.pull(store, repo)).await,
        Err(e) => Err(e.into()),
    };
    op.finish(result)
}
