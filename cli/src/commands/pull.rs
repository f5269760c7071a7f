//! `qsm pull` — clone or update a git repository inside a domain.

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::services::vm::repo;
use crate::domain::repo::DEFAULT_STORE_USER;
use crate::domain::{GitRepo, RepoStore};

/// Arguments for the pull command.
#[derive(Args)]
pub struct PullArgs {
    /// Domain name
    pub domain: String,

    /// Repository URL
    pub url: String,

    /// Directory name of the checkout inside the store
    pub name: String,

    /// Absolute path of the repository store in the domain
    #[arg(long)]
    pub store: String,

    /// Guest user that owns the store
    #[arg(long, default_value = DEFAULT_STORE_USER)]
    pub user: String,
}

/// Run `qsm pull`. The store is created first when missing.
///
/// # Errors
///
/// Returns an error for invalid input, a missing domain or a failed git run.
pub async fn run(app: &AppContext, args: &PullArgs) -> Result<()> {
    let reporter = app.reporter();
    let store = RepoStore::new(&args.store).owned_by(&args.user, &args.user);
    let git_repo = GitRepo {
        url: &args.url,
        name: &args.name,
    };
    repo::verify_store(&app.executor, &app.repo_scripts, &reporter, &args.domain, &store).await?;
    repo::pull(
        &app.executor,
        &app.repo_scripts,
        &reporter,
        &args.domain,
        &store,
        &git_repo,
    )
    .await?;
    Ok(())
}
