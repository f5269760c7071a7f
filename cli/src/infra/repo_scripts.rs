//! Git repository store scripts run inside guests.
//!
//! Every path and URL is single-quoted; the script itself is POSIX `sh`.

use crate::application::ports::RepoScripts;
use crate::domain::quote::shell_quote;
use crate::domain::repo::{DIST_DIR, GitRepo, RepoStore};

#[derive(Debug, Default, Clone, Copy)]
pub struct ShellRepoScripts;

impl RepoScripts for ShellRepoScripts {
    fn verify_store(&self, store: &RepoStore<'_>) -> String {
        let dir = shell_quote(store.dir);
        let dist = shell_quote(&store.path_of(DIST_DIR));
        let owner = format!("{}:{}", store.user, store.group);
        format!(
            "if [ -d {dir} ]; then\n  \
             echo \"repo store exists @ \"{dir}\n\
             else\n  \
             echo \"creating repo store @ \"{dir}\n  \
             mkdir -p {dist} && chmod {mode:o} {dir} {dist} && chown {owner} {dir} {dist}\n\
             fi\n",
            mode = store.mode,
        )
    }

    fn pull(&self, store: &RepoStore<'_>, repo: &GitRepo<'_>) -> String {
        let dir = shell_quote(store.dir);
        let local = shell_quote(&store.path_of(repo.name));
        let url = shell_quote(repo.url);
        let name = shell_quote(repo.name);
        format!(
            "if [ -d {local} ]; then\n  \
             echo \"pulling updates for \"{name}\n  \
             cd {local} && exec git pull\n\
             else\n  \
             echo \"cloning \"{name}\n  \
             cd {dir} && exec git clone -- {url} {name}\n\
             fi\n"
        )
    }
}
