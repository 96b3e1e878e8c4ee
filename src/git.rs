//! Local git queries.
//!
//! Development mode adds the checked-out branch to the build whitelist, which
//! requires asking git what that branch is. Everything here shells out to the
//! system git through [`crate::command`].

use std::path::Path;
use thiserror::Error;

use crate::command::{self, CommandError};

#[derive(Error, Debug)]
pub enum GitError {
    #[error("{0}")]
    Command(#[from] CommandError),
    #[error("not inside a git repository: {0}")]
    NotARepository(String),
    #[error("HEAD is detached; development mode needs a checked-out branch")]
    DetachedHead,
}

/// Check whether `dir` is inside a git repository.
pub fn is_git_repo(dir: &Path) -> bool {
    command::succeeded_in(dir, "git", &["rev-parse", "--git-dir"])
}

/// Name of the branch checked out in `dir`.
///
/// Errors when `dir` is not a repository or HEAD is detached (git reports
/// the literal string `HEAD` for a detached checkout).
pub fn current_branch(dir: &Path) -> Result<String, GitError> {
    if !is_git_repo(dir) {
        return Err(GitError::NotARepository(dir.display().to_string()));
    }
    let branch = command::run_in(
        dir,
        "git",
        &["rev-parse", "--abbrev-ref", "HEAD"],
        "git rev-parse",
    )?;
    if branch == "HEAD" {
        return Err(GitError::DetachedHead);
    }
    Ok(branch)
}
