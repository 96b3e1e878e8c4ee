//! Build target computation.
//!
//! Stage 2 of the build pipeline. Combines the fetched release list with the
//! local git state into a [`BuildPlan`]: the branch whitelist, the tag
//! whitelist, and the resolved latest version. The plan is created once per
//! run, handed to the builder as environment state, and discarded when the
//! run ends.
//!
//! ## Whitelist Rules
//!
//! - Tags: the fetched release tags, order preserved.
//! - Branches: the current branch (development mode only, and only when it
//!   differs from the default branch), followed by the default branch unless
//!   `branches.include_default = false`.
//!
//! ```text
//! mode         checkout      whitelist
//! standard     anywhere      [main]
//! development  feat-docs     [feat-docs, main]
//! development  main          [main]
//! ```

use std::path::Path;
use thiserror::Error;

use crate::config::{BranchesConfig, BuildConfig};
use crate::git::{self, GitError};
use crate::releases::{self, FetchError};

#[derive(Error, Debug)]
pub enum PlanError {
    #[error(transparent)]
    Git(#[from] GitError),
    #[error(transparent)]
    Fetch(#[from] FetchError),
}

/// Build mode selected by the `development` CLI positional.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Build the default branch and the release tags.
    Standard,
    /// Additionally build the currently checked-out branch.
    Development,
}

/// Everything the builder invocation needs to know.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildPlan {
    /// Branches to build, current branch first when present.
    pub branches: Vec<String>,
    /// Release tags to build, newest first.
    pub tags: Vec<String>,
    /// Tag the redirect page points at. Always a member of `tags`.
    pub latest: String,
}

impl BuildPlan {
    /// All version names the builder must produce, branches before tags.
    pub fn versions(&self) -> impl Iterator<Item = &str> {
        self.branches
            .iter()
            .chain(self.tags.iter())
            .map(String::as_str)
    }
}

/// Compute the branch whitelist.
///
/// `current` is the checked-out branch in development mode, `None` otherwise.
pub fn branch_whitelist(branches: &BranchesConfig, current: Option<&str>) -> Vec<String> {
    let mut whitelist = Vec::new();
    if let Some(current) = current {
        if current != branches.default {
            whitelist.push(current.to_string());
        }
    }
    if branches.include_default {
        whitelist.push(branches.default.clone());
    }
    whitelist
}

/// Assemble the build plan from the fetched tags and the local checkout.
///
/// In development mode the current branch is read from `project_dir`; a
/// missing repository or detached HEAD is an error there, and never consulted
/// in standard mode.
pub fn compute_plan(
    config: &BuildConfig,
    mode: Mode,
    project_dir: &Path,
    tags: Vec<String>,
) -> Result<BuildPlan, PlanError> {
    let latest = releases::select_latest(&tags)?.to_string();
    let current = match mode {
        Mode::Development => Some(git::current_branch(project_dir)?),
        Mode::Standard => None,
    };
    Ok(BuildPlan {
        branches: branch_whitelist(&config.branches, current.as_deref()),
        tags,
        latest,
    })
}

/// Whitelist wire format for the builder environment: comma-joined names.
pub fn join_whitelist(names: &[String]) -> String {
    names.join(",")
}
