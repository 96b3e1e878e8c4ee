//! External builder orchestration.
//!
//! Stage 3 of the build pipeline. Clears out everything a previous run left
//! behind, optionally regenerates API docs, runs the multi-version builder
//! exactly once, and verifies that every planned version actually came out.
//!
//! ## Builder Contract
//!
//! The configured builder program is invoked with its configured arguments
//! plus the output directory appended as the final argument, from the project
//! directory, with the whitelists exported:
//!
//! ```text
//! DOCSHELF_BRANCH_WHITELIST=feat-docs,main \
//! DOCSHELF_TAG_WHITELIST=v3.0.0,v2.4.7 \
//!     sphinx-multiversion docs _build/site
//! ```
//!
//! It is expected to create `_build/site/<name>/index.html` for every
//! whitelisted name. Builder stdout/stderr pass straight through to the
//! terminal; on failure those diagnostics are all there is.
//!
//! ## Destructive Clean
//!
//! `build.output_dir` and `build.apidoc_dir` are removed before the builder
//! runs. Interrupting a run mid-way leaves neither the old site nor a
//! complete new one. There is no partial-success path: a builder exit code
//! other than zero, or a planned version with no `index.html`, fails the run.

use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};
use thiserror::Error;

use crate::config::{ApidocConfig, BuildConfig, BuilderConfig};
use crate::plan::{self, BuildPlan};

#[derive(Error, Debug)]
pub enum BuildError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },
    #[error("{program} exited with {status}")]
    BuilderFailed { program: String, status: ExitStatus },
    #[error("builder produced no output for `{version}`: expected {}", .path.display())]
    MissingVersion { version: String, path: PathBuf },
}

/// Remove the prior build output and the prior generated API docs.
///
/// Both paths are resolved relative to `project_dir`. The output directory is
/// recreated empty so the builder always starts from a clean root.
pub fn clean(project_dir: &Path, config: &BuildConfig) -> Result<(), BuildError> {
    let output_dir = project_dir.join(&config.build.output_dir);
    let apidoc_dir = project_dir.join(&config.build.apidoc_dir);
    remove_dir_if_present(&output_dir)?;
    remove_dir_if_present(&apidoc_dir)?;
    std::fs::create_dir_all(&output_dir)?;
    Ok(())
}

fn remove_dir_if_present(dir: &Path) -> std::io::Result<()> {
    match std::fs::remove_dir_all(dir) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
}

/// Run the optional API-doc pre-step. A no-op when no program is configured.
pub fn run_apidoc(project_dir: &Path, apidoc: &ApidocConfig) -> Result<(), BuildError> {
    if apidoc.program.is_empty() {
        return Ok(());
    }
    let status = Command::new(&apidoc.program)
        .args(&apidoc.args)
        .current_dir(project_dir)
        .status()
        .map_err(|e| BuildError::Spawn {
            program: apidoc.program.clone(),
            source: e,
        })?;
    if !status.success() {
        return Err(BuildError::BuilderFailed {
            program: apidoc.program.clone(),
            status,
        });
    }
    Ok(())
}

/// Invoke the multi-version builder once with the plan's whitelists.
pub fn run_builder(
    project_dir: &Path,
    builder: &BuilderConfig,
    output_dir: &Path,
    plan: &BuildPlan,
) -> Result<(), BuildError> {
    let status = Command::new(&builder.program)
        .args(&builder.args)
        .arg(output_dir)
        .env(&builder.branch_env, plan::join_whitelist(&plan.branches))
        .env(&builder.tag_env, plan::join_whitelist(&plan.tags))
        .current_dir(project_dir)
        .status()
        .map_err(|e| BuildError::Spawn {
            program: builder.program.clone(),
            source: e,
        })?;
    if !status.success() {
        return Err(BuildError::BuilderFailed {
            program: builder.program.clone(),
            status,
        });
    }
    Ok(())
}

/// Check that every planned version produced an `index.html`.
///
/// Returns the verified version names, branches before tags.
pub fn verify_versions(output_dir: &Path, plan: &BuildPlan) -> Result<Vec<String>, BuildError> {
    let mut verified = Vec::new();
    for version in plan.versions() {
        let index = output_dir.join(version).join("index.html");
        if !index.is_file() {
            return Err(BuildError::MissingVersion {
                version: version.to_string(),
                path: index,
            });
        }
        verified.push(version.to_string());
    }
    Ok(verified)
}

/// Run the whole build stage: clean, API-doc pre-step, builder, verification.
pub fn build_site(
    project_dir: &Path,
    config: &BuildConfig,
    plan: &BuildPlan,
) -> Result<Vec<String>, BuildError> {
    clean(project_dir, config)?;
    run_apidoc(project_dir, &config.apidoc)?;
    let output_dir = project_dir.join(&config.build.output_dir);
    run_builder(project_dir, &config.builder, &output_dir, plan)?;
    verify_versions(&output_dir, plan)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{fake_builder_config, sample_plan};
    use tempfile::TempDir;

    #[test]
    fn clean_removes_prior_output_and_apidocs() {
        let tmp = TempDir::new().unwrap();
        let config = BuildConfig::default();
        let stale_page = tmp.path().join("_build/site/v0.1.0/index.html");
        let stale_apidoc = tmp.path().join("api/widgets.html");
        std::fs::create_dir_all(stale_page.parent().unwrap()).unwrap();
        std::fs::write(&stale_page, "old").unwrap();
        std::fs::create_dir_all(stale_apidoc.parent().unwrap()).unwrap();
        std::fs::write(&stale_apidoc, "old").unwrap();

        clean(tmp.path(), &config).unwrap();

        assert!(!stale_page.exists());
        assert!(!stale_apidoc.exists());
        assert!(tmp.path().join("_build/site").is_dir());
    }

    #[test]
    fn clean_tolerates_a_missing_prior_run() {
        let tmp = TempDir::new().unwrap();
        clean(tmp.path(), &BuildConfig::default()).unwrap();
        assert!(tmp.path().join("_build/site").is_dir());
    }

    #[test]
    fn build_site_produces_every_planned_version() {
        let tmp = TempDir::new().unwrap();
        let mut config = BuildConfig::default();
        config.builder = fake_builder_config(tmp.path());
        let plan = sample_plan();

        let versions = build_site(tmp.path(), &config, &plan).unwrap();

        assert_eq!(versions, vec!["main", "v3.0.0", "v2.4.7"]);
        for version in &versions {
            let index = tmp.path().join("_build/site").join(version).join("index.html");
            assert!(index.is_file(), "missing {}", index.display());
        }
    }

    #[test]
    fn build_site_wipes_stale_versions() {
        let tmp = TempDir::new().unwrap();
        let mut config = BuildConfig::default();
        config.builder = fake_builder_config(tmp.path());
        let stale = tmp.path().join("_build/site/v0.1.0/index.html");
        std::fs::create_dir_all(stale.parent().unwrap()).unwrap();
        std::fs::write(&stale, "old").unwrap();

        build_site(tmp.path(), &config, &sample_plan()).unwrap();

        assert!(!stale.exists());
    }

    #[test]
    fn failing_builder_is_fatal() {
        let tmp = TempDir::new().unwrap();
        let mut config = BuildConfig::default();
        config.builder = fake_builder_config(tmp.path());
        config.builder.program = "false".to_string();
        config.builder.args.clear();

        let err = build_site(tmp.path(), &config, &sample_plan()).unwrap_err();
        assert!(matches!(err, BuildError::BuilderFailed { .. }));
    }

    #[test]
    fn missing_builder_program_is_fatal() {
        let tmp = TempDir::new().unwrap();
        let mut config = BuildConfig::default();
        config.builder.program = "docshelf-no-such-builder".to_string();

        let err = build_site(tmp.path(), &config, &sample_plan()).unwrap_err();
        assert!(matches!(err, BuildError::Spawn { .. }));
    }

    #[test]
    fn version_without_index_fails_verification() {
        let tmp = TempDir::new().unwrap();
        let output_dir = tmp.path().join("_build/site");
        let plan = sample_plan();
        // Build only the branches, leaving every tag missing.
        for branch in &plan.branches {
            let dir = output_dir.join(branch);
            std::fs::create_dir_all(&dir).unwrap();
            std::fs::write(dir.join("index.html"), "ok").unwrap();
        }

        let err = verify_versions(&output_dir, &plan).unwrap_err();
        match err {
            BuildError::MissingVersion { version, .. } => assert_eq!(version, "v3.0.0"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn apidoc_step_is_skipped_when_unconfigured() {
        let tmp = TempDir::new().unwrap();
        run_apidoc(tmp.path(), &ApidocConfig::default()).unwrap();
    }

    #[test]
    fn apidoc_failure_is_fatal() {
        let tmp = TempDir::new().unwrap();
        let apidoc = ApidocConfig {
            program: "false".to_string(),
            args: vec![],
        };
        let err = run_apidoc(tmp.path(), &apidoc).unwrap_err();
        assert!(matches!(err, BuildError::BuilderFailed { .. }));
    }
}
