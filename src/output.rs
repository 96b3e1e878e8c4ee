//! CLI output formatting for all pipeline stages.
//!
//! # Information-First Display
//!
//! Output is **information-centric, not file-centric**. The primary display
//! for every entity (release tag, branch, built version) is its semantic
//! identity (name and positional index), with filesystem paths shown as
//! secondary context on indented lines. The listing reads as a version
//! inventory while still letting users trace results back to directories.
//!
//! # Entity Display Contract
//!
//! Every entity follows a consistent two-level pattern across all stages:
//!
//! 1. **Header line**: positional index + name (+ optional detail like a
//!    page count or the `latest` marker)
//! 2. **Context lines**: indented `Output:`, `Redirect:`, etc.
//!
//! # Output Format
//!
//! ## Releases
//!
//! ```text
//! Releases for acme/widgets (network)
//! 001 v3.0.0 (3.0.0)
//! 002 v2.4.7 (2.4.7) [latest]
//! 003 v2.4.6 (2.4.6)
//! ```
//!
//! ## Plan
//!
//! ```text
//! Branches
//! 001 feat-docs
//! 002 main
//!
//! Tags
//! 001 v3.0.0
//! 002 v2.4.7 [latest]
//! ```
//!
//! ## Build
//!
//! ```text
//! 001 main → main/ (12 pages)
//! 002 v3.0.0 → v3.0.0/ (12 pages)
//! 003 v2.4.7 → v2.4.7/ (11 pages)
//!
//! Redirect → ./v2.4.7/index.html
//! Built 3 versions
//! ```
//!
//! # Architecture
//!
//! Each stage has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure (no I/O) except the build report, which counts pages
//! in the output tree.

use std::path::Path;
use walkdir::WalkDir;

use crate::plan::BuildPlan;
use crate::provision::InstanceParams;
use crate::releases::FetchSource;
use crate::tags;

// ============================================================================
// Shared entity display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Format an entity header: positional index + name, with the latest marker.
///
/// ```text
/// 001 v3.0.0 (3.0.0)
/// 002 v2.4.7 (2.4.7) [latest]
/// ```
fn entity_header(index: usize, title: &str, is_latest: bool) -> String {
    if is_latest {
        format!("{} {} [latest]", format_index(index), title)
    } else {
        format!("{} {}", format_index(index), title)
    }
}

// ============================================================================
// Stage 1: Release listing
// ============================================================================

/// Format the fetched release list, marking the resolved latest version.
///
/// `latest` is `None` when resolution failed (fewer than two tags); the list
/// is still shown so the user can see what the API returned.
pub fn format_releases_output(
    repo: &str,
    release_tags: &[String],
    latest: Option<&str>,
    source: FetchSource,
) -> Vec<String> {
    let origin = match source {
        FetchSource::Cache => "cache",
        FetchSource::Network => "network",
    };
    let mut lines = vec![format!("Releases for {repo} ({origin})")];
    for (i, tag) in release_tags.iter().enumerate() {
        let parsed = tags::parse_tag(tag);
        lines.push(entity_header(
            i + 1,
            &parsed.display_title(),
            latest == Some(tag.as_str()),
        ));
    }
    if release_tags.is_empty() {
        lines.push("(no releases)".to_string());
    }
    lines
}

pub fn print_releases_output(
    repo: &str,
    release_tags: &[String],
    latest: Option<&str>,
    source: FetchSource,
) {
    for line in format_releases_output(repo, release_tags, latest, source) {
        println!("{line}");
    }
}

// ============================================================================
// Stage 2: Plan
// ============================================================================

/// Format the computed whitelists.
pub fn format_plan_output(plan: &BuildPlan) -> Vec<String> {
    let mut lines = vec!["Branches".to_string()];
    if plan.branches.is_empty() {
        lines.push("(none)".to_string());
    }
    for (i, branch) in plan.branches.iter().enumerate() {
        lines.push(entity_header(i + 1, branch, false));
    }
    lines.push(String::new());
    lines.push("Tags".to_string());
    for (i, tag) in plan.tags.iter().enumerate() {
        lines.push(entity_header(i + 1, tag, *tag == plan.latest));
    }
    lines
}

pub fn print_plan_output(plan: &BuildPlan) {
    for line in format_plan_output(plan) {
        println!("{line}");
    }
}

// ============================================================================
// Stage 3+4: Build report
// ============================================================================

/// Count HTML pages under a built version directory.
fn count_pages(version_dir: &Path) -> usize {
    WalkDir::new(version_dir)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .filter(|e| e.path().extension().is_some_and(|ext| ext == "html"))
        .count()
}

/// Format the post-build report: one line per built version with its page
/// count, the redirect target, and a total.
pub fn format_build_output(
    output_dir: &Path,
    versions: &[String],
    redirect_target: &str,
) -> Vec<String> {
    let mut lines = Vec::new();
    for (i, version) in versions.iter().enumerate() {
        let pages = count_pages(&output_dir.join(version));
        lines.push(format!(
            "{} {version} → {version}/ ({pages} {})",
            format_index(i + 1),
            if pages == 1 { "page" } else { "pages" },
        ));
    }
    lines.push(String::new());
    lines.push(format!("Redirect → {redirect_target}"));
    lines.push(format!(
        "Built {} version{}",
        versions.len(),
        if versions.len() == 1 { "" } else { "s" }
    ));
    lines
}

pub fn print_build_output(output_dir: &Path, versions: &[String], redirect_target: &str) {
    for line in format_build_output(output_dir, versions, redirect_target) {
        println!("{line}");
    }
}

// ============================================================================
// Provision report
// ============================================================================

/// Format the provision summary.
pub fn format_provision_output(path: &Path, params: &InstanceParams) -> Vec<String> {
    vec![
        format!("Wrote {}", path.display()),
        format!(
            "    {} instances, branch {}, port {}",
            crate::provision::INSTANCE_COUNT,
            params.branch,
            params.port
        ),
        format!("    Setup: {}", params.setup_script),
    ]
}

pub fn print_provision_output(path: &Path, params: &InstanceParams) {
    for line in format_provision_output(path, params) {
        println!("{line}");
    }
}
