//! # Docshelf
//!
//! A release-aware multi-version documentation site builder. The release API
//! is the data source: published tags become versioned doc trees, the local
//! checkout contributes branches, and one generated page glues it together.
//!
//! # Architecture: Four-Stage Pipeline
//!
//! Docshelf runs the build as four sequential stages:
//!
//! ```text
//! 1. Fetch     release API  →  tag list        (network → structured data)
//! 2. Plan      tags + git   →  build plan      (whitelists + latest version)
//! 3. Build     build plan   →  _build/site/    (one tree per branch/tag)
//! 4. Redirect  latest       →  index.html      (meta-refresh to latest)
//! ```
//!
//! This separation exists for three reasons:
//!
//! - **Inspectability**: `docshelf releases` and `docshelf plan` expose the
//!   first two stages on their own, so a surprising build can be diagnosed
//!   without running the builder.
//! - **Cheap re-runs**: the fetched tag list is cached on disk, so repeated
//!   CI builds skip the network.
//! - **Testability**: plan computation and redirect rendering are pure
//!   functions, and the builder contract is a shell-level interface any
//!   stand-in script can implement.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`releases`] | Stage 1 — fetches recent release tags, resolves the published latest |
//! | [`plan`] | Stage 2 — computes the branch/tag whitelists from config and git state |
//! | [`builder`] | Stage 3 — cleans prior output, drives the external multi-version builder |
//! | [`redirect`] | Stage 4 — renders the meta-refresh entry page with Maud |
//! | [`cache`] | Versioned on-disk cache for fetched release lists |
//! | [`config`] | `docshelf.toml` loading, validation, stock config generation |
//! | [`command`] | Subprocess primitives with stderr-first error reporting |
//! | [`git`] | Current-branch and repository detection via system git |
//! | [`tags`] | Release-tag parsing (`v` prefix, semver) for display and listings |
//! | [`provision`] | Test-harness instance definitions rendered as Terraform JSON |
//! | [`output`] | CLI output formatting — index-led listings of pipeline results |
//!
//! # Design Decisions
//!
//! ## The Newest Tag Is Never "Latest"
//!
//! The published latest version is the *second*-newest fetched tag. Release
//! tags appear before their artifacts finish publishing, so the newest tag
//! routinely points at a version whose docs sources are not final. The
//! selection lives in one place ([`releases::select_latest`]) and fails hard
//! when fewer than two tags exist, rather than guessing.
//!
//! ## One Builder Invocation, Whitelists in the Environment
//!
//! The external builder is invoked exactly once per run. Which versions it
//! builds is communicated as environment state, two comma-joined variables
//! with configurable names, matching how multi-version sphinx setups read
//! their whitelist configuration. Per-version subprocesses would multiply
//! checkout work and interleave diagnostics for no gain.
//!
//! ## Destructive Clean, No Partial Success
//!
//! Prior output is removed before the builder runs, and any planned version
//! missing an `index.html` afterwards fails the whole run. A half-updated
//! site that silently serves stale versions is worse than a red build.
//!
//! ## Maud Over Template Engines
//!
//! The redirect page is generated with [Maud](https://maud.lambda.xyz/):
//! malformed HTML is a compile error, interpolation is escaped by default,
//! and there is no template file to ship or drift out of sync.
//!
//! ## Terraform JSON Over HCL
//!
//! The test-harness instance definition is emitted in Terraform's JSON
//! syntax from typed Rust structs. Terraform consumes `.tf.json` natively,
//! and serializing a struct beats string-templating HCL.

pub mod builder;
pub mod cache;
pub mod command;
pub mod config;
pub mod git;
pub mod output;
pub mod plan;
pub mod provision;
pub mod redirect;
pub mod releases;
pub mod tags;

#[cfg(test)]
pub(crate) mod test_helpers;
