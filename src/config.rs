//! Build configuration module.
//!
//! Handles loading and validating `docshelf.toml`. Configuration is flat:
//! stock defaults are overridden by the values present in the config file,
//! and a handful of CLI flags (`--output`, the `development` positional)
//! override the file.
//!
//! ## Config File Location
//!
//! `docshelf.toml` lives at the root of the repository whose documentation is
//! being built. The path can be changed with `--config`.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! repo = "acme/widgets"            # owner/name on the release host
//!
//! [releases]
//! count = 3                        # how many recent releases to consider (>= 2)
//! api_base = "https://api.github.com"
//! cache_ttl_secs = 900             # reuse a cached release list younger than this
//!
//! [branches]
//! default = "main"                 # default branch name
//! include_default = true           # set false to keep it out of the build
//!
//! [build]
//! output_dir = "_build/site"       # destroyed and recreated every run
//! apidoc_dir = "api"               # generated API docs, destroyed every run
//!
//! [builder]
//! program = "sphinx-multiversion"  # multi-version documentation builder
//! args = ["docs"]                  # output_dir is appended as the last argument
//! branch_env = "DOCSHELF_BRANCH_WHITELIST"
//! tag_env = "DOCSHELF_TAG_WHITELIST"
//!
//! [apidoc]
//! program = ""                     # optional pre-step, "" skips it
//! args = []
//!
//! [provision]
//! module_source = "./modules/test-instance"
//! output_path = "infra/test-instances.tf.json"
//! ```
//!
//! ## Partial Configuration
//!
//! The config file is sparse: set only the values you want to override.
//!
//! ```toml
//! repo = "acme/widgets"
//!
//! [releases]
//! count = 5
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Build configuration loaded from `docshelf.toml`.
///
/// All fields have sensible defaults. User config files need only specify
/// the values they want to override. Unknown keys are rejected.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BuildConfig {
    /// Repository slug (`owner/name`) on the release host.
    pub repo: String,
    /// Release listing settings (count, API endpoint, cache lifetime).
    pub releases: ReleasesConfig,
    /// Branch whitelist settings.
    pub branches: BranchesConfig,
    /// Output directory layout.
    pub build: BuildDirsConfig,
    /// External multi-version builder invocation.
    pub builder: BuilderConfig,
    /// Optional API-doc generation pre-step.
    pub apidoc: ApidocConfig,
    /// Test-harness provisioning output.
    pub provision: ProvisionConfig,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            repo: default_repo(),
            releases: ReleasesConfig::default(),
            branches: BranchesConfig::default(),
            build: BuildDirsConfig::default(),
            builder: BuilderConfig::default(),
            apidoc: ApidocConfig::default(),
            provision: ProvisionConfig::default(),
        }
    }
}

fn default_repo() -> String {
    "acme/widgets".to_string()
}

impl BuildConfig {
    /// Validate config values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.repo.is_empty() || !self.repo.contains('/') {
            return Err(ConfigError::Validation(
                "repo must be an owner/name slug".into(),
            ));
        }
        if self.releases.count < 2 {
            return Err(ConfigError::Validation(
                "releases.count must be at least 2 (the newest tag is never published)".into(),
            ));
        }
        if self.branches.default.is_empty() {
            return Err(ConfigError::Validation(
                "branches.default must not be empty".into(),
            ));
        }
        if self.builder.program.is_empty() {
            return Err(ConfigError::Validation(
                "builder.program must not be empty".into(),
            ));
        }
        if self.build.output_dir.is_empty() {
            return Err(ConfigError::Validation(
                "build.output_dir must not be empty".into(),
            ));
        }
        Ok(())
    }
}

/// Release listing settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReleasesConfig {
    /// Number of most recent releases to consider. Must be at least 2:
    /// the newest tag is treated as unpublished and skipped.
    pub count: usize,
    /// Base URL of the release-listing API.
    pub api_base: String,
    /// Reuse a cached release list younger than this many seconds.
    pub cache_ttl_secs: u64,
}

impl Default for ReleasesConfig {
    fn default() -> Self {
        Self {
            count: 3,
            api_base: "https://api.github.com".to_string(),
            cache_ttl_secs: 900,
        }
    }
}

/// Branch whitelist settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BranchesConfig {
    /// Default branch name (`main`/`master`).
    pub default: String,
    /// When false, the default branch is left out of the whitelist and only
    /// release tags (plus the current branch in development mode) are built.
    pub include_default: bool,
}

impl Default for BranchesConfig {
    fn default() -> Self {
        Self {
            default: "main".to_string(),
            include_default: true,
        }
    }
}

/// Output directory layout.
///
/// Both directories are removed at the start of every build. Nothing from a
/// previous run survives a successful build.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BuildDirsConfig {
    /// Site output root. One subdirectory per built branch/tag, plus the
    /// redirect `index.html`.
    pub output_dir: String,
    /// Directory where the API-doc pre-step writes its output.
    pub apidoc_dir: String,
}

impl Default for BuildDirsConfig {
    fn default() -> Self {
        Self {
            output_dir: "_build/site".to_string(),
            apidoc_dir: "api".to_string(),
        }
    }
}

/// External multi-version builder invocation.
///
/// The builder is invoked exactly once per build with the branch and tag
/// whitelists exported as comma-joined environment variables, and is expected
/// to produce one subdirectory per whitelisted name under the output root.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BuilderConfig {
    /// Program to invoke.
    pub program: String,
    /// Arguments passed before the output directory (which is always appended
    /// as the final argument).
    pub args: Vec<String>,
    /// Environment variable carrying the comma-joined branch whitelist.
    pub branch_env: String,
    /// Environment variable carrying the comma-joined tag whitelist.
    pub tag_env: String,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            program: "sphinx-multiversion".to_string(),
            args: vec!["docs".to_string()],
            branch_env: "DOCSHELF_BRANCH_WHITELIST".to_string(),
            tag_env: "DOCSHELF_TAG_WHITELIST".to_string(),
        }
    }
}

/// Optional API-doc generation pre-step.
///
/// Runs before the multi-version builder when `program` is non-empty. Its
/// output directory (`build.apidoc_dir`) is wiped at the start of every run
/// whether or not the step is enabled.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ApidocConfig {
    /// Program to invoke. Empty string skips the step.
    pub program: String,
    /// Arguments for the program.
    pub args: Vec<String>,
}

/// Test-harness provisioning output.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProvisionConfig {
    /// Source address of the instance module.
    pub module_source: String,
    /// Where the rendered definition is written.
    pub output_path: String,
}

impl Default for ProvisionConfig {
    fn default() -> Self {
        Self {
            module_source: "./modules/test-instance".to_string(),
            output_path: "infra/test-instances.tf.json".to_string(),
        }
    }
}

/// Load config from a `docshelf.toml` file.
///
/// A missing file yields the stock defaults. A present file is parsed
/// (unknown keys rejected) and validated.
pub fn load_config(path: &Path) -> Result<BuildConfig, ConfigError> {
    let config = if path.exists() {
        let content = fs::read_to_string(path)?;
        toml::from_str(&content)?
    } else {
        BuildConfig::default()
    };
    config.validate()?;
    Ok(config)
}

/// Returns a fully-commented stock `docshelf.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Docshelf Configuration
# ======================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
# Unknown keys will cause an error.

# Repository slug (owner/name) on the release host. Release tags are read
# from its releases API.
repo = "acme/widgets"

[releases]
# How many of the most recent releases to consider. Must be at least 2:
# the newest tag is treated as still unpublished and is skipped when
# resolving the latest version.
count = 3
# Base URL of the release-listing API.
api_base = "https://api.github.com"
# A cached release list younger than this many seconds is reused without
# touching the network. Pass --no-cache to force a fresh fetch.
cache_ttl_secs = 900

[branches]
# Default branch name.
default = "main"
# Set false to keep the default branch out of the build whitelist.
include_default = true

[build]
# Site output root: one subdirectory per built branch/tag plus the redirect
# index.html. Removed and recreated on every build.
output_dir = "_build/site"
# Output directory of the API-doc pre-step. Also removed on every build.
apidoc_dir = "api"

[builder]
# Multi-version documentation builder. Invoked once per build with the
# whitelists exported in the environment; the output directory is appended
# as the final argument.
program = "sphinx-multiversion"
args = ["docs"]
# Environment variables carrying the comma-joined whitelists.
branch_env = "DOCSHELF_BRANCH_WHITELIST"
tag_env = "DOCSHELF_TAG_WHITELIST"

[apidoc]
# Optional API-doc generation step run before the builder. Leave program
# empty to skip.
program = ""
args = []

[provision]
# Source address of the test-instance module and where the rendered
# definition is written by `docshelf provision`.
module_source = "./modules/test-instance"
output_path = "infra/test-instances.tf.json"
"##
}
