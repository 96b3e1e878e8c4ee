//! Shared test utilities for the docshelf test suite.
//!
//! Provides a fake multi-version builder (a POSIX shell script honoring the
//! whitelist environment contract) and canned build plans, so pipeline logic
//! can be exercised without sphinx or network access.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = TempDir::new().unwrap();
//! let mut config = BuildConfig::default();
//! config.builder = fake_builder_config(tmp.path());
//!
//! let versions = builder::build_site(tmp.path(), &config, &sample_plan()).unwrap();
//! ```

use std::path::Path;

use crate::config::BuilderConfig;
use crate::plan::BuildPlan;

/// Shell script implementing the builder contract: read the comma-joined
/// whitelists from the environment, create one directory per name under the
/// output root (the final argument), each with an `index.html`.
const FAKE_BUILDER: &str = r#"#!/bin/sh
set -e
out="$1"
names=$(printf '%s,%s' "$DOCSHELF_BRANCH_WHITELIST" "$DOCSHELF_TAG_WHITELIST" | tr ',' ' ')
for name in $names; do
    mkdir -p "$out/$name"
    printf '<html><body>%s</body></html>\n' "$name" > "$out/$name/index.html"
done
"#;

/// Write the fake builder script into `dir` and return a [`BuilderConfig`]
/// invoking it through `sh` with the stock whitelist env var names.
pub fn fake_builder_config(dir: &Path) -> BuilderConfig {
    let script = dir.join("fake-builder.sh");
    std::fs::write(&script, FAKE_BUILDER).unwrap();
    BuilderConfig {
        program: "sh".to_string(),
        args: vec![script.display().to_string()],
        ..BuilderConfig::default()
    }
}

/// A plan over one branch and two tags, latest resolved to the second tag.
pub fn sample_plan() -> BuildPlan {
    BuildPlan {
        branches: vec!["main".to_string()],
        tags: vec!["v3.0.0".to_string(), "v2.4.7".to_string()],
        latest: "v2.4.7".to_string(),
    }
}
