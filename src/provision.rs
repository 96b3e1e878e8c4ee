//! Test-harness provisioning definition.
//!
//! The distributed test harness runs against a pair of throwaway cloud
//! instances. `docshelf provision` renders the module invocation describing
//! them in Terraform JSON syntax (which `terraform` consumes interchangeably
//! with HCL), so the harness always provisions from a generated, typed
//! definition instead of a hand-edited one.
//!
//! Instance count and sizing are fixed; only the branch to check out, the
//! port the harness listens on, and the setup script vary per run:
//!
//! ```json
//! {
//!   "module": {
//!     "test-instances": {
//!       "source": "./modules/test-instance",
//!       "instance_count": 2,
//!       "machine_type": "n2-standard-4",
//!       "boot_disk_gb": 50,
//!       "data_disk_gb": 200,
//!       "branch": "feat-docs",
//!       "port": 8080,
//!       "setup_script": "./scripts/setup.sh"
//!     }
//!   }
//! }
//! ```

use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::config::ProvisionConfig;

/// The harness always gets exactly two instances.
pub const INSTANCE_COUNT: u32 = 2;
/// Fixed machine shape for both instances.
pub const MACHINE_TYPE: &str = "n2-standard-4";
/// Fixed boot disk size in GB.
pub const BOOT_DISK_GB: u32 = 50;
/// Fixed attached data disk size in GB.
pub const DATA_DISK_GB: u32 = 200;

/// Name of the module block in the rendered definition.
const MODULE_NAME: &str = "test-instances";

#[derive(Error, Debug)]
pub enum ProvisionError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Per-run parameters of the test instances.
#[derive(Debug, Clone)]
pub struct InstanceParams {
    /// Branch the instances check out.
    pub branch: String,
    /// Port the test harness listens on.
    pub port: u16,
    /// Path of the setup script executed on first boot.
    pub setup_script: String,
}

#[derive(Debug, Serialize)]
struct TfDocument {
    module: BTreeMap<&'static str, ModuleBlock>,
}

#[derive(Debug, Serialize)]
struct ModuleBlock {
    source: String,
    instance_count: u32,
    machine_type: &'static str,
    boot_disk_gb: u32,
    data_disk_gb: u32,
    branch: String,
    port: u16,
    setup_script: String,
}

/// Render the definition as pretty-printed Terraform JSON.
pub fn render(config: &ProvisionConfig, params: &InstanceParams) -> Result<String, ProvisionError> {
    let block = ModuleBlock {
        source: config.module_source.clone(),
        instance_count: INSTANCE_COUNT,
        machine_type: MACHINE_TYPE,
        boot_disk_gb: BOOT_DISK_GB,
        data_disk_gb: DATA_DISK_GB,
        branch: params.branch.clone(),
        port: params.port,
        setup_script: params.setup_script.clone(),
    };
    let document = TfDocument {
        module: BTreeMap::from([(MODULE_NAME, block)]),
    };
    let mut rendered = serde_json::to_string_pretty(&document)?;
    rendered.push('\n');
    Ok(rendered)
}

/// Render and write the definition to the configured output path.
///
/// The path is resolved relative to `project_dir`; parent directories are
/// created as needed. Returns the path of the written file.
pub fn write(
    project_dir: &Path,
    config: &ProvisionConfig,
    params: &InstanceParams,
) -> Result<PathBuf, ProvisionError> {
    let path = project_dir.join(&config.output_path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&path, render(config, params)?)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn params() -> InstanceParams {
        InstanceParams {
            branch: "feat-docs".to_string(),
            port: 8080,
            setup_script: "./scripts/setup.sh".to_string(),
        }
    }

    #[test]
    fn renders_one_module_block_with_two_instances() {
        let rendered = render(&ProvisionConfig::default(), &params()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&rendered).unwrap();
        let module = &value["module"]["test-instances"];
        assert_eq!(module["instance_count"], 2);
        assert_eq!(module["source"], "./modules/test-instance");
        assert_eq!(module["machine_type"], "n2-standard-4");
        assert_eq!(module["boot_disk_gb"], 50);
        assert_eq!(module["data_disk_gb"], 200);
    }

    #[test]
    fn caller_parameters_flow_through() {
        let rendered = render(&ProvisionConfig::default(), &params()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&rendered).unwrap();
        let module = &value["module"]["test-instances"];
        assert_eq!(module["branch"], "feat-docs");
        assert_eq!(module["port"], 8080);
        assert_eq!(module["setup_script"], "./scripts/setup.sh");
    }

    #[test]
    fn write_creates_parent_directories() {
        let tmp = TempDir::new().unwrap();
        let path = write(tmp.path(), &ProvisionConfig::default(), &params()).unwrap();
        assert_eq!(path, tmp.path().join("infra/test-instances.tf.json"));
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.ends_with('\n'));
        serde_json::from_str::<serde_json::Value>(&content).unwrap();
    }
}
