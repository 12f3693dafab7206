use std::process::Command;

use crate::adapters::{run_captured, stderr_text};
use crate::domain::error::ProbeError;
use crate::domain::instance::InstanceRecord;
use crate::domain::self_link::SelfLink;
use crate::engine::ComputeInventory;

/// Environment variable overriding the `gcloud` binary.
pub const GCLOUD_BIN_ENV: &str = "INFRACHECK_GCLOUD_BIN";

const TOOL: &str = "gcloud";
const NOT_FOUND_MARKERS: [&str; 3] = ["was not found", "HTTPError 404", "notFound"];

/// Compute inventory backed by `gcloud compute instances describe`.
#[derive(Debug, Clone)]
pub struct GcloudInventory {
    bin: String,
}

impl GcloudInventory {
    pub fn new(bin: impl Into<String>) -> Self {
        Self { bin: bin.into() }
    }

    pub fn from_env() -> Self {
        Self::new(std::env::var(GCLOUD_BIN_ENV).unwrap_or_else(|_| TOOL.to_string()))
    }
}

impl ComputeInventory for GcloudInventory {
    fn get_instance(&self, link: &SelfLink) -> Result<Option<InstanceRecord>, ProbeError> {
        let mut command = Command::new(&self.bin);
        command
            .args(["compute", "instances", "describe"])
            .arg(&link.name)
            .arg("--project")
            .arg(&link.project)
            .arg("--zone")
            .arg(&link.zone)
            .arg("--format=json");

        let output = run_captured(&mut command, TOOL)?;
        if !output.status.success() {
            let stderr = stderr_text(&output);
            if is_not_found(&stderr) {
                tracing::debug!(instance = %link, "instance not found");
                return Ok(None);
            }
            return Err(ProbeError::Execution {
                tool: TOOL.to_string(),
                message: stderr,
            });
        }

        parse_instance(&output.stdout).map(Some)
    }
}

fn is_not_found(stderr: &str) -> bool {
    NOT_FOUND_MARKERS
        .iter()
        .any(|marker| stderr.contains(marker))
}

fn parse_instance(stdout: &[u8]) -> Result<InstanceRecord, ProbeError> {
    serde_json::from_slice(stdout).map_err(|error| ProbeError::Decode {
        tool: TOOL.to_string(),
        message: error.to_string(),
    })
}
