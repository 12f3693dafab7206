use serde::Deserialize;

/// Status an instance must report to pass the `status` control.
pub const RUNNING_STATUS: &str = "RUNNING";

/// Compute instance metadata returned by the cloud inventory.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct InstanceRecord {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub status: String,
}

impl InstanceRecord {
    pub fn is_running(&self) -> bool {
        self.status == RUNNING_STATUS
    }
}
