pub mod remote;
pub mod vm;

use crate::domain::error::ProbeError;
use crate::domain::instance::InstanceRecord;
use crate::domain::self_link::SelfLink;

/// Read-only view of the cloud compute inventory.
pub trait ComputeInventory {
    /// Returns `Ok(None)` when the instance does not exist.
    fn get_instance(&self, link: &SelfLink) -> Result<Option<InstanceRecord>, ProbeError>;
}

/// Read-only inspection of the host under test.
pub trait HostInspector {
    fn os_name(&self) -> Result<String, ProbeError>;
    fn file_exists(&self, path: &str) -> Result<bool, ProbeError>;
}
