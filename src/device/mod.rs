//! Target device discovery and selection

mod selection;

pub use selection::DeviceSelector;

use serde::Serialize;

use crate::error::Result;
use crate::ui::{highlight, human_size};

/// A removable block device as reported by the host
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceDescriptor {
    pub description: String,
    /// OS device path, e.g. `/dev/disk4` or `/dev/sdb`
    pub identifier: String,
    /// Size in bytes
    pub size: u64,
}

/// Lists removable devices on the host
pub trait DeviceEnumerator {
    fn list_devices(&self) -> Result<Vec<DeviceDescriptor>>;
}

/// Numbered line for a device, as shown when choosing a target
pub fn list_entry(index: usize, device: &DeviceDescriptor) -> String {
    format!(
        "{} -> {} ({}, {})",
        highlight(&index.to_string()),
        device.description,
        device.identifier,
        human_size(device.size)
    )
}
