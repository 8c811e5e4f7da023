//! Devices command implementation
//!
//! Lists the removable devices the provision command would offer, without
//! touching any of them.

use crate::cli::DevicesArgs;
use crate::config::DEFAULT_VOLUME_NAME;
use crate::device::{DeviceDescriptor, list_entry};
use crate::disk;
use crate::error::Result;

/// Run devices command
pub fn run(args: &DevicesArgs) -> Result<()> {
    let host = disk::host(DEFAULT_VOLUME_NAME)?;
    let devices = host.list_devices()?;

    if args.json {
        println!("{}", to_json(&devices)?);
        return Ok(());
    }

    if devices.is_empty() {
        println!("No removable devices found.");
        return Ok(());
    }

    println!("Removable devices ({}):", devices.len());
    println!();
    for line in numbered(&devices) {
        println!("{line}");
    }

    Ok(())
}

/// Same numbering the provision prompt uses
fn numbered(devices: &[DeviceDescriptor]) -> Vec<String> {
    devices
        .iter()
        .enumerate()
        .map(|(index, device)| list_entry(index, device))
        .collect()
}

fn to_json(devices: &[DeviceDescriptor]) -> Result<String> {
    Ok(serde_json::to_string_pretty(devices)?)
}
