//! Linux disk operations via `parted`, `mkfs.exfat`, `sfdisk` and `dd`
//!
//! Linux does not auto-mount a freshly formatted volume, so the partition
//! step mounts the data volume itself under `/mnt/<volume name>`.
//! `mkfs.exfat` is the exfatprogs one, which takes the label as `-L`.

use std::path::Path;

use serde_json::Value;

use super::{
    COPYING_FILES, DiskOperations, EJECTING, PARTITIONING, PATCHING_TABLE, UNMOUNTING,
    WRITING_BOOT_IMAGE, capture, quote,
};
use crate::device::{DeviceDescriptor, DeviceEnumerator};
use crate::error::{Result, WizardError};
use crate::shell::{ProvisionStep, ShellCommand};

#[derive(Debug, Clone)]
pub struct LinuxDisk {
    volume_name: String,
}

impl LinuxDisk {
    pub fn new(volume_name: &str) -> Self {
        Self {
            volume_name: volume_name.to_string(),
        }
    }

    fn mount_point(&self) -> String {
        format!("/mnt/{}", self.volume_name)
    }
}

/// Device node of partition `number` on `device`
///
/// Devices whose name ends in a digit (`mmcblk0`, `nvme0n1`) use a `p`
/// separator.
fn partition_path(device: &str, number: u32) -> String {
    if device.ends_with(|c: char| c.is_ascii_digit()) {
        format!("{device}p{number}")
    } else {
        format!("{device}{number}")
    }
}

impl DiskOperations for LinuxDisk {
    fn partition(&self, device: &str) -> ShellCommand {
        let data = partition_path(device, 1);
        let mount = self.mount_point();
        ShellCommand::new(
            ProvisionStep::Partition,
            PARTITIONING,
            format!(
                "sudo parted --script {device} -- mklabel msdos \
                 mkpart primary 1MiB -3MiB mkpart primary -3MiB 100% \
                 && sudo udevadm settle \
                 && sudo mkfs.exfat -L {volume} {data} \
                 && sudo mkdir -p {mount} \
                 && sudo mount {data} {mount}",
                volume = self.volume_name
            ),
        )
    }

    fn copy_tree(&self, source_dir: &Path) -> ShellCommand {
        ShellCommand::new(
            ProvisionStep::CopyInstallerFiles,
            COPYING_FILES,
            format!("sudo cp -Rv {}/* {}/", quote(source_dir), self.mount_point()),
        )
    }

    fn copy_file(
        &self,
        step: ProvisionStep,
        description: &str,
        source: &Path,
        target_name: &str,
    ) -> ShellCommand {
        ShellCommand::new(
            step,
            description,
            format!("sudo cp {} {}/{target_name}", quote(source), self.mount_point()),
        )
    }

    fn unmount(&self, device: &str) -> ShellCommand {
        ShellCommand::new(
            ProvisionStep::Unmount,
            UNMOUNTING,
            format!("sudo umount {}", partition_path(device, 1)),
        )
    }

    fn patch_partition_table(&self, device: &str) -> ShellCommand {
        ShellCommand::new(
            ProvisionStep::PatchPartitionTable,
            PATCHING_TABLE,
            format!("sudo sfdisk --part-type {device} 2 a2"),
        )
    }

    fn write_boot_image(&self, device: &str, image: &Path) -> ShellCommand {
        ShellCommand::new(
            ProvisionStep::WriteBootImage,
            WRITING_BOOT_IMAGE,
            format!(
                "sudo dd if={} of={} bs=64k",
                quote(image),
                partition_path(device, 2)
            ),
        )
    }

    fn disable_indexing(&self) -> Vec<ShellCommand> {
        Vec::new()
    }

    fn eject(&self, device: &str) -> ShellCommand {
        ShellCommand::new(
            ProvisionStep::Eject,
            EJECTING,
            format!("sudo eject {device}"),
        )
    }
}

impl DeviceEnumerator for LinuxDisk {
    fn list_devices(&self) -> Result<Vec<DeviceDescriptor>> {
        let listing = capture(
            "lsblk",
            &[
                "--json",
                "--bytes",
                "--nodeps",
                "--output",
                "PATH,SIZE,MODEL,VENDOR,RM,TRAN,TYPE",
            ],
        )?;
        parse_lsblk(&listing)
    }
}

fn as_u64(value: Option<&Value>) -> Option<u64> {
    match value? {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

// Older lsblk releases print booleans as "0"/"1" strings.
fn as_bool(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => s == "1" || s == "true",
        Some(Value::Number(n)) => n.as_u64() == Some(1),
        _ => false,
    }
}

fn as_str(value: Option<&Value>) -> &str {
    value.and_then(Value::as_str).map_or("", str::trim)
}

/// Removable whole disks from `lsblk --json` output
fn parse_lsblk(listing: &str) -> Result<Vec<DeviceDescriptor>> {
    let root: Value =
        serde_json::from_str(listing).map_err(|e| WizardError::DeviceEnumerationFailed {
            reason: format!("unexpected lsblk output: {e}"),
        })?;
    let Some(entries) = root.get("blockdevices").and_then(Value::as_array) else {
        return Err(WizardError::DeviceEnumerationFailed {
            reason: "lsblk output has no blockdevices".to_string(),
        });
    };

    let devices = entries
        .iter()
        .filter(|entry| as_str(entry.get("type")) == "disk")
        .filter(|entry| {
            let path = as_str(entry.get("path"));
            let tran = as_str(entry.get("tran"));
            as_bool(entry.get("rm"))
                || tran == "usb"
                || tran == "mmc"
                || path.starts_with("/dev/mmcblk")
        })
        .filter_map(|entry| {
            let identifier = as_str(entry.get("path"));
            if identifier.is_empty() {
                return None;
            }
            let name = format!(
                "{} {}",
                as_str(entry.get("vendor")),
                as_str(entry.get("model"))
            );
            let name = name.split_whitespace().collect::<Vec<_>>().join(" ");
            Some(DeviceDescriptor {
                description: if name.is_empty() {
                    identifier.to_string()
                } else {
                    name
                },
                identifier: identifier.to_string(),
                size: as_u64(entry.get("size")).unwrap_or(0),
            })
        })
        .collect();
    Ok(devices)
}
