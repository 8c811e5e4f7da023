//! macOS disk operations via `diskutil`, `fdisk` and `dd`

use std::path::Path;

use super::{
    COPYING_FILES, DiskOperations, EJECTING, PARTITIONING, PATCHING_TABLE, UNMOUNTING,
    WRITING_BOOT_IMAGE, capture, quote,
};
use crate::device::{DeviceDescriptor, DeviceEnumerator};
use crate::error::Result;
use crate::shell::{ProvisionStep, ShellCommand};

/// Size of the boot-loader volume
const UBOOT_SIZE: &str = "3M";

#[derive(Debug, Clone)]
pub struct MacDisk {
    volume_name: String,
}

impl MacDisk {
    pub fn new(volume_name: &str) -> Self {
        Self {
            volume_name: volume_name.to_string(),
        }
    }

    fn mount_point(&self) -> String {
        format!("/Volumes/{}", self.volume_name)
    }
}

impl DiskOperations for MacDisk {
    fn partition(&self, device: &str) -> ShellCommand {
        ShellCommand::new(
            ProvisionStep::Partition,
            PARTITIONING,
            format!(
                "diskutil partitionDisk {device} MBR ExFAT {} R ExFAT UBOOT {UBOOT_SIZE}",
                self.volume_name
            ),
        )
    }

    fn copy_tree(&self, source_dir: &Path) -> ShellCommand {
        ShellCommand::new(
            ProvisionStep::CopyInstallerFiles,
            COPYING_FILES,
            format!("cp -Rv {}/* {}/", quote(source_dir), self.mount_point()),
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
            format!("cp {} {}/{target_name}", quote(source), self.mount_point()),
        )
    }

    fn unmount(&self, device: &str) -> ShellCommand {
        ShellCommand::new(
            ProvisionStep::Unmount,
            UNMOUNTING,
            format!("diskutil unmountDisk {device}"),
        )
    }

    fn patch_partition_table(&self, device: &str) -> ShellCommand {
        // `fdisk -d` prints one line per partition; `n` skips the data
        // volume so only the second entry is retagged.
        ShellCommand::new(
            ProvisionStep::PatchPartitionTable,
            PATCHING_TABLE,
            format!("sudo fdisk -d {device} | sed 'n;s/0x07/0xA2/g' | sudo fdisk -ry {device}"),
        )
    }

    fn write_boot_image(&self, device: &str, image: &Path) -> ShellCommand {
        ShellCommand::new(
            ProvisionStep::WriteBootImage,
            WRITING_BOOT_IMAGE,
            format!("sudo dd if={} of={device}s2 bs=64k", quote(image)),
        )
    }

    fn disable_indexing(&self) -> Vec<ShellCommand> {
        let mount = self.mount_point();
        vec![
            ShellCommand::new(
                ProvisionStep::DisableIndexing,
                "Disabling Spotlight indexing...",
                format!("sudo mdutil -d {mount}"),
            ),
            ShellCommand::new(
                ProvisionStep::RemoveIndexMetadata,
                "Removing Spotlight files...",
                format!("rm -rf {mount}/.Spotlight-V100"),
            ),
            ShellCommand::new(
                ProvisionStep::RemoveIndexMetadata,
                "Removing (more) Spotlight files...",
                format!("rm -rf {mount}/.fseventsd"),
            ),
        ]
    }

    fn eject(&self, device: &str) -> ShellCommand {
        ShellCommand::new(
            ProvisionStep::Eject,
            EJECTING,
            format!("diskutil eject {device}"),
        )
    }
}

impl DeviceEnumerator for MacDisk {
    fn list_devices(&self) -> Result<Vec<DeviceDescriptor>> {
        let listing = capture("diskutil", &["list", "external", "physical"])?;
        let mut devices = Vec::new();
        for identifier in parse_disk_list(&listing) {
            let info = capture("diskutil", &["info", &identifier])?;
            devices.push(parse_disk_info(identifier, &info));
        }
        Ok(devices)
    }
}

/// Whole-disk identifiers from `diskutil list` output
fn parse_disk_list(listing: &str) -> Vec<String> {
    listing
        .lines()
        .filter(|line| line.starts_with("/dev/disk"))
        .filter_map(|line| line.split_whitespace().next())
        .map(str::to_string)
        .collect()
}

fn info_field<'a>(info: &'a str, key: &str) -> Option<&'a str> {
    info.lines().find_map(|line| {
        let (name, value) = line.split_once(':')?;
        (name.trim() == key).then(|| value.trim())
    })
}

/// Build a descriptor from `diskutil info` output
fn parse_disk_info(identifier: String, info: &str) -> DeviceDescriptor {
    let description = info_field(info, "Device / Media Name")
        .filter(|name| !name.is_empty())
        .unwrap_or(&identifier)
        .to_string();
    // "31.9 GB (31914983424 Bytes) (exactly 62333952 512-Byte-Units)"
    let size = info_field(info, "Disk Size")
        .and_then(|value| value.split_once('(')?.1.split_once(" Bytes"))
        .and_then(|(bytes, _)| bytes.trim().parse().ok())
        .unwrap_or(0);
    DeviceDescriptor {
        description,
        identifier,
        size,
    }
}
