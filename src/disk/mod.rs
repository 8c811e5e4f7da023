//! Platform disk operations
//!
//! Every destructive step is expressed as a [`ShellCommand`] built here and
//! executed by a [`crate::shell::CommandRunner`]. Only device enumeration
//! runs commands directly, because its output is parsed and a failure there
//! is fatal.

mod linux;
mod macos;

pub use linux::LinuxDisk;
pub use macos::MacDisk;

use std::path::Path;
use std::process::Command;

use crate::device::DeviceEnumerator;
use crate::error::{Result, WizardError};
use crate::shell::{ProvisionStep, ShellCommand};

pub(crate) const PARTITIONING: &str = "Partitioning SD card...";
pub(crate) const COPYING_FILES: &str = "Copying MiSTer files...";
pub(crate) const UNMOUNTING: &str = "Unmounting SD card...";
pub(crate) const PATCHING_TABLE: &str = "Fixing the SD card partition table to support UBOOT...";
pub(crate) const WRITING_BOOT_IMAGE: &str = "Writing uboot image to the UBOOT partition...";
pub(crate) const EJECTING: &str = "Ejecting SD card...";

/// Builds the host commands for each provisioning step
///
/// Implementations are bound to one data volume name at construction.
pub trait DiskOperations {
    /// Repartition the whole device into the data volume and a small
    /// boot-loader volume, leaving the data volume mounted
    fn partition(&self, device: &str) -> ShellCommand;

    /// Copy the contents of `source_dir` to the root of the data volume
    fn copy_tree(&self, source_dir: &Path) -> ShellCommand;

    /// Copy one file to the data volume under `target_name`
    fn copy_file(
        &self,
        step: ProvisionStep,
        description: &str,
        source: &Path,
        target_name: &str,
    ) -> ShellCommand;

    fn unmount(&self, device: &str) -> ShellCommand;

    /// Retag the boot-loader partition (type `0x07` to `0xA2`) so U-Boot
    /// is found by the board's preloader
    fn patch_partition_table(&self, device: &str) -> ShellCommand;

    /// Raw-copy the boot image onto the boot-loader partition
    fn write_boot_image(&self, device: &str, image: &Path) -> ShellCommand;

    /// Commands that turn off search indexing on the data volume, possibly none
    fn disable_indexing(&self) -> Vec<ShellCommand>;

    fn eject(&self, device: &str) -> ShellCommand;
}

/// A host platform provides both enumeration and provisioning commands
pub trait HostDisk: DiskOperations + DeviceEnumerator {
    fn as_disk(&self) -> &dyn DiskOperations;
    fn as_enumerator(&self) -> &dyn DeviceEnumerator;
}

impl<T: DiskOperations + DeviceEnumerator> HostDisk for T {
    fn as_disk(&self) -> &dyn DiskOperations {
        self
    }

    fn as_enumerator(&self) -> &dyn DeviceEnumerator {
        self
    }
}

/// Disk operations for the platform the wizard is running on
pub fn host(volume_name: &str) -> Result<Box<dyn HostDisk>> {
    match std::env::consts::OS {
        "macos" => Ok(Box::new(MacDisk::new(volume_name))),
        "linux" => Ok(Box::new(LinuxDisk::new(volume_name))),
        other => Err(WizardError::PlatformNotSupported {
            platform: other.to_string(),
        }),
    }
}

/// Quote a path for interpolation into a `sh -c` command line
pub(crate) fn quote(path: &Path) -> String {
    let text = path.display().to_string();
    if text
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || "/._-+:@".contains(c))
    {
        text
    } else {
        format!("'{}'", text.replace('\'', r"'\''"))
    }
}

/// Run an enumeration command and return its standard output
pub(crate) fn capture(program: &str, args: &[&str]) -> Result<String> {
    let output = Command::new(program).args(args).output().map_err(|e| {
        WizardError::DeviceEnumerationFailed {
            reason: format!("{program}: {e}"),
        }
    })?;
    if !output.status.success() {
        return Err(WizardError::DeviceEnumerationFailed {
            reason: format!(
                "{program} exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            ),
        });
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_plain_path() {
        assert_eq!(
            quote(Path::new("./mw_temp/installer/files")),
            "./mw_temp/installer/files"
        );
    }

    #[test]
    fn test_quote_path_with_spaces() {
        assert_eq!(
            quote(Path::new("/Users/me/My Cards/mw_temp")),
            "'/Users/me/My Cards/mw_temp'"
        );
        assert_eq!(quote(Path::new("it's")), r"'it'\''s'");
    }

    #[test]
    fn test_capture_reports_failure() {
        let result = capture("sh", &["-c", "echo nope >&2; exit 1"]);
        match result {
            Err(WizardError::DeviceEnumerationFailed { reason }) => {
                assert!(reason.contains("nope"));
            }
            other => panic!("Expected DeviceEnumerationFailed, got {other:?}"),
        }
    }

    #[test]
    fn test_capture_stdout() {
        assert_eq!(capture("sh", &["-c", "echo ok"]).unwrap(), "ok\n");
    }

    #[test]
    fn test_capture_missing_program() {
        assert!(capture("definitely-not-a-real-program-mw", &[]).is_err());
    }
}
