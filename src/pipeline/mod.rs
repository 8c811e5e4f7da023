//! SD card provisioning pipeline
//!
//! Stages run in a fixed order with no branching and no rollback:
//!
//! 1. select the target device
//! 2. recreate the scratch directory
//! 3. resolve, download and extract the installer, executable and menu core
//! 4. partition and format the card
//! 5. copy the installer tree, executable and menu core to the data volume
//! 6. unmount and patch the boot-loader partition type
//! 7. write the U-Boot image to the boot-loader partition
//! 8. disable search indexing on the data volume
//! 9. eject
//! 10. remove the scratch directory
//!
//! Network and archive failures abort the run. Disk commands only warn: the
//! outcome of each is recorded in the [`ProvisionReport`] and the next
//! command runs regardless. A failed scratch cleanup is also only a warning.

use crate::artifact::{ArtifactSpec, FetchedArtifacts, ResolvedArtifact, file_name_from_url};
use crate::config::WizardConfig;
use crate::device::{DeviceEnumerator, DeviceSelector};
use crate::disk::DiskOperations;
use crate::error::Result;
use crate::fetch::ArtifactFetcher;
use crate::release::ReleaseResolver;
use crate::scratch::ScratchDirectory;
use crate::shell::{CommandRunner, ProvisionStep, ShellCommand};
use crate::ui::Logger;
use crate::ui::input::InputSource;

/// File name of the main executable on the data volume
const EXECUTABLE_TARGET: &str = "MiSTer";
/// File name of the menu core on the data volume
const MENU_CORE_TARGET: &str = "menu.rbf";

/// Outcome of every disk command, in execution order
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ProvisionReport {
    pub device: String,
    pub steps: Vec<(ProvisionStep, bool)>,
}

impl ProvisionReport {
    /// Steps whose command reported failure
    pub fn failed_steps(&self) -> Vec<ProvisionStep> {
        self.steps
            .iter()
            .filter(|(_, succeeded)| !succeeded)
            .map(|(step, _)| *step)
            .collect()
    }
}

/// Collaborators the pipeline drives
pub struct ProvisioningPipeline<'a> {
    config: &'a WizardConfig,
    logger: Logger,
    resolver: &'a dyn ReleaseResolver,
    fetcher: &'a dyn ArtifactFetcher,
    devices: &'a dyn DeviceEnumerator,
    disk: &'a dyn DiskOperations,
    runner: &'a dyn CommandRunner,
}

impl<'a> ProvisioningPipeline<'a> {
    pub fn new(
        config: &'a WizardConfig,
        logger: Logger,
        resolver: &'a dyn ReleaseResolver,
        fetcher: &'a dyn ArtifactFetcher,
        devices: &'a dyn DeviceEnumerator,
        disk: &'a dyn DiskOperations,
        runner: &'a dyn CommandRunner,
    ) -> Self {
        Self {
            config,
            logger,
            resolver,
            fetcher,
            devices,
            disk,
            runner,
        }
    }

    /// Provision a card chosen through `input`
    pub fn run(&self, input: &mut dyn InputSource) -> Result<ProvisionReport> {
        let devices = self.devices.list_devices()?;
        self.logger.debug_value("devices", &devices);
        let device = DeviceSelector::new(&devices, self.logger).select(input)?;
        self.logger.debug_value("device", &device.identifier);

        let scratch = ScratchDirectory::recreate(&self.config.scratch_dir, &self.logger)?;
        self.logger.debug_value("scratch", &scratch.path());
        let artifacts = self.fetch_artifacts(&scratch)?;
        self.logger.debug_value("artifacts", &artifacts);

        let mut report = ProvisionReport {
            device: device.identifier.clone(),
            steps: Vec::new(),
        };
        for command in self.commands(&device.identifier, &artifacts) {
            // Failures are recorded, never acted on.
            let outcome = self.runner.run(&command);
            report.steps.push((command.step, outcome.succeeded));
        }

        // A leftover directory is wiped on the next run.
        let scratch_path = scratch.path().to_path_buf();
        if let Err(e) = scratch.remove(&self.logger) {
            self.logger.warn(&format!(
                "Could not remove {}: {e}",
                scratch_path.display()
            ));
        }
        self.logger.info("Done!");
        Ok(report)
    }

    /// Download the three artifacts one after another
    fn fetch_artifacts(&self, scratch: &ScratchDirectory) -> Result<FetchedArtifacts> {
        let set = &self.config.artifacts;
        Ok(FetchedArtifacts {
            installer: self.fetch_artifact(&set.installer, scratch)?,
            executable: self.fetch_artifact(&set.executable, scratch)?,
            menu_core: self.fetch_artifact(&set.menu_core, scratch)?,
        })
    }

    fn fetch_artifact(
        &self,
        spec: &ArtifactSpec,
        scratch: &ScratchDirectory,
    ) -> Result<ResolvedArtifact> {
        let source_url = self.resolver.resolve(&spec.repository, &spec.prefix)?;
        self.logger.debug_value(&spec.repository, &source_url);

        let local_path = scratch.join(file_name_from_url(&source_url));
        self.fetcher.fetch(&source_url, &local_path)?;

        let extracted_path = match spec.kind.extract_dir() {
            Some(dir) => {
                let dest = scratch.join(dir);
                self.fetcher.extract(&local_path, &dest)?;
                Some(dest)
            }
            None => None,
        };

        Ok(ResolvedArtifact {
            source_url,
            local_path,
            extracted_path,
        })
    }

    /// Disk commands for `device`, in execution order
    fn commands(&self, device: &str, artifacts: &FetchedArtifacts) -> Vec<ShellCommand> {
        let disk = self.disk;
        let mut commands = vec![
            disk.partition(device),
            disk.copy_tree(&artifacts.installer_files()),
            disk.copy_file(
                ProvisionStep::CopyExecutable,
                "Copying executable...",
                &artifacts.executable.local_path,
                EXECUTABLE_TARGET,
            ),
            disk.copy_file(
                ProvisionStep::CopyMenuCore,
                "Copying menu core...",
                &artifacts.menu_core.local_path,
                MENU_CORE_TARGET,
            ),
            disk.unmount(device),
            disk.patch_partition_table(device),
            disk.write_boot_image(device, &artifacts.boot_image()),
        ];
        commands.extend(disk.disable_indexing());
        commands.push(disk.eject(device));
        commands
    }
}

#[cfg(test)]
mod tests;
