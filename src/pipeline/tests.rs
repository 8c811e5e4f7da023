//! Pipeline tests with in-memory collaborators

#![allow(clippy::expect_used)]

use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};

use serial_test::serial;
use tempfile::TempDir;

use super::*;
use crate::device::DeviceDescriptor;
use crate::disk::MacDisk;
use crate::error::WizardError;
use crate::shell::CommandOutcome;
use crate::ui::input::ScriptedInput;

struct FixedResolver {
    calls: RefCell<Vec<String>>,
}

impl FixedResolver {
    fn new() -> Self {
        Self {
            calls: RefCell::new(Vec::new()),
        }
    }
}

impl ReleaseResolver for FixedResolver {
    fn resolve(&self, repository: &str, prefix: &str) -> Result<String> {
        self.calls.borrow_mut().push(repository.to_string());
        let file = match prefix {
            "release" => "release_20240125.rar",
            "releases/MiSTer" => "MiSTer_20240125",
            _ => "menu_20240101.rbf",
        };
        Ok(format!(
            "https://github.com/MiSTer-devel/{repository}/raw/master/{file}"
        ))
    }
}

struct FailingResolver;

impl ReleaseResolver for FailingResolver {
    fn resolve(&self, repository: &str, prefix: &str) -> Result<String> {
        Err(WizardError::NoMatchingRelease {
            repository: repository.to_string(),
            prefix: prefix.to_string(),
        })
    }
}

/// Writes placeholder files instead of downloading
#[derive(Default)]
struct FakeFetcher {
    fetched: RefCell<Vec<PathBuf>>,
}

impl ArtifactFetcher for FakeFetcher {
    fn fetch(&self, url: &str, destination: &Path) -> Result<()> {
        fs::write(destination, url.as_bytes())?;
        self.fetched.borrow_mut().push(destination.to_path_buf());
        Ok(())
    }

    fn extract(&self, _archive: &Path, destination_dir: &Path) -> Result<()> {
        let linux = destination_dir.join("files").join("linux");
        fs::create_dir_all(&linux)?;
        fs::write(linux.join("uboot.img"), b"uboot")?;
        Ok(())
    }
}

struct TwoDevices;

impl DeviceEnumerator for TwoDevices {
    fn list_devices(&self) -> Result<Vec<DeviceDescriptor>> {
        Ok(vec![
            DeviceDescriptor {
                description: "SD Card Reader".to_string(),
                identifier: "/dev/disk4".to_string(),
                size: 31_914_983_424,
            },
            DeviceDescriptor {
                description: "USB Stick".to_string(),
                identifier: "/dev/disk5".to_string(),
                size: 8_004_304_896,
            },
        ])
    }
}

/// Records every command and reports each one as failed
#[derive(Default)]
struct RecordingRunner {
    commands: RefCell<Vec<ShellCommand>>,
}

impl RecordingRunner {
    fn steps(&self) -> Vec<ProvisionStep> {
        self.commands.borrow().iter().map(|c| c.step).collect()
    }

    fn count(&self, step: ProvisionStep) -> usize {
        self.steps().into_iter().filter(|s| *s == step).count()
    }

    fn position(&self, step: ProvisionStep) -> usize {
        self.steps()
            .iter()
            .position(|s| *s == step)
            .expect("step was run")
    }
}

impl CommandRunner for RecordingRunner {
    fn run(&self, command: &ShellCommand) -> CommandOutcome {
        self.commands.borrow_mut().push(command.clone());
        CommandOutcome {
            output: "boom".to_string(),
            succeeded: false,
        }
    }
}

/// Owns every collaborator so a pipeline can borrow them
struct Harness {
    _temp: TempDir,
    config: WizardConfig,
    resolver: FixedResolver,
    fetcher: FakeFetcher,
    disk: MacDisk,
    runner: RecordingRunner,
}

impl Harness {
    fn new() -> Self {
        let temp = TempDir::new().unwrap();
        let config = WizardConfig {
            scratch_dir: temp.path().join("mw_temp"),
            ..WizardConfig::default()
        };
        Self::with_config(temp, config)
    }

    fn with_config(temp: TempDir, config: WizardConfig) -> Self {
        let disk = MacDisk::new(&config.volume_name);
        Self {
            _temp: temp,
            config,
            resolver: FixedResolver::new(),
            fetcher: FakeFetcher::default(),
            disk,
            runner: RecordingRunner::default(),
        }
    }

    fn run_with(
        &self,
        resolver: &dyn ReleaseResolver,
        answers: &[&str],
    ) -> Result<ProvisionReport> {
        let pipeline = ProvisioningPipeline::new(
            &self.config,
            Logger::new(false),
            resolver,
            &self.fetcher,
            &TwoDevices,
            &self.disk,
            &self.runner,
        );
        pipeline.run(&mut ScriptedInput::new(answers.iter().copied()))
    }

    fn run(&self, answers: &[&str]) -> Result<ProvisionReport> {
        self.run_with(&self.resolver, answers)
    }
}

#[test]
fn test_dry_run_issues_commands_in_order() {
    let harness = Harness::new();

    let report = harness.run(&["abc", "0", "n", "0", "y"]).unwrap();

    let runner = &harness.runner;
    for step in [
        ProvisionStep::Partition,
        ProvisionStep::Unmount,
        ProvisionStep::PatchPartitionTable,
        ProvisionStep::WriteBootImage,
        ProvisionStep::Eject,
    ] {
        assert_eq!(runner.count(step), 1, "{step} should run exactly once");
    }
    assert!(runner.position(ProvisionStep::Partition) < runner.position(ProvisionStep::Unmount));
    assert!(
        runner.position(ProvisionStep::Unmount)
            < runner.position(ProvisionStep::PatchPartitionTable)
    );
    assert!(
        runner.position(ProvisionStep::PatchPartitionTable)
            < runner.position(ProvisionStep::WriteBootImage)
    );
    assert!(runner.position(ProvisionStep::WriteBootImage) < runner.position(ProvisionStep::Eject));

    // Every command failed, yet all of them ran and the scratch dir is gone.
    assert_eq!(report.device, "/dev/disk4");
    assert_eq!(report.failed_steps().len(), runner.steps().len());
    assert_eq!(runner.steps().last(), Some(&ProvisionStep::Eject));
    assert!(!harness.config.scratch_dir.exists());
}

#[test]
fn test_full_command_sequence() {
    let harness = Harness::new();

    harness.run(&["1", "y"]).unwrap();

    assert_eq!(
        harness.runner.steps(),
        [
            ProvisionStep::Partition,
            ProvisionStep::CopyInstallerFiles,
            ProvisionStep::CopyExecutable,
            ProvisionStep::CopyMenuCore,
            ProvisionStep::Unmount,
            ProvisionStep::PatchPartitionTable,
            ProvisionStep::WriteBootImage,
            ProvisionStep::DisableIndexing,
            ProvisionStep::RemoveIndexMetadata,
            ProvisionStep::RemoveIndexMetadata,
            ProvisionStep::Eject,
        ]
    );

    let commands = harness.runner.commands.borrow();
    let scratch = harness.config.scratch_dir.display().to_string();
    assert!(commands[0].command.contains("/dev/disk5"));
    assert_eq!(
        commands[1].command,
        format!("cp -Rv {scratch}/installer/files/* /Volumes/MiSTer_Data/")
    );
    assert_eq!(
        commands[2].command,
        format!("cp {scratch}/MiSTer_20240125 /Volumes/MiSTer_Data/MiSTer")
    );
    assert_eq!(
        commands[3].command,
        format!("cp {scratch}/menu_20240101.rbf /Volumes/MiSTer_Data/menu.rbf")
    );
    assert_eq!(
        commands[6].command,
        format!("sudo dd if={scratch}/installer/files/linux/uboot.img of=/dev/disk5s2 bs=64k")
    );
}

#[test]
fn test_artifacts_fetched_in_order() {
    let harness = Harness::new();

    harness.run(&["0", "y"]).unwrap();

    assert_eq!(
        *harness.resolver.calls.borrow(),
        ["SD-Installer-Win64_MiSTer", "Main_MiSTer", "Menu_MiSTer"]
    );
    let names: Vec<String> = harness
        .fetcher
        .fetched
        .borrow()
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(
        names,
        ["release_20240125.rar", "MiSTer_20240125", "menu_20240101.rbf"]
    );
}

#[test]
fn test_leftover_scratch_directory_is_replaced() {
    let harness = Harness::new();
    let scratch = &harness.config.scratch_dir;
    fs::create_dir_all(scratch).unwrap();
    fs::write(scratch.join("stale.rar"), b"old").unwrap();

    harness.run(&["0", "y"]).unwrap();

    assert!(!scratch.exists());
    assert_eq!(harness.fetcher.fetched.borrow().len(), 3);
}

#[test]
fn test_resolution_failure_aborts_before_disk_commands() {
    let harness = Harness::new();

    let result = harness.run_with(&FailingResolver, &["0", "y"]);

    assert!(matches!(result, Err(WizardError::NoMatchingRelease { .. })));
    assert!(harness.runner.steps().is_empty());
    // The scratch directory is left for the next run to wipe.
    assert!(harness.config.scratch_dir.exists());
}

#[test]
fn test_unconfirmed_selection_touches_nothing() {
    let harness = Harness::new();

    let result = harness.run(&["0", "yes"]);

    assert!(matches!(result, Err(WizardError::InputClosed)));
    assert!(harness.runner.steps().is_empty());
    assert!(!harness.config.scratch_dir.exists());
}

#[test]
#[serial]
fn test_relative_scratch_directory_uses_working_directory() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().to_path_buf();
    let previous = std::env::current_dir().unwrap();
    std::env::set_current_dir(&root).unwrap();

    let harness = Harness::with_config(temp, WizardConfig::default());
    let result = harness.run(&["0", "y"]);

    std::env::set_current_dir(previous).unwrap();
    result.unwrap();
    assert!(
        harness
            .fetcher
            .fetched
            .borrow()
            .iter()
            .all(|p| p.starts_with("./mw_temp"))
    );
    assert!(!root.join("mw_temp").exists());
}

/// Deletes the scratch directory while the disk commands run
struct ScratchWipingRunner {
    scratch: PathBuf,
}

impl CommandRunner for ScratchWipingRunner {
    fn run(&self, _command: &ShellCommand) -> CommandOutcome {
        let _ = fs::remove_dir_all(&self.scratch);
        CommandOutcome {
            output: String::new(),
            succeeded: true,
        }
    }
}

#[test]
fn test_scratch_cleanup_failure_still_completes() {
    let harness = Harness::new();
    let runner = ScratchWipingRunner {
        scratch: harness.config.scratch_dir.clone(),
    };
    let pipeline = ProvisioningPipeline::new(
        &harness.config,
        Logger::new(false),
        &harness.resolver,
        &harness.fetcher,
        &TwoDevices,
        &harness.disk,
        &runner,
    );

    let report = pipeline
        .run(&mut ScriptedInput::new(["0", "y"]))
        .expect("cleanup errors only warn");

    assert_eq!(report.device, "/dev/disk4");
    assert!(report.failed_steps().is_empty());
    assert!(!harness.config.scratch_dir.exists());
}
