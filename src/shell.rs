//! Host shell command execution
//!
//! Commands never fail the caller. A non-zero exit or a spawn error is
//! reported as a warning and surfaces only as `succeeded: false` in the
//! returned [`CommandOutcome`].

use std::fmt;
use std::process::Command;

use crate::ui::Logger;

/// Provisioning step a command belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProvisionStep {
    Partition,
    CopyInstallerFiles,
    CopyExecutable,
    CopyMenuCore,
    Unmount,
    PatchPartitionTable,
    WriteBootImage,
    DisableIndexing,
    RemoveIndexMetadata,
    Eject,
}

impl fmt::Display for ProvisionStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ProvisionStep::Partition => "partition",
            ProvisionStep::CopyInstallerFiles => "copy-installer-files",
            ProvisionStep::CopyExecutable => "copy-executable",
            ProvisionStep::CopyMenuCore => "copy-menu-core",
            ProvisionStep::Unmount => "unmount",
            ProvisionStep::PatchPartitionTable => "patch-partition-table",
            ProvisionStep::WriteBootImage => "write-boot-image",
            ProvisionStep::DisableIndexing => "disable-indexing",
            ProvisionStep::RemoveIndexMetadata => "remove-index-metadata",
            ProvisionStep::Eject => "eject",
        };
        f.write_str(name)
    }
}

/// A shell command line with the message shown while it runs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellCommand {
    pub step: ProvisionStep,
    pub description: String,
    pub command: String,
}

impl ShellCommand {
    pub fn new(step: ProvisionStep, description: &str, command: String) -> Self {
        Self {
            step,
            description: description.to_string(),
            command,
        }
    }
}

/// Result of running a command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutcome {
    /// Standard output if it was non-empty, standard error otherwise
    pub output: String,
    pub succeeded: bool,
}

/// Executes provisioning commands
pub trait CommandRunner {
    fn run(&self, command: &ShellCommand) -> CommandOutcome;
}

/// Runs commands through `sh -c`
#[derive(Debug, Clone, Copy)]
pub struct ShellRunner {
    logger: Logger,
}

impl ShellRunner {
    pub fn new(logger: Logger) -> Self {
        Self { logger }
    }
}

impl CommandRunner for ShellRunner {
    fn run(&self, command: &ShellCommand) -> CommandOutcome {
        self.logger.info(&command.description);
        self.logger.debug_value("command", &command.command);

        match Command::new("sh").arg("-c").arg(&command.command).output() {
            Ok(output) => {
                let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
                let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
                let succeeded = output.status.success();
                if !succeeded {
                    self.logger.warn(&format!(
                        "Step '{}' failed ({}): {}",
                        command.step,
                        output.status,
                        stderr.trim()
                    ));
                }
                let output = if stdout.is_empty() { stderr } else { stdout };
                if self.logger.debug_enabled() && !output.trim().is_empty() {
                    self.logger.debug(output.trim_end());
                }
                CommandOutcome { output, succeeded }
            }
            Err(e) => {
                self.logger
                    .warn(&format!("Step '{}' could not start: {e}", command.step));
                CommandOutcome {
                    output: String::new(),
                    succeeded: false,
                }
            }
        }
    }
}

/// Prints commands instead of running them
#[derive(Debug, Clone, Copy)]
pub struct DryRunRunner {
    logger: Logger,
}

impl DryRunRunner {
    pub fn new(logger: Logger) -> Self {
        Self { logger }
    }
}

impl CommandRunner for DryRunRunner {
    fn run(&self, command: &ShellCommand) -> CommandOutcome {
        self.logger.info(&command.description);
        self.logger.info(&format!("  would run: {}", command.command));
        CommandOutcome {
            output: String::new(),
            succeeded: true,
        }
    }
}
