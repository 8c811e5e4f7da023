//! Run configuration assembled from command-line flags and environment

use std::path::PathBuf;

use crate::artifact::ArtifactSet;
use crate::cli::{Cli, ProvisionArgs};

pub const DEFAULT_OWNER: &str = "MiSTer-devel";
pub const DEFAULT_BRANCH: &str = "master";
pub const DEFAULT_API_URL: &str = "https://api.github.com";
pub const DEFAULT_RAW_URL: &str = "https://github.com";
pub const DEFAULT_SCRATCH_DIR: &str = "./mw_temp";
pub const DEFAULT_VOLUME_NAME: &str = "MiSTer_Data";

/// Where releases are published
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceConfig {
    pub owner: String,
    pub branch: String,
    pub api_base: String,
    pub raw_base: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            owner: DEFAULT_OWNER.to_string(),
            branch: DEFAULT_BRANCH.to_string(),
            api_base: DEFAULT_API_URL.to_string(),
            raw_base: DEFAULT_RAW_URL.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct WizardConfig {
    pub source: SourceConfig,
    pub artifacts: ArtifactSet,
    pub scratch_dir: PathBuf,
    /// Label of the data volume, also its mount name
    pub volume_name: String,
    pub debug: bool,
    /// Print disk commands instead of running them
    pub dry_run: bool,
}

impl Default for WizardConfig {
    fn default() -> Self {
        Self {
            source: SourceConfig::default(),
            artifacts: ArtifactSet::default(),
            scratch_dir: PathBuf::from(DEFAULT_SCRATCH_DIR),
            volume_name: DEFAULT_VOLUME_NAME.to_string(),
            debug: false,
            dry_run: false,
        }
    }
}

impl SourceConfig {
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            owner: cli.owner.clone(),
            branch: cli.branch.clone(),
            api_base: cli.api_url.clone(),
            raw_base: cli.raw_url.clone(),
        }
    }
}

impl WizardConfig {
    pub fn from_args(cli: &Cli, provision: &ProvisionArgs) -> Self {
        Self {
            source: SourceConfig::from_cli(cli),
            artifacts: ArtifactSet::default(),
            scratch_dir: provision.scratch_dir.clone(),
            volume_name: provision.volume_name.clone(),
            debug: cli.debug,
            dry_run: provision.dry_run,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_defaults_match_cli_defaults() {
        let cli = Cli::try_parse_from(["mister-wizard"]).unwrap();
        let config = WizardConfig::from_args(&cli, &ProvisionArgs::default());
        let default = WizardConfig::default();
        assert_eq!(config.source, default.source);
        assert_eq!(config.scratch_dir, default.scratch_dir);
        assert_eq!(config.volume_name, default.volume_name);
        assert!(!config.debug);
        assert!(!config.dry_run);
    }

    #[test]
    fn test_from_args_overrides() {
        let cli = Cli::try_parse_from([
            "mister-wizard",
            "--debug",
            "--owner",
            "fork",
            "--branch",
            "main",
            "provision",
            "--scratch-dir",
            "/tmp/wizard",
            "--volume-name",
            "CARD",
            "--dry-run",
        ])
        .unwrap();
        let Some(crate::cli::Commands::Provision(args)) = &cli.command else {
            panic!("Expected Provision command");
        };
        let config = WizardConfig::from_args(&cli, args);
        assert_eq!(config.source.owner, "fork");
        assert_eq!(config.source.branch, "main");
        assert_eq!(config.scratch_dir, PathBuf::from("/tmp/wizard"));
        assert_eq!(config.volume_name, "CARD");
        assert!(config.debug);
        assert!(config.dry_run);
    }
}
