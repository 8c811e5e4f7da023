//! CLI definitions using clap derive API

use clap::builder::{Styles, styling::AnsiColor};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::{
    DEFAULT_API_URL, DEFAULT_BRANCH, DEFAULT_OWNER, DEFAULT_RAW_URL, DEFAULT_SCRATCH_DIR,
    DEFAULT_VOLUME_NAME,
};

/// MiSTer Wizard - SD card provisioning for MiSTer
///
/// Downloads the latest MiSTer releases and writes a bootable SD card.
#[derive(Parser, Debug)]
#[command(
    name = "mister-wizard",
    author,
    version,
    color = clap::ColorChoice::Auto,
    styles = Styles::styled()
        .header(AnsiColor::Green.on_default().bold())
        .usage(AnsiColor::Green.on_default().bold())
        .literal(AnsiColor::Cyan.on_default().bold())
        .placeholder(AnsiColor::Cyan.on_default()),
    about = "Provision a MiSTer SD card from the latest releases",
    long_about = "MiSTer Wizard downloads the latest SD installer, main executable and menu core, \
                  then partitions, formats and populates an SD card so it boots on MiSTer. \
                  ALL DATA ON THE SELECTED CARD IS DESTROYED.",
    after_help = "\x1b[1m\x1b[32mExamples:\x1b[0m\n    \
                  mister-wizard\n    \
                  mister-wizard provision --dry-run\n    \
                  mister-wizard devices\n    \
                  mister-wizard resolve"
)]
pub struct Cli {
    /// Print debug output
    #[arg(
        long,
        short = 'd',
        global = true,
        env = "MW_DEBUG",
        action = clap::ArgAction::SetTrue,
        value_parser = clap::builder::BoolishValueParser::new()
    )]
    pub debug: bool,

    /// GitHub account publishing the releases
    #[arg(long, global = true, env = "MW_OWNER", default_value = DEFAULT_OWNER)]
    pub owner: String,

    /// Branch the releases are read from
    #[arg(long, global = true, env = "MW_BRANCH", default_value = DEFAULT_BRANCH)]
    pub branch: String,

    /// Base URL of the GitHub API
    #[arg(long, global = true, hide = true, env = "MW_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Base URL raw files are downloaded from
    #[arg(long, global = true, hide = true, env = "MW_RAW_URL", default_value = DEFAULT_RAW_URL)]
    pub raw_url: String,

    /// Defaults to `provision`
    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// The requested subcommand, or `provision` configured from its env vars
    pub fn command_or_default(&self) -> Result<Commands, clap::Error> {
        match &self.command {
            Some(command) => Ok(command.clone()),
            None => ProvisionArgs::try_parse_from(["provision"]).map(Commands::Provision),
        }
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Download the latest releases and write them to an SD card
    Provision(ProvisionArgs),

    /// List removable devices
    Devices(DevicesArgs),

    /// Print the download URL of each latest release
    Resolve,

    /// Show version information
    Version,

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the provision command
#[derive(Parser, Debug, Clone)]
#[command(after_help = "EXAMPLES:\n  \
                  Provision a card:\n    mister-wizard provision\n\n\
                  Show the disk commands without running them:\n    mister-wizard provision --dry-run\n\n\
                  Keep downloads somewhere else:\n    mister-wizard provision --scratch-dir /tmp/mw")]
pub struct ProvisionArgs {
    /// Working directory for downloads, recreated on every run
    #[arg(long, env = "MW_SCRATCH_DIR", default_value = DEFAULT_SCRATCH_DIR)]
    pub scratch_dir: PathBuf,

    /// Label of the data volume
    #[arg(long, env = "MW_VOLUME_NAME", default_value = DEFAULT_VOLUME_NAME)]
    pub volume_name: String,

    /// Print disk commands instead of running them (downloads still happen)
    #[arg(long)]
    pub dry_run: bool,
}

impl Default for ProvisionArgs {
    fn default() -> Self {
        Self {
            scratch_dir: PathBuf::from(DEFAULT_SCRATCH_DIR),
            volume_name: DEFAULT_VOLUME_NAME.to_string(),
            dry_run: false,
        }
    }
}

/// Arguments for the devices command
#[derive(Parser, Debug, Clone, Default)]
pub struct DevicesArgs {
    /// Print the device list as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for completions command
#[derive(Parser, Debug, Clone)]
#[command(after_help = "EXAMPLES:\n  \
                  Generate bash completions:\n    mister-wizard completions --shell bash > ~/.bash_completion.d/mister-wizard\n\n\
                  Generate zsh completions:\n    mister-wizard completions --shell zsh > ~/.zfunc/_mister-wizard")]
pub struct CompletionsArgs {
    /// Shell type (bash, elvish, fish, powershell, zsh)
    #[arg(long)]
    pub shell: String,
}
