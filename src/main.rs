//! MiSTer Wizard - SD card provisioning for MiSTer
//!
//! A command line tool that downloads the latest MiSTer releases from GitHub
//! and turns a removable SD card into a bootable MiSTer card.

use clap::Parser;

mod artifact;
mod cli;
mod commands;
mod config;
mod device;
mod disk;
mod error;
mod fetch;
mod http;
mod pipeline;
mod release;
mod scratch;
mod shell;
mod ui;

use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();

    // Running without a subcommand provisions a card.
    let command = cli.command_or_default().unwrap_or_else(|e| e.exit());

    let result = match &command {
        Commands::Provision(args) => commands::provision::run(&cli, args),
        Commands::Devices(args) => commands::devices::run(args),
        Commands::Resolve => commands::resolve::run(&cli),
        Commands::Version => commands::version::run(),
        Commands::Completions(args) => commands::completions::run(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
