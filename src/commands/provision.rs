//! Provision command implementation
//!
//! Builds the real collaborators (GitHub resolver, HTTP fetcher, host disk
//! commands and console input) and hands them to the provisioning pipeline.

use crate::cli::{Cli, ProvisionArgs};
use crate::config::WizardConfig;
use crate::disk;
use crate::error::Result;
use crate::fetch::HttpFetcher;
use crate::http;
use crate::pipeline::{ProvisionReport, ProvisioningPipeline};
use crate::release::GitHubResolver;
use crate::shell::{CommandRunner, DryRunRunner, ShellRunner};
use crate::ui::input::ConsoleInput;
use crate::ui::{Logger, highlight, underline};

/// Run provision command
pub fn run(cli: &Cli, args: &ProvisionArgs) -> Result<()> {
    let config = WizardConfig::from_args(cli, args);
    let logger = Logger::new(config.debug);

    logger.out(&format!(
        "{}\n\n",
        underline(&format!("MiSTer Wizard v{} by tatsutron", env!("CARGO_PKG_VERSION")))
    ));
    logger.debug_value("config", &config);

    let client = http::client()?;
    let resolver = GitHubResolver::new(client.clone(), config.source.clone());
    let fetcher = HttpFetcher::new(client, logger);
    let host = disk::host(&config.volume_name)?;
    let runner: Box<dyn CommandRunner> = if config.dry_run {
        Box::new(DryRunRunner::new(logger))
    } else {
        Box::new(ShellRunner::new(logger))
    };

    let pipeline = ProvisioningPipeline::new(
        &config,
        logger,
        &resolver,
        &fetcher,
        host.as_enumerator(),
        host.as_disk(),
        runner.as_ref(),
    );
    let report = pipeline.run(&mut ConsoleInput)?;
    summarize(&logger, &report);

    Ok(())
}

/// Warn about disk commands that reported failure
fn summarize(logger: &Logger, report: &ProvisionReport) {
    let failed = report.failed_steps();
    if failed.is_empty() {
        return;
    }
    let names: Vec<String> = failed.iter().map(ToString::to_string).collect();
    logger.error(&format!(
        "{} command(s) on {} reported failure: {}",
        failed.len(),
        highlight(&report.device),
        names.join(", ")
    ));
    logger.warn("The card may not boot. Check the output above and run the wizard again.");
}
