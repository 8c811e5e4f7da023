//! Resolve command implementation
//!
//! Prints the download URL each artifact would be fetched from. Nothing is
//! downloaded and no device is touched.

use crate::artifact::ArtifactSet;
use crate::cli::Cli;
use crate::config::SourceConfig;
use crate::error::Result;
use crate::http;
use crate::release::{GitHubResolver, ReleaseResolver};
use crate::ui::{Logger, highlight};

/// Run resolve command
pub fn run(cli: &Cli) -> Result<()> {
    let logger = Logger::new(cli.debug);
    let source = SourceConfig::from_cli(cli);
    logger.debug_value("source", &source);

    let resolver = GitHubResolver::new(http::client()?, source);
    for line in resolve_all(&resolver, &ArtifactSet::default(), &logger)? {
        println!("{line}");
    }

    Ok(())
}

/// One `repository: url` line per artifact, in fetch order
fn resolve_all(
    resolver: &dyn ReleaseResolver,
    artifacts: &ArtifactSet,
    logger: &Logger,
) -> Result<Vec<String>> {
    artifacts
        .iter()
        .map(|spec| -> Result<String> {
            let spinner = logger.spinner(&format!("Resolving {}...", spec.repository));
            let url = resolver.resolve(&spec.repository, &spec.prefix);
            spinner.finish_and_clear();
            Ok(format!("{}: {}", highlight(&spec.repository), url?))
        })
        .collect()
}
