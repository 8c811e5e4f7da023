//! Latest-release resolution against GitHub repositories
//!
//! A repository's "latest" release is the lexicographically greatest path in
//! its default branch that starts with a given prefix. Upstream release
//! files carry a date stamp (`release_20240125.rar`, `releases/MiSTer_20240125`),
//! so byte order matches chronological order.

use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, USER_AGENT};
use serde::Deserialize;
use uuid::Uuid;

use crate::config::SourceConfig;
use crate::error::{Result, WizardError};

/// Resolves a repository and path prefix to a download URL
pub trait ReleaseResolver {
    fn resolve(&self, repository: &str, prefix: &str) -> Result<String>;
}

/// Recursive tree listing returned by the GitHub git trees API
#[derive(Debug, Deserialize)]
struct TreeListing {
    tree: Vec<TreeEntry>,
}

#[derive(Debug, Deserialize)]
struct TreeEntry {
    path: String,
}

/// Pick the latest path starting with `prefix`
///
/// Comparison is lexicographic, not numeric: `release_2` sorts after
/// `release_10`.
pub fn select_latest<'a, I>(paths: I, prefix: &str) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    paths.into_iter().filter(|p| p.starts_with(prefix)).max()
}

/// Resolver backed by the GitHub REST API
pub struct GitHubResolver {
    client: Client,
    source: SourceConfig,
}

impl GitHubResolver {
    pub fn new(client: Client, source: SourceConfig) -> Self {
        Self { client, source }
    }

    fn tree_url(&self, repository: &str) -> String {
        format!(
            "{}/repos/{}/{}/git/trees/{}?recursive=1",
            self.source.api_base.trim_end_matches('/'),
            self.source.owner,
            repository,
            self.source.branch
        )
    }

    /// Raw-content URL for a file on the configured branch
    pub fn raw_url(&self, repository: &str, path: &str) -> String {
        format!(
            "{}/{}/{}/raw/{}/{}",
            self.source.raw_base.trim_end_matches('/'),
            self.source.owner,
            repository,
            self.source.branch,
            path
        )
    }

    fn list_paths(&self, repository: &str) -> Result<Vec<String>> {
        // GitHub requires a User-Agent; a fresh one per call keeps requests anonymous.
        let response = self
            .client
            .get(self.tree_url(repository))
            .header(USER_AGENT, Uuid::new_v4().to_string())
            .header(ACCEPT, "application/vnd.github.v3+json")
            .send()
            .map_err(|e| WizardError::listing_failed(repository, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(WizardError::listing_failed(
                repository,
                format!("GitHub API returned {status}"),
            ));
        }

        let body = response
            .text()
            .map_err(|e| WizardError::listing_failed(repository, e))?;
        parse_tree(&body).map_err(|e| WizardError::listing_failed(repository, e))
    }
}

fn parse_tree(body: &str) -> std::result::Result<Vec<String>, serde_json::Error> {
    let listing: TreeListing = serde_json::from_str(body)?;
    Ok(listing.tree.into_iter().map(|entry| entry.path).collect())
}

impl ReleaseResolver for GitHubResolver {
    fn resolve(&self, repository: &str, prefix: &str) -> Result<String> {
        let paths = self.list_paths(repository)?;
        let latest = select_latest(paths.iter().map(String::as_str), prefix).ok_or_else(|| {
            WizardError::NoMatchingRelease {
                repository: repository.to_string(),
                prefix: prefix.to_string(),
            }
        })?;
        Ok(self.raw_url(repository, latest))
    }
}
