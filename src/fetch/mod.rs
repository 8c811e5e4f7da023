//! Artifact download and extraction
//!
//! Downloads are a single streamed GET written straight to the destination.
//! There is no resume and no checksum; a failed transfer leaves the partial
//! file behind and aborts the run.

mod archive;

use std::fs::File;
use std::path::Path;

use reqwest::blocking::Client;

use crate::artifact::file_name_from_url;
use crate::error::{Result, WizardError};
use crate::ui::Logger;

/// Downloads artifacts and unpacks archives
pub trait ArtifactFetcher {
    fn fetch(&self, url: &str, destination: &Path) -> Result<()>;

    fn extract(&self, archive: &Path, destination_dir: &Path) -> Result<()>;
}

/// Fetcher backed by a blocking HTTP client
pub struct HttpFetcher {
    client: Client,
    logger: Logger,
}

impl HttpFetcher {
    pub fn new(client: Client, logger: Logger) -> Self {
        Self { client, logger }
    }

    fn download(&self, url: &str, destination: &Path) -> Result<()> {
        let mut response = self
            .client
            .get(url)
            .send()
            .and_then(reqwest::blocking::Response::error_for_status)
            .map_err(|e| WizardError::download_failed(url, e))?;
        let mut file = File::create(destination)?;
        response
            .copy_to(&mut file)
            .map_err(|e| WizardError::download_failed(url, e))?;
        Ok(())
    }
}

/// Start event logged before any bytes are requested
fn download_message(url: &str) -> String {
    format!("Downloading {}...", file_name_from_url(url))
}

impl ArtifactFetcher for HttpFetcher {
    fn fetch(&self, url: &str, destination: &Path) -> Result<()> {
        let message = download_message(url);
        self.logger.info(&message);
        let pb = self.logger.spinner(&message);

        let result = self.download(url, destination);

        pb.finish_and_clear();
        result
    }

    fn extract(&self, archive: &Path, destination_dir: &Path) -> Result<()> {
        let name = archive
            .file_name()
            .map_or_else(|| archive.display().to_string(), |n| n.to_string_lossy().into_owned());
        let message = format!("Extracting {name}...");
        self.logger.info(&message);
        let pb = self.logger.spinner(&message);

        let result = archive::extract(archive, destination_dir);

        pb.finish_and_clear();
        result
    }
}
