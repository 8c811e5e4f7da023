//! Shared blocking HTTP client

use reqwest::blocking::Client;

use crate::error::{Result, WizardError};

/// Build the client used for tree listings and artifact downloads
///
/// Requests carry no timeout: artifacts are large and the operator is
/// watching the run.
pub fn client() -> Result<Client> {
    Client::builder()
        .timeout(None)
        .build()
        .map_err(|e| WizardError::IoError {
            message: format!("Failed to build HTTP client: {e}"),
        })
}
