//! Error types and handling for the wizard
//!
//! Uses `thiserror` for error definitions and `miette` for pretty diagnostics.
//!
//! Only the fatal tier lives here: resolution, download, extraction, device
//! enumeration and input failures. Shell command failures are never errors,
//! they are reported through [`crate::shell::CommandOutcome`].

use miette::Diagnostic;
use thiserror::Error;

/// Main error type for wizard operations
#[derive(Error, Diagnostic, Debug)]
pub enum WizardError {
    // Release resolution errors
    #[error("Failed to list repository '{repository}': {reason}")]
    #[diagnostic(
        code(mister_wizard::release::listing_failed),
        help("Check your network connection; the GitHub API may also be rate limiting you")
    )]
    ListingFailed { repository: String, reason: String },

    #[error("No release in '{repository}' matches prefix '{prefix}'")]
    #[diagnostic(
        code(mister_wizard::release::no_match),
        help("The upstream repository layout may have changed")
    )]
    NoMatchingRelease { repository: String, prefix: String },

    // Fetch errors
    #[error("Failed to download {url}: {reason}")]
    #[diagnostic(code(mister_wizard::fetch::download_failed))]
    DownloadFailed { url: String, reason: String },

    #[error("Failed to extract {path}: {reason}")]
    #[diagnostic(code(mister_wizard::fetch::extraction_failed))]
    ExtractionFailed { path: String, reason: String },

    #[error("Unsupported archive format: {path}")]
    #[diagnostic(
        code(mister_wizard::fetch::unsupported_archive),
        help("Supported formats: .rar, .zip")
    )]
    UnsupportedArchive { path: String },

    // Device errors
    #[error("Failed to enumerate devices: {reason}")]
    #[diagnostic(code(mister_wizard::device::enumeration_failed))]
    DeviceEnumerationFailed { reason: String },

    #[error("No removable devices found")]
    #[diagnostic(
        code(mister_wizard::device::none_found),
        help("Insert the SD card and run the wizard again")
    )]
    NoRemovableDevices,

    #[error("Platform not supported: {platform}")]
    #[diagnostic(
        code(mister_wizard::device::platform_not_supported),
        help("Supported platforms: macos, linux")
    )]
    PlatformNotSupported { platform: String },

    // Input errors
    #[error("Failed to read input: {message}")]
    #[diagnostic(code(mister_wizard::input::read_failed))]
    InputFailed { message: String },

    #[error("Input closed before a device was confirmed")]
    #[diagnostic(code(mister_wizard::input::closed))]
    InputClosed,

    // File system errors
    #[error("IO error: {message}")]
    #[diagnostic(code(mister_wizard::fs::io_error))]
    IoError { message: String },
}

impl WizardError {
    /// Create a listing error for a repository
    pub fn listing_failed(repository: impl Into<String>, reason: impl ToString) -> Self {
        WizardError::ListingFailed {
            repository: repository.into(),
            reason: reason.to_string(),
        }
    }

    /// Create a download error for a URL
    pub fn download_failed(url: impl Into<String>, reason: impl ToString) -> Self {
        WizardError::DownloadFailed {
            url: url.into(),
            reason: reason.to_string(),
        }
    }

    /// Create an extraction error for an archive path
    pub fn extraction_failed(path: &std::path::Path, reason: impl ToString) -> Self {
        WizardError::ExtractionFailed {
            path: path.display().to_string(),
            reason: reason.to_string(),
        }
    }
}

impl From<std::io::Error> for WizardError {
    fn from(err: std::io::Error) -> Self {
        WizardError::IoError {
            message: err.to_string(),
        }
    }
}

impl From<reqwest::Error> for WizardError {
    fn from(err: reqwest::Error) -> Self {
        let url = err
            .url()
            .map_or_else(|| "<unknown>".to_string(), ToString::to_string);
        WizardError::DownloadFailed {
            url,
            reason: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for WizardError {
    fn from(err: serde_json::Error) -> Self {
        WizardError::IoError {
            message: format!("Invalid JSON: {err}"),
        }
    }
}

impl From<inquire::InquireError> for WizardError {
    fn from(err: inquire::InquireError) -> Self {
        WizardError::InputFailed {
            message: err.to_string(),
        }
    }
}

/// Result type alias using miette for error handling
pub type Result<T> = miette::Result<T, WizardError>;
