//! Archive extraction (rar, zip)

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use unrar::Archive;

use crate::error::{Result, WizardError};

/// Supported archive formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveFormat {
    /// The SD installer is published as a RAR archive
    Rar,
    Zip,
}

impl ArchiveFormat {
    /// Detect archive format from file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_string_lossy().to_lowercase();
        match extension.as_str() {
            "rar" => Some(ArchiveFormat::Rar),
            "zip" => Some(ArchiveFormat::Zip),
            _ => None,
        }
    }
}

/// Extract `archive_path` into `dest_dir`, creating it if needed
pub fn extract(archive_path: &Path, dest_dir: &Path) -> Result<()> {
    let format = ArchiveFormat::from_path(archive_path).ok_or_else(|| {
        WizardError::UnsupportedArchive {
            path: archive_path.display().to_string(),
        }
    })?;

    std::fs::create_dir_all(dest_dir)?;

    match format {
        ArchiveFormat::Rar => extract_rar(archive_path, dest_dir),
        ArchiveFormat::Zip => extract_zip(archive_path, dest_dir),
    }
}

fn failed<E: ToString>(archive_path: &Path) -> impl Fn(E) -> WizardError + '_ {
    move |e| WizardError::extraction_failed(archive_path, e)
}

fn extract_rar(archive_path: &Path, dest_dir: &Path) -> Result<()> {
    let mut archive = Archive::new(archive_path)
        .open_for_processing()
        .map_err(failed(archive_path))?;
    // Directory entries are extracted too so empty directories survive.
    while let Some(header) = archive.read_header().map_err(failed(archive_path))? {
        archive = header
            .extract_with_base(dest_dir)
            .map_err(failed(archive_path))?;
    }
    Ok(())
}

fn extract_zip(archive_path: &Path, dest_dir: &Path) -> Result<()> {
    let file = File::open(archive_path)?;
    let mut archive =
        zip::ZipArchive::new(BufReader::new(file)).map_err(failed(archive_path))?;
    // ZipArchive::extract rejects entries that would escape dest_dir.
    archive.extract(dest_dir).map_err(failed(archive_path))
}
