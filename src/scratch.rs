//! Process-lifetime working directory for downloads
//!
//! The directory lives at a fixed path relative to the working directory. A
//! directory left behind by an earlier, failed run is wiped on startup.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::ui::Logger;

#[derive(Debug)]
pub struct ScratchDirectory {
    path: PathBuf,
}

impl ScratchDirectory {
    /// Remove `path` if it exists and create it empty
    pub fn recreate(path: impl Into<PathBuf>, logger: &Logger) -> Result<Self> {
        let path = path.into();
        if path.exists() {
            logger.debug(&format!("Removing {}...", display_path(&path)));
            fs::remove_dir_all(&path)?;
        }
        logger.debug(&format!("Creating {}...", display_path(&path)));
        fs::create_dir_all(&path)?;
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn join(&self, name: impl AsRef<Path>) -> PathBuf {
        self.path.join(name)
    }

    /// Delete the directory and everything in it
    pub fn remove(self, logger: &Logger) -> Result<()> {
        logger.debug(&format!("Removing {}", display_path(&self.path)));
        fs::remove_dir_all(&self.path)?;
        Ok(())
    }
}

fn display_path(path: &Path) -> String {
    std::path::absolute(path)
        .unwrap_or_else(|_| path.to_path_buf())
        .display()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_recreate_creates_empty_directory() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("mw_temp");

        let scratch = ScratchDirectory::recreate(&path, &Logger::new(false)).unwrap();

        assert!(scratch.path().is_dir());
        assert_eq!(fs::read_dir(scratch.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_recreate_wipes_leftover_directory() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("mw_temp");
        fs::create_dir_all(path.join("installer/files")).unwrap();
        fs::write(path.join("release_20230101.rar"), b"stale").unwrap();

        let scratch = ScratchDirectory::recreate(&path, &Logger::new(false)).unwrap();

        assert_eq!(fs::read_dir(scratch.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_remove_deletes_contents() {
        let temp = TempDir::new().unwrap();
        let scratch =
            ScratchDirectory::recreate(temp.path().join("mw_temp"), &Logger::new(false)).unwrap();
        fs::write(scratch.join("MiSTer_20240125"), b"binary").unwrap();
        let path = scratch.path().to_path_buf();

        scratch.remove(&Logger::new(false)).unwrap();

        assert!(!path.exists());
    }
}
