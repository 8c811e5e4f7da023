//! Release artifacts the SD card is built from

use std::path::{Path, PathBuf};

/// Role an artifact plays on the provisioned card
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    /// SD installer archive carrying the card's file tree and the U-Boot image
    Installer,
    /// Main MiSTer executable
    Executable,
    /// Menu core bitstream
    MenuCore,
}

impl ArtifactKind {
    /// Directory inside the scratch directory the artifact is extracted to,
    /// for artifacts that are archives
    pub fn extract_dir(self) -> Option<&'static str> {
        match self {
            ArtifactKind::Installer => Some("installer"),
            ArtifactKind::Executable | ArtifactKind::MenuCore => None,
        }
    }
}

/// Where an artifact is published
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactSpec {
    pub kind: ArtifactKind,
    pub repository: String,
    /// Path prefix that release files share
    pub prefix: String,
}

impl ArtifactSpec {
    pub fn new(kind: ArtifactKind, repository: &str, prefix: &str) -> Self {
        Self {
            kind,
            repository: repository.to_string(),
            prefix: prefix.to_string(),
        }
    }
}

/// The three artifacts a card needs, fetched in declaration order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactSet {
    pub installer: ArtifactSpec,
    pub executable: ArtifactSpec,
    pub menu_core: ArtifactSpec,
}

impl Default for ArtifactSet {
    fn default() -> Self {
        Self {
            installer: ArtifactSpec::new(
                ArtifactKind::Installer,
                "SD-Installer-Win64_MiSTer",
                "release",
            ),
            executable: ArtifactSpec::new(ArtifactKind::Executable, "Main_MiSTer", "releases/MiSTer"),
            menu_core: ArtifactSpec::new(ArtifactKind::MenuCore, "Menu_MiSTer", "releases/menu"),
        }
    }
}

impl ArtifactSet {
    pub fn iter(&self) -> impl Iterator<Item = &ArtifactSpec> {
        [&self.installer, &self.executable, &self.menu_core].into_iter()
    }
}

/// A downloaded artifact living in the scratch directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedArtifact {
    pub source_url: String,
    pub local_path: PathBuf,
    pub extracted_path: Option<PathBuf>,
}

impl ResolvedArtifact {
    /// Extracted tree for archives, the downloaded file otherwise
    pub fn contents(&self) -> &Path {
        self.extracted_path.as_deref().unwrap_or(&self.local_path)
    }
}

/// File name a URL points to
pub fn file_name_from_url(url: &str) -> &str {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    path.rsplit('/').next().unwrap_or(path)
}

/// All artifacts of a run, after download and extraction
#[derive(Debug, Clone)]
pub struct FetchedArtifacts {
    pub installer: ResolvedArtifact,
    pub executable: ResolvedArtifact,
    pub menu_core: ResolvedArtifact,
}

impl FetchedArtifacts {
    /// Directory whose contents are copied to the data volume
    pub fn installer_files(&self) -> PathBuf {
        self.installer.contents().join("files")
    }

    /// U-Boot image shipped inside the installer
    pub fn boot_image(&self) -> PathBuf {
        self.installer_files().join("linux").join("uboot.img")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_artifacts_order() {
        let set = ArtifactSet::default();
        let repos: Vec<&str> = set.iter().map(|a| a.repository.as_str()).collect();
        assert_eq!(
            repos,
            ["SD-Installer-Win64_MiSTer", "Main_MiSTer", "Menu_MiSTer"]
        );
    }

    #[test]
    fn test_only_installer_is_extracted() {
        assert_eq!(ArtifactKind::Installer.extract_dir(), Some("installer"));
        assert_eq!(ArtifactKind::Executable.extract_dir(), None);
        assert_eq!(ArtifactKind::MenuCore.extract_dir(), None);
    }

    #[test]
    fn test_file_name_from_url() {
        assert_eq!(
            file_name_from_url("https://github.com/o/r/raw/master/releases/MiSTer_20240125"),
            "MiSTer_20240125"
        );
        assert_eq!(
            file_name_from_url("https://example.com/release.rar?download=1"),
            "release.rar"
        );
    }

    #[test]
    fn test_installer_paths() {
        let installer = ResolvedArtifact {
            source_url: "u".to_string(),
            local_path: PathBuf::from("mw_temp/release.rar"),
            extracted_path: Some(PathBuf::from("mw_temp/installer")),
        };
        let plain = ResolvedArtifact {
            source_url: "u".to_string(),
            local_path: PathBuf::from("mw_temp/MiSTer"),
            extracted_path: None,
        };
        let fetched = FetchedArtifacts {
            installer,
            executable: plain.clone(),
            menu_core: plain,
        };
        assert_eq!(
            fetched.installer_files(),
            PathBuf::from("mw_temp/installer/files")
        );
        assert_eq!(
            fetched.boot_image(),
            PathBuf::from("mw_temp/installer/files/linux/uboot.img")
        );
        assert_eq!(fetched.executable.contents(), Path::new("mw_temp/MiSTer"));
    }
}
