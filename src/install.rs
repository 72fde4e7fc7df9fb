/// Installer: materializes the support bundle into `~/.config/clickterm` and puts
/// the bundled tmux config in place, backing up whatever was there before.
///
/// Whether to install is decided by an [`InstallState`] probed once per activation.
/// The manifest that records a finished install is written last, so an install that
/// fails halfway is retried on the next activation.

use crate::bundle::{BundleEntry, BundledConfig, SupportBundle};
use crate::error::InstallError;
use crate::layout::{backup_path, Layout};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallManifest {
    pub version: u32,
    pub files: Vec<String>,
}

impl InstallManifest {
    pub fn save(&self, path: &Path) -> Result<(), InstallError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)
            .map_err(|source| InstallError::WriteFile { path: path.to_path_buf(), source })
    }

    pub fn load(path: &Path) -> std::io::Result<Self> {
        let json = fs::read_to_string(path)?;
        serde_json::from_str(&json)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    }
}

/// What is on disk before an activation does anything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallState {
    /// No install directory at all.
    Fresh,
    /// Directory exists without a readable manifest: a legacy or interrupted install.
    Unversioned,
    Installed(InstallManifest),
}

impl InstallState {
    pub fn probe(layout: &Layout) -> Self {
        if !layout.install_dir().is_dir() {
            return Self::Fresh;
        }
        match InstallManifest::load(&layout.manifest_path()) {
            Ok(manifest) => Self::Installed(manifest),
            Err(e) => {
                if e.kind() != std::io::ErrorKind::NotFound {
                    log::warn!("ignoring unreadable install manifest: {}", e);
                }
                Self::Unversioned
            }
        }
    }

    /// Install runs iff the installed version is older than the bundle.
    pub fn needs_install(&self, bundle_version: u32) -> bool {
        match self {
            Self::Installed(manifest) => manifest.version < bundle_version,
            Self::Fresh | Self::Unversioned => true,
        }
    }

    fn previous_files(&self) -> &[String] {
        match self {
            Self::Installed(manifest) => &manifest.files,
            Self::Fresh | Self::Unversioned => &[],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigOutcome {
    NotBundled,
    /// Live file already matches the bundled content.
    Unchanged,
    Created,
    Replaced { backup: PathBuf },
    /// Install dir already existed, so the dotfile and its backup slot were left alone.
    Kept,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallOutcome {
    UpToDate,
    Installed { files: Vec<PathBuf>, config: ConfigOutcome },
}

pub struct Installer<'a> {
    layout: &'a Layout,
    bundle: &'a SupportBundle,
}

impl<'a> Installer<'a> {
    pub fn new(layout: &'a Layout, bundle: &'a SupportBundle) -> Self {
        Self { layout, bundle }
    }

    /// Install if needed, logging and swallowing any failure so the launcher still runs.
    pub fn ensure_installed(&self, state: &InstallState) {
        match self.install(state) {
            Ok(InstallOutcome::UpToDate) => {
                log::debug!("support files up to date (bundle v{})", self.bundle.version);
            }
            Ok(InstallOutcome::Installed { files, config }) => {
                log::info!(
                    "installed {} support files into {} (bundle v{})",
                    files.len(),
                    self.layout.install_dir().display(),
                    self.bundle.version
                );
                if let ConfigOutcome::Replaced { backup } = &config {
                    log::info!("previous config saved to {}", backup.display());
                }
            }
            Err(e) => log::error!("failed to install support files: {}", e),
        }
    }

    pub fn install(&self, state: &InstallState) -> Result<InstallOutcome, InstallError> {
        if !state.needs_install(self.bundle.version) {
            return Ok(InstallOutcome::UpToDate);
        }

        let dir = self.layout.install_dir();
        fs::create_dir_all(&dir)
            .map_err(|source| InstallError::CreateDir { path: dir.clone(), source })?;

        let mut files = Vec::with_capacity(self.bundle.entries.len());
        for entry in &self.bundle.entries {
            files.push(write_entry(&dir, entry)?);
        }

        // An earlier install already moved the user's own config aside; renaming again
        // would replace that backup with our previously bundled file.
        let config = match (&self.bundle.config, state) {
            (None, _) => ConfigOutcome::NotBundled,
            (Some(bundled), InstallState::Fresh) => self.install_config(bundled)?,
            (Some(_), InstallState::Unversioned | InstallState::Installed(_)) => ConfigOutcome::Kept,
        };

        self.remove_stale(state.previous_files());

        InstallManifest { version: self.bundle.version, files: self.bundle.file_names() }
            .save(&self.layout.manifest_path())?;

        Ok(InstallOutcome::Installed { files, config })
    }

    fn install_config(&self, bundled: &BundledConfig) -> Result<ConfigOutcome, InstallError> {
        let path = self.layout.dotfile_path(bundled.file_name);
        // symlink_metadata so a dangling dotfile symlink still counts as present
        let outcome = if fs::symlink_metadata(&path).is_ok() {
            if fs::read(&path).is_ok_and(|current| current == bundled.contents.as_bytes()) {
                return Ok(ConfigOutcome::Unchanged);
            }
            let backup = backup_path(&path);
            // rename replaces any earlier backup: there is a single slot
            fs::rename(&path, &backup).map_err(|source| InstallError::Backup {
                path: path.clone(),
                backup: backup.clone(),
                source,
            })?;
            ConfigOutcome::Replaced { backup }
        } else {
            ConfigOutcome::Created
        };

        fs::write(&path, bundled.contents)
            .map_err(|source| InstallError::WriteFile { path, source })?;
        Ok(outcome)
    }

    fn remove_stale(&self, previous: &[String]) {
        let dir = self.layout.install_dir();
        for name in previous.iter().filter(|name| !self.bundle.contains(name)) {
            // Manifest contents are not trusted to stay inside the install dir.
            if name.contains('/') || name.starts_with('.') {
                continue;
            }
            let path = dir.join(name);
            match fs::remove_file(&path) {
                Ok(()) => log::info!("removed stale support file {}", path.display()),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => log::warn!("failed to remove stale {}: {}", path.display(), e),
            }
        }
    }
}

fn write_entry(dir: &Path, entry: &BundleEntry) -> Result<PathBuf, InstallError> {
    let path = dir.join(entry.name);
    fs::write(&path, entry.contents)
        .map_err(|source| InstallError::WriteFile { path: path.clone(), source })?;
    set_mode(&path, if entry.executable { 0o755 } else { 0o644 })?;
    Ok(path)
}

#[cfg(unix)]
fn set_mode(path: &Path, mode: u32) -> Result<(), InstallError> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(mode))
        .map_err(|source| InstallError::SetPermissions { path: path.to_path_buf(), source })
}

#[cfg(not(unix))]
fn set_mode(_path: &Path, _mode: u32) -> Result<(), InstallError> {
    Ok(())
}
