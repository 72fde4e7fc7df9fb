/// Filesystem layout under the user's home directory.
///
/// Everything clickterm writes is derived from a single home path, so tests can
/// point a `Layout` at a scratch directory.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

const INSTALL_SUBDIR: &str = ".config/clickterm";
const MANIFEST_NAME: &str = ".manifest.json";
const SETTINGS_NAME: &str = "config.toml";
const BACKUP_SUFFIX: &str = ".backup";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    home: PathBuf,
}

impl Layout {
    pub fn new(home: impl Into<PathBuf>) -> Self {
        Self { home: home.into() }
    }

    /// Layout for the current user, if a home directory can be determined.
    pub fn discover() -> Option<Self> {
        dirs::home_dir().map(Self::new)
    }

    pub fn home(&self) -> &Path {
        &self.home
    }

    /// `~/.config/clickterm`
    pub fn install_dir(&self) -> PathBuf {
        self.home.join(INSTALL_SUBDIR)
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.install_dir().join(MANIFEST_NAME)
    }

    /// Launcher settings. Not part of the bundle, so installs never touch it.
    pub fn settings_path(&self) -> PathBuf {
        self.install_dir().join(SETTINGS_NAME)
    }

    /// Where a bundled dotfile lands, e.g. `~/.tmux.conf`.
    pub fn dotfile_path(&self, file_name: &str) -> PathBuf {
        self.home.join(file_name)
    }

    /// Expand a leading `~` against this layout's home.
    pub fn expand(&self, raw: &str) -> PathBuf {
        if raw == "~" {
            self.home.clone()
        } else if let Some(rest) = raw.strip_prefix("~/") {
            self.home.join(rest)
        } else {
            PathBuf::from(raw)
        }
    }
}

/// The single backup slot for `path`: same path with `.backup` appended.
pub fn backup_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(BACKUP_SUFFIX);
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_install_dir() {
        let layout = Layout::new("/home/u");
        assert_eq!(layout.install_dir(), PathBuf::from("/home/u/.config/clickterm"));
        assert_eq!(layout.manifest_path(), PathBuf::from("/home/u/.config/clickterm/.manifest.json"));
        assert_eq!(layout.settings_path(), PathBuf::from("/home/u/.config/clickterm/config.toml"));
    }

    #[test]
    fn test_dotfile_and_backup() {
        let layout = Layout::new("/home/u");
        let conf = layout.dotfile_path(".tmux.conf");
        assert_eq!(conf, PathBuf::from("/home/u/.tmux.conf"));
        assert_eq!(backup_path(&conf), PathBuf::from("/home/u/.tmux.conf.backup"));
    }

    #[test]
    fn test_expand_tilde() {
        let layout = Layout::new("/home/u");
        assert_eq!(layout.expand("~"), PathBuf::from("/home/u"));
        assert_eq!(layout.expand("~/Developers/x"), PathBuf::from("/home/u/Developers/x"));
        assert_eq!(layout.expand("/opt/x"), PathBuf::from("/opt/x"));
        assert_eq!(layout.expand("~other/x"), PathBuf::from("~other/x"));
    }
}
