/// Typed errors for the installer, the session launcher and config loading.
///
/// None of these reach the user: the component entry points log them and carry on.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum InstallError {
    #[error("failed to create install directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    WriteFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to set permissions on {path}: {source}")]
    SetPermissions {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The existing config could not be moved to the backup slot, so it was left in place.
    #[error("failed to back up {path} to {backup}: {source}")]
    Backup {
        path: PathBuf,
        backup: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode install manifest: {0}")]
    ManifestEncode(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("failed to write launch script in {dir}: {source}")]
    WriteScript {
        dir: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("open command is empty")]
    EmptyOpenCommand,

    #[error("failed to spawn `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid setting: {0}")]
    Invalid(String),
}
