/// Launcher settings: TOML-based with sensible defaults.
/// Settings file: `~/.config/clickterm/config.toml`

use crate::error::ConfigError;
use serde::Deserialize;
use std::path::Path;

pub const DEFAULT_SESSION_NAME: &str = "clickterm";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub session: SessionConfig,
    pub multiplexer: MultiplexerConfig,
    pub terminal: TerminalConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub name: String,
    /// `~` is expanded against the home directory.
    pub working_dir: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MultiplexerConfig {
    pub program: String,
    /// Appended to `PATH` in the launch script; dock-started apps get a minimal `PATH`.
    pub search_path: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TerminalConfig {
    pub app: String,
    /// Program and arguments; `{app}` and `{script}` are substituted.
    pub open_command: Vec<String>,
    /// Where launch scripts are written. Defaults to the system temp dir.
    pub scratch_dir: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub file: Option<String>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_SESSION_NAME.into(),
            working_dir: "~/Developers/tmux-clickterm".into(),
        }
    }
}

impl Default for MultiplexerConfig {
    fn default() -> Self {
        Self {
            program: "tmux".into(),
            search_path: vec!["/opt/homebrew/bin".into(), "/usr/local/bin".into()],
        }
    }
}

impl Default for TerminalConfig {
    fn default() -> Self {
        Self {
            app: "iTerm".into(),
            open_command: default_open_command(),
            scratch_dir: None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".into(), file: None }
    }
}

#[cfg(target_os = "macos")]
fn default_open_command() -> Vec<String> {
    // `open -a` hands the file to a running instance instead of starting another.
    ["open", "-a", "{app}", "{script}"].map(String::from).to_vec()
}

#[cfg(not(target_os = "macos"))]
fn default_open_command() -> Vec<String> {
    ["x-terminal-emulator", "-e", "{script}"].map(String::from).to_vec()
}

impl Config {
    /// Load and validate settings from `path`. A missing file yields defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(contents) => Self::parse(&contents),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(source) => Err(ConfigError::Read { path: path.to_path_buf(), source }),
        }
    }

    /// Parse and validate settings from a TOML string.
    pub fn parse(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let name = &self.session.name;
        if name.trim().is_empty() {
            return Err(ConfigError::Invalid("session.name is empty".into()));
        }
        // tmux rewrites these in session names, which would break `-s` matching.
        if name.contains([':', '.']) {
            return Err(ConfigError::Invalid(format!(
                "session.name {name:?} must not contain ':' or '.'"
            )));
        }
        if self.multiplexer.program.trim().is_empty() {
            return Err(ConfigError::Invalid("multiplexer.program is empty".into()));
        }
        if self.terminal.open_command.is_empty() {
            return Err(ConfigError::Invalid("terminal.open_command is empty".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let cfg = Config::default();
        assert_eq!(cfg.session.name, "clickterm");
        assert_eq!(cfg.session.working_dir, "~/Developers/tmux-clickterm");
        assert_eq!(cfg.multiplexer.program, "tmux");
        assert_eq!(cfg.terminal.app, "iTerm");
        assert!(cfg.terminal.open_command.iter().any(|a| a == "{script}"));
        assert_eq!(cfg.logging.level, "info");
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_parse_empty_toml() {
        let cfg = Config::parse("").unwrap();
        assert_eq!(cfg.session.name, "clickterm");
        assert!(cfg.terminal.scratch_dir.is_none());
    }

    #[test]
    fn test_parse_partial_toml() {
        let cfg = Config::parse(r#"
            [session]
            working_dir = "~/src"

            [terminal]
            app = "Terminal"
        "#).unwrap();
        assert_eq!(cfg.session.working_dir, "~/src");
        assert_eq!(cfg.terminal.app, "Terminal");
        // Defaults preserved for unset fields
        assert_eq!(cfg.session.name, "clickterm");
        assert_eq!(cfg.multiplexer.program, "tmux");
    }

    #[test]
    fn test_parse_full_toml() {
        let cfg = Config::parse(r#"
            [session]
            name = "work"
            working_dir = "/srv/work"

            [multiplexer]
            program = "/usr/bin/tmux"
            search_path = []

            [terminal]
            app = "WezTerm"
            open_command = ["wezterm", "start", "--", "{script}"]
            scratch_dir = "~/tmp"

            [logging]
            level = "debug"
            file = "~/Library/Logs/clickterm.log"
        "#).unwrap();
        assert_eq!(cfg.session.name, "work");
        assert_eq!(cfg.multiplexer.program, "/usr/bin/tmux");
        assert!(cfg.multiplexer.search_path.is_empty());
        assert_eq!(cfg.terminal.open_command.len(), 4);
        assert_eq!(cfg.terminal.scratch_dir.as_deref(), Some("~/tmp"));
        assert_eq!(cfg.logging.level, "debug");
        assert_eq!(cfg.logging.file.as_deref(), Some("~/Library/Logs/clickterm.log"));
    }

    #[test]
    fn test_invalid_toml_is_error() {
        let err = Config::parse("this is not valid toml {{{}}}").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_rejects_bad_session_names() {
        for name in ["", "  ", "a:b", "a.b"] {
            let toml = format!("[session]\nname = {name:?}\n");
            let err = Config::parse(&toml).unwrap_err();
            assert!(matches!(err, ConfigError::Invalid(_)), "{name:?}");
        }
    }

    #[test]
    fn test_rejects_empty_open_command() {
        let err = Config::parse("[terminal]\nopen_command = []\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let cfg = Config::load(&dir.path().join("config.toml")).unwrap();
        assert_eq!(cfg.session.name, "clickterm");
    }

    #[test]
    fn test_load_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[session]\nname = \"dev\"\n").unwrap();
        assert_eq!(Config::load(&path).unwrap().session.name, "dev");
    }
}
