/// Support files shipped inside the binary and materialized on first launch.

pub const SHELL_SCRIPT: &str = include_str!("../assets/scripts/clickterm-shell.sh");
pub const STATUS_SCRIPT: &str = include_str!("../assets/scripts/clickterm-status.sh");
pub const README: &str = include_str!("../assets/scripts/README.txt");
pub const TMUX_CONF: &str = include_str!("../assets/tmux.conf");

/// Bump whenever an entry is added, renamed or changed so existing installs upgrade.
pub const BUNDLE_VERSION: u32 = 1;

/// Script tmux runs as the first program of a newly created session.
pub const SESSION_ENTRY: &str = "clickterm-shell.sh";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BundleEntry {
    pub name: &'static str,
    pub contents: &'static str,
    pub executable: bool,
}

/// A dotfile installed directly under the home directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BundledConfig {
    pub file_name: &'static str,
    pub contents: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupportBundle {
    pub version: u32,
    pub entries: Vec<BundleEntry>,
    pub config: Option<BundledConfig>,
}

impl SupportBundle {
    /// The bundle compiled into this binary.
    pub fn embedded() -> Self {
        Self {
            version: BUNDLE_VERSION,
            entries: vec![
                BundleEntry { name: SESSION_ENTRY, contents: SHELL_SCRIPT, executable: true },
                BundleEntry { name: "clickterm-status.sh", contents: STATUS_SCRIPT, executable: true },
                BundleEntry { name: "README.txt", contents: README, executable: false },
            ],
            config: Some(BundledConfig { file_name: ".tmux.conf", contents: TMUX_CONF }),
        }
    }

    pub fn file_names(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.name.to_string()).collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|e| e.name == name)
    }
}
