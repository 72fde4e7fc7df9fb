use clap::{Parser, ValueEnum};
use libclickterm::app::{Activation, App};
use libclickterm::config::{Config, LoggingConfig};
use libclickterm::layout::Layout;
use std::fs::File;
use std::path::{Path, PathBuf};

#[derive(Debug, Parser)]
#[command(name = "clickterm", version, about = "Attach to the clickterm tmux session, creating it if needed")]
struct Cli {
    /// Activation event delivered by the host shell.
    #[arg(value_enum, default_value_t = Event::Launch)]
    event: Event,

    /// Launcher settings file (default: ~/.config/clickterm/config.toml).
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Event {
    Launch,
    Reopen,
}

impl From<Event> for Activation {
    fn from(event: Event) -> Self {
        match event {
            Event::Launch => Activation::Launch,
            Event::Reopen => Activation::Reopen,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let Some(layout) = Layout::discover() else {
        init_logging(&LoggingConfig::default(), None);
        log::error!("cannot determine home directory; skipping install and session launch");
        return;
    };

    // Settings are read before the logger exists; a bad file is reported right after.
    let settings_path = cli.config.unwrap_or_else(|| layout.settings_path());
    let loaded = Config::load(&settings_path);
    let logging = loaded.as_ref().map(|c| c.logging.clone()).unwrap_or_default();
    init_logging(&logging, Some(&layout));

    let config = loaded.unwrap_or_else(|e| {
        log::warn!("ignoring {}: {}; using defaults", settings_path.display(), e);
        Config::default()
    });

    App::new(config, layout).activate(cli.event.into());
}

fn init_logging(logging: &LoggingConfig, layout: Option<&Layout>) {
    let env = env_logger::Env::default().default_filter_or(logging.level.as_str());
    let mut builder = env_logger::Builder::from_env(env);

    if let (Some(file), Some(layout)) = (&logging.file, layout) {
        let path = layout.expand(file);
        match open_log_file(&path) {
            Ok(f) => {
                builder.target(env_logger::Target::Pipe(Box::new(f)));
            }
            Err(e) => eprintln!("clickterm: cannot open log file {}: {}", path.display(), e),
        }
    }

    builder.init();
}

fn open_log_file(path: &Path) -> std::io::Result<File> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::OpenOptions::new().create(true).append(true).open(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_open_log_file_creates_parent() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("Logs/clickterm.log");
        open_log_file(&path).unwrap();
        assert!(path.is_file());
    }

    #[test]
    fn test_open_log_file_reports_blocked_parent() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("Logs"), "").unwrap();
        assert!(open_log_file(&dir.path().join("Logs/clickterm.log")).is_err());
    }
}
