/// Session launcher: hands the terminal a one-shot script that attaches to the
/// named tmux session, creating it first if needed.
///
/// Create-if-absent is a single `tmux new-session -A` call. There is no separate
/// `has-session` probe, so repeated or concurrent launches converge on one session.

use crate::bundle::SESSION_ENTRY;
use crate::config::Config;
use crate::error::LaunchError;
use crate::layout::Layout;
use crate::spawn::Spawner;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// The generated launch script, not yet on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchRequest {
    script: String,
}

impl LaunchRequest {
    pub fn build(config: &Config, layout: &Layout) -> Self {
        let quote = |s: &str| shell_words::quote(s).into_owned();

        let working_dir = layout.expand(&config.session.working_dir);
        let entry = layout.install_dir().join(SESSION_ENTRY);
        // tmux runs the session command through `sh -c`, so it is quoted twice.
        let entry_cmd = quote(&quote(&entry.to_string_lossy()));

        let mut script = String::from("#!/bin/sh\n# Generated by clickterm; removes itself once started.\nrm -f -- \"$0\"\n");
        if !config.multiplexer.search_path.is_empty() {
            script.push_str("PATH=\"$PATH\"");
            for dir in &config.multiplexer.search_path {
                script.push(':');
                script.push_str(&quote(&layout.expand(dir).to_string_lossy()));
            }
            script.push_str("\nexport PATH\n");
        }
        script.push_str(&format!(
            "cd {} 2>/dev/null || cd \"$HOME\"\n",
            quote(&working_dir.to_string_lossy())
        ));
        script.push_str(&format!(
            "exec {} new-session -A -s {} {}\n",
            quote(&config.multiplexer.program),
            quote(&config.session.name),
            entry_cmd
        ));
        Self { script }
    }

    pub fn contents(&self) -> &str {
        &self.script
    }

    /// Write the script under a unique name in `dir` and keep it past our exit.
    pub fn persist(&self, dir: &Path) -> Result<PathBuf, LaunchError> {
        let write_err = |source| LaunchError::WriteScript { dir: dir.to_path_buf(), source };

        fs::create_dir_all(dir).map_err(write_err)?;
        let mut file = tempfile::Builder::new()
            .prefix("clickterm-")
            .suffix(".command")
            .tempfile_in(dir)
            .map_err(write_err)?;
        file.write_all(self.script.as_bytes()).map_err(write_err)?;
        file.flush().map_err(write_err)?;
        make_executable(file.path()).map_err(write_err)?;

        let (_, path) = file.keep().map_err(|e| write_err(e.error))?;
        Ok(path)
    }
}

#[cfg(unix)]
fn make_executable(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o700))
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) -> std::io::Result<()> {
    Ok(())
}

pub struct SessionLauncher<'a, S: Spawner> {
    config: &'a Config,
    layout: &'a Layout,
    spawner: S,
}

impl<'a, S: Spawner> SessionLauncher<'a, S> {
    pub fn new(config: &'a Config, layout: &'a Layout, spawner: S) -> Self {
        Self { config, layout, spawner }
    }

    /// Best-effort launch: failures are logged, never returned.
    pub fn launch_or_attach(&self) {
        match self.try_launch() {
            Ok(script) => log::info!(
                "requested {} to attach session '{}' via {}",
                self.config.terminal.app,
                self.config.session.name,
                script.display()
            ),
            Err(e) => log::error!("failed to launch session '{}': {}", self.config.session.name, e),
        }
    }

    pub fn try_launch(&self) -> Result<PathBuf, LaunchError> {
        let request = LaunchRequest::build(self.config, self.layout);
        let script = request.persist(&self.scratch_dir())?;
        log::debug!("wrote launch script {}", script.display());

        let (program, args) = match self.open_command(&script) {
            Ok(command) => command,
            Err(e) => {
                discard(&script);
                return Err(e);
            }
        };
        if let Err(source) = self.spawner.spawn_detached(&program, &args) {
            discard(&script);
            return Err(LaunchError::Spawn { program, source });
        }
        Ok(script)
    }

    fn scratch_dir(&self) -> PathBuf {
        match &self.config.terminal.scratch_dir {
            Some(dir) => self.layout.expand(dir),
            None => std::env::temp_dir(),
        }
    }

    fn open_command(&self, script: &Path) -> Result<(String, Vec<String>), LaunchError> {
        let app = &self.config.terminal.app;
        let script = script.to_string_lossy();
        let mut parts = self.config.terminal.open_command.iter()
            .map(|arg| arg.replace("{app}", app).replace("{script}", &script));
        let program = parts.next().ok_or(LaunchError::EmptyOpenCommand)?;
        Ok((program, parts.collect()))
    }
}

fn discard(script: &Path) {
    if let Err(e) = fs::remove_file(script) {
        log::warn!("failed to remove unused launch script {}: {}", script.display(), e);
    }
}
