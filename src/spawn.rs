/// Fire-and-forget process handoff.

use std::io;
use std::process::{Command, Stdio};

/// Starts an external program without waiting on it.
pub trait Spawner {
    /// Returns once the child has been started. There is no result channel.
    fn spawn_detached(&self, program: &str, args: &[String]) -> io::Result<()>;
}

impl<S: Spawner + ?Sized> Spawner for &S {
    fn spawn_detached(&self, program: &str, args: &[String]) -> io::Result<()> {
        (**self).spawn_detached(program, args)
    }
}

/// Spawns the child in its own session with null stdio, so it outlives the launcher
/// and never writes into whatever terminal started us.
#[derive(Debug, Default, Clone, Copy)]
pub struct DetachedSpawner;

impl Spawner for DetachedSpawner {
    fn spawn_detached(&self, program: &str, args: &[String]) -> io::Result<()> {
        let mut cmd = Command::new(program);
        cmd.args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            // tmux refuses to nest when started from inside another session
            .env_remove("TMUX");

        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            // SAFETY: setsid is async-signal-safe and touches no parent state.
            unsafe {
                cmd.pre_exec(|| {
                    nix::unistd::setsid().map(|_| ()).map_err(io::Error::from)
                });
            }
        }

        let child = cmd.spawn()?;
        log::debug!("spawned `{}` (pid {})", program, child.id());
        Ok(())
    }
}
