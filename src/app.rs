/// Activation handling: every launch or dock-reopen installs (if needed), then
/// attaches to the session.

use crate::bundle::SupportBundle;
use crate::config::Config;
use crate::install::{InstallState, Installer};
use crate::launcher::SessionLauncher;
use crate::layout::Layout;
use crate::spawn::{DetachedSpawner, Spawner};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    /// Application started.
    Launch,
    /// Dock icon clicked while already running.
    Reopen,
}

pub struct App<S: Spawner = DetachedSpawner> {
    config: Config,
    layout: Layout,
    bundle: SupportBundle,
    spawner: S,
}

impl App {
    pub fn new(config: Config, layout: Layout) -> Self {
        Self::with_parts(config, layout, SupportBundle::embedded(), DetachedSpawner)
    }
}

impl<S: Spawner> App<S> {
    pub fn with_parts(config: Config, layout: Layout, bundle: SupportBundle, spawner: S) -> Self {
        Self { config, layout, bundle, spawner }
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Installer always finishes (or logs its failure) before the launcher starts.
    pub fn activate(&self, event: Activation) {
        log::debug!("activation: {:?}", event);

        let state = InstallState::probe(&self.layout);
        Installer::new(&self.layout, &self.bundle).ensure_installed(&state);

        SessionLauncher::new(&self.config, &self.layout, &self.spawner).launch_or_attach();
    }
}
