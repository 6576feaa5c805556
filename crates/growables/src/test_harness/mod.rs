//! # TestHost — headless harness for the growables engine
//!
//! Wraps a `bevy::app::App` with `MinimalPlugins`, the host plugin and
//! `GrowablesPlugin`. Builder methods set up prefabs, zone blocks and
//! buildings; `tick()` runs the `FixedUpdate` schedule directly.

mod extension;
mod queries;
mod setup;

pub use extension::{ExtensionJobStats, TestExtension, LVO_ROUTINE};

use bevy::app::App;
use bevy::prelude::*;

use crate::host::HostPlugin;
use crate::GrowablesPlugin;

pub struct TestHost {
    app: App,
}

impl Default for TestHost {
    fn default() -> Self {
        Self::new()
    }
}

impl TestHost {
    /// An empty host with the engine installed and startup systems run.
    pub fn new() -> Self {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.add_plugins((HostPlugin, GrowablesPlugin));
        // Startup: host patches and queue binding.
        app.update();
        Self { app }
    }

    /// A host without the engine, for checking the host routine on its own.
    pub fn host_only() -> Self {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.add_plugins(HostPlugin);
        app.update();
        Self { app }
    }

    pub fn app_mut(&mut self) -> &mut App {
        &mut self.app
    }
}
