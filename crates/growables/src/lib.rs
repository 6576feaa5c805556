//! Level transitions, zone validity and classification for growable
//! buildings, plus the host simulation they plug into.
//!
//! `GrowablesPlugin` adds the engine; `host::HostPlugin` adds the host. Both
//! schedule their systems in `FixedUpdate` under [`SimulationSet`].

pub mod classification;
pub mod config;
pub mod error;
pub mod host;
pub mod interception;
pub mod levelling;
pub mod settings;
pub mod sim_rng;
pub mod simulation_sets;
pub mod spatial;
pub mod zone_check;

#[cfg(any(test, feature = "bench"))]
pub mod test_harness;

use bevy::prelude::*;

pub use simulation_sets::SimulationSet;

pub struct GrowablesPlugin;

impl Plugin for GrowablesPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins((
            simulation_sets::SimulationSetsPlugin,
            sim_rng::SimRngPlugin,
            settings::SettingsPlugin,
            classification::ClassificationPlugin,
            levelling::LevellingPlugin,
            zone_check::ZoneCheckPlugin,
            interception::InterceptionPlugin,
        ));
    }
}
