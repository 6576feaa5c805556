use bevy::prelude::*;

use super::{bind_builtin_queues, process_downgrades, process_upgrades, LevelQueues, LevelTickLedger};
use crate::settings::{publish_setting_changes, SettingChanged};
use crate::simulation_sets::SimulationSet;

/// The engine's cached copy of the levelling toggles.
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LevellingConfig {
    pub disable_levelling: bool,
    pub disable_abandonment: bool,
}

/// Mirrors levelling and abandonment toggles into [`LevellingConfig`].
pub fn apply_levelling_settings(
    mut changes: EventReader<SettingChanged>,
    mut config: ResMut<LevellingConfig>,
) {
    for change in changes.read() {
        match *change {
            SettingChanged::DisableLevelling(disabled) => config.disable_levelling = disabled,
            SettingChanged::DisableAbandonment(disabled) => config.disable_abandonment = disabled,
            _ => {}
        }
    }
}

pub struct LevellingPlugin;

impl Plugin for LevellingPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<LevellingConfig>()
            .init_resource::<LevelQueues>()
            .init_resource::<LevelTickLedger>()
            .add_systems(Startup, bind_builtin_queues)
            .add_systems(
                FixedUpdate,
                apply_levelling_settings
                    .after(publish_setting_changes)
                    .in_set(SimulationSet::Classify),
            )
            .add_systems(
                FixedUpdate,
                (process_upgrades, process_downgrades)
                    .chain()
                    .in_set(SimulationSet::Levelling),
            );
    }
}
