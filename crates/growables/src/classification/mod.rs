//! Classification tags the engine writes onto buildings, the systems that
//! assign them, and the bulk admin operations over them.
//!
//! The tags are plain markers, so the host's entity serialization persists
//! them without any help from the engine.

mod admin;
mod tagging;

pub use admin::{handle_admin_commands, AdminCommand};
pub use tagging::{
    apply_placement_settings, tag_existing_buildings, tag_plopped_buildings,
    tag_spawned_buildings, toggle_level_lock, PlacementConfig, ToggleLevelLock,
};

use bevy::prelude::*;

use crate::host::components::{
    Building, CommercialProperty, IndustrialProperty, PrefabRef, ResidentialProperty,
};
use crate::host::prefabs::PrefabCatalog;
use crate::settings::publish_setting_changes;
use crate::simulation_sets::SimulationSet;

/// Grown by the zone spawner.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Spawned;

/// Placed directly by the player; exempt from zone-driven condemnation.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Plopped;

/// Exempt from automatic level changes in either direction.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LevelLocked;

/// Buildings that hold residential, commercial or industrial property.
pub type PropertyBuilding = (
    With<Building>,
    Or<(
        With<ResidentialProperty>,
        With<CommercialProperty>,
        With<IndustrialProperty>,
    )>,
);

/// Signature landmarks never take part in classification.
pub(crate) fn is_signature(catalog: &PrefabCatalog, prefab_ref: &PrefabRef) -> bool {
    catalog
        .building(prefab_ref.0)
        .is_some_and(|prefab| prefab.signature)
}

pub struct ClassificationPlugin;

impl Plugin for ClassificationPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PlacementConfig>()
            .add_event::<ToggleLevelLock>()
            .add_event::<AdminCommand>()
            .add_systems(
                FixedUpdate,
                (
                    apply_placement_settings.after(publish_setting_changes),
                    (
                        tag_existing_buildings,
                        tag_spawned_buildings,
                        tag_plopped_buildings,
                    )
                        .chain()
                        .after(apply_placement_settings),
                    toggle_level_lock,
                    handle_admin_commands,
                )
                    .in_set(SimulationSet::Classify),
            );
    }
}
