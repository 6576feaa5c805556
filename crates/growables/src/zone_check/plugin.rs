use bevy::prelude::*;
use bevy::tasks::{ComputeTaskPool, TaskPool};

use super::{find_affected, next_transition, ZoneTransition, ZoneValidator};
use crate::classification::Plopped;
use crate::host::components::{Abandoned, Attached, Building, Condemned, Destroyed, PrefabRef};
use crate::host::icons::{IconCommand, IconPriority};
use crate::host::object_search::ObjectSearchTree;
use crate::host::prefabs::PrefabCatalog;
use crate::host::zoning::{ZoneUpdateCollect, ZoningGrid};
use crate::host::{BuildingConfiguration, ToolMode};
use crate::settings::{publish_setting_changes, SettingChanged};
use crate::simulation_sets::SimulationSet;

/// Buildings validated per task.
const VALIDATION_CHUNK: usize = 64;

#[derive(Resource, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ZoneCheckConfig {
    pub enabled: bool,
}

/// Mirrors the despawn-on-rezone toggle into [`ZoneCheckConfig`].
pub fn apply_zone_check_settings(
    mut changes: EventReader<SettingChanged>,
    mut config: ResMut<ZoneCheckConfig>,
) {
    for change in changes.read() {
        if let SettingChanged::SpawnedZoneDespawn(enabled) = *change {
            config.enabled = enabled;
        }
    }
}

type SweptStructure<'a> = (
    &'a PrefabRef,
    &'a Transform,
    Option<&'a Attached>,
    Has<Plopped>,
    Has<Condemned>,
    Has<Destroyed>,
    Has<Abandoned>,
);

#[allow(clippy::too_many_arguments)]
pub fn sweep_zone_validity(
    mut commands: Commands,
    config: Res<ZoneCheckConfig>,
    updates: Res<ZoneUpdateCollect>,
    building_config: Option<Res<BuildingConfiguration>>,
    tool_mode: Res<ToolMode>,
    catalog: Res<PrefabCatalog>,
    zoning: Res<ZoningGrid>,
    search: Res<ObjectSearchTree>,
    structures: Query<SweptStructure, With<Building>>,
    prefab_refs: Query<&PrefabRef>,
    mut icons: EventWriter<IconCommand>,
) {
    if !config.enabled || !updates.is_updated() {
        return;
    }
    let Some(building_config) = building_config else {
        return;
    };

    let affected = find_affected(updates.bounds(), search.tree(), |entity| {
        structures
            .get(entity)
            .is_ok_and(|(prefab_ref, ..)| catalog.is_growable(prefab_ref.0))
    });
    if affected.is_empty() {
        return;
    }

    let validator = ZoneValidator {
        catalog: &catalog,
        zoning: &zoning,
        editor: tool_mode.editor,
    };
    let structures = &structures;
    let prefab_refs = &prefab_refs;
    let transitions: Vec<Vec<(Entity, ZoneTransition)>> =
        ComputeTaskPool::get_or_init(TaskPool::default).scope(|scope| {
            for chunk in affected.chunks(VALIDATION_CHUNK) {
                scope.spawn(async move {
                    chunk
                        .iter()
                        .filter_map(|&entity| {
                            let (prefab_ref, transform, attached, plopped, condemned, destroyed, abandoned) =
                                structures.get(entity).ok()?;
                            if plopped {
                                return None;
                            }
                            let prefab = validator.catalog.building(prefab_ref.0)?;
                            let parent = attached
                                .and_then(|attached| prefab_refs.get(attached.parent).ok())
                                .and_then(|parent| validator.catalog.building(parent.0));
                            let valid = validator.is_valid(prefab, transform, parent);
                            next_transition(valid, condemned, destroyed || abandoned)
                                .map(|transition| (entity, transition))
                        })
                        .collect()
                });
            }
        });

    let mut condemned = 0;
    let mut reprieved = 0;
    for (entity, transition) in transitions.into_iter().flatten() {
        match transition {
            ZoneTransition::Condemn { notify } => {
                commands.entity(entity).insert(Condemned);
                if notify {
                    icons.send(IconCommand::Add {
                        owner: entity,
                        icon: building_config.condemned_notification,
                        priority: IconPriority::FatalProblem,
                    });
                }
                condemned += 1;
            }
            ZoneTransition::Reprieve => {
                commands.entity(entity).remove::<Condemned>();
                icons.send(IconCommand::Remove {
                    owner: entity,
                    icon: building_config.condemned_notification,
                });
                reprieved += 1;
            }
        }
    }
    if condemned + reprieved > 0 {
        debug!(
            "Zone sweep over {} buildings: {} condemned, {} reprieved",
            affected.len(),
            condemned,
            reprieved
        );
    }
}

pub struct ZoneCheckPlugin;

impl Plugin for ZoneCheckPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ZoneCheckConfig>()
            .add_systems(
                FixedUpdate,
                apply_zone_check_settings
                    .after(publish_setting_changes)
                    .in_set(SimulationSet::Classify),
            )
            .add_systems(
                FixedUpdate,
                sweep_zone_validity.in_set(SimulationSet::ZoneCheck),
            );
    }
}
