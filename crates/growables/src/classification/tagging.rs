use bevy::ecs::entity::EntityHashMap;
use bevy::prelude::*;

use super::{is_signature, LevelLocked, Plopped, PropertyBuilding, Spawned};
use crate::host::components::{Building, Created, PrefabRef, UnderConstruction};
use crate::host::events::SessionLoaded;
use crate::host::prefabs::PrefabCatalog;
use crate::settings::SettingChanged;

#[derive(Resource, Debug, Default, Clone, Copy)]
pub struct PlacementConfig {
    pub lock_plopped_buildings: bool,
}

/// Flip the level lock of the selected building.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToggleLevelLock(pub Entity);

pub fn apply_placement_settings(
    mut changes: EventReader<SettingChanged>,
    mut config: ResMut<PlacementConfig>,
) {
    for change in changes.read() {
        if let SettingChanged::LockPloppedBuildings(lock) = *change {
            config.lock_plopped_buildings = lock;
        }
    }
}

/// After a save loads, every untagged property building counts as spawned.
pub fn tag_existing_buildings(
    mut commands: Commands,
    mut loads: EventReader<SessionLoaded>,
    catalog: Res<PrefabCatalog>,
    untagged: Query<(Entity, &PrefabRef), (PropertyBuilding, Without<Spawned>, Without<Plopped>)>,
) {
    if loads.read().count() == 0 {
        return;
    }
    let mut tagged = 0;
    for (entity, prefab_ref) in &untagged {
        if is_signature(&catalog, prefab_ref) {
            continue;
        }
        commands.entity(entity).insert(Spawned);
        tagged += 1;
    }
    info!("Tagged {} existing buildings as spawned", tagged);
}

pub fn tag_spawned_buildings(
    mut commands: Commands,
    catalog: Res<PrefabCatalog>,
    growing: Query<
        (Entity, &PrefabRef),
        (
            PropertyBuilding,
            With<UnderConstruction>,
            Without<Spawned>,
            Without<Plopped>,
        ),
    >,
) {
    for (entity, prefab_ref) in &growing {
        if !is_signature(&catalog, prefab_ref) {
            commands.entity(entity).insert(Spawned);
        }
    }
}

/// Buildings created this frame without going through construction were
/// placed by the player.
pub fn tag_plopped_buildings(
    mut commands: Commands,
    config: Res<PlacementConfig>,
    catalog: Res<PrefabCatalog>,
    placed: Query<
        (Entity, &PrefabRef),
        (
            PropertyBuilding,
            With<Created>,
            Without<UnderConstruction>,
            Without<Spawned>,
            Without<Plopped>,
        ),
    >,
) {
    for (entity, prefab_ref) in &placed {
        if is_signature(&catalog, prefab_ref) {
            continue;
        }
        let mut building = commands.entity(entity);
        building.insert(Plopped);
        if config.lock_plopped_buildings {
            building.insert(LevelLocked);
        }
    }
}

pub fn toggle_level_lock(
    mut commands: Commands,
    mut requests: EventReader<ToggleLevelLock>,
    buildings: Query<Has<LevelLocked>, With<Building>>,
) {
    // Several toggles of one building in a frame must compose.
    let mut pending: EntityHashMap<bool> = EntityHashMap::default();
    for &ToggleLevelLock(entity) in requests.read() {
        let Ok(queried) = buildings.get(entity) else {
            warn!("Ignoring level lock toggle for non-building {:?}", entity);
            continue;
        };
        let locked = pending.get(&entity).copied().unwrap_or(queried);
        if locked {
            commands.entity(entity).remove::<LevelLocked>();
        } else {
            commands.entity(entity).insert(LevelLocked);
        }
        pending.insert(entity, !locked);
    }
}
