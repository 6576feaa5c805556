use bevy::prelude::*;

use super::selection::{level_up_triggers, select_upgrade, UpgradeRequest};
use super::{LevelQueues, LevelTickLedger, LevellingConfig};
use crate::classification::LevelLocked;
use crate::host::components::{PrefabRef, UnderConstruction};
use crate::host::events::{TriggerAction, ZoneBuiltLevelUpdate};
use crate::host::icons::{IconCommand, IconPriority};
use crate::host::prefabs::PrefabCatalog;
use crate::host::zoning::ZoningGrid;
use crate::host::BuildingConfiguration;
use crate::sim_rng::SimRng;
use crate::spatial::max_height;

/// Drains the upgrade queue. When levelling is disabled both queues are
/// emptied untouched instead.
#[allow(clippy::too_many_arguments)]
pub fn process_upgrades(
    mut commands: Commands,
    config: Res<LevellingConfig>,
    queues: Res<LevelQueues>,
    building_config: Option<Res<BuildingConfiguration>>,
    catalog: Res<PrefabCatalog>,
    zoning: Res<ZoningGrid>,
    mut rng: ResMut<SimRng>,
    mut ledger: ResMut<LevelTickLedger>,
    structures: Query<(&PrefabRef, &Transform, Has<LevelLocked>)>,
    mut triggers: EventWriter<TriggerAction>,
    mut zone_built: EventWriter<ZoneBuiltLevelUpdate>,
    mut icons: EventWriter<IconCommand>,
) {
    ledger.begin_tick();
    let Some(pair) = queues.pair() else {
        return;
    };
    if config.disable_levelling {
        pair.upgrade.clear();
        pair.downgrade.clear();
        return;
    }
    let Some(building_config) = building_config else {
        return;
    };

    while let Some(entity) = pair.upgrade.try_dequeue() {
        if !ledger.claim(entity) {
            continue;
        }
        let Ok((prefab_ref, transform, locked)) = structures.get(entity) else {
            continue;
        };
        if locked {
            continue;
        }
        let Some(prefab) = catalog
            .building(prefab_ref.0)
            .filter(|prefab| prefab.is_growable())
        else {
            continue;
        };
        let Some(spawnable) = prefab.spawnable else {
            continue;
        };
        let Some(zone) = catalog.zone(spawnable.zone) else {
            continue;
        };

        let Some(level) = spawnable.level.checked_add(1) else {
            continue;
        };

        let property = prefab.property.unwrap_or_default();
        let request = UpgradeRequest {
            zone_type: zone.zone_type,
            level,
            lot_size: prefab.lot_size,
            max_height: max_height(&zoning, transform, prefab.lot_size),
            access: prefab.flags.access(),
            property,
        };
        let Some(new_prefab) = select_upgrade(&catalog, &request, &mut rng.0) else {
            continue;
        };

        commands.entity(entity).insert(UnderConstruction {
            new_prefab,
            progress: u8::MAX,
        });
        for kind in level_up_triggers(&property, prefab.office) {
            triggers.send(TriggerAction { kind, entity });
        }
        zone_built.send(ZoneBuiltLevelUpdate {
            zone: spawnable.zone,
            from_level: spawnable.level,
            to_level: request.level,
            squares: prefab.lot_size.x * prefab.lot_size.y,
        });
        icons.send(IconCommand::Add {
            owner: entity,
            icon: building_config.level_up_notification,
            priority: IconPriority::Info,
        });
    }
}
