use bevy::prelude::*;

use super::{is_signature, LevelLocked, PropertyBuilding};
use crate::host::components::{
    Abandoned, Building, BuildingCondition, ElectricityConsumer, GarbageProducer, MailProducer,
    PrefabRef, PropertyOnMarket, PropertyToBeOnMarket, Updated, WaterConsumer,
};
use crate::host::icons::IconCommand;
use crate::host::prefabs::PrefabCatalog;
use crate::host::BuildingConfiguration;

/// Bulk operations requested from outside the tick pipeline.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminCommand {
    LockAllBuildings,
    UnlockAllBuildings,
    RemoveAllAbandonment,
}

#[allow(clippy::too_many_arguments)]
pub fn handle_admin_commands(
    mut commands: Commands,
    mut requests: EventReader<AdminCommand>,
    catalog: Res<PrefabCatalog>,
    config: Option<Res<BuildingConfiguration>>,
    unlocked: Query<(Entity, &PrefabRef), (PropertyBuilding, Without<LevelLocked>)>,
    locked: Query<(Entity, &PrefabRef), (PropertyBuilding, With<LevelLocked>)>,
    abandoned: Query<(Entity, &PrefabRef, &Building, Has<BuildingCondition>), (PropertyBuilding, With<Abandoned>)>,
    mut icons: EventWriter<IconCommand>,
) {
    for request in requests.read() {
        match request {
            AdminCommand::LockAllBuildings => {
                let mut count = 0;
                for (entity, prefab_ref) in &unlocked {
                    if !is_signature(&catalog, prefab_ref) {
                        commands.entity(entity).insert(LevelLocked);
                        count += 1;
                    }
                }
                info!("Level-locked {} buildings", count);
            }
            AdminCommand::UnlockAllBuildings => {
                let mut count = 0;
                for (entity, prefab_ref) in &locked {
                    if !is_signature(&catalog, prefab_ref) {
                        commands.entity(entity).remove::<LevelLocked>();
                        count += 1;
                    }
                }
                info!("Removed level lock from {} buildings", count);
            }
            AdminCommand::RemoveAllAbandonment => {
                let mut count = 0;
                for (entity, prefab_ref, building, has_condition) in &abandoned {
                    if is_signature(&catalog, prefab_ref) {
                        continue;
                    }
                    let mut target = commands.entity(entity);
                    target
                        .remove::<(Abandoned, PropertyOnMarket)>()
                        .insert((
                            PropertyToBeOnMarket,
                            GarbageProducer,
                            MailProducer,
                            ElectricityConsumer,
                            WaterConsumer,
                        ));
                    if has_condition {
                        target.insert(BuildingCondition { condition: 0 });
                    }
                    if let Some(config) = &config {
                        icons.send(IconCommand::Remove {
                            owner: entity,
                            icon: config.abandoned_notification,
                        });
                    }
                    if let Some(mut edge) = building.road_edge.and_then(|e| commands.get_entity(e)) {
                        edge.insert(Updated);
                    }
                    count += 1;
                }
                info!("Cleared abandonment from {} buildings", count);
            }
        }
    }
}
