use bevy::prelude::*;

use super::selection::level_down_triggers;
use super::{LevelQueues, LevelTickLedger, LevellingConfig};
use crate::classification::LevelLocked;
use crate::host::components::{
    Abandoned, Building, BuildingStateFlags, CrimeProducer, ElectricityConsumer, GarbageProducer,
    GroundPolluter, MailProducer, PrefabRef, PropertyOnMarket, PropertyRenter,
    PropertyToBeOnMarket, Renters, Updated, WaterConsumer,
};
use crate::host::events::{RoadEdgeRefresh, TriggerAction, UtilityGraph};
use crate::host::icons::{IconCommand, IconPriority};
use crate::host::prefabs::PrefabCatalog;
use crate::host::{BuildingConfiguration, SimulationFrame};

type Utilities = (
    Has<ElectricityConsumer>,
    Has<WaterConsumer>,
    Has<GarbageProducer>,
    Has<GroundPolluter>,
    Has<MailProducer>,
);

/// Drains the downgrade queue, abandoning buildings or returning them to the
/// market.
#[allow(clippy::too_many_arguments)]
pub fn process_downgrades(
    mut commands: Commands,
    config: Res<LevellingConfig>,
    queues: Res<LevelQueues>,
    building_config: Option<Res<BuildingConfiguration>>,
    catalog: Res<PrefabCatalog>,
    frame: Res<SimulationFrame>,
    mut ledger: ResMut<LevelTickLedger>,
    mut structures: Query<(
        &PrefabRef,
        Has<LevelLocked>,
        Option<&mut Building>,
        Option<&mut Renters>,
        Option<&CrimeProducer>,
        Utilities,
    )>,
    mut triggers: EventWriter<TriggerAction>,
    mut icons: EventWriter<IconCommand>,
    mut road_edges: EventWriter<RoadEdgeRefresh>,
) {
    let Some(pair) = queues.pair() else {
        return;
    };
    if config.disable_levelling {
        pair.downgrade.clear();
        return;
    }
    let Some(building_config) = building_config else {
        return;
    };

    while let Some(entity) = pair.downgrade.try_dequeue() {
        if !ledger.claim(entity) {
            continue;
        }
        let Ok((prefab_ref, locked, building, renters, crime, utilities)) =
            structures.get_mut(entity)
        else {
            continue;
        };

        if config.disable_abandonment || locked {
            commands
                .entity(entity)
                .remove::<PropertyOnMarket>()
                .insert(PropertyToBeOnMarket);
            continue;
        }

        let Some(prefab) = catalog
            .building(prefab_ref.0)
            .filter(|prefab| prefab.is_growable())
        else {
            continue;
        };

        let road_edge = building.as_deref().and_then(|b| b.road_edge);
        let (electricity, water, garbage, polluter, mail) = utilities;

        let mut target = commands.entity(entity);
        target.insert((
            Abandoned {
                abandonment_time: frame.0,
            },
            Updated,
        ));
        if electricity {
            target.remove::<ElectricityConsumer>();
            if let Some(edge) = road_edge {
                road_edges.send(RoadEdgeRefresh {
                    graph: UtilityGraph::Electricity,
                    edge,
                });
            }
        }
        if water {
            target.remove::<WaterConsumer>();
            if let Some(edge) = road_edge {
                road_edges.send(RoadEdgeRefresh {
                    graph: UtilityGraph::WaterPipe,
                    edge,
                });
            }
        }
        if garbage {
            target.remove::<GarbageProducer>();
        }
        if polluter {
            target.remove::<GroundPolluter>();
        }
        if mail {
            target.remove::<MailProducer>();
        }
        if let Some(crime) = crime {
            target.insert(CrimeProducer {
                crime: crime.crime * 2.0,
                patrol_request: crime.patrol_request,
            });
        }

        if let Some(mut renters) = renters {
            while let Some(renter) = renters.0.pop() {
                if let Some(mut renter) = commands.get_entity(renter) {
                    renter.remove::<PropertyRenter>();
                }
            }
        }

        if let Some(mut building) = building {
            if building.flags.contains(BuildingStateFlags::HIGH_RENT_WARNING) {
                icons.send(IconCommand::Remove {
                    owner: entity,
                    icon: building_config.high_rent_notification,
                });
                building.flags.remove(BuildingStateFlags::HIGH_RENT_WARNING);
            }
        }

        icons.send(IconCommand::RemovePriority {
            owner: entity,
            priority: IconPriority::Problem,
        });
        icons.send(IconCommand::RemovePriority {
            owner: entity,
            priority: IconPriority::FatalProblem,
        });
        icons.send(IconCommand::Add {
            owner: entity,
            icon: building_config.abandoned_notification,
            priority: IconPriority::FatalProblem,
        });

        let property = prefab.property.unwrap_or_default();
        for kind in level_down_triggers(&property, prefab.office) {
            triggers.send(TriggerAction { kind, entity });
        }
    }
}
