//! The host simulation the engine plugs into.
//!
//! Owns buildings, prefabs, the zoning grid and both spatial indexes, fills
//! the level queues through its property-renter routine, and consumes the
//! engine's outbound icon, trigger, zone-built and road-edge events.

pub mod components;
pub mod construction;
pub mod events;
pub mod extensions;
pub mod icons;
pub mod object_search;
pub mod prefabs;
pub mod property_renter;
pub mod queues;
pub mod routine;
pub mod zoning;

use bevy::prelude::*;

use crate::simulation_sets::{SimulationSet, SimulationSetsPlugin};
use icons::IconId;

/// Host frame index, advanced once per tick.
#[derive(Resource, Debug, Default, Clone, Copy)]
pub struct SimulationFrame(pub u32);

#[derive(Resource, Debug, Default, Clone, Copy)]
pub struct ToolMode {
    /// Editor and sandbox sessions skip zone validation.
    pub editor: bool,
}

/// Zoning configuration singleton: icon prefabs used for notifications.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildingConfiguration {
    pub level_up_notification: IconId,
    pub abandoned_notification: IconId,
    pub condemned_notification: IconId,
    pub high_rent_notification: IconId,
}

impl Default for BuildingConfiguration {
    fn default() -> Self {
        Self {
            level_up_notification: IconId(1),
            abandoned_notification: IconId(2),
            condemned_notification: IconId(3),
            high_rent_notification: IconId(4),
        }
    }
}

fn advance_frame(mut frame: ResMut<SimulationFrame>) {
    frame.0 = frame.0.wrapping_add(1);
}

fn clear_created_markers(
    mut commands: Commands,
    created: Query<Entity, With<components::Created>>,
) {
    for entity in &created {
        commands.entity(entity).remove::<components::Created>();
    }
}

/// Refresh requests live until the start of the following frame.
fn clear_updated_markers(
    mut commands: Commands,
    updated: Query<Entity, With<components::Updated>>,
) {
    for entity in &updated {
        commands.entity(entity).remove::<components::Updated>();
    }
}

pub struct HostPlugin;

impl Plugin for HostPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(SimulationSetsPlugin)
            .init_resource::<SimulationFrame>()
            .init_resource::<ToolMode>()
            .init_resource::<BuildingConfiguration>()
            .init_resource::<prefabs::PrefabCatalog>()
            .init_resource::<zoning::ZoningGrid>()
            .init_resource::<zoning::ZoneUpdateCollect>()
            .init_resource::<object_search::ObjectSearchTree>()
            .init_resource::<queues::HostLevelQueues>()
            .init_resource::<routine::RoutineRegistry>()
            .init_resource::<extensions::ScheduledRoutines>()
            .init_resource::<extensions::ExtensionCatalog>()
            .init_resource::<property_renter::PropertyRenterStats>()
            .init_resource::<events::TriggerLog>()
            .init_resource::<events::ZoneBuiltTally>()
            .init_resource::<events::PendingEdgeRefresh>()
            .add_event::<icons::IconCommand>()
            .add_event::<events::TriggerAction>()
            .add_event::<events::ZoneBuiltLevelUpdate>()
            .add_event::<events::RoadEdgeRefresh>()
            .add_event::<events::SessionLoaded>()
            .add_systems(
                FixedUpdate,
                (
                    clear_updated_markers,
                    advance_frame,
                    construction::advance_construction,
                    object_search::update_object_search_tree,
                    extensions::run_scheduled_routines,
                )
                    .chain()
                    .in_set(SimulationSet::HostPre),
            )
            .add_systems(
                FixedUpdate,
                (
                    icons::apply_icon_commands,
                    events::record_triggers,
                    events::apply_zone_built_updates,
                    events::refresh_road_edges,
                    zoning::clear_zone_updates,
                    clear_created_markers,
                )
                    .in_set(SimulationSet::HostPost),
            );

        app.world_mut()
            .resource_mut::<routine::RoutineRegistry>()
            .register(
                property_renter::PROPERTY_RENTER_ROUTINE,
                property_renter::property_renter_routine(),
            );
    }
}
