//! Host-owned components on building and renter entities.

use bevy::prelude::*;
use bitflags::bitflags;

use super::prefabs::PrefabId;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct BuildingStateFlags: u8 {
        const HIGH_RENT_WARNING = 1 << 0;
    }
}

#[derive(Component, Debug, Clone, Default)]
pub struct Building {
    /// Road edge the building is connected to.
    pub road_edge: Option<Entity>,
    pub flags: BuildingStateFlags,
}

#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrefabRef(pub PrefabId);

/// Attachment to a parent object, e.g. a placeholder lot.
#[derive(Component, Debug, Clone, Copy)]
pub struct Attached {
    pub parent: Entity,
}

/// Households and companies living in a building.
#[derive(Component, Debug, Clone, Default)]
pub struct Renters(pub Vec<Entity>);

/// Back-reference from a renter to its property.
#[derive(Component, Debug, Clone, Copy)]
pub struct PropertyRenter {
    pub property: Entity,
}

#[derive(Component, Debug, Clone, Copy, Default)]
pub struct ElectricityConsumer;

#[derive(Component, Debug, Clone, Copy, Default)]
pub struct WaterConsumer;

#[derive(Component, Debug, Clone, Copy, Default)]
pub struct GarbageProducer;

#[derive(Component, Debug, Clone, Copy, Default)]
pub struct GroundPolluter;

#[derive(Component, Debug, Clone, Copy, Default)]
pub struct MailProducer;

#[derive(Component, Debug, Clone, Copy, PartialEq, Default)]
pub struct CrimeProducer {
    pub crime: f32,
    pub patrol_request: Option<Entity>,
}

/// Upkeep balance; positive values push towards a level-up, negative ones
/// towards a level-down.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BuildingCondition {
    pub condition: i32,
}

#[derive(Component, Debug, Clone, Copy, Default)]
pub struct PropertyOnMarket;

#[derive(Component, Debug, Clone, Copy, Default)]
pub struct PropertyToBeOnMarket;

/// Set for the frame an entity was created by a tool or spawner.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Created;

/// Requests a host-side refresh of the entity. Removed at the start of the
/// next frame.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Updated;

#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Destroyed;

#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Abandoned {
    pub abandonment_time: u32,
}

/// Placement no longer satisfies current zoning.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Condemned;

#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnderConstruction {
    pub new_prefab: PrefabId,
    /// 0..=255; 255 completes on the next construction step.
    pub progress: u8,
}

#[derive(Component, Debug, Clone, Copy, Default)]
pub struct ResidentialProperty;

#[derive(Component, Debug, Clone, Copy, Default)]
pub struct CommercialProperty;

#[derive(Component, Debug, Clone, Copy, Default)]
pub struct IndustrialProperty;
