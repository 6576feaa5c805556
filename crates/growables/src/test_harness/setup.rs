//! Builder methods for `TestHost`.

use bevy::math::{IVec2, Vec2, Vec3};
use bevy::prelude::*;

use crate::host::components::{
    Building, BuildingCondition, CommercialProperty, Created, IndustrialProperty, PrefabRef,
    ResidentialProperty, UnderConstruction,
};
use crate::host::events::SessionLoaded;
use crate::host::prefabs::{BuildingPrefab, PrefabCatalog, PrefabId, ZonePrefabId};
use crate::host::queues::HostLevelQueues;
use crate::host::zoning::{BlockId, ZoneBlock, ZoneType, ZoneUpdateCollect, ZoningGrid};
use crate::host::{BuildingConfiguration, ToolMode};
use crate::settings::GrowablesSettings;
use crate::spatial::Bounds2;

use super::TestHost;

impl TestHost {
    // -----------------------------------------------------------------------
    // Catalog
    // -----------------------------------------------------------------------

    pub fn add_zone(&mut self, name: &str, zone_type: ZoneType) -> ZonePrefabId {
        self.app
            .world_mut()
            .resource_mut::<PrefabCatalog>()
            .add_zone(name, zone_type)
    }

    pub fn add_prefab(&mut self, prefab: BuildingPrefab) -> PrefabId {
        self.app
            .world_mut()
            .resource_mut::<PrefabCatalog>()
            .add_building(prefab)
    }

    pub fn set_zone_enabled(&mut self, zone: ZonePrefabId, enabled: bool) {
        self.app
            .world_mut()
            .resource_mut::<PrefabCatalog>()
            .set_zone_enabled(zone, enabled);
    }

    // -----------------------------------------------------------------------
    // Zoning grid
    // -----------------------------------------------------------------------

    pub fn add_block(&mut self, block: ZoneBlock) -> BlockId {
        self.app.world_mut().resource_mut::<ZoningGrid>().add_block(block)
    }

    /// A block facing +Z that lines up cell for cell with an unrotated lot of
    /// `lot` cells centred at `position`, with road along its front row.
    pub fn zone_lot(&mut self, position: Vec2, lot: IVec2, zone: ZoneType, height: i16) -> BlockId {
        self.add_block(ZoneBlock::zoned(
            Vec3::new(position.x, 0.0, position.y),
            Vec2::Y,
            lot,
            zone,
            height,
        ))
    }

    /// Rezones `area` and records it as changed this frame.
    pub fn rezone(&mut self, area: Bounds2, zone: ZoneType) -> usize {
        let world = self.app.world_mut();
        let changed = world.resource_mut::<ZoningGrid>().rezone(area, zone);
        world.resource_mut::<ZoneUpdateCollect>().push(area);
        changed
    }

    /// Records `area` as changed without editing any cell.
    pub fn mark_zone_update(&mut self, area: Bounds2) {
        self.app
            .world_mut()
            .resource_mut::<ZoneUpdateCollect>()
            .push(area);
    }

    // -----------------------------------------------------------------------
    // Buildings
    // -----------------------------------------------------------------------

    /// Spawns an existing building of `prefab` at `position` on the ground,
    /// with property markers matching the prefab's property data.
    pub fn spawn_building(&mut self, prefab: PrefabId, position: Vec2) -> Entity {
        let property = self
            .app
            .world()
            .resource::<PrefabCatalog>()
            .building(prefab)
            .and_then(|p| p.property)
            .unwrap_or_default();
        let mut entity = self.app.world_mut().spawn((
            Building::default(),
            PrefabRef(prefab),
            Transform::from_xyz(position.x, 0.0, position.y),
            BuildingCondition::default(),
        ));
        if property.residential_count() > 0 {
            entity.insert(ResidentialProperty);
        }
        if property.commercial_count() > 0 {
            entity.insert(CommercialProperty);
        }
        if property.industrial_count() > 0 {
            entity.insert(IndustrialProperty);
        }
        entity.id()
    }

    /// A building the player just placed.
    pub fn place_building(&mut self, prefab: PrefabId, position: Vec2) -> Entity {
        let entity = self.spawn_building(prefab, position);
        self.app.world_mut().entity_mut(entity).insert(Created);
        entity
    }

    /// A building the zone spawner just started growing.
    pub fn grow_building(&mut self, prefab: PrefabId, position: Vec2) -> Entity {
        let entity = self.spawn_building(prefab, position);
        self.app.world_mut().entity_mut(entity).insert((
            Created,
            UnderConstruction {
                new_prefab: prefab,
                progress: 0,
            },
        ));
        entity
    }

    pub fn insert(&mut self, entity: Entity, bundle: impl Bundle) {
        self.app.world_mut().entity_mut(entity).insert(bundle);
    }

    pub fn spawn(&mut self, bundle: impl Bundle) -> Entity {
        self.app.world_mut().spawn(bundle).id()
    }

    // -----------------------------------------------------------------------
    // Inputs
    // -----------------------------------------------------------------------

    pub fn enqueue_upgrade(&mut self, entity: Entity) {
        self.app.world().resource::<HostLevelQueues>().0.upgrade.enqueue(entity);
    }

    pub fn enqueue_downgrade(&mut self, entity: Entity) {
        self.app.world().resource::<HostLevelQueues>().0.downgrade.enqueue(entity);
    }

    pub fn update_settings(&mut self, change: impl FnOnce(&mut GrowablesSettings)) {
        let mut settings = self.app.world_mut().resource_mut::<GrowablesSettings>();
        change(&mut *settings);
    }

    pub fn send<E: Event>(&mut self, event: E) {
        self.app.world_mut().send_event(event);
    }

    pub fn load_session(&mut self) {
        self.send(SessionLoaded);
    }

    pub fn set_editor(&mut self, editor: bool) {
        self.app.world_mut().resource_mut::<ToolMode>().editor = editor;
    }

    pub fn remove_building_configuration(&mut self) {
        self.app.world_mut().remove_resource::<BuildingConfiguration>();
    }
}
