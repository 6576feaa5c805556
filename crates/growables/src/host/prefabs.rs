//! Read-only prefab catalog: building and zone definitions loaded once.

use bevy::math::IVec2;
use bevy::prelude::*;
use bitflags::bitflags;

use super::zoning::ZoneType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PrefabId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ZonePrefabId(pub u32);

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct BuildingFlags: u8 {
        const LEFT_ACCESS = 1 << 0;
        const RIGHT_ACCESS = 1 << 1;
        const REQUIRE_ROAD = 1 << 2;
    }
}

impl BuildingFlags {
    /// The road-access subset compared between level-up candidates.
    pub fn access(self) -> Self {
        self & (Self::LEFT_ACCESS | Self::RIGHT_ACCESS)
    }
}

/// Bitmask of economy resources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ResourceMask(pub u64);

impl ResourceMask {
    pub const NONE: ResourceMask = ResourceMask(0);

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BuildingPropertyData {
    pub residential_properties: u32,
    pub allowed_manufactured: ResourceMask,
    pub allowed_sold: ResourceMask,
    pub allowed_stored: ResourceMask,
}

impl BuildingPropertyData {
    pub fn residential_count(&self) -> u32 {
        self.residential_properties
    }

    pub fn commercial_count(&self) -> u32 {
        u32::from(!self.allowed_sold.is_empty())
    }

    pub fn industrial_count(&self) -> u32 {
        u32::from(!self.allowed_manufactured.is_empty() || !self.allowed_stored.is_empty())
    }

    /// Whether `candidate` can host everything this property holds.
    pub fn fits_within(&self, candidate: &BuildingPropertyData) -> bool {
        self.residential_properties <= candidate.residential_properties
            && self.allowed_manufactured == candidate.allowed_manufactured
            && self.allowed_sold == candidate.allowed_sold
            && self.allowed_stored == candidate.allowed_stored
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpawnableBuildingData {
    pub zone: ZonePrefabId,
    pub level: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaceholderBuildingData {
    pub zone: ZonePrefabId,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BuildingPrefab {
    pub name: String,
    pub lot_size: IVec2,
    pub flags: BuildingFlags,
    /// Geometry height in world units.
    pub height: f32,
    pub spawnable: Option<SpawnableBuildingData>,
    pub signature: bool,
    pub placeholder: Option<PlaceholderBuildingData>,
    pub property: Option<BuildingPropertyData>,
    pub office: bool,
}

impl BuildingPrefab {
    pub fn new(name: impl Into<String>, lot_size: IVec2, height: f32) -> Self {
        Self {
            name: name.into(),
            lot_size,
            flags: BuildingFlags::empty(),
            height,
            spawnable: None,
            signature: false,
            placeholder: None,
            property: None,
            office: false,
        }
    }

    pub fn spawnable(mut self, zone: ZonePrefabId, level: u8) -> Self {
        self.spawnable = Some(SpawnableBuildingData { zone, level });
        self
    }

    pub fn with_property(mut self, property: BuildingPropertyData) -> Self {
        self.property = Some(property);
        self
    }

    pub fn with_flags(mut self, flags: BuildingFlags) -> Self {
        self.flags = flags;
        self
    }

    pub fn signature(mut self) -> Self {
        self.signature = true;
        self
    }

    pub fn office(mut self) -> Self {
        self.office = true;
        self
    }

    pub fn placeholder(mut self, zone: ZonePrefabId) -> Self {
        self.placeholder = Some(PlaceholderBuildingData { zone });
        self
    }

    /// Spawnable and not a signature landmark.
    pub fn is_growable(&self) -> bool {
        self.spawnable.is_some() && !self.signature
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ZonePrefab {
    pub name: String,
    pub zone_type: ZoneType,
    pub enabled: bool,
}

/// Spawnable prefabs sharing a zone type.
#[derive(Debug, Clone, PartialEq)]
pub struct SpawnGroup {
    pub zone_type: ZoneType,
    pub members: Vec<PrefabId>,
}

#[derive(Resource, Debug, Default)]
pub struct PrefabCatalog {
    buildings: Vec<BuildingPrefab>,
    zones: Vec<ZonePrefab>,
    groups: Vec<SpawnGroup>,
}

impl PrefabCatalog {
    pub fn add_zone(&mut self, name: impl Into<String>, zone_type: ZoneType) -> ZonePrefabId {
        let id = ZonePrefabId(self.zones.len() as u32);
        self.zones.push(ZonePrefab {
            name: name.into(),
            zone_type,
            enabled: true,
        });
        id
    }

    /// Adds a building prefab. Spawnable prefabs join the spawn group of
    /// their zone type.
    pub fn add_building(&mut self, prefab: BuildingPrefab) -> PrefabId {
        let id = PrefabId(self.buildings.len() as u32);
        let zone_type = prefab
            .spawnable
            .and_then(|s| self.zone(s.zone))
            .map(|z| z.zone_type);
        if let Some(zone_type) = zone_type {
            match self.groups.iter_mut().find(|g| g.zone_type == zone_type) {
                Some(group) => group.members.push(id),
                None => self.groups.push(SpawnGroup {
                    zone_type,
                    members: vec![id],
                }),
            }
        }
        self.buildings.push(prefab);
        id
    }

    pub fn building(&self, id: PrefabId) -> Option<&BuildingPrefab> {
        self.buildings.get(id.0 as usize)
    }

    pub fn zone(&self, id: ZonePrefabId) -> Option<&ZonePrefab> {
        self.zones.get(id.0 as usize)
    }

    pub fn set_zone_enabled(&mut self, id: ZonePrefabId, enabled: bool) {
        if let Some(zone) = self.zones.get_mut(id.0 as usize) {
            zone.enabled = enabled;
        }
    }

    pub fn spawn_groups(&self) -> impl Iterator<Item = &SpawnGroup> {
        self.groups.iter()
    }

    pub fn is_growable(&self, id: PrefabId) -> bool {
        self.building(id).is_some_and(BuildingPrefab::is_growable)
    }

    /// Zone type of a spawnable prefab, `None` for anything else.
    pub fn zone_type_of(&self, id: PrefabId) -> Option<ZoneType> {
        let spawnable = self.building(id)?.spawnable?;
        self.zone(spawnable.zone).map(|z| z.zone_type)
    }
}
