use bevy::math::IVec2;
use rand::Rng;

use crate::config::CANDIDATE_WEIGHT;
use crate::host::events::TriggerKind;
use crate::host::prefabs::{BuildingFlags, BuildingPrefab, BuildingPropertyData, PrefabCatalog, PrefabId};
use crate::host::zoning::ZoneType;

/// What a replacement prefab must satisfy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UpgradeRequest {
    pub zone_type: ZoneType,
    pub level: u8,
    pub lot_size: IVec2,
    pub max_height: f32,
    pub access: BuildingFlags,
    pub property: BuildingPropertyData,
}

/// Whether `prefab` can replace a building described by `request`.
pub fn is_candidate(request: &UpgradeRequest, prefab: &BuildingPrefab) -> bool {
    let (Some(spawnable), Some(property)) = (prefab.spawnable, prefab.property.as_ref()) else {
        return false;
    };
    spawnable.level == request.level
        && prefab.lot_size == request.lot_size
        && prefab.height <= request.max_height
        && prefab.flags.access() == request.access
        && request.property.fits_within(property)
}

/// Uniform reservoir pick over every candidate in the spawn groups of the
/// requested zone type. Each candidate carries the same fixed weight and
/// replaces the current pick with probability weight / running total.
pub fn select_upgrade<R: Rng + ?Sized>(
    catalog: &PrefabCatalog,
    request: &UpgradeRequest,
    rng: &mut R,
) -> Option<PrefabId> {
    let mut total = 0u32;
    let mut selected = None;
    for group in catalog
        .spawn_groups()
        .filter(|group| group.zone_type == request.zone_type)
    {
        for &id in &group.members {
            let Some(prefab) = catalog.building(id) else {
                continue;
            };
            if !is_candidate(request, prefab) {
                continue;
            }
            total += CANDIDATE_WEIGHT;
            if rng.gen_range(0..total) < CANDIDATE_WEIGHT {
                selected = Some(id);
            }
        }
    }
    selected
}

/// One trigger per land use the property holds; office wins over generic
/// industry.
pub fn level_up_triggers(property: &BuildingPropertyData, office: bool) -> Vec<TriggerKind> {
    classify(
        property,
        office,
        [
            TriggerKind::LevelUpResidential,
            TriggerKind::LevelUpCommercial,
            TriggerKind::LevelUpOffice,
            TriggerKind::LevelUpIndustrial,
        ],
    )
}

pub fn level_down_triggers(property: &BuildingPropertyData, office: bool) -> Vec<TriggerKind> {
    classify(
        property,
        office,
        [
            TriggerKind::LevelDownResidential,
            TriggerKind::LevelDownCommercial,
            TriggerKind::LevelDownOffice,
            TriggerKind::LevelDownIndustrial,
        ],
    )
}

fn classify(
    property: &BuildingPropertyData,
    office: bool,
    [residential, commercial, office_kind, industrial]: [TriggerKind; 4],
) -> Vec<TriggerKind> {
    let mut kinds = Vec::new();
    if property.residential_count() > 0 {
        kinds.push(residential);
    }
    if property.commercial_count() > 0 {
        kinds.push(commercial);
    }
    if property.industrial_count() > 0 {
        kinds.push(if office { office_kind } else { industrial });
    }
    kinds
}
