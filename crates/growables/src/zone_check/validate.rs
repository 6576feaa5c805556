use bevy::prelude::*;

use crate::host::prefabs::{BuildingPrefab, PrefabCatalog};
use crate::host::zoning::ZoningGrid;
use crate::spatial::validate_footprint;

/// A change to a building's condemned state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoneTransition {
    /// Mark condemned; `notify` adds the condemned icon.
    Condemn { notify: bool },
    Reprieve,
}

/// Condemned-state machine. `None` means no mutation: a valid building that
/// was never condemned, or a condemned one that is still invalid.
pub fn next_transition(valid: bool, condemned: bool, destroyed_or_abandoned: bool) -> Option<ZoneTransition> {
    match (valid, condemned) {
        (false, false) => Some(ZoneTransition::Condemn {
            notify: !destroyed_or_abandoned,
        }),
        (true, true) => Some(ZoneTransition::Reprieve),
        _ => None,
    }
}

/// Read-only view of the world used to decide whether a building still fits
/// its zone. Shared across validation tasks.
#[derive(Clone, Copy)]
pub struct ZoneValidator<'a> {
    pub catalog: &'a PrefabCatalog,
    pub zoning: &'a ZoningGrid,
    /// Editor and sandbox sessions accept every placement.
    pub editor: bool,
}

impl ZoneValidator<'_> {
    pub fn is_valid(
        &self,
        prefab: &BuildingPrefab,
        transform: &Transform,
        parent: Option<&BuildingPrefab>,
    ) -> bool {
        if self.editor {
            return true;
        }
        let Some(spawnable) = prefab.spawnable else {
            return true;
        };
        let Some(zone) = self.catalog.zone(spawnable.zone) else {
            return true;
        };
        let zone_type = zone.zone_type;

        let parent_zone = parent
            .and_then(|parent| parent.placeholder)
            .and_then(|placeholder| self.catalog.zone(placeholder.zone))
            .map(|zone| zone.zone_type);
        if parent_zone == Some(zone_type) {
            return true;
        }

        if zone_type.is_defined() && !zone.enabled {
            return false;
        }
        validate_footprint(self.zoning, transform, prefab.lot_size, zone_type)
    }
}
