use bevy::prelude::*;

use super::components::{PrefabRef, UnderConstruction, Updated};

/// Progress added per frame to an ongoing construction.
pub const CONSTRUCTION_STEP: u8 = 64;

/// Finishes rebuilds at full progress and advances the rest.
pub fn advance_construction(
    mut commands: Commands,
    mut sites: Query<(Entity, &mut UnderConstruction, &mut PrefabRef)>,
) {
    for (entity, mut site, mut prefab) in &mut sites {
        if site.progress == u8::MAX {
            prefab.0 = site.new_prefab;
            commands
                .entity(entity)
                .remove::<UnderConstruction>()
                .insert(Updated);
        } else {
            site.progress = site.progress.saturating_add(CONSTRUCTION_STEP);
        }
    }
}
