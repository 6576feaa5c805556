//! Spatial index over placed buildings, separate from the zone block tree.

use bevy::ecs::entity::EntityHashMap;
use bevy::prelude::*;

use super::components::{Building, PrefabRef};
use super::prefabs::PrefabCatalog;
use crate::config::world_bounds;
use crate::spatial::{Bounds2, Footprint, QuadTree};

#[derive(Resource)]
pub struct ObjectSearchTree {
    tree: QuadTree<Entity>,
    bounds: EntityHashMap<Bounds2>,
}

impl Default for ObjectSearchTree {
    fn default() -> Self {
        Self {
            tree: QuadTree::new(world_bounds()),
            bounds: EntityHashMap::default(),
        }
    }
}

impl ObjectSearchTree {
    pub fn insert(&mut self, entity: Entity, bounds: Bounds2) {
        self.remove(entity);
        self.tree.insert(entity, bounds);
        self.bounds.insert(entity, bounds);
    }

    pub fn remove(&mut self, entity: Entity) -> bool {
        match self.bounds.remove(&entity) {
            Some(bounds) => self.tree.remove(entity, bounds),
            None => false,
        }
    }

    pub fn tree(&self) -> &QuadTree<Entity> {
        &self.tree
    }

    pub fn len(&self) -> usize {
        self.tree.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }
}

pub fn update_object_search_tree(
    catalog: Res<PrefabCatalog>,
    mut index: ResMut<ObjectSearchTree>,
    moved: Query<
        (Entity, &Transform, &PrefabRef),
        (
            With<Building>,
            Or<(Added<Building>, Changed<Transform>, Changed<PrefabRef>)>,
        ),
    >,
    mut removed: RemovedComponents<Building>,
) {
    for entity in removed.read() {
        index.remove(entity);
    }
    for (entity, transform, prefab_ref) in &moved {
        let Some(prefab) = catalog.building(prefab_ref.0) else {
            continue;
        };
        let bounds = Footprint::new(transform, prefab.lot_size).outer_bounds();
        index.insert(entity, bounds);
    }
}
