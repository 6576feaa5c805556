use bevy::prelude::*;
use bevy::tasks::{ComputeTaskPool, TaskPool};
use crossbeam_channel::unbounded;

use crate::spatial::{Bounds2, QuadTree};

/// Entities in `search` whose bounds touch any of `changed` and pass
/// `accept`, sorted and without duplicates.
pub fn find_affected<F>(changed: &[Bounds2], search: &QuadTree<Entity>, accept: F) -> Vec<Entity>
where
    F: Fn(Entity) -> bool + Sync,
{
    let (tx, rx) = unbounded();
    let accept = &accept;
    ComputeTaskPool::get_or_init(TaskPool::default).scope(|scope| {
        for &bounds in changed {
            let tx = tx.clone();
            scope.spawn(async move {
                search.visit_intersecting(bounds, |entity| {
                    if accept(entity) {
                        // The receiver outlives the scope.
                        let _ = tx.send(entity);
                    }
                });
            });
        }
    });
    drop(tx);
    collect_unique(rx.try_iter().collect())
}

/// Sorts by entity identity and compacts adjacent duplicates in place.
pub fn collect_unique(mut entities: Vec<Entity>) -> Vec<Entity> {
    entities.sort_unstable();
    if entities.is_empty() {
        return entities;
    }
    let mut write = 1;
    for read in 1..entities.len() {
        if entities[read] != entities[write - 1] {
            entities[write] = entities[read];
            write += 1;
        }
    }
    entities.truncate(write);
    entities
}
