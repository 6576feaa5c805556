//! Simulation and query methods for `TestHost`.

use bevy::prelude::*;

use crate::host::events::{TriggerKind, TriggerLog};
use crate::host::icons::{IconId, IconPriority, Icons};
use crate::host::queues::HostLevelQueues;
use crate::levelling::LevelQueues;

use super::TestHost;

impl TestHost {
    // -----------------------------------------------------------------------
    // Simulation
    // -----------------------------------------------------------------------

    /// Runs N ticks by executing the `FixedUpdate` schedule directly.
    pub fn tick(&mut self, n: u32) {
        for _ in 0..n {
            self.app.world_mut().run_schedule(FixedUpdate);
        }
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    pub fn world(&self) -> &World {
        self.app.world()
    }

    pub fn world_mut(&mut self) -> &mut World {
        self.app.world_mut()
    }

    pub fn resource<R: Resource>(&self) -> &R {
        self.app.world().resource::<R>()
    }

    pub fn has<C: Component>(&self, entity: Entity) -> bool {
        self.app.world().get::<C>(entity).is_some()
    }

    pub fn get<C: Component>(&self, entity: Entity) -> Option<&C> {
        self.app.world().get::<C>(entity)
    }

    pub fn count<C: Component>(&mut self) -> usize {
        let world = self.app.world_mut();
        world.query_filtered::<(), With<C>>().iter(world).count()
    }

    /// Every event of type `E` sent since the last drain, in send order.
    pub fn drain_events<E: Event>(&mut self) -> Vec<E> {
        self.app
            .world_mut()
            .resource_mut::<Events<E>>()
            .drain()
            .collect()
    }

    pub fn icons(&self, entity: Entity) -> Vec<(IconId, IconPriority)> {
        self.get::<Icons>(entity)
            .map(|icons| icons.0.clone())
            .unwrap_or_default()
    }

    pub fn trigger_count(&self, kind: TriggerKind) -> u32 {
        self.resource::<TriggerLog>().count(kind)
    }

    /// Entries still waiting in the host's own queues (upgrade, downgrade).
    pub fn host_queue_lengths(&self) -> (usize, usize) {
        let pair = &self.resource::<HostLevelQueues>().0;
        (pair.upgrade.len(), pair.downgrade.len())
    }

    pub fn level_queues(&self) -> &LevelQueues {
        self.resource::<LevelQueues>()
    }
}
