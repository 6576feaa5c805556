use bevy::ecs::entity::EntityHashSet;
use bevy::prelude::*;

use crate::host::queues::{HostLevelQueues, QueuePair};

/// Who owns the queues the engine drains.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueueSource {
    BuiltIn,
    Extension(String),
}

/// The queue pair the engine is bound to. Unbound means the engine idles.
#[derive(Resource, Debug, Default)]
pub struct LevelQueues {
    binding: Option<(QueuePair, QueueSource)>,
}

impl LevelQueues {
    /// Points the engine at `pair`, replacing any earlier binding.
    pub fn bind(&mut self, pair: QueuePair, source: QueueSource) {
        info!("Binding level queues to {:?}", source);
        self.binding = Some((pair, source));
    }

    /// Leaves the engine without queues until the next bind.
    pub fn unbind(&mut self) {
        self.binding = None;
    }

    pub fn pair(&self) -> Option<&QueuePair> {
        self.binding.as_ref().map(|(pair, _)| pair)
    }

    pub fn source(&self) -> Option<&QueueSource> {
        self.binding.as_ref().map(|(_, source)| source)
    }
}

/// Entities already dequeued this tick, from either queue.
#[derive(Resource, Debug, Default)]
pub struct LevelTickLedger {
    seen: EntityHashSet,
}

impl LevelTickLedger {
    pub fn begin_tick(&mut self) {
        self.seen.clear();
    }

    /// `false` if the entity was already handled this tick.
    pub fn claim(&mut self, entity: Entity) -> bool {
        self.seen.insert(entity)
    }
}

/// Binds the host's own queues unless something already bound the engine.
pub fn bind_builtin_queues(host: Option<Res<HostLevelQueues>>, mut queues: ResMut<LevelQueues>) {
    if queues.pair().is_some() {
        return;
    }
    match host {
        Some(host) => queues.bind(host.0.clone(), QueueSource::BuiltIn),
        None => error!("Host level queues are unavailable; level changes are disabled"),
    }
}
