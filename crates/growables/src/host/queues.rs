//! Shared FIFO work queues of entities pending a level change.

use bevy::prelude::*;
use crossbeam_channel::{unbounded, Receiver, Sender};

/// Multi-producer FIFO of entity handles. Clones share the same queue.
#[derive(Clone, Debug)]
pub struct LevelQueue {
    tx: Sender<Entity>,
    rx: Receiver<Entity>,
}

impl Default for LevelQueue {
    fn default() -> Self {
        let (tx, rx) = unbounded();
        Self { tx, rx }
    }
}

impl LevelQueue {
    pub fn enqueue(&self, entity: Entity) {
        // Both ends live in every clone, so the channel cannot disconnect.
        let _ = self.tx.send(entity);
    }

    pub fn try_dequeue(&self) -> Option<Entity> {
        self.rx.try_recv().ok()
    }

    /// Drops every pending entry, returning how many were dropped.
    pub fn clear(&self) -> usize {
        self.rx.try_iter().count()
    }

    pub fn len(&self) -> usize {
        self.rx.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }

    /// Whether both handles refer to the same underlying queue.
    pub fn same_queue(&self, other: &LevelQueue) -> bool {
        self.rx.same_channel(&other.rx)
    }
}

#[derive(Clone, Debug, Default)]
pub struct QueuePair {
    pub upgrade: LevelQueue,
    pub downgrade: LevelQueue,
}

/// The host's own queue pair, filled by its property-renter routine.
#[derive(Resource, Clone, Debug, Default)]
pub struct HostLevelQueues(pub QueuePair);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_fifo_order() {
        let queue = LevelQueue::default();
        let producer = queue.clone();
        producer.enqueue(Entity::from_raw(3));
        producer.enqueue(Entity::from_raw(1));
        assert_eq!(queue.len(), 2);
        assert_eq!(queue.try_dequeue(), Some(Entity::from_raw(3)));
        assert_eq!(queue.try_dequeue(), Some(Entity::from_raw(1)));
        assert_eq!(queue.try_dequeue(), None);
    }

    #[test]
    fn test_clear_reports_dropped_count() {
        let queue = LevelQueue::default();
        for i in 0..5 {
            queue.enqueue(Entity::from_raw(i));
        }
        assert_eq!(queue.clear(), 5);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_same_queue_identity() {
        let a = LevelQueue::default();
        let b = LevelQueue::default();
        assert!(a.same_queue(&a.clone()));
        assert!(!a.same_queue(&b));
    }
}
