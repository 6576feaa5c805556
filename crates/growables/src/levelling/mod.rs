//! Level transition engine.
//!
//! Each tick the upgrade queue is drained first, then the downgrade queue.
//! Upgrades pick a replacement prefab one level up that fits the lot and the
//! height clearance; downgrades abandon the building, or put it back on the
//! market when abandonment is off or the building is level-locked.

mod downgrade;
mod plugin;
mod queues;
mod selection;
mod upgrade;

pub use downgrade::process_downgrades;
pub use plugin::{apply_levelling_settings, LevellingConfig, LevellingPlugin};
pub use queues::{bind_builtin_queues, LevelQueues, LevelTickLedger, QueueSource};
pub use selection::{is_candidate, level_down_triggers, level_up_triggers, select_upgrade, UpgradeRequest};
pub use upgrade::process_upgrades;
