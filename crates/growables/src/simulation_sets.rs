//! Deterministic tick ordering via `SystemSet` phases.
//!
//! Every system in `FixedUpdate` belongs to one of these sets. The host and
//! the engine share the chain so that the work queues are filled before the
//! level engine drains them, and outbound events are consumed only after the
//! engine has written them.
//!
//! ```text
//! HostPre  →  Classify  →  Levelling  →  ZoneCheck  →  HostPost
//! ```
//!
//! * **HostPre** – Frame counter, construction progress, object search tree
//!   maintenance, host producers (rent evaluation filling the work queues).
//! * **Classify** – Settings subscribers, Spawned/Plopped tagging, admin
//!   operations.
//! * **Levelling** – Upgrade drain, then downgrade drain.
//! * **ZoneCheck** – Incremental zone validity sweep.
//! * **HostPost** – Host consumers of icons, triggers, zone-built deltas and
//!   road-edge refresh requests; clearing the changed-bounds list.

use bevy::prelude::*;

/// Ordered phases for systems running in the `FixedUpdate` schedule.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimulationSet {
    HostPre,
    Classify,
    Levelling,
    ZoneCheck,
    HostPost,
}

/// Configures the `SimulationSet` chain. Safe to add from several plugins.
pub struct SimulationSetsPlugin;

impl Plugin for SimulationSetsPlugin {
    fn build(&self, app: &mut App) {
        app.configure_sets(
            FixedUpdate,
            (
                SimulationSet::HostPre,
                SimulationSet::Classify,
                SimulationSet::Levelling,
                SimulationSet::ZoneCheck,
                SimulationSet::HostPost,
            )
                .chain(),
        );
    }

    fn is_unique(&self) -> bool {
        false
    }
}
