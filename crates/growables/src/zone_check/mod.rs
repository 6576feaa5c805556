//! Zone validity sweep.
//!
//! When the zoning grid is edited, every spawned building whose lot touches
//! an edited region is re-checked against the zone it was grown for. Buildings
//! that no longer fit are condemned; condemned buildings whose zoning is
//! restored are reprieved.
//!
//! The sweep runs in three stages: find the affected buildings (one task per
//! edited region), sort and deduplicate them, then validate (one task per
//! chunk). All mutations go through `Commands` and the icon stream.

mod collect;
mod plugin;
mod validate;

pub use collect::{collect_unique, find_affected};
pub use plugin::{apply_zone_check_settings, sweep_zone_validity, ZoneCheckConfig, ZoneCheckPlugin};
pub use validate::{next_transition, ZoneTransition, ZoneValidator};
