//! Host interception and queue redirection.
//!
//! At startup the host's property-renter routine is overridden with a copy
//! that no longer runs its own level jobs, so the level engine is the only
//! consumer of the level queues. On each session load a known third-party
//! replacement of that routine is probed for; when it is present its level
//! jobs are cut out the same way and the engine is rebound to its queues.
//! Every override is owned by the active [`Patcher`] and removed again by
//! [`teardown`].

mod adapter;
mod excision;
mod patcher;

pub use adapter::{
    AdaptedExtension, LandValueOverhaulAdapter, QueueAdapter, LVO_EXTENSION, LVO_LEVELDOWN_FIELD,
    LVO_LEVELDOWN_JOB, LVO_LEVELUP_FIELD, LVO_LEVELUP_JOB, LVO_REGION_END, LVO_SYSTEM,
};
pub use excision::{excise_level_jobs, ExcisionShape, RegionEnd};
pub use patcher::{
    apply_host_patches, install_patcher, redirect_on_session_load, teardown, teardown_on_exit,
    ExtensionProbe, InterceptionPlugin, Patcher, PATCH_OWNER,
};
