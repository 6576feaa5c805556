use crate::error::AdaptError;
use crate::host::extensions::ExtensionModule;
use crate::host::queues::{LevelQueue, QueuePair};

use super::excision::{ExcisionShape, RegionEnd};

pub const LVO_EXTENSION: &str = "LandValueOverhaul";
/// The host system the extension replaces.
pub const LVO_SYSTEM: &str = "PropertyRenterSystem";
pub const LVO_LEVELUP_JOB: &str = "LandValueOverhaul::PropertyRenterSystem::LevelupJob";
pub const LVO_LEVELDOWN_JOB: &str = "LandValueOverhaul::PropertyRenterSystem::LeveldownJob";
pub const LVO_LEVELUP_FIELD: &str = "m_LevelupQueue";
pub const LVO_LEVELDOWN_FIELD: &str = "m_LeveldownQueue";
/// Step after which the extension's job handles are stored.
pub const LVO_REGION_END: &str = "store_job_handle";

/// What a successful adaptation yields.
#[derive(Debug, Clone)]
pub struct AdaptedExtension {
    /// Registry name of the extension's replacement routine.
    pub routine: String,
    pub queues: QueuePair,
}

/// Typed access to the level queues of one supported third-party extension.
pub trait QueueAdapter: Send + Sync {
    fn extension_name(&self) -> &str;

    fn excision_shape(&self) -> ExcisionShape;

    fn try_adapt(&self, module: &dyn ExtensionModule) -> Result<AdaptedExtension, AdaptError>;
}

/// Land Value Overhaul ships its own property-renter system with private
/// level queues.
#[derive(Debug, Default, Clone, Copy)]
pub struct LandValueOverhaulAdapter;

impl LandValueOverhaulAdapter {
    fn queue<'m>(module: &'m dyn ExtensionModule, field: &str) -> Result<&'m LevelQueue, AdaptError> {
        module
            .field(LVO_SYSTEM, field)
            .ok_or_else(|| AdaptError::MissingField {
                system: LVO_SYSTEM.to_string(),
                field: field.to_string(),
            })?
            .downcast_ref::<LevelQueue>()
            .ok_or_else(|| AdaptError::FieldType {
                field: field.to_string(),
                expected: "LevelQueue",
            })
    }
}

impl QueueAdapter for LandValueOverhaulAdapter {
    fn extension_name(&self) -> &str {
        LVO_EXTENSION
    }

    fn excision_shape(&self) -> ExcisionShape {
        ExcisionShape {
            work_items: &[LVO_LEVELUP_JOB, LVO_LEVELDOWN_JOB],
            end: RegionEnd::Label(LVO_REGION_END),
            require_all: false,
        }
    }

    fn try_adapt(&self, module: &dyn ExtensionModule) -> Result<AdaptedExtension, AdaptError> {
        let routine = module
            .routine(LVO_SYSTEM)
            .ok_or_else(|| AdaptError::MissingRoutine {
                system: LVO_SYSTEM.to_string(),
            })?;
        let upgrade = Self::queue(module, LVO_LEVELUP_FIELD)?;
        let downgrade = Self::queue(module, LVO_LEVELDOWN_FIELD)?;
        Ok(AdaptedExtension {
            routine: routine.to_string(),
            queues: QueuePair {
                upgrade: upgrade.clone(),
                downgrade: downgrade.clone(),
            },
        })
    }
}
