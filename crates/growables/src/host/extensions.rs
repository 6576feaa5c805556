//! Third-party extensions known to the host's asset database, and the host
//! routines scheduled each frame.

use std::any::Any;
use std::sync::Arc;

use bevy::prelude::*;

use super::property_renter::PROPERTY_RENTER_ROUTINE;
use super::routine::run_routine;

/// Loaded code of an extension, inspected through typed lookups.
pub trait ExtensionModule: Send + Sync {
    fn version(&self) -> &str;

    /// Registry name of the routine the module runs for `system`.
    fn routine(&self, system: &str) -> Option<&str>;

    /// A named field of one of the module's systems.
    fn field(&self, system: &str, field: &str) -> Option<&(dyn Any + Send + Sync)>;
}

pub struct ExtensionAsset {
    pub name: String,
    /// `None` when the asset is present but its code is not loaded.
    pub module: Option<Arc<dyn ExtensionModule>>,
}

#[derive(Resource, Default)]
pub struct ExtensionCatalog {
    assets: Vec<ExtensionAsset>,
}

impl ExtensionCatalog {
    pub fn install(&mut self, name: impl Into<String>, module: Arc<dyn ExtensionModule>) {
        self.assets.push(ExtensionAsset {
            name: name.into(),
            module: Some(module),
        });
    }

    pub fn install_unloaded(&mut self, name: impl Into<String>) {
        self.assets.push(ExtensionAsset {
            name: name.into(),
            module: None,
        });
    }

    pub fn find(&self, name: &str) -> Option<&ExtensionAsset> {
        self.assets.iter().find(|asset| asset.name == name)
    }
}

/// Routine names run by the host each frame, in order.
#[derive(Resource, Debug, Clone)]
pub struct ScheduledRoutines(pub Vec<String>);

impl Default for ScheduledRoutines {
    fn default() -> Self {
        Self(vec![PROPERTY_RENTER_ROUTINE.to_string()])
    }
}

impl ScheduledRoutines {
    /// Swaps `old` for `new`, as an extension does when it takes over a
    /// host system.
    pub fn replace(&mut self, old: &str, new: &str) -> bool {
        match self.0.iter_mut().find(|name| name.as_str() == old) {
            Some(slot) => {
                *slot = new.to_string();
                true
            }
            None => false,
        }
    }
}

pub fn run_scheduled_routines(world: &mut World) {
    let names = world.resource::<ScheduledRoutines>().0.clone();
    for name in &names {
        run_routine(world, name);
    }
}
