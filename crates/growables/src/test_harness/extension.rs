//! A stand-in for the Land Value Overhaul extension: its own property-renter
//! routine with private level queues and level jobs that drain them.

use std::any::Any;
use std::sync::Arc;

use bevy::prelude::*;

use crate::host::extensions::{ExtensionCatalog, ExtensionModule, ScheduledRoutines};
use crate::host::property_renter::PROPERTY_RENTER_ROUTINE;
use crate::host::queues::QueuePair;
use crate::host::routine::{RoutineRegistry, RoutineStep};
use crate::interception::{
    LVO_EXTENSION, LVO_LEVELDOWN_FIELD, LVO_LEVELDOWN_JOB, LVO_LEVELUP_FIELD, LVO_LEVELUP_JOB,
    LVO_REGION_END, LVO_SYSTEM,
};

use super::TestHost;

pub const LVO_ROUTINE: &str = "LandValueOverhaul::PropertyRenterSystem::on_update";

/// Entries the extension's own level jobs consumed.
#[derive(Resource, Debug, Default)]
pub struct ExtensionJobStats {
    pub level_ups: usize,
    pub level_downs: usize,
    pub frames: u32,
}

pub struct TestExtension {
    pub queues: QueuePair,
    /// Field names to expose; a missing or wrong one makes the module
    /// incompatible.
    pub upgrade_field: &'static str,
    pub expose_wrong_type: bool,
}

impl Default for TestExtension {
    fn default() -> Self {
        Self {
            queues: QueuePair::default(),
            upgrade_field: LVO_LEVELUP_FIELD,
            expose_wrong_type: false,
        }
    }
}

impl ExtensionModule for TestExtension {
    fn version(&self) -> &str {
        "1.4.0"
    }

    fn routine(&self, system: &str) -> Option<&str> {
        (system == LVO_SYSTEM).then_some(LVO_ROUTINE)
    }

    fn field(&self, system: &str, field: &str) -> Option<&(dyn Any + Send + Sync)> {
        if system != LVO_SYSTEM {
            return None;
        }
        if field == self.upgrade_field {
            if self.expose_wrong_type {
                return Some(&self.upgrade_field as &(dyn Any + Send + Sync));
            }
            return Some(&self.queues.upgrade as &(dyn Any + Send + Sync));
        }
        (field == LVO_LEVELDOWN_FIELD).then_some(&self.queues.downgrade as &(dyn Any + Send + Sync))
    }
}

fn extension_routine(queues: &QueuePair, region_end: &'static str) -> Vec<RoutineStep> {
    let upgrade = queues.upgrade.clone();
    let downgrade = queues.downgrade.clone();
    vec![
        RoutineStep::new("update_rents", |_: &mut World| {}),
        RoutineStep::new("create_levelup_job", move |world: &mut World| {
            world.resource_mut::<ExtensionJobStats>().level_ups += upgrade.clear();
        })
        .declaring(&[LVO_LEVELUP_JOB]),
        RoutineStep::new("create_leveldown_job", move |world: &mut World| {
            world.resource_mut::<ExtensionJobStats>().level_downs += downgrade.clear();
        })
        .declaring(&[LVO_LEVELDOWN_JOB]),
        RoutineStep::new(region_end, |_: &mut World| {}),
        RoutineStep::new("count_frame", |world: &mut World| {
            world.resource_mut::<ExtensionJobStats>().frames += 1;
        }),
    ]
}

impl TestHost {
    /// Installs the extension the way it installs itself: registers its
    /// routine and swaps it in for the host's property-renter routine.
    /// Returns its level queues.
    pub fn install_extension(&mut self, extension: TestExtension) -> QueuePair {
        self.install_extension_with_region_end(extension, LVO_REGION_END)
    }

    /// Like `install_extension`, with the job region closed by a step of a
    /// different label.
    pub fn install_extension_with_region_end(
        &mut self,
        extension: TestExtension,
        region_end: &'static str,
    ) -> QueuePair {
        let queues = extension.queues.clone();
        let world = self.world_mut();
        world.init_resource::<ExtensionJobStats>();
        world
            .resource_mut::<RoutineRegistry>()
            .register(LVO_ROUTINE, extension_routine(&queues, region_end));
        world
            .resource_mut::<ScheduledRoutines>()
            .replace(PROPERTY_RENTER_ROUTINE, LVO_ROUTINE);
        world
            .resource_mut::<ExtensionCatalog>()
            .install(LVO_EXTENSION, Arc::new(extension));
        queues
    }

    /// The extension asset is present but its code never loaded.
    pub fn install_unloaded_extension(&mut self) {
        self.world_mut()
            .resource_mut::<ExtensionCatalog>()
            .install_unloaded(LVO_EXTENSION);
    }
}
