//! The host's property-renter routine: evaluates building condition, fills the
//! level queues and, unless overridden, runs its own level jobs on them.

use bevy::prelude::*;

use super::components::{Building, BuildingCondition};
use super::queues::HostLevelQueues;
use super::routine::RoutineStep;

pub const PROPERTY_RENTER_ROUTINE: &str = "PropertyRenterSystem::on_update";
pub const LEVELUP_JOB: &str = "PropertyRenterSystem::LevelupJob";
pub const LEVELDOWN_JOB: &str = "PropertyRenterSystem::LeveldownJob";

/// Condition at which a building qualifies for a level-up.
pub const LEVEL_UP_CONDITION: i32 = 100;
/// Condition at which a building qualifies for a level-down.
pub const LEVEL_DOWN_CONDITION: i32 = -100;

#[derive(Resource, Debug, Default)]
pub struct PropertyRenterStats {
    pub evaluations: u64,
    /// Entries consumed by the routine's own level jobs.
    pub host_level_ups: u32,
    pub host_level_downs: u32,
    pub frames: u64,
}

pub fn property_renter_routine() -> Vec<RoutineStep> {
    vec![
        RoutineStep::new("evaluate_conditions", evaluate_conditions),
        RoutineStep::new("schedule_levelup_job", host_level_up_job).declaring(&[LEVELUP_JOB]),
        RoutineStep::new("schedule_leveldown_job", host_level_down_job)
            .declaring(&[LEVELDOWN_JOB]),
        RoutineStep::new("store_dependency", |_: &mut World| {}).handing_off(),
        RoutineStep::new("record_frame", |world: &mut World| {
            world.resource_mut::<PropertyRenterStats>().frames += 1;
        }),
    ]
}

/// Moves buildings past a condition threshold into the matching queue. A
/// building lands in at most one queue per frame.
pub fn evaluate_conditions(world: &mut World) {
    let queues = world.resource::<HostLevelQueues>().0.clone();
    let mut buildings = world.query_filtered::<(Entity, &mut BuildingCondition), With<Building>>();
    let mut evaluated = 0;
    for (entity, mut condition) in buildings.iter_mut(world) {
        evaluated += 1;
        if condition.condition >= LEVEL_UP_CONDITION {
            condition.condition = 0;
            queues.upgrade.enqueue(entity);
        } else if condition.condition <= LEVEL_DOWN_CONDITION {
            condition.condition = 0;
            queues.downgrade.enqueue(entity);
        }
    }
    world.resource_mut::<PropertyRenterStats>().evaluations += evaluated;
}

fn host_level_up_job(world: &mut World) {
    let drained = world.resource::<HostLevelQueues>().0.upgrade.clear();
    world.resource_mut::<PropertyRenterStats>().host_level_ups += drained as u32;
}

fn host_level_down_job(world: &mut World) {
    let drained = world.resource::<HostLevelQueues>().0.downgrade.clear();
    world.resource_mut::<PropertyRenterStats>().host_level_downs += drained as u32;
}
