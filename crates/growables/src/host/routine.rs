//! Host routines as ordered, labelled steps that can be overridden.
//!
//! A routine is what a host system runs each frame. Each step declares the
//! work-item types it creates and whether it hands its result off as the
//! frame's job dependency. Overrides replace the active step list on behalf
//! of an owner and can be removed again, restoring the original.

use std::fmt;
use std::sync::Arc;

use bevy::prelude::*;
use bevy::utils::HashMap;

pub type StepAction = Arc<dyn Fn(&mut World) + Send + Sync>;

#[derive(Clone)]
pub struct RoutineStep {
    pub label: &'static str,
    /// Work-item types this step declares.
    pub locals: &'static [&'static str],
    /// Whether this step hands its job off as the routine's dependency.
    pub hands_off: bool,
    action: StepAction,
}

impl RoutineStep {
    pub fn new(label: &'static str, action: impl Fn(&mut World) + Send + Sync + 'static) -> Self {
        Self {
            label,
            locals: &[],
            hands_off: false,
            action: Arc::new(action),
        }
    }

    pub fn declaring(mut self, locals: &'static [&'static str]) -> Self {
        self.locals = locals;
        self
    }

    pub fn handing_off(mut self) -> Self {
        self.hands_off = true;
        self
    }

    pub fn declares_any(&self, types: &[&str]) -> bool {
        self.locals.iter().any(|local| types.contains(local))
    }

    pub fn run(&self, world: &mut World) {
        (self.action)(world);
    }
}

impl fmt::Debug for RoutineStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RoutineStep")
            .field("label", &self.label)
            .field("locals", &self.locals)
            .field("hands_off", &self.hands_off)
            .finish()
    }
}

#[derive(Debug, Clone)]
struct RoutineOverride {
    owner: String,
    steps: Arc<[RoutineStep]>,
}

#[derive(Debug, Clone)]
struct Routine {
    original: Arc<[RoutineStep]>,
    active: Option<RoutineOverride>,
}

/// Returned when an override cannot be installed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OverrideRejected {
    UnknownRoutine,
    OwnedBy(String),
}

#[derive(Resource, Debug, Default)]
pub struct RoutineRegistry {
    routines: HashMap<String, Routine>,
}

impl RoutineRegistry {
    pub fn register(&mut self, name: impl Into<String>, steps: Vec<RoutineStep>) {
        self.routines.insert(
            name.into(),
            Routine {
                original: steps.into(),
                active: None,
            },
        );
    }

    pub fn contains(&self, name: &str) -> bool {
        self.routines.contains_key(name)
    }

    pub fn original(&self, name: &str) -> Option<&[RoutineStep]> {
        self.routines.get(name).map(|r| &*r.original)
    }

    /// Steps that currently run for `name`.
    pub fn active_steps(&self, name: &str) -> Option<Arc<[RoutineStep]>> {
        self.routines.get(name).map(|r| match &r.active {
            Some(over) => Arc::clone(&over.steps),
            None => Arc::clone(&r.original),
        })
    }

    pub fn override_owner(&self, name: &str) -> Option<&str> {
        self.routines
            .get(name)
            .and_then(|r| r.active.as_ref())
            .map(|o| o.owner.as_str())
    }

    pub fn install_override(
        &mut self,
        name: &str,
        owner: &str,
        steps: Vec<RoutineStep>,
    ) -> Result<(), OverrideRejected> {
        let routine = self
            .routines
            .get_mut(name)
            .ok_or(OverrideRejected::UnknownRoutine)?;
        if let Some(existing) = &routine.active {
            if existing.owner != owner {
                return Err(OverrideRejected::OwnedBy(existing.owner.clone()));
            }
        }
        routine.active = Some(RoutineOverride {
            owner: owner.to_string(),
            steps: steps.into(),
        });
        Ok(())
    }

    /// Removes every override installed by `owner`; returns how many.
    pub fn remove_overrides(&mut self, owner: &str) -> usize {
        let mut removed = 0;
        for routine in self.routines.values_mut() {
            if routine.active.as_ref().is_some_and(|o| o.owner == owner) {
                routine.active = None;
                removed += 1;
            }
        }
        removed
    }
}

/// Runs the active steps of a registered routine. Unknown routines are a no-op.
pub fn run_routine(world: &mut World, name: &str) {
    let Some(steps) = world.resource::<RoutineRegistry>().active_steps(name) else {
        return;
    };
    for step in steps.iter() {
        step.run(world);
    }
}
