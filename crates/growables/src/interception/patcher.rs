use std::fmt;

use bevy::prelude::*;

use super::adapter::{LandValueOverhaulAdapter, QueueAdapter};
use super::excision::{excise_level_jobs, ExcisionShape};
use crate::error::{AdaptError, PatchError};
use crate::host::events::SessionLoaded;
use crate::host::extensions::ExtensionCatalog;
use crate::host::property_renter::PROPERTY_RENTER_ROUTINE;
use crate::host::queues::HostLevelQueues;
use crate::host::routine::RoutineRegistry;
use crate::levelling::{LevelQueues, QueueSource};
use crate::simulation_sets::SimulationSet;

/// Owner name under which overrides are installed.
pub const PATCH_OWNER: &str = "plop-the-growables";

/// Outcome of probing for a third-party extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtensionProbe {
    NotDetected,
    /// The asset exists but its code is not loaded.
    NotLoaded,
    Redirected,
    /// Redirected by an earlier probe.
    AlreadyRedirected,
    Incompatible(AdaptError),
}

impl fmt::Display for ExtensionProbe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtensionProbe::NotDetected => write!(f, "not detected"),
            ExtensionProbe::NotLoaded => write!(f, "not loaded"),
            ExtensionProbe::Redirected => write!(f, "redirected"),
            ExtensionProbe::AlreadyRedirected => write!(f, "already redirected"),
            ExtensionProbe::Incompatible(e) => write!(f, "incompatible: {e}"),
        }
    }
}

/// Owns every override this layer installs.
#[derive(Resource)]
pub struct Patcher {
    owner: String,
    adapter: Box<dyn QueueAdapter>,
    host_patched: bool,
    redirected: bool,
}

impl Patcher {
    pub fn new(owner: impl Into<String>) -> Self {
        Self::with_adapter(owner, LandValueOverhaulAdapter)
    }

    pub fn with_adapter(owner: impl Into<String>, adapter: impl QueueAdapter + 'static) -> Self {
        Self {
            owner: owner.into(),
            adapter: Box::new(adapter),
            host_patched: false,
            redirected: false,
        }
    }

    /// Name the overrides are installed under.
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Whether the host routine currently runs without its level jobs.
    pub fn host_patched(&self) -> bool {
        self.host_patched
    }

    /// Whether the engine drains an extension's queues.
    pub fn redirected(&self) -> bool {
        self.redirected
    }

    /// Overrides the host property-renter routine with a copy lacking its
    /// level jobs. On error nothing is installed.
    pub fn patch_host(&mut self, registry: &mut RoutineRegistry) -> Result<(), PatchError> {
        if self.host_patched {
            return Ok(());
        }
        let original = registry
            .original(PROPERTY_RENTER_ROUTINE)
            .ok_or_else(|| PatchError::UnknownRoutine(PROPERTY_RENTER_ROUTINE.to_string()))?;
        let patched = excise_level_jobs(PROPERTY_RENTER_ROUTINE, original, &ExcisionShape::HOST)?;
        registry
            .install_override(PROPERTY_RENTER_ROUTINE, &self.owner, patched)
            .map_err(|rejection| PatchError::from_rejection(PROPERTY_RENTER_ROUTINE, rejection))?;
        self.host_patched = true;
        Ok(())
    }

    /// Looks for the supported extension and, if it can be adapted, cuts its
    /// level jobs out and rebinds the engine to its queues. The queues are
    /// extracted before anything is changed, so any failure leaves the
    /// current binding and routines as they were.
    pub fn probe_extension(
        &mut self,
        catalog: &ExtensionCatalog,
        registry: &mut RoutineRegistry,
        queues: &mut LevelQueues,
    ) -> ExtensionProbe {
        if self.redirected {
            return ExtensionProbe::AlreadyRedirected;
        }
        let name = self.adapter.extension_name();
        let Some(asset) = catalog.find(name) else {
            return ExtensionProbe::NotDetected;
        };
        let Some(module) = asset.module.as_deref() else {
            return ExtensionProbe::NotLoaded;
        };
        info!("{} {} found", name, module.version());

        let adapted = match self.adapter.try_adapt(module) {
            Ok(adapted) => adapted,
            Err(e) => return ExtensionProbe::Incompatible(e),
        };
        let patched = registry
            .original(&adapted.routine)
            .ok_or_else(|| PatchError::UnknownRoutine(adapted.routine.clone()))
            .and_then(|steps| excise_level_jobs(&adapted.routine, steps, &self.adapter.excision_shape()));
        let patched = match patched {
            Ok(patched) => patched,
            Err(e) => return ExtensionProbe::Incompatible(e.into()),
        };
        if let Err(rejection) = registry.install_override(&adapted.routine, &self.owner, patched) {
            let e = PatchError::from_rejection(&adapted.routine, rejection);
            return ExtensionProbe::Incompatible(e.into());
        }

        queues.bind(adapted.queues, QueueSource::Extension(name.to_string()));
        self.redirected = true;
        ExtensionProbe::Redirected
    }

    /// Removes every override this patcher installed and unbinds the engine.
    /// Returns the number of routines restored.
    pub fn unpatch_all(&mut self, registry: &mut RoutineRegistry, queues: Option<&mut LevelQueues>) -> usize {
        info!("Reverting all applied patches for {}", self.owner);
        let restored = registry.remove_overrides(&self.owner);
        self.host_patched = false;
        self.redirected = false;
        if let Some(queues) = queues {
            queues.unbind();
        }
        restored
    }
}

/// Makes `patcher` the active one, reverting any patcher already active, then
/// patches the host routine and binds the built-in queues if nothing else is
/// bound.
pub fn install_patcher(world: &mut World, mut patcher: Patcher) {
    if let Some(existing) = world.get_resource::<Patcher>() {
        error!("Existing patcher {} detected; reverting", existing.owner());
        teardown(world);
    }

    info!("Applying host patches for {}", patcher.owner());
    let result = match world.get_resource_mut::<RoutineRegistry>() {
        Some(mut registry) => patcher.patch_host(&mut registry),
        None => Err(PatchError::UnknownRoutine(PROPERTY_RENTER_ROUTINE.to_string())),
    };
    match result {
        Ok(()) => info!("Host level jobs removed from {}", PROPERTY_RENTER_ROUTINE),
        Err(e) => error!("Host routine left unpatched: {}", e),
    }

    let host = world.get_resource::<HostLevelQueues>().map(|host| host.0.clone());
    if let (Some(host), Some(mut queues)) = (host, world.get_resource_mut::<LevelQueues>()) {
        if queues.pair().is_none() {
            queues.bind(host, QueueSource::BuiltIn);
        }
    }
    world.insert_resource(patcher);
}

pub fn apply_host_patches(world: &mut World) {
    install_patcher(world, Patcher::new(PATCH_OWNER));
}

/// Restores the host and any redirected extension. Safe to call when nothing
/// is patched.
pub fn teardown(world: &mut World) {
    let Some(mut patcher) = world.remove_resource::<Patcher>() else {
        return;
    };
    let restored = match world.get_resource_mut::<RoutineRegistry>() {
        Some(mut registry) => patcher.unpatch_all(&mut registry, None),
        None => 0,
    };
    if let Some(mut queues) = world.get_resource_mut::<LevelQueues>() {
        queues.unbind();
    }
    info!("Teardown restored {} routines", restored);
}

pub fn redirect_on_session_load(
    mut loads: EventReader<SessionLoaded>,
    patcher: Option<ResMut<Patcher>>,
    catalog: Res<ExtensionCatalog>,
    mut registry: ResMut<RoutineRegistry>,
    mut queues: ResMut<LevelQueues>,
) {
    if loads.read().count() == 0 {
        return;
    }
    let Some(mut patcher) = patcher else {
        return;
    };
    match patcher.probe_extension(&catalog, &mut registry, &mut queues) {
        ExtensionProbe::Redirected => info!("Level queues redirected to {}", patcher.adapter.extension_name()),
        ExtensionProbe::Incompatible(e) => {
            warn!("{} incompatible: {}; keeping current level queues", patcher.adapter.extension_name(), e)
        }
        probe => info!("{} {}", patcher.adapter.extension_name(), probe),
    }
}

pub fn teardown_on_exit(mut exits: EventReader<AppExit>, mut commands: Commands) {
    if exits.read().count() > 0 {
        commands.queue(teardown);
    }
}

pub struct InterceptionPlugin;

impl Plugin for InterceptionPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, apply_host_patches)
            .add_systems(
                FixedUpdate,
                redirect_on_session_load.in_set(SimulationSet::Classify),
            )
            .add_systems(Last, teardown_on_exit);
    }
}
