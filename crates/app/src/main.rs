//! Headless driver for the growables engine.
//!
//! Builds the host and the engine on a `MinimalPlugins` App, seeds a demo
//! city, runs a fixed number of ticks and prints a JSON summary to stdout.
//!
//! Usage: `plop_growables [settings.json] [ticks] [seed]`

mod demo_city;

use std::collections::BTreeMap;
use std::path::PathBuf;

use bevy::log::LogPlugin;
use bevy::prelude::*;

use growables::classification::{Plopped, Spawned};
use growables::host::components::{Abandoned, Condemned, PrefabRef, UnderConstruction};
use growables::host::events::SessionLoaded;
use growables::host::prefabs::PrefabCatalog;
use growables::host::HostPlugin;
use growables::levelling::LevelQueues;
use growables::settings::{GrowablesSettings, SettingsPath};
use growables::{GrowablesPlugin, SimulationSet};

const DEFAULT_SETTINGS: &str = "growables_settings.json";
const DEFAULT_TICKS: u32 = 600;
const DEFAULT_SEED: u64 = 42;

fn main() {
    let mut args = std::env::args().skip(1);
    let settings_path = args
        .next()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_SETTINGS));
    let ticks = args
        .next()
        .and_then(|t| t.parse().ok())
        .unwrap_or(DEFAULT_TICKS);
    let seed = args
        .next()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_SEED);

    let mut app = App::new();
    app.add_plugins((MinimalPlugins, LogPlugin::default()));

    // Loaded after the log plugin so a missing or corrupt file is reported.
    let settings = GrowablesSettings::load_or_default(&settings_path);
    app.insert_resource(settings)
        .insert_resource(SettingsPath(Some(settings_path)))
        .add_plugins((HostPlugin, GrowablesPlugin))
        .add_systems(
            FixedUpdate,
            demo_city::drift_conditions.in_set(SimulationSet::HostPre),
        );

    // Startup: host patches and queue binding.
    app.update();

    let lots = demo_city::seed(app.world_mut(), seed);
    info!("Seeded {} lots", lots);
    app.world_mut().send_event(SessionLoaded);

    for tick in 0..ticks {
        if tick == ticks / 2 {
            let cells = demo_city::rezone_first_street(app.world_mut());
            info!("Rezoned {} cells to commercial", cells);
        }
        app.world_mut().run_schedule(FixedUpdate);
    }

    let summary = summarize(app.world_mut(), ticks);
    match serde_json::to_string_pretty(&summary) {
        Ok(text) => println!("{text}"),
        Err(e) => error!("Failed to encode summary: {}", e),
    }

    app.world_mut().send_event(AppExit::Success);
    app.world_mut().run_schedule(Last);
}

fn count<C: Component>(world: &mut World) -> usize {
    world.query_filtered::<(), With<C>>().iter(world).count()
}

fn summarize(world: &mut World, ticks: u32) -> serde_json::Value {
    let mut prefabs = world.query::<&PrefabRef>();
    let mut by_prefab = BTreeMap::<String, usize>::new();
    let catalog = world.resource::<PrefabCatalog>();
    for prefab_ref in prefabs.iter(world) {
        let name = catalog
            .building(prefab_ref.0)
            .map_or_else(|| format!("{:?}", prefab_ref.0), |prefab| prefab.name.clone());
        *by_prefab.entry(name).or_default() += 1;
    }
    let source = world
        .get_resource::<LevelQueues>()
        .and_then(|queues| queues.source().map(|source| format!("{source:?}")));

    serde_json::json!({
        "ticks": ticks,
        "queue_source": source,
        "spawned": count::<Spawned>(world),
        "plopped": count::<Plopped>(world),
        "under_construction": count::<UnderConstruction>(world),
        "abandoned": count::<Abandoned>(world),
        "condemned": count::<Condemned>(world),
        "buildings_by_prefab": by_prefab,
    })
}
