//! Settings changes reaching the engine while it runs.

use bevy::math::Vec2;

use super::City;
use crate::classification::{LevelLocked, PlacementConfig};
use crate::host::components::UnderConstruction;
use crate::levelling::LevellingConfig;
use crate::settings::{GrowablesSettings, SettingChanged, SettingsPath};
use crate::zone_check::ZoneCheckConfig;

#[test]
fn test_changes_reach_every_cached_config() {
    let mut city = City::new();
    city.host.tick(1);
    city.host.update_settings(|s| {
        s.disable_levelling = true;
        s.disable_abandonment = true;
        s.lock_plopped_buildings = true;
        s.spawned_zone_despawn = true;
    });
    city.host.tick(1);

    assert_eq!(
        *city.host.resource::<LevellingConfig>(),
        LevellingConfig {
            disable_levelling: true,
            disable_abandonment: true,
        }
    );
    assert!(city.host.resource::<PlacementConfig>().lock_plopped_buildings);
    assert_eq!(
        *city.host.resource::<ZoneCheckConfig>(),
        ZoneCheckConfig { enabled: true }
    );
}

#[test]
fn test_one_event_per_changed_toggle() {
    let mut city = City::new();
    city.host.tick(1);
    city.host.drain_events::<SettingChanged>();

    city.host.update_settings(|s| s.disable_abandonment = true);
    city.host.tick(3);
    assert_eq!(
        city.host.drain_events::<SettingChanged>(),
        vec![SettingChanged::DisableAbandonment(true)]
    );
}

#[test]
fn test_reenabling_levelling_resumes_processing() {
    let mut city = City::new();
    let building = city.house_at(Vec2::ZERO);
    city.host.update_settings(|s| s.disable_levelling = true);
    city.host.enqueue_upgrade(building);
    city.host.tick(1);
    assert!(!city.host.has::<UnderConstruction>(building));

    city.host.update_settings(|s| s.disable_levelling = false);
    city.host.enqueue_upgrade(building);
    city.host.tick(1);
    assert!(city.host.has::<UnderConstruction>(building));
}

#[test]
fn test_lock_setting_applies_to_later_placements_only() {
    let mut city = City::new();
    let before = city.host.place_building(city.house, Vec2::ZERO);
    city.host.tick(1);

    city.host.update_settings(|s| s.lock_plopped_buildings = true);
    let after = city.host.place_building(city.house, Vec2::new(48.0, 0.0));
    city.host.tick(1);

    assert!(!city.host.has::<LevelLocked>(before));
    assert!(city.host.has::<LevelLocked>(after));
}

#[test]
fn test_changed_settings_are_saved() {
    let path = std::env::temp_dir().join(format!(
        "growables_integration_{}.json",
        std::process::id()
    ));
    let mut city = City::new();
    city.host
        .world_mut()
        .insert_resource(SettingsPath(Some(path.clone())));
    city.host.tick(1);
    assert!(!path.exists(), "defaults are not written back");

    city.host.update_settings(|s| s.spawned_zone_despawn = true);
    city.host.tick(1);
    let saved = GrowablesSettings::load(&path).expect("settings written");
    assert!(saved.spawned_zone_despawn);
    let _ = std::fs::remove_file(&path);
}
