//! Upgrade and downgrade queue processing across whole ticks.

use bevy::math::Vec2;

use super::{City, CLEARANCE, LOT, RESIDENTIAL};
use crate::classification::LevelLocked;
use crate::host::components::{
    Abandoned, BuildingCondition, PrefabRef, PropertyOnMarket, PropertyToBeOnMarket,
    UnderConstruction,
};
use crate::host::events::{TriggerKind, ZoneBuiltLevelUpdate};
use crate::host::icons::IconPriority;
use crate::host::prefabs::BuildingPrefab;
use crate::host::BuildingConfiguration;

// ====================================================================
// Upgrades
// ====================================================================

#[test]
fn test_upgrade_picks_one_eligible_prefab() {
    let mut city = City::new();
    let building = city.house_at(Vec2::ZERO);
    city.host.enqueue_upgrade(building);
    city.host.tick(1);

    let site = *city
        .host
        .get::<UnderConstruction>(building)
        .expect("construction started");
    assert!(city.upgrades.contains(&site.new_prefab));
    assert_eq!(site.progress, u8::MAX);
    assert_eq!(city.host.trigger_count(TriggerKind::LevelUpResidential), 1);
    assert_eq!(
        city.host.drain_events::<ZoneBuiltLevelUpdate>(),
        vec![ZoneBuiltLevelUpdate {
            zone: city.residential,
            from_level: 1,
            to_level: 2,
            squares: 4,
        }]
    );
    let level_up = city.host.resource::<BuildingConfiguration>().level_up_notification;
    assert_eq!(city.host.icons(building), vec![(level_up, IconPriority::Info)]);
    assert_eq!(city.host.host_queue_lengths(), (0, 0));
}

#[test]
fn test_upgrade_completes_on_next_tick() {
    let mut city = City::new();
    let building = city.house_at(Vec2::ZERO);
    city.host.enqueue_upgrade(building);
    city.host.tick(1);
    let target = city
        .host
        .get::<UnderConstruction>(building)
        .map(|site| site.new_prefab)
        .expect("construction started");

    city.host.tick(1);
    assert!(!city.host.has::<UnderConstruction>(building));
    assert_eq!(city.host.get::<PrefabRef>(building), Some(&PrefabRef(target)));
    let tally = city.host.resource::<crate::host::events::ZoneBuiltTally>();
    assert_eq!(tally.squares(city.residential, 1), -4);
    assert_eq!(tally.squares(city.residential, 2), 4);
}

#[test]
fn test_upgrade_respects_height_clearance() {
    let mut city = City::new();
    let tower = city.host.add_prefab(
        BuildingPrefab::new("tower", LOT, 60.0)
            .spawnable(city.residential, 3)
            .with_property(super::homes(40)),
    );
    city.host.zone_lot(Vec2::ZERO, LOT, RESIDENTIAL, CLEARANCE);
    let building = city.host.spawn_building(city.upgrades[0], Vec2::ZERO);
    city.host.enqueue_upgrade(building);
    city.host.tick(1);

    assert!(!city.host.has::<UnderConstruction>(building), "{tower:?} is too tall");
    assert_eq!(city.host.host_queue_lengths(), (0, 0));
    assert!(city.host.drain_events::<ZoneBuiltLevelUpdate>().is_empty());
}

#[test]
fn test_top_level_building_is_not_rebuilt_at_same_level() {
    let mut city = City::new();
    let [summit, peer] = ["summit", "summit-b"].map(|name| {
        city.host.add_prefab(
            BuildingPrefab::new(name, LOT, 10.0)
                .spawnable(city.residential, u8::MAX)
                .with_property(super::homes(2)),
        )
    });
    city.host.zone_lot(Vec2::ZERO, LOT, RESIDENTIAL, CLEARANCE);
    let building = city.host.spawn_building(summit, Vec2::ZERO);
    city.host.enqueue_upgrade(building);
    city.host.tick(1);

    assert!(!city.host.has::<UnderConstruction>(building), "{peer:?} is not a level up");
    assert!(city.host.drain_events::<ZoneBuiltLevelUpdate>().is_empty());
    assert_eq!(city.host.trigger_count(TriggerKind::LevelUpResidential), 0);
    assert_eq!(city.host.host_queue_lengths(), (0, 0));
}

#[test]
fn test_locked_building_is_not_upgraded() {
    let mut city = City::new();
    let building = city.house_at(Vec2::ZERO);
    city.host.insert(building, LevelLocked);
    city.host.enqueue_upgrade(building);
    city.host.tick(1);
    assert!(!city.host.has::<UnderConstruction>(building));
    assert_eq!(city.host.trigger_count(TriggerKind::LevelUpResidential), 0);
}

#[test]
fn test_condition_threshold_drives_upgrade() {
    let mut city = City::new();
    let building = city.house_at(Vec2::ZERO);
    city.host.insert(building, BuildingCondition { condition: 150 });
    city.host.tick(1);
    assert!(city.host.has::<UnderConstruction>(building));
    assert_eq!(
        city.host.get::<BuildingCondition>(building),
        Some(&BuildingCondition { condition: 0 })
    );
}

#[test]
fn test_same_seed_same_choice() {
    let pick = || {
        let mut city = City::new();
        let building = city.house_at(Vec2::ZERO);
        city.host.enqueue_upgrade(building);
        city.host.tick(1);
        city.host
            .get::<UnderConstruction>(building)
            .map(|site| site.new_prefab)
    };
    assert_eq!(pick(), pick());
}

// ====================================================================
// Downgrades
// ====================================================================

#[test]
fn test_locked_building_goes_back_on_market() {
    let mut city = City::new();
    let building = city.house_at(Vec2::ZERO);
    city.host.insert(building, (LevelLocked, PropertyOnMarket));
    city.host.enqueue_downgrade(building);
    city.host.tick(1);

    assert_eq!(city.host.count::<Abandoned>(), 0);
    assert!(city.host.has::<PropertyToBeOnMarket>(building));
    assert!(!city.host.has::<PropertyOnMarket>(building));
    assert_eq!(city.host.trigger_count(TriggerKind::LevelDownResidential), 0);
}

#[test]
fn test_disabled_abandonment_goes_back_on_market() {
    let mut city = City::new();
    city.host.update_settings(|s| s.disable_abandonment = true);
    let building = city.house_at(Vec2::ZERO);
    city.host.enqueue_downgrade(building);
    city.host.tick(1);

    assert!(!city.host.has::<Abandoned>(building));
    assert!(city.host.has::<PropertyToBeOnMarket>(building));
}

// ====================================================================
// Queue invariants
// ====================================================================

#[test]
fn test_global_disable_drains_without_mutation() {
    let mut city = City::new();
    city.host.update_settings(|s| s.disable_levelling = true);
    let a = city.house_at(Vec2::ZERO);
    let b = city.house_at(Vec2::new(48.0, 0.0));
    for _ in 0..3 {
        city.host.enqueue_upgrade(a);
        city.host.enqueue_downgrade(b);
    }
    city.host.tick(1);

    assert_eq!(city.host.host_queue_lengths(), (0, 0));
    assert_eq!(city.host.count::<UnderConstruction>(), 0);
    assert_eq!(city.host.count::<Abandoned>(), 0);
    assert_eq!(city.host.count::<PropertyToBeOnMarket>(), 0);
    assert!(city.host.drain_events::<ZoneBuiltLevelUpdate>().is_empty());
}

#[test]
fn test_entity_in_both_queues_is_processed_once() {
    let mut city = City::new();
    let building = city.house_at(Vec2::ZERO);
    city.host.enqueue_upgrade(building);
    city.host.enqueue_upgrade(building);
    city.host.enqueue_downgrade(building);
    city.host.tick(1);

    assert!(city.host.has::<UnderConstruction>(building));
    assert!(!city.host.has::<Abandoned>(building));
    assert_eq!(city.host.drain_events::<ZoneBuiltLevelUpdate>().len(), 1);
    assert_eq!(city.host.host_queue_lengths(), (0, 0));

    // The ledger resets each tick.
    city.host.tick(1);
    city.host.enqueue_downgrade(building);
    city.host.tick(1);
    assert!(city.host.has::<Abandoned>(building));
}

#[test]
fn test_missing_building_configuration_holds_queues() {
    let mut city = City::new();
    city.host.remove_building_configuration();
    let building = city.house_at(Vec2::ZERO);
    city.host.enqueue_upgrade(building);
    city.host.enqueue_downgrade(building);
    city.host.tick(1);

    assert_eq!(city.host.host_queue_lengths(), (1, 1));
    assert!(!city.host.has::<UnderConstruction>(building));
    assert!(!city.host.has::<Abandoned>(building));
}

#[test]
fn test_stale_entities_are_skipped() {
    let mut city = City::new();
    let building = city.house_at(Vec2::ZERO);
    city.host.world_mut().despawn(building);
    city.host.enqueue_upgrade(building);
    city.host.enqueue_downgrade(building);
    city.host.tick(1);
    assert_eq!(city.host.host_queue_lengths(), (0, 0));
    assert_eq!(city.host.count::<UnderConstruction>(), 0);
}
