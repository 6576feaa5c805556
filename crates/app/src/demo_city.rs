//! A small seeded city so the engine has something to level.

use bevy::math::{IVec2, Vec2, Vec3};
use bevy::prelude::*;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use growables::host::components::{
    Building, BuildingCondition, CrimeProducer, ElectricityConsumer, GarbageProducer,
    MailProducer, PrefabRef, ResidentialProperty, WaterConsumer,
};
use growables::host::prefabs::{BuildingPrefab, BuildingPropertyData, PrefabCatalog};
use growables::host::zoning::{ZoneBlock, ZoneType, ZoneUpdateCollect, ZoningGrid};
use growables::spatial::Bounds2;

pub const RESIDENTIAL: ZoneType = ZoneType(1);
pub const COMMERCIAL: ZoneType = ZoneType(2);

const LOT: IVec2 = IVec2::new(2, 2);
const LOT_SPACING: f32 = 24.0;
const STREETS: i32 = 4;
const LOTS_PER_STREET: i32 = 12;

/// Drives building condition up and down so buildings cross the level
/// thresholds over a run.
#[derive(Resource)]
pub struct DemoRng(pub ChaCha8Rng);

fn homes(count: u32) -> BuildingPropertyData {
    BuildingPropertyData {
        residential_properties: count,
        ..Default::default()
    }
}

/// Fills the catalog and grid, and places one level-1 house per lot.
pub fn seed(world: &mut World, seed: u64) -> usize {
    let starter = {
        let mut catalog = world.resource_mut::<PrefabCatalog>();
        let residential = catalog.add_zone("Residential Low", RESIDENTIAL);
        catalog.add_zone("Commercial Low", COMMERCIAL);
        let mut starter = None;
        for level in 1..=3u8 {
            for variant in 0..2u32 {
                let height = 8.0 + f32::from(level) * 6.0 + variant as f32 * 2.0;
                let id = catalog.add_building(
                    BuildingPrefab::new(format!("house L{level} v{variant}"), LOT, height)
                        .spawnable(residential, level)
                        .with_property(homes(u32::from(level) * 2 + variant)),
                );
                starter.get_or_insert(id);
            }
        }
        starter
    };
    let Some(starter) = starter else {
        return 0;
    };

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut lots = Vec::new();
    let mut grid = world.resource_mut::<ZoningGrid>();
    for street in 0..STREETS {
        for lot in 0..LOTS_PER_STREET {
            let position = Vec2::new(lot as f32 * LOT_SPACING, street as f32 * 64.0);
            let clearance = rng.gen_range(18..=40);
            grid.add_block(ZoneBlock::zoned(
                Vec3::new(position.x, 0.0, position.y),
                Vec2::Y,
                LOT,
                RESIDENTIAL,
                clearance,
            ));
            lots.push(position);
        }
    }

    for position in &lots {
        world.spawn((
            (
                Building::default(),
                PrefabRef(starter),
                Transform::from_xyz(position.x, 0.0, position.y),
                BuildingCondition {
                    condition: rng.gen_range(-60..60),
                },
                ResidentialProperty,
            ),
            (
                ElectricityConsumer,
                WaterConsumer,
                GarbageProducer,
                MailProducer,
                CrimeProducer {
                    crime: rng.gen_range(0.0..4.0),
                    patrol_request: None,
                },
            ),
        ));
    }
    world.insert_resource(DemoRng(rng));
    lots.len()
}

/// Random walk on every building's condition.
pub fn drift_conditions(rng: Option<ResMut<DemoRng>>, mut buildings: Query<&mut BuildingCondition>) {
    let Some(mut rng) = rng else {
        return;
    };
    for mut condition in &mut buildings {
        condition.condition += rng.0.gen_range(-14..=16);
    }
}

/// Turns the first street commercial, as a player repainting zones would.
pub fn rezone_first_street(world: &mut World) -> usize {
    let area = Bounds2::new(
        Vec2::new(-LOT_SPACING, -16.0),
        Vec2::new(LOT_SPACING * LOTS_PER_STREET as f32, 16.0),
    );
    let changed = world.resource_mut::<ZoningGrid>().rezone(area, COMMERCIAL);
    world.resource_mut::<ZoneUpdateCollect>().push(area);
    changed
}
