//! Benchmarks for the spatial queries on the level engine's hot path.
//!
//! Run with: cargo bench -p growables

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use bevy::math::{IVec2, Quat, Vec2, Vec3};
use bevy::prelude::{Entity, Transform};

use growables::config::{world_bounds, CELL_SIZE};
use growables::host::zoning::{ZoneBlock, ZoneType, ZoningGrid};
use growables::spatial::{max_height, validate_footprint, Bounds2, QuadTree};
use growables::zone_check::find_affected;

const RESIDENTIAL: ZoneType = ZoneType(1);

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// `count` small lots scattered over the central part of the world.
fn scattered_lots(count: usize) -> Vec<Bounds2> {
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    (0..count)
        .map(|_| {
            let center = Vec2::new(rng.gen_range(-4000.0..4000.0), rng.gen_range(-4000.0..4000.0));
            let half = Vec2::splat(CELL_SIZE * rng.gen_range(1..=3) as f32);
            Bounds2::from_center(center, half)
        })
        .collect()
}

fn entity_tree(lots: &[Bounds2]) -> QuadTree<Entity> {
    let mut tree = QuadTree::new(world_bounds());
    for (i, lot) in lots.iter().enumerate() {
        tree.insert(Entity::from_raw(i as u32), *lot);
    }
    tree
}

/// Rows of 4-deep blocks along east-west streets, alternately facing north
/// and south.
fn zoned_grid(rows: i32, blocks_per_row: i32) -> ZoningGrid {
    let mut grid = ZoningGrid::default();
    for row in 0..rows {
        let facing = if row % 2 == 0 { Vec2::Y } else { Vec2::NEG_Y };
        for column in 0..blocks_per_row {
            let position = Vec3::new(column as f32 * 48.0, 0.0, row as f32 * 40.0);
            grid.add_block(ZoneBlock::zoned(
                position,
                facing,
                IVec2::new(6, 4),
                RESIDENTIAL,
                60,
            ));
        }
    }
    grid
}

// ---------------------------------------------------------------------------
// Quad-tree
// ---------------------------------------------------------------------------

fn bench_quad_tree(c: &mut Criterion) {
    let mut group = c.benchmark_group("quad_tree");

    for count in [1_000usize, 10_000, 50_000] {
        let lots = scattered_lots(count);
        group.bench_with_input(BenchmarkId::new("build", count), &lots, |b, lots| {
            b.iter(|| black_box(entity_tree(lots)));
        });

        let tree = entity_tree(&lots);
        let probe = Bounds2::from_center(Vec2::new(120.0, -80.0), Vec2::splat(64.0));
        group.bench_with_input(BenchmarkId::new("query", count), &tree, |b, tree| {
            b.iter(|| black_box(tree.query(black_box(probe))));
        });
    }

    group.finish();
}

// ---------------------------------------------------------------------------
// Footprint scans
// ---------------------------------------------------------------------------

fn bench_footprint(c: &mut Criterion) {
    let mut group = c.benchmark_group("footprint");
    let grid = zoned_grid(40, 40);
    let aligned = Transform::from_xyz(960.0, 0.0, 800.0 - 8.0);
    let rotated = Transform::from_xyz(964.0, 0.0, 796.0).with_rotation(Quat::from_rotation_y(0.3));

    group.bench_function("max_height", |b| {
        b.iter(|| black_box(max_height(&grid, black_box(&aligned), IVec2::new(4, 3))));
    });
    group.bench_function("validate_aligned", |b| {
        b.iter(|| {
            black_box(validate_footprint(
                &grid,
                black_box(&aligned),
                IVec2::new(4, 3),
                RESIDENTIAL,
            ))
        });
    });
    group.bench_function("validate_rotated", |b| {
        b.iter(|| {
            black_box(validate_footprint(
                &grid,
                black_box(&rotated),
                IVec2::new(2, 2),
                RESIDENTIAL,
            ))
        });
    });

    group.finish();
}

// ---------------------------------------------------------------------------
// Zone sweep collection
// ---------------------------------------------------------------------------

fn bench_find_affected(c: &mut Criterion) {
    let mut group = c.benchmark_group("zone_sweep");
    let tree = entity_tree(&scattered_lots(20_000));

    for regions in [1usize, 16, 128] {
        let changed = scattered_lots(regions)
            .into_iter()
            .map(|bounds| bounds.expand(96.0))
            .collect::<Vec<_>>();
        group.bench_with_input(
            BenchmarkId::new("find_affected", regions),
            &changed,
            |b, changed| {
                b.iter(|| black_box(find_affected(changed, &tree, |_| true)));
            },
        );
    }

    group.finish();
}

// ---------------------------------------------------------------------------
// Register groups
// ---------------------------------------------------------------------------

criterion_group!(benches, bench_quad_tree, bench_footprint, bench_find_affected);
criterion_main!(benches);
