use std::f32::consts::{FRAC_PI_2, PI};

use bevy::math::{IVec2, Quat, Vec2, Vec3};
use bevy::transform::components::Transform;

use super::*;
use crate::host::zoning::{CellFlags, ValidArea, ZoneBlock, ZoneType, ZoningGrid};

const RESIDENTIAL: ZoneType = ZoneType(1);
const COMMERCIAL: ZoneType = ZoneType(2);

fn square(center: Vec2, half: f32) -> Bounds2 {
    Bounds2::from_center(center, Vec2::splat(half))
}

fn grid_with(block: ZoneBlock) -> ZoningGrid {
    let mut grid = ZoningGrid::default();
    grid.add_block(block);
    grid
}

fn residential_block(direction: Vec2, height: i16) -> ZoneBlock {
    ZoneBlock::zoned(Vec3::ZERO, direction, IVec2::new(2, 2), RESIDENTIAL, height)
}

// ====================================================================
// Bounds
// ====================================================================

#[test]
fn test_bounds_touching_edges_intersect() {
    let a = Bounds2::new(Vec2::ZERO, Vec2::splat(1.0));
    let b = Bounds2::new(Vec2::new(1.0, 0.0), Vec2::new(2.0, 1.0));
    let c = Bounds2::new(Vec2::new(1.5, 0.0), Vec2::new(2.0, 1.0));
    assert!(a.intersects(&b));
    assert!(!a.intersects(&c));
}

#[test]
fn test_bounds_quadrants_tile_parent() {
    let parent = square(Vec2::new(10.0, -10.0), 8.0);
    let quads = parent.quadrants();
    assert_eq!(quads[0].min, parent.min);
    assert_eq!(quads[3].max, parent.max);
    for quad in quads {
        assert!(parent.contains(&quad));
        assert_eq!(quad.max - quad.min, Vec2::splat(8.0));
    }
}

// ====================================================================
// Quad-tree
// ====================================================================

#[test]
fn test_quad_tree_query_after_splits() {
    let mut tree = QuadTree::with_limits(square(Vec2::ZERO, 64.0), 2, 4);
    for i in 0..16 {
        let x = -56.0 + (i % 4) as f32 * 32.0;
        let y = -56.0 + (i / 4) as f32 * 32.0;
        tree.insert(i, square(Vec2::new(x, y), 2.0));
    }
    assert_eq!(tree.len(), 16);

    let mut hits = tree.query(square(Vec2::new(-56.0, -56.0), 4.0));
    hits.sort_unstable();
    assert_eq!(hits, vec![0]);

    let mut row = tree.query(Bounds2::new(Vec2::new(-64.0, -60.0), Vec2::new(64.0, -52.0)));
    row.sort_unstable();
    assert_eq!(row, vec![0, 1, 2, 3]);
}

#[test]
fn test_quad_tree_keeps_straddling_and_outside_items_reachable() {
    let mut tree = QuadTree::with_limits(square(Vec2::ZERO, 64.0), 1, 4);
    tree.insert(1, square(Vec2::new(-40.0, -40.0), 1.0));
    tree.insert(2, square(Vec2::new(40.0, 40.0), 1.0));
    tree.insert(3, square(Vec2::ZERO, 4.0));
    tree.insert(4, square(Vec2::new(500.0, 0.0), 1.0));

    assert_eq!(tree.query(square(Vec2::new(2.0, 2.0), 1.0)), vec![3]);
    assert_eq!(tree.query(square(Vec2::new(500.0, 0.0), 2.0)), vec![4]);
}

#[test]
fn test_quad_tree_remove() {
    let mut tree = QuadTree::with_limits(square(Vec2::ZERO, 64.0), 1, 4);
    let a = square(Vec2::new(-40.0, -40.0), 1.0);
    let b = square(Vec2::new(40.0, 40.0), 1.0);
    tree.insert('a', a);
    tree.insert('b', b);
    assert!(tree.remove('a', a));
    assert!(!tree.remove('a', a));
    assert_eq!(tree.len(), 1);
    assert!(tree.query(a).is_empty());
    assert_eq!(tree.query(b), vec!['b']);

    tree.clear();
    assert!(tree.is_empty());
    assert!(tree.query(b).is_empty());
}

struct Counting {
    query: Bounds2,
    offered: usize,
}

impl QuadTreeIterator<u32> for Counting {
    fn intersect(&self, bounds: &Bounds2) -> bool {
        bounds.intersects(&self.query)
    }

    fn iterate(&mut self, _bounds: &Bounds2, _item: u32) {
        self.offered += 1;
    }
}

#[test]
fn test_iterator_skips_rejected_nodes() {
    let mut tree = QuadTree::with_limits(square(Vec2::ZERO, 64.0), 1, 4);
    for i in 0..4 {
        tree.insert(i, square(Vec2::new(40.0, 40.0), 1.0 + i as f32));
    }
    tree.insert(9, square(Vec2::new(-40.0, -40.0), 1.0));

    let mut far = Counting {
        query: square(Vec2::new(-40.0, -40.0), 2.0),
        offered: 0,
    };
    tree.iterate(&mut far);
    assert_eq!(far.offered, 1, "only the SW item is offered");
}

// ====================================================================
// Footprint
// ====================================================================

#[test]
fn test_footprint_cells_row_major_from_far_corner() {
    let footprint = Footprint::new(&Transform::IDENTITY, IVec2::new(2, 2));
    let cells: Vec<_> = footprint.cells().collect();
    assert_eq!(
        cells,
        vec![
            (IVec2::new(0, 0), Vec2::new(4.0, 4.0)),
            (IVec2::new(1, 0), Vec2::new(-4.0, 4.0)),
            (IVec2::new(0, 1), Vec2::new(4.0, -4.0)),
            (IVec2::new(1, 1), Vec2::new(-4.0, -4.0)),
        ]
    );
    assert_eq!(footprint.bounds, square(Vec2::ZERO, 4.0));
    assert_eq!(footprint.outer_bounds(), square(Vec2::ZERO, 8.0));
}

#[test]
fn test_footprint_rotation_swaps_axes() {
    let transform = Transform::from_xyz(100.0, 3.0, -20.0).with_rotation(Quat::from_rotation_y(FRAC_PI_2));
    let footprint = Footprint::new(&transform, IVec2::new(3, 1));
    assert!(footprint.forward.abs_diff_eq(Vec2::new(8.0, 0.0), 1e-4));
    assert!(footprint.right.abs_diff_eq(Vec2::new(0.0, -8.0), 1e-4));
    assert_eq!(footprint.cell_count(), 3);
    let outer = footprint.outer_bounds();
    assert!((outer.max - outer.min).abs_diff_eq(Vec2::new(8.0, 24.0), 1e-3));
}

// ====================================================================
// Height clearance
// ====================================================================

#[test]
fn test_max_height_is_lowest_visible_cell_above_base() {
    let mut block = residential_block(Vec2::Y, 30);
    if let Some(cell) = block.cell_mut(IVec2::new(1, 1)) {
        cell.height = 12;
    }
    let grid = grid_with(block);
    let lot = IVec2::new(2, 2);
    assert_eq!(max_height(&grid, &Transform::IDENTITY, lot), 12.0);
    assert_eq!(max_height(&grid, &Transform::from_xyz(0.0, 2.0, 0.0), lot), 10.0);
}

#[test]
fn test_max_height_ignores_hidden_and_invalid_cells() {
    let mut block = residential_block(Vec2::Y, 30);
    if let Some(cell) = block.cell_mut(IVec2::new(0, 0)) {
        cell.state = CellFlags::empty();
        cell.height = 1;
    }
    let grid = grid_with(block.clone());
    assert_eq!(max_height(&grid, &Transform::IDENTITY, IVec2::new(2, 2)), 30.0);

    block.valid_area = ValidArea {
        min: IVec2::ZERO,
        max: IVec2::new(0, 2),
    };
    let grid = grid_with(block);
    let clearance = max_height(&grid, &Transform::IDENTITY, IVec2::new(2, 2));
    assert_eq!(clearance, i32::MAX as f32);
}

// ====================================================================
// Zone validation
// ====================================================================

#[test]
fn test_validate_matching_zone_with_frontage() {
    let grid = grid_with(residential_block(Vec2::Y, 30));
    assert!(validate_footprint(&grid, &Transform::IDENTITY, IVec2::new(2, 2), RESIDENTIAL));
    assert!(!validate_footprint(&grid, &Transform::IDENTITY, IVec2::new(2, 2), COMMERCIAL));
}

#[test]
fn test_validate_rotated_building_on_rotated_block() {
    let grid = grid_with(residential_block(Vec2::X, 30));
    let transform = Transform::from_rotation(Quat::from_rotation_y(FRAC_PI_2));
    assert!(validate_footprint(&grid, &transform, IVec2::new(2, 2), RESIDENTIAL));
}

#[test]
fn test_validate_fails_when_one_cell_differs() {
    let mut block = residential_block(Vec2::Y, 30);
    if let Some(cell) = block.cell_mut(IVec2::new(1, 1)) {
        cell.zone = COMMERCIAL;
    }
    let grid = grid_with(block);
    assert!(!validate_footprint(&grid, &Transform::IDENTITY, IVec2::new(2, 2), RESIDENTIAL));
}

#[test]
fn test_validate_records_back_road_for_reversed_building() {
    let grid = grid_with(residential_block(Vec2::Y, 30));
    let transform = Transform::from_rotation(Quat::from_rotation_y(PI));
    let mut validation = ZoneValidation::new(
        &grid,
        Footprint::new(&transform, IVec2::new(2, 2)),
        RESIDENTIAL,
    );
    grid.tree().iterate(&mut validation);
    assert!(validation.all_cells_validated());
    assert!(validation.directions().contains(CellFlags::ROAD_BACK));
    assert!(!validation.directions().contains(CellFlags::ROADSIDE));
    assert!(!validation.is_valid());
}

#[test]
fn test_validate_needs_every_cell_covered() {
    let grid = grid_with(residential_block(Vec2::Y, 30));
    assert!(!validate_footprint(&grid, &Transform::IDENTITY, IVec2::new(3, 2), RESIDENTIAL));
}

// ====================================================================
// Road flag remapping
// ====================================================================

#[test]
fn test_remap_same_frame_keeps_roads_and_drops_other_bits() {
    let state = CellFlags::ROADSIDE | CellFlags::ROAD_LEFT | CellFlags::VISIBLE;
    assert_eq!(
        remap_road_flags(Vec2::Y, Vec2::Y, state),
        CellFlags::ROADSIDE | CellFlags::ROAD_LEFT
    );
}

#[test]
fn test_remap_across_frames() {
    assert_eq!(
        remap_road_flags(Vec2::Y, Vec2::NEG_Y, CellFlags::ROADSIDE),
        CellFlags::ROAD_BACK
    );
    assert_eq!(
        remap_road_flags(Vec2::Y, Vec2::X, CellFlags::ROADSIDE),
        CellFlags::ROAD_LEFT
    );
    assert_eq!(
        remap_road_flags(Vec2::X, Vec2::Y, CellFlags::ROAD_LEFT),
        CellFlags::ROADSIDE
    );
}
