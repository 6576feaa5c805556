use crate::spatial::Bounds2;
use bevy::math::Vec2;

/// Edge length of one zoning cell in world units.
pub const CELL_SIZE: f32 = 8.0;

/// Fixed weight given to every eligible level-up candidate.
pub const CANDIDATE_WEIGHT: u32 = 100;

/// Half extent of the area covered by the default quad-trees.
pub const WORLD_HALF_EXTENT: f32 = 7168.0;

/// Items a quad-tree leaf holds before it is split.
pub const QUAD_TREE_SPLIT_THRESHOLD: usize = 8;

/// Maximum subdivision depth of the quad-trees.
pub const QUAD_TREE_MAX_DEPTH: u8 = 10;

/// World bounds used for the zone block and object search trees.
pub fn world_bounds() -> Bounds2 {
    Bounds2::new(
        Vec2::splat(-WORLD_HALF_EXTENT),
        Vec2::splat(WORLD_HALF_EXTENT),
    )
}
