use bevy::math::{IVec2, Vec2, Vec3};
use bevy::transform::components::Transform;

use super::Bounds2;
use crate::config::CELL_SIZE;

/// The rotated grid of cell centres a structure covers.
///
/// `right` and `forward` are one cell long. Scanning starts at the corner
/// furthest along both vectors and walks back row by row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Footprint {
    pub position: Vec2,
    /// Bounds of the cell centres, used to cull zone blocks.
    pub bounds: Bounds2,
    pub lot_size: IVec2,
    pub start: Vec2,
    pub right: Vec2,
    pub forward: Vec2,
}

impl Footprint {
    pub fn new(transform: &Transform, lot_size: IVec2) -> Self {
        let right = ground(transform.rotation * Vec3::new(CELL_SIZE, 0.0, 0.0));
        let forward = ground(transform.rotation * Vec3::new(0.0, 0.0, CELL_SIZE));
        let offset_x = right * (lot_size.x as f32 * 0.5 - 0.5);
        let offset_y = forward * (lot_size.y as f32 * 0.5 - 0.5);
        let position = ground(transform.translation);

        Self {
            position,
            bounds: Bounds2::from_center(position, offset_x.abs() + offset_y.abs()),
            lot_size,
            start: position + offset_y + offset_x,
            right,
            forward,
        }
    }

    pub fn cell_count(&self) -> usize {
        (self.lot_size.x.max(0) * self.lot_size.y.max(0)) as usize
    }

    /// Bounds of the whole lot, cell edges included.
    pub fn outer_bounds(&self) -> Bounds2 {
        let half = (self.right * self.lot_size.x as f32 * 0.5).abs()
            + (self.forward * self.lot_size.y as f32 * 0.5).abs();
        Bounds2::from_center(self.position, half)
    }

    /// Lot coordinates and world centre of every cell, row-major.
    pub fn cells(&self) -> impl Iterator<Item = (IVec2, Vec2)> {
        let Footprint {
            lot_size,
            start,
            right,
            forward,
            ..
        } = *self;
        (0..lot_size.y.max(0)).flat_map(move |y| {
            let row = start - forward * y as f32;
            (0..lot_size.x.max(0)).map(move |x| (IVec2::new(x, y), row - right * x as f32))
        })
    }
}

/// Projects a world position onto the ground plane.
pub(crate) fn ground(v: Vec3) -> Vec2 {
    Vec2::new(v.x, v.z)
}
