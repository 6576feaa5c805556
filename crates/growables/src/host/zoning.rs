//! Zoning grid: blocks of cells along road edges, indexed by a quad-tree.

use bevy::math::{IVec2, Vec2, Vec3};
use bevy::prelude::*;
use bitflags::bitflags;

use crate::config::{world_bounds, CELL_SIZE};
use crate::spatial::{Bounds2, QuadTree};

bitflags! {
    /// Per-cell state. Road bits are relative to the owning block's frame.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct CellFlags: u16 {
        /// Road along the block front.
        const ROADSIDE = 1 << 2;
        const VISIBLE = 1 << 3;
        const ROAD_LEFT = 1 << 9;
        const ROAD_RIGHT = 1 << 10;
        const ROAD_BACK = 1 << 11;
        const ROAD_ANY = Self::ROADSIDE.bits()
            | Self::ROAD_LEFT.bits()
            | Self::ROAD_RIGHT.bits()
            | Self::ROAD_BACK.bits();
    }
}

/// Zone type index. `ZoneType::NONE` marks unzoned cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct ZoneType(pub u16);

impl ZoneType {
    pub const NONE: ZoneType = ZoneType(0);

    pub fn is_defined(self) -> bool {
        self != Self::NONE
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ZoneCell {
    pub state: CellFlags,
    pub zone: ZoneType,
    /// Height limit of the cell in world units.
    pub height: i16,
}

/// Half-open cell index rectangle `[min, max)` that may be built on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ValidArea {
    pub min: IVec2,
    pub max: IVec2,
}

impl ValidArea {
    pub fn is_empty(&self) -> bool {
        self.max.x <= self.min.x || self.max.y <= self.min.y
    }

    pub fn contains(&self, index: IVec2) -> bool {
        index.x >= self.min.x && index.x < self.max.x && index.y >= self.min.y && index.y < self.max.y
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockId(pub u32);

/// A strip of cells facing a road.
///
/// Cell `(0, 0)` is the corner furthest along the block's right vector and
/// its forward `direction`; the front row faces the road.
#[derive(Debug, Clone, PartialEq)]
pub struct ZoneBlock {
    pub position: Vec3,
    pub direction: Vec2,
    pub size: IVec2,
    pub valid_area: ValidArea,
    pub cells: Vec<ZoneCell>,
}

impl ZoneBlock {
    /// A block of hidden, unzoned cells.
    pub fn new(position: Vec3, direction: Vec2, size: IVec2) -> Self {
        let count = (size.x.max(0) * size.y.max(0)) as usize;
        Self {
            position,
            direction: direction.normalize_or_zero(),
            size,
            valid_area: ValidArea {
                min: IVec2::ZERO,
                max: size,
            },
            cells: vec![ZoneCell::default(); count],
        }
    }

    /// A fully visible block zoned `zone`, with a road along its front row.
    pub fn zoned(position: Vec3, direction: Vec2, size: IVec2, zone: ZoneType, height: i16) -> Self {
        let mut block = Self::new(position, direction, size);
        for y in 0..size.y {
            for x in 0..size.x {
                let mut state = CellFlags::VISIBLE;
                state.set(CellFlags::ROADSIDE, y == 0);
                block.cells[(y * size.x + x) as usize] = ZoneCell {
                    state,
                    zone,
                    height,
                };
            }
        }
        block
    }

    /// Unit vector along a block row, perpendicular to `direction`.
    pub fn right(&self) -> Vec2 {
        Vec2::new(self.direction.y, -self.direction.x)
    }

    /// Cell index of a world ground position; may fall outside the block.
    pub fn cell_index(&self, position: Vec2) -> IVec2 {
        let offset = Vec2::new(self.position.x, self.position.z) - position;
        let half = self.size.as_vec2() * (CELL_SIZE * 0.5);
        IVec2::new(
            ((offset.dot(self.right()) + half.x) / CELL_SIZE).floor() as i32,
            ((offset.dot(self.direction) + half.y) / CELL_SIZE).floor() as i32,
        )
    }

    /// World ground position of a cell centre.
    pub fn cell_position(&self, index: IVec2) -> Vec2 {
        let half = self.size.as_vec2() * (CELL_SIZE * 0.5);
        let along_right = index.x as f32 * CELL_SIZE + CELL_SIZE * 0.5 - half.x;
        let along_forward = index.y as f32 * CELL_SIZE + CELL_SIZE * 0.5 - half.y;
        Vec2::new(self.position.x, self.position.z)
            - self.right() * along_right
            - self.direction * along_forward
    }

    pub fn cell(&self, index: IVec2) -> Option<&ZoneCell> {
        self.flat_index(index).and_then(|i| self.cells.get(i))
    }

    pub fn cell_mut(&mut self, index: IVec2) -> Option<&mut ZoneCell> {
        self.flat_index(index).and_then(|i| self.cells.get_mut(i))
    }

    pub fn bounds(&self) -> Bounds2 {
        let half = self.size.as_vec2() * (CELL_SIZE * 0.5);
        let extent = (self.right() * half.x).abs() + (self.direction * half.y).abs();
        Bounds2::from_center(Vec2::new(self.position.x, self.position.z), extent)
    }

    fn flat_index(&self, index: IVec2) -> Option<usize> {
        let inside = index.x >= 0 && index.y >= 0 && index.x < self.size.x && index.y < self.size.y;
        inside.then(|| (index.y * self.size.x + index.x) as usize)
    }
}

/// All zone blocks plus the search tree over their bounds.
#[derive(Resource)]
pub struct ZoningGrid {
    blocks: Vec<ZoneBlock>,
    tree: QuadTree<BlockId>,
}

impl Default for ZoningGrid {
    fn default() -> Self {
        Self {
            blocks: Vec::new(),
            tree: QuadTree::new(world_bounds()),
        }
    }
}

impl ZoningGrid {
    pub fn add_block(&mut self, block: ZoneBlock) -> BlockId {
        let id = BlockId(self.blocks.len() as u32);
        self.tree.insert(id, block.bounds());
        self.blocks.push(block);
        id
    }

    pub fn block(&self, id: BlockId) -> Option<&ZoneBlock> {
        self.blocks.get(id.0 as usize)
    }

    pub fn block_mut(&mut self, id: BlockId) -> Option<&mut ZoneBlock> {
        self.blocks.get_mut(id.0 as usize)
    }

    pub fn tree(&self) -> &QuadTree<BlockId> {
        &self.tree
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Rezones every visible cell whose centre lies inside `area`; returns the
    /// number of cells changed.
    pub fn rezone(&mut self, area: Bounds2, zone: ZoneType) -> usize {
        let mut changed = 0;
        for id in self.tree.query(area) {
            let Some(block) = self.blocks.get_mut(id.0 as usize) else {
                continue;
            };
            for y in 0..block.size.y {
                for x in 0..block.size.x {
                    let index = IVec2::new(x, y);
                    let centre = block.cell_position(index);
                    let inside = centre.cmpge(area.min).all() && centre.cmple(area.max).all();
                    if let (true, Some(cell)) = (inside, block.cell_mut(index)) {
                        if cell.state.contains(CellFlags::VISIBLE) && cell.zone != zone {
                            cell.zone = zone;
                            changed += 1;
                        }
                    }
                }
            }
        }
        changed
    }
}

/// Regions of the zoning grid edited this frame.
#[derive(Resource, Default, Debug)]
pub struct ZoneUpdateCollect {
    bounds: Vec<Bounds2>,
}

impl ZoneUpdateCollect {
    pub fn push(&mut self, bounds: Bounds2) {
        self.bounds.push(bounds);
    }

    /// Whether any edit happened since the last clear.
    pub fn is_updated(&self) -> bool {
        !self.bounds.is_empty()
    }

    pub fn bounds(&self) -> &[Bounds2] {
        &self.bounds
    }

    pub fn clear(&mut self) {
        self.bounds.clear();
    }
}

pub fn clear_zone_updates(mut collect: ResMut<ZoneUpdateCollect>) {
    collect.clear();
}
