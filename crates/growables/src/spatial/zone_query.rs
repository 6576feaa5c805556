use bevy::math::{IVec2, Vec2};
use bevy::transform::components::Transform;

use super::{Bounds2, Footprint, QuadTreeIterator};
use crate::host::zoning::{BlockId, CellFlags, ZoneBlock, ZoneCell, ZoneType, ZoningGrid};

/// Road sides in clockwise order starting at the front.
const ROAD_SIDES: [CellFlags; 4] = [
    CellFlags::ROADSIDE,
    CellFlags::ROAD_RIGHT,
    CellFlags::ROAD_BACK,
    CellFlags::ROAD_LEFT,
];

// ---------------------------------------------------------------------------
// Height clearance
// ---------------------------------------------------------------------------

/// Accumulates the lowest visible cell height under a footprint.
pub struct HeightClearance<'a> {
    grid: &'a ZoningGrid,
    footprint: Footprint,
    min_height: i32,
}

impl<'a> HeightClearance<'a> {
    pub fn new(grid: &'a ZoningGrid, footprint: Footprint) -> Self {
        Self {
            grid,
            footprint,
            min_height: i32::MAX,
        }
    }

    /// `i32::MAX` when no visible cell was found.
    pub fn min_height(&self) -> i32 {
        self.min_height
    }
}

impl QuadTreeIterator<BlockId> for HeightClearance<'_> {
    fn intersect(&self, bounds: &Bounds2) -> bool {
        bounds.intersects(&self.footprint.bounds)
    }

    fn iterate(&mut self, bounds: &Bounds2, block_id: BlockId) {
        if !bounds.intersects(&self.footprint.bounds) {
            return;
        }
        let Some(block) = self.grid.block(block_id) else {
            return;
        };
        if block.valid_area.is_empty() {
            return;
        }

        for (_, position) in self.footprint.cells() {
            let Some(cell) = valid_cell(block, position) else {
                continue;
            };
            if cell.state.contains(CellFlags::VISIBLE) {
                self.min_height = self.min_height.min(i32::from(cell.height));
            }
        }
    }
}

/// Maximum height a structure may reach at `transform`, measured from its
/// base elevation.
pub fn max_height(grid: &ZoningGrid, transform: &Transform, lot_size: IVec2) -> f32 {
    let mut clearance = HeightClearance::new(grid, Footprint::new(transform, lot_size));
    grid.tree().iterate(&mut clearance);
    clearance.min_height() as f32 - transform.translation.y
}

// ---------------------------------------------------------------------------
// Zone validation
// ---------------------------------------------------------------------------

/// Checks that every footprint cell carries the target zone and records the
/// road sides seen on the footprint boundary.
pub struct ZoneValidation<'a> {
    grid: &'a ZoningGrid,
    footprint: Footprint,
    forward: Vec2,
    zone: ZoneType,
    validated: Vec<bool>,
    directions: CellFlags,
}

impl<'a> ZoneValidation<'a> {
    pub fn new(grid: &'a ZoningGrid, footprint: Footprint, zone: ZoneType) -> Self {
        Self {
            grid,
            forward: footprint.forward.normalize_or_zero(),
            validated: vec![false; footprint.cell_count()],
            footprint,
            zone,
            directions: CellFlags::empty(),
        }
    }

    pub fn directions(&self) -> CellFlags {
        self.directions
    }

    pub fn all_cells_validated(&self) -> bool {
        self.validated.iter().all(|&v| v)
    }

    /// Fully zoned and fronting a road.
    pub fn is_valid(&self) -> bool {
        self.directions.contains(CellFlags::ROADSIDE) && self.all_cells_validated()
    }

    fn edge_mask(&self, coords: IVec2) -> CellFlags {
        let last = self.footprint.lot_size - IVec2::ONE;
        let mut mask = CellFlags::empty();
        mask.set(CellFlags::ROADSIDE, coords.y == 0);
        mask.set(CellFlags::ROAD_BACK, coords.y == last.y);
        mask.set(CellFlags::ROAD_RIGHT, coords.x == 0);
        mask.set(CellFlags::ROAD_LEFT, coords.x == last.x);
        mask
    }
}

impl QuadTreeIterator<BlockId> for ZoneValidation<'_> {
    fn intersect(&self, bounds: &Bounds2) -> bool {
        bounds.intersects(&self.footprint.bounds)
    }

    fn iterate(&mut self, bounds: &Bounds2, block_id: BlockId) {
        if !bounds.intersects(&self.footprint.bounds) {
            return;
        }
        let Some(block) = self.grid.block(block_id) else {
            return;
        };
        if block.valid_area.is_empty() {
            return;
        }

        let lot_x = self.footprint.lot_size.x;
        for (coords, position) in self.footprint.cells() {
            let Some(cell) = valid_cell(block, position) else {
                continue;
            };
            if !cell.state.contains(CellFlags::VISIBLE) || cell.zone != self.zone {
                continue;
            }

            self.validated[(coords.y * lot_x + coords.x) as usize] = true;
            if cell.state.intersects(CellFlags::ROAD_ANY) {
                let roads = remap_road_flags(block.direction, self.forward, cell.state);
                self.directions |= roads & self.edge_mask(coords);
            }
        }
    }
}

/// Whether a structure at `transform` sits entirely on `zone` cells with road
/// frontage.
pub fn validate_footprint(
    grid: &ZoningGrid,
    transform: &Transform,
    lot_size: IVec2,
    zone: ZoneType,
) -> bool {
    let mut validation = ZoneValidation::new(grid, Footprint::new(transform, lot_size), zone);
    grid.tree().iterate(&mut validation);
    validation.is_valid()
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Re-expresses the road sides of a cell from the frame of a block facing
/// `source_forward` in the frame of a structure facing `target_forward`.
/// Non-road bits are dropped.
pub fn remap_road_flags(source_forward: Vec2, target_forward: Vec2, state: CellFlags) -> CellFlags {
    let mut out = CellFlags::empty();
    for (turns, side) in ROAD_SIDES.into_iter().enumerate() {
        if !state.contains(side) {
            continue;
        }
        let world = rotate_clockwise(source_forward, turns);
        let (nearest, _) = (0..ROAD_SIDES.len()).fold((0, f32::MIN), |best, candidate| {
            let alignment = rotate_clockwise(target_forward, candidate).dot(world);
            if alignment > best.1 {
                (candidate, alignment)
            } else {
                best
            }
        });
        out |= ROAD_SIDES[nearest];
    }
    out
}

fn rotate_clockwise(v: Vec2, quarter_turns: usize) -> Vec2 {
    (0..quarter_turns % 4).fold(v, |v, _| Vec2::new(v.y, -v.x))
}

fn valid_cell(block: &ZoneBlock, position: Vec2) -> Option<&ZoneCell> {
    let index = block.cell_index(position);
    if !block.valid_area.contains(index) {
        return None;
    }
    block.cell(index)
}
