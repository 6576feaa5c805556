//! Read-only spatial queries shared by the level engine and the zone sweep.
//!
//! A loose quad-tree indexes items by axis-aligned bounds; traversal is driven
//! by a [`QuadTreeIterator`] that decides which nodes to enter and receives
//! every item whose node it entered. Two footprint policies sit on top of it:
//! [`HeightClearance`] and [`ZoneValidation`].

mod bounds;
mod footprint;
mod quad_tree;
mod zone_query;

pub use bounds::Bounds2;
pub use footprint::Footprint;
pub use quad_tree::{QuadTree, QuadTreeIterator};
pub use zone_query::{
    max_height, remap_road_flags, validate_footprint, HeightClearance, ZoneValidation,
};

#[cfg(test)]
mod tests;
