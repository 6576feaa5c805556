use bevy::math::Vec2;

/// Axis-aligned rectangle on the ground plane (world x/z).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Bounds2 {
    pub min: Vec2,
    pub max: Vec2,
}

impl Bounds2 {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    pub fn from_center(center: Vec2, half_extent: Vec2) -> Self {
        Self {
            min: center - half_extent,
            max: center + half_extent,
        }
    }

    /// Inclusive overlap test; touching edges count as intersecting.
    pub fn intersects(&self, other: &Bounds2) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
    }

    pub fn contains(&self, other: &Bounds2) -> bool {
        self.min.x <= other.min.x
            && self.min.y <= other.min.y
            && self.max.x >= other.max.x
            && self.max.y >= other.max.y
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    pub fn expand(&self, amount: f32) -> Self {
        Self {
            min: self.min - Vec2::splat(amount),
            max: self.max + Vec2::splat(amount),
        }
    }

    /// The four equal sub-rectangles, ordered SW, SE, NW, NE.
    pub fn quadrants(&self) -> [Bounds2; 4] {
        let c = self.center();
        [
            Bounds2::new(self.min, c),
            Bounds2::new(Vec2::new(c.x, self.min.y), Vec2::new(self.max.x, c.y)),
            Bounds2::new(Vec2::new(self.min.x, c.y), Vec2::new(c.x, self.max.y)),
            Bounds2::new(c, self.max),
        ]
    }
}
