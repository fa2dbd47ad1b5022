//! Navigation configuration.

use tilenav_core::Point;

use crate::agent::WorldPos;

/// Tunables of the navigation engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NavConfig {
    /// Edge length of one tile in world (pixel) units.
    pub tile_size: f32,
}

impl Default for NavConfig {
    fn default() -> Self {
        Self { tile_size: 32.0 }
    }
}

impl NavConfig {
    /// World position an agent stands at when it is exactly on tile `p`.
    pub fn tile_origin(&self, p: Point) -> WorldPos {
        WorldPos::new(p.x as f32 * self.tile_size, p.y as f32 * self.tile_size)
    }

    /// The tile whose origin is nearest to `pos`.
    pub fn tile_at(&self, pos: WorldPos) -> Point {
        Point::new(
            (pos.x / self.tile_size).round() as i32,
            (pos.y / self.tile_size).round() as i32,
        )
    }
}
