//! Order targets.

use tilenav_core::{GridModel, Point, Range};

/// Identifier of a unit, building or resource deposit.
pub type EntityId = u32;

/// What an order points at.
///
/// The variant carries what navigation needs to know about the target: where
/// it is and how many tiles it covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Target {
    /// A plain move order onto a tile.
    Ground(Point),
    /// Another unit, standing on one tile.
    Unit { id: EntityId, pos: Point },
    /// A building covering its footprint.
    Building { id: EntityId, footprint: Range },
    /// A resource deposit covering its footprint.
    Resource { id: EntityId, footprint: Range },
}

impl Target {
    /// Tiles covered by the target.
    pub fn footprint(&self) -> Range {
        match *self {
            Target::Ground(p) | Target::Unit { pos: p, .. } => Range::single(p),
            Target::Building { footprint, .. } | Target::Resource { footprint, .. } => footprint,
        }
    }

    /// Top-left tile of the target.
    pub fn anchor(&self) -> Point {
        self.footprint().min
    }

    /// Entity behind the target, if any.
    pub fn id(&self) -> Option<EntityId> {
        match *self {
            Target::Ground(_) => None,
            Target::Unit { id, .. } | Target::Building { id, .. } | Target::Resource { id, .. } => {
                Some(id)
            }
        }
    }

    /// Whether the target spans more than the tile it is addressed by.
    pub fn is_area(&self) -> bool {
        matches!(self, Target::Building { .. } | Target::Resource { .. })
    }

    /// Whether the agent has to stop next to the target instead of on it.
    ///
    /// Only a ground order onto a currently free tile can be walked onto.
    pub fn requires_approach<G: GridModel + ?Sized>(&self, grid: &G) -> bool {
        match *self {
            Target::Ground(p) => !grid.is_free(p),
            _ => true,
        }
    }

    /// Whether an agent on `tile` is where this order wants it: on a ground
    /// target, or next to any other target.
    pub fn is_reached_from(&self, tile: Point) -> bool {
        match *self {
            Target::Ground(p) => p == tile,
            _ => {
                let fp = self.footprint();
                fp.grow(1).contains(tile) && !fp.contains(tile)
            }
        }
    }
}
