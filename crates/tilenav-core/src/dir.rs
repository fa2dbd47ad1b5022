//! Eight-way facing.

use crate::geom::Point;

/// Facing of an agent, one of the eight compass directions.
///
/// Facing is presentation state only: it is derived from the sign of the
/// coordinate delta towards the next waypoint and never feeds back into
/// movement.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Direction {
    North,
    NorthEast,
    East,
    SouthEast,
    #[default]
    South,
    SouthWest,
    West,
    NorthWest,
}

impl Direction {
    /// All directions, clockwise from north.
    pub const ALL: [Direction; 8] = [
        Direction::North,
        Direction::NorthEast,
        Direction::East,
        Direction::SouthEast,
        Direction::South,
        Direction::SouthWest,
        Direction::West,
        Direction::NorthWest,
    ];

    /// Direction from `from` towards `to`, using only the sign of each axis
    /// delta. Returns `None` when both points are equal.
    pub fn toward(from: Point, to: Point) -> Option<Direction> {
        let dx = (to.x - from.x).signum();
        let dy = (to.y - from.y).signum();
        let d = match (dx, dy) {
            (0, -1) => Direction::North,
            (1, -1) => Direction::NorthEast,
            (1, 0) => Direction::East,
            (1, 1) => Direction::SouthEast,
            (0, 1) => Direction::South,
            (-1, 1) => Direction::SouthWest,
            (-1, 0) => Direction::West,
            (-1, -1) => Direction::NorthWest,
            _ => return None,
        };
        Some(d)
    }

    /// The unit offset for one step in this direction.
    pub fn delta(self) -> Point {
        match self {
            Direction::North => Point::new(0, -1),
            Direction::NorthEast => Point::new(1, -1),
            Direction::East => Point::new(1, 0),
            Direction::SouthEast => Point::new(1, 1),
            Direction::South => Point::new(0, 1),
            Direction::SouthWest => Point::new(-1, 1),
            Direction::West => Point::new(-1, 0),
            Direction::NorthWest => Point::new(-1, -1),
        }
    }

    /// Whether this is one of the four diagonal directions.
    pub fn is_diagonal(self) -> bool {
        let d = self.delta();
        d.x != 0 && d.y != 0
    }
}
