//! Grid queries consumed by the navigation engine, and a concrete tile map.
//!
//! The engine never owns the world grid: it only asks [`GridModel`] whether a
//! tile is terrain-walkable and whether something currently stands on it.
//! [`TileMap`] is the stock implementation, with one [`Terrain`] value and an
//! occupant count per tile.

use std::fmt;

use crate::geom::{Point, Range};

/// Read-only view of the world grid, as seen by one query.
///
/// Bounds are fixed for the lifetime of a map. Coordinates outside
/// [`bounds`](GridModel::bounds) are neither walkable nor occupied.
pub trait GridModel {
    /// The rectangle of valid coordinates.
    fn bounds(&self) -> Range;

    /// Whether the terrain at `p` can be walked on, ignoring occupants.
    fn is_walkable(&self, p: Point) -> bool;

    /// Whether some entity currently overlaps `p`.
    fn is_occupied(&self, p: Point) -> bool;

    /// Whether `p` lies inside the map.
    #[inline]
    fn in_bounds(&self, p: Point) -> bool {
        self.bounds().contains(p)
    }

    /// Whether `p` is inside the map, walkable and unoccupied.
    #[inline]
    fn is_free(&self, p: Point) -> bool {
        self.in_bounds(p) && self.is_walkable(p) && !self.is_occupied(p)
    }
}

impl<G: GridModel + ?Sized> GridModel for &G {
    fn bounds(&self) -> Range {
        (**self).bounds()
    }

    fn is_walkable(&self, p: Point) -> bool {
        (**self).is_walkable(p)
    }

    fn is_occupied(&self, p: Point) -> bool {
        (**self).is_occupied(p)
    }
}

// ---------------------------------------------------------------------------
// Terrain
// ---------------------------------------------------------------------------

/// Terrain class of a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Terrain {
    #[default]
    Ground,
    Forest,
    Sand,
    Water,
    Rock,
}

impl Terrain {
    /// Whether units can walk on this terrain.
    pub fn is_walkable(self) -> bool {
        !matches!(self, Terrain::Water | Terrain::Rock)
    }

    /// Character used in ASCII maps.
    pub fn rune(self) -> char {
        match self {
            Terrain::Ground => '.',
            Terrain::Forest => '"',
            Terrain::Sand => ':',
            Terrain::Water => '~',
            Terrain::Rock => '#',
        }
    }

    /// Parse an ASCII map character.
    pub fn from_rune(ch: char) -> Option<Terrain> {
        match ch {
            '.' => Some(Terrain::Ground),
            '"' => Some(Terrain::Forest),
            ':' => Some(Terrain::Sand),
            '~' => Some(Terrain::Water),
            '#' => Some(Terrain::Rock),
            _ => None,
        }
    }
}

/// ASCII rune for a ground tile with an occupant on it.
pub const OCCUPIED_RUNE: char = 'o';

/// Errors that can occur when parsing an ASCII map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MapError {
    /// The map has no rows.
    Empty,
    /// A line is not as wide as the first one.
    InconsistentWidth { line: usize },
    /// A character that is neither terrain nor an occupant marker.
    InvalidRune { ch: char, pos: Point },
}

impl fmt::Display for MapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "map: no rows"),
            Self::InconsistentWidth { line } => {
                write!(f, "map: line {line} does not match the width of the first line")
            }
            Self::InvalidRune { ch, pos } => {
                write!(
                    f,
                    "map contains invalid rune \u{201c}{ch}\u{201d} at ({}, {})",
                    pos.x, pos.y
                )
            }
        }
    }
}

impl std::error::Error for MapError {}

// ---------------------------------------------------------------------------
// TileMap
// ---------------------------------------------------------------------------

/// A fixed-size map of terrain plus live occupant counts.
///
/// Occupancy is a count rather than a flag: two agents may briefly stand on
/// the same tile, and a tile stays occupied until every occupant released it.
#[derive(Debug, Clone)]
pub struct TileMap {
    terrain: Vec<Terrain>,
    occupants: Vec<u16>,
    bounds: Range,
}

impl TileMap {
    /// Create a map of `Terrain::Ground` with no occupants.
    pub fn new(width: i32, height: i32) -> Self {
        let bounds = Range::new(0, 0, width.max(0), height.max(0));
        let len = bounds.len();
        Self {
            terrain: vec![Terrain::default(); len],
            occupants: vec![0; len],
            bounds,
        }
    }

    /// Parse a map from ASCII art, one line per row.
    ///
    /// Terrain runes are those of [`Terrain::rune`]; [`OCCUPIED_RUNE`] is
    /// ground with one occupant. Leading and trailing blank lines are
    /// ignored.
    pub fn from_ascii(s: &str) -> Result<TileMap, MapError> {
        let lines: Vec<&str> = s
            .lines()
            .map(str::trim_end)
            .skip_while(|l| l.is_empty())
            .collect();
        let lines: Vec<&str> = match lines.iter().rposition(|l| !l.is_empty()) {
            Some(last) => lines[..=last].to_vec(),
            None => return Err(MapError::Empty),
        };
        let width = lines[0].chars().count() as i32;
        let mut map = TileMap::new(width, lines.len() as i32);
        for (y, line) in lines.iter().enumerate() {
            if line.chars().count() as i32 != width {
                return Err(MapError::InconsistentWidth { line: y });
            }
            for (x, ch) in line.chars().enumerate() {
                let p = Point::new(x as i32, y as i32);
                if ch == OCCUPIED_RUNE {
                    map.occupy(p);
                    continue;
                }
                let t = Terrain::from_rune(ch).ok_or(MapError::InvalidRune { ch, pos: p })?;
                map.set_terrain(p, t);
            }
        }
        Ok(map)
    }

    /// Width of the map.
    pub fn width(&self) -> i32 {
        self.bounds.width()
    }

    /// Height of the map.
    pub fn height(&self) -> i32 {
        self.bounds.height()
    }

    fn idx(&self, p: Point) -> Option<usize> {
        if !self.bounds.contains(p) {
            return None;
        }
        Some((p.y * self.bounds.width() + p.x) as usize)
    }

    /// Terrain at `p`, or `None` if out of bounds.
    pub fn terrain(&self, p: Point) -> Option<Terrain> {
        self.idx(p).map(|i| self.terrain[i])
    }

    /// Set the terrain at `p`. Does nothing if out of bounds.
    pub fn set_terrain(&mut self, p: Point, t: Terrain) {
        if let Some(i) = self.idx(p) {
            self.terrain[i] = t;
        }
    }

    /// Fill every tile of `r` (clipped to the map) with `t`.
    pub fn fill_terrain(&mut self, r: Range, t: Terrain) {
        for p in r.intersect(self.bounds) {
            self.set_terrain(p, t);
        }
    }

    /// Number of entities currently on `p`.
    pub fn occupants(&self, p: Point) -> u16 {
        self.idx(p).map_or(0, |i| self.occupants[i])
    }

    /// Record one more occupant on `p`.
    pub fn occupy(&mut self, p: Point) {
        if let Some(i) = self.idx(p) {
            self.occupants[i] = self.occupants[i].saturating_add(1);
        }
    }

    /// Remove one occupant from `p`.
    pub fn release(&mut self, p: Point) {
        if let Some(i) = self.idx(p) {
            self.occupants[i] = self.occupants[i].saturating_sub(1);
        }
    }

    /// Move one occupant from `from` to `to`.
    pub fn relocate(&mut self, from: Point, to: Point) {
        self.release(from);
        self.occupy(to);
    }

    /// Occupy every tile of a footprint.
    pub fn occupy_range(&mut self, r: Range) {
        for p in r.intersect(self.bounds) {
            self.occupy(p);
        }
    }

    /// Release every tile of a footprint.
    pub fn release_range(&mut self, r: Range) {
        for p in r.intersect(self.bounds) {
            self.release(p);
        }
    }

    /// Count tiles satisfying a predicate.
    pub fn count_fn(&self, mut f: impl FnMut(Point) -> bool) -> usize {
        self.bounds.iter().filter(|&p| f(p)).count()
    }

    /// Render the map as ASCII, occupied tiles shown as [`OCCUPIED_RUNE`].
    pub fn to_ascii(&self) -> String {
        let mut s = String::with_capacity(self.bounds.len() + self.height() as usize);
        for y in 0..self.height() {
            for x in 0..self.width() {
                let p = Point::new(x, y);
                if self.occupants(p) > 0 {
                    s.push(OCCUPIED_RUNE);
                } else {
                    s.push(self.terrain(p).unwrap_or_default().rune());
                }
            }
            s.push('\n');
        }
        s
    }
}

impl GridModel for TileMap {
    fn bounds(&self) -> Range {
        self.bounds
    }

    fn is_walkable(&self, p: Point) -> bool {
        self.terrain(p).is_some_and(Terrain::is_walkable)
    }

    fn is_occupied(&self, p: Point) -> bool {
        self.occupants(p) > 0
    }
}


#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use super::*;

    #[test]
    fn terrain_round_trip() {
        let json = serde_json::to_string(&Terrain::Water).unwrap();
        let back: Terrain = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Terrain::Water);
    }

    #[test]
    fn range_round_trip() {
        let r = Range::new(1, 2, 10, 20);
        let json = serde_json::to_string(&r).unwrap();
        let back: Range = serde_json::from_str(&json).unwrap();
        assert_eq!(back, r);
    }
}
