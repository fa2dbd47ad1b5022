//! Tile geometry: [`Point`] and [`Range`].
//!
//! A [`Point`] names one tile of the world grid by (column, row). A [`Range`]
//! is a half-open rectangle of tiles, used both for map bounds and for the
//! footprint of multi-tile targets such as buildings and resource deposits.

use std::fmt;
use std::ops::{Add, Sub};

// ---------------------------------------------------------------------------
// Point
// ---------------------------------------------------------------------------

/// A tile coordinate. X is the column and grows right, Y is the row and grows
/// down.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// North, east, south, west.
    #[inline]
    pub fn neighbors_4(self) -> [Point; 4] {
        let Point { x, y } = self;
        [
            Point::new(x, y - 1),
            Point::new(x + 1, y),
            Point::new(x, y + 1),
            Point::new(x - 1, y),
        ]
    }

    /// The eight surrounding tiles: [`neighbors_4`](Self::neighbors_4), then
    /// north-east, south-east, south-west, north-west.
    ///
    /// Path search expands neighbours in this order, so it takes part in
    /// breaking ties between equally good routes.
    #[inline]
    pub fn neighbors_8(self) -> [Point; 8] {
        let [n, e, s, w] = self.neighbors_4();
        let Point { x, y } = self;
        [
            n,
            e,
            s,
            w,
            Point::new(x + 1, y - 1),
            Point::new(x + 1, y + 1),
            Point::new(x - 1, y + 1),
            Point::new(x - 1, y - 1),
        ]
    }

    /// Whether `other` is one of the eight tiles around `self`.
    #[inline]
    pub fn is_adjacent(self, other: Point) -> bool {
        let d = other - self;
        d != Point::default() && d.x.abs() <= 1 && d.y.abs() <= 1
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl Add for Point {
    type Output = Point;
    #[inline]
    fn add(self, o: Point) -> Point {
        Point::new(self.x + o.x, self.y + o.y)
    }
}

impl Sub for Point {
    type Output = Point;
    #[inline]
    fn sub(self, o: Point) -> Point {
        Point::new(self.x - o.x, self.y - o.y)
    }
}

// ---------------------------------------------------------------------------
// Range
// ---------------------------------------------------------------------------

/// Tiles `min.x..max.x` × `min.y..max.y`: `min` is included, `max` is not.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Range {
    pub min: Point,
    pub max: Point,
}

impl Range {
    /// The rectangle spanned by two corners, given in any order.
    #[inline]
    pub fn new(x0: i32, y0: i32, x1: i32, y1: i32) -> Self {
        Self {
            min: Point::new(x0.min(x1), y0.min(y1)),
            max: Point::new(x0.max(x1), y0.max(y1)),
        }
    }

    /// Just the tile `p`.
    #[inline]
    pub fn single(p: Point) -> Self {
        Self::sized(p, 1, 1)
    }

    /// `width` × `height` tiles with `origin` as the top-left one.
    #[inline]
    pub fn sized(origin: Point, width: i32, height: i32) -> Self {
        Self::new(origin.x, origin.y, origin.x + width, origin.y + height)
    }

    #[inline]
    pub fn width(self) -> i32 {
        self.max.x - self.min.x
    }

    #[inline]
    pub fn height(self) -> i32 {
        self.max.y - self.min.y
    }

    /// Number of tiles.
    #[inline]
    pub fn len(self) -> usize {
        if self.is_empty() {
            0
        } else {
            self.width() as usize * self.height() as usize
        }
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.width() <= 0 || self.height() <= 0
    }

    #[inline]
    pub fn contains(self, p: Point) -> bool {
        (self.min.x..self.max.x).contains(&p.x) && (self.min.y..self.max.y).contains(&p.y)
    }

    /// Tiles in both ranges; `Range::default()` when they are disjoint.
    #[inline]
    pub fn intersect(self, other: Range) -> Self {
        let r = Range {
            min: Point::new(self.min.x.max(other.min.x), self.min.y.max(other.min.y)),
            max: Point::new(self.max.x.min(other.max.x), self.max.y.min(other.max.y)),
        };
        if r.is_empty() { Range::default() } else { r }
    }

    #[inline]
    pub fn overlaps(self, other: Range) -> bool {
        !self.intersect(other).is_empty()
    }

    /// The range with `n` more tiles on every side.
    #[inline]
    pub fn grow(self, n: i32) -> Self {
        let d = Point::new(n, n);
        Range {
            min: self.min - d,
            max: self.max + d,
        }
    }

    /// The tile of this range nearest to `p`; `p` itself when inside.
    #[inline]
    pub fn clamp(self, p: Point) -> Point {
        Point::new(
            p.x.clamp(self.min.x, self.max.x - 1),
            p.y.clamp(self.min.y, self.max.y - 1),
        )
    }

    /// The tiles touching this range from outside, row by row: everything in
    /// `grow(1)` that is not in `self`.
    pub fn ring(self) -> impl Iterator<Item = Point> {
        self.grow(1).iter().filter(move |&p| !self.contains(p))
    }

    /// Every tile, row by row.
    #[inline]
    pub fn iter(self) -> RangeIter {
        RangeIter {
            range: self,
            next: 0,
            len: self.len(),
        }
    }
}

impl IntoIterator for Range {
    type Item = Point;
    type IntoIter = RangeIter;
    #[inline]
    fn into_iter(self) -> RangeIter {
        self.iter()
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{} at {}", self.width(), self.height(), self.min)
    }
}

/// Row-major walk over a [`Range`].
#[derive(Clone, Debug)]
pub struct RangeIter {
    range: Range,
    next: usize,
    len: usize,
}

impl Iterator for RangeIter {
    type Item = Point;

    #[inline]
    fn next(&mut self) -> Option<Point> {
        if self.next >= self.len {
            return None;
        }
        let w = self.range.width() as usize;
        let p = Point::new(
            self.range.min.x + (self.next % w) as i32,
            self.range.min.y + (self.next / w) as i32,
        );
        self.next += 1;
        Some(p)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.len - self.next;
        (n, Some(n))
    }
}

impl ExactSizeIterator for RangeIter {}
