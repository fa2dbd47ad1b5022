use std::collections::VecDeque;
use std::collections::vec_deque;

use tilenav_core::Point;

/// An agent's route: the waypoints after the start, up to and including the
/// goal.
///
/// A path is replaced wholesale on replan. The only in-place edits are
/// popping the head as it is reached and re-inserting a head waypoint so an
/// agent already mid-step keeps moving smoothly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Path {
    waypoints: VecDeque<Point>,
}

impl Path {
    /// An empty path.
    pub fn new() -> Self {
        Self::default()
    }

    /// The next waypoint to walk to.
    pub fn head(&self) -> Option<Point> {
        self.waypoints.front().copied()
    }

    /// The final waypoint.
    pub fn goal(&self) -> Option<Point> {
        self.waypoints.back().copied()
    }

    /// Remove and return the head waypoint.
    pub fn pop_head(&mut self) -> Option<Point> {
        self.waypoints.pop_front()
    }

    /// Insert `p` as the new head waypoint.
    pub fn push_front(&mut self, p: Point) {
        self.waypoints.push_front(p);
    }

    /// Drop every waypoint.
    pub fn clear(&mut self) {
        self.waypoints.clear();
    }

    /// Number of waypoints left.
    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    /// Whether no waypoint is left.
    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    /// Whether `p` is one of the waypoints.
    pub fn contains(&self, p: Point) -> bool {
        self.waypoints.contains(&p)
    }

    /// Iterate over waypoints from head to goal.
    pub fn iter(&self) -> vec_deque::Iter<'_, Point> {
        self.waypoints.iter()
    }

    /// Waypoints from head to goal.
    pub fn to_vec(&self) -> Vec<Point> {
        self.waypoints.iter().copied().collect()
    }
}

impl From<Vec<Point>> for Path {
    fn from(v: Vec<Point>) -> Self {
        Self {
            waypoints: v.into(),
        }
    }
}

impl FromIterator<Point> for Path {
    fn from_iter<I: IntoIterator<Item = Point>>(iter: I) -> Self {
        Self {
            waypoints: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Path {
    type Item = &'a Point;
    type IntoIter = vec_deque::Iter<'a, Point>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
