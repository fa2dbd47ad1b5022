//! Tile-walk line of sight.
//!
//! A cheap visibility gate for ranged actions. Rather than casting a
//! geometric ray, the check walks greedily from the observer towards the
//! target over orthogonal neighbours, and fails as soon as every neighbour
//! that brings it closer is blocked.

use tilenav_core::{GridModel, Point};
use tilenav_paths::{Neighbors, manhattan};

/// Greedy tile-walk visibility test.
pub struct LineOfSight;

impl LineOfSight {
    /// Whether `observer` can see `target` on `grid`.
    pub fn is_open<G: GridModel + ?Sized>(observer: Point, target: Point, grid: &G) -> bool {
        Self::walk(observer, target, grid).is_ok()
    }

    /// Walk from `observer` towards `target`.
    ///
    /// Each step looks at the in-bounds orthogonal neighbours with the
    /// smallest Manhattan distance to the target (one, or two on a tie). If
    /// the target is among them, sight is open. Otherwise the walk moves to
    /// the first of them that is walkable and unoccupied; when none is, sight
    /// is blocked and the tile where the walk stopped is returned as the
    /// error. The target itself may be occupied (it usually is a unit).
    pub fn walk<G: GridModel + ?Sized>(observer: Point, target: Point, grid: &G) -> Result<(), Point> {
        if observer == target {
            return Ok(());
        }
        if !grid.in_bounds(target) {
            return Err(observer);
        }
        let mut nb = Neighbors::new();
        let mut cur = observer;
        loop {
            let around = nb.cardinal(cur, |n| grid.in_bounds(n));
            let Some(best) = around.iter().map(|&n| manhattan(n, target)).min() else {
                return Err(cur);
            };
            let mut next = None;
            for &n in around.iter().filter(|&&n| manhattan(n, target) == best) {
                if n == target {
                    return Ok(());
                }
                if next.is_none() && grid.is_free(n) {
                    next = Some(n);
                }
            }
            match next {
                Some(n) => cur = n,
                None => return Err(cur),
            }
        }
    }
}
