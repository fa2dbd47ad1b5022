use std::f32::consts::SQRT_2;

use tilenav_core::Point;

/// Cost of one cardinal step.
pub const CARDINAL_COST: f32 = 1.0;

/// Cost of one diagonal step. A constant, not derived from the actual delta.
pub const DIAGONAL_COST: f32 = SQRT_2;

/// Manhattan (L1) distance between two points.
#[inline]
pub fn manhattan(a: Point, b: Point) -> i32 {
    (a.x - b.x).abs() + (a.y - b.y).abs()
}

/// Chebyshev (L∞) distance between two points.
#[inline]
pub fn chebyshev(a: Point, b: Point) -> i32 {
    (a.x - b.x).abs().max((a.y - b.y).abs())
}

/// Approximate distance shared by the search heuristic and the edge cost.
///
/// When only one axis differs this is the sum of the axis deltas. As soon as
/// both axes differ it is the constant [`DIAGONAL_COST`], whatever the actual
/// deltas are. For adjacent tiles this is exactly the step cost.
#[inline]
pub fn approx_distance(a: Point, b: Point) -> f32 {
    let dx = (a.x - b.x).abs();
    let dy = (a.y - b.y).abs();
    if dx != 0 && dy != 0 {
        DIAGONAL_COST
    } else {
        (dx + dy) as f32 * CARDINAL_COST
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_metrics() {
        let a = Point::new(1, 1);
        let b = Point::new(4, 3);
        assert_eq!(manhattan(a, b), 5);
        assert_eq!(chebyshev(a, b), 3);
    }

    #[test]
    fn approx_single_axis_is_exact() {
        assert_eq!(approx_distance(Point::new(0, 0), Point::new(0, 7)), 7.0);
        assert_eq!(approx_distance(Point::new(5, 2), Point::new(1, 2)), 4.0);
        assert_eq!(approx_distance(Point::new(3, 3), Point::new(3, 3)), 0.0);
    }

    #[test]
    fn approx_both_axes_is_constant() {
        assert_eq!(approx_distance(Point::new(0, 0), Point::new(1, 1)), SQRT_2);
        assert_eq!(approx_distance(Point::new(0, 0), Point::new(9, 2)), SQRT_2);
    }
}
