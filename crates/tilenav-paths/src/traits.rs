use tilenav_core::Point;

/// Movement graph of a search: which tiles can be stepped onto from `p`.
pub trait Pather {
    /// Push the tiles reachable in one step from `p` onto `buf`, in expansion
    /// order. `buf` is empty on entry.
    fn neighbors(&self, p: Point, buf: &mut Vec<Point>);
}

/// A movement graph with step costs.
pub trait WeightedPather: Pather {
    /// Cost of the single step `from` → `to`; strictly positive.
    fn cost(&self, from: Point, to: Point) -> f32;
}

/// A weighted movement graph with a remaining-cost estimate for A*.
pub trait AstarPather: WeightedPather {
    /// Estimated cost of getting from `from` to `to`.
    fn estimate(&self, from: Point, to: Point) -> f32;
}
