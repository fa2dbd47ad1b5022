use tilenav_core::Point;

/// Reusable buffer for filtered neighbour lists, so tight loops such as the
/// line-of-sight walk do not allocate per step.
pub struct Neighbors {
    buf: Vec<Point>,
}

impl Default for Neighbors {
    fn default() -> Self {
        Self::new()
    }
}

impl Neighbors {
    pub fn new() -> Self {
        Self {
            buf: Vec::with_capacity(8),
        }
    }

    /// Cardinal neighbours of `p` accepted by `keep`, in N, E, S, W order.
    pub fn cardinal(&mut self, p: Point, keep: impl Fn(Point) -> bool) -> &[Point] {
        self.buf.clear();
        self.buf.extend(p.neighbors_4().into_iter().filter(|&n| keep(n)));
        &self.buf
    }

    /// All eight neighbours of `p` accepted by `keep`, cardinals first.
    pub fn all(&mut self, p: Point, keep: impl Fn(Point) -> bool) -> &[Point] {
        self.buf.clear();
        self.buf.extend(p.neighbors_8().into_iter().filter(|&n| keep(n)));
        &self.buf
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cardinal_filters() {
        let mut nb = Neighbors::new();
        let ns = nb.cardinal(Point::new(0, 0), |n| n.x >= 0 && n.y >= 0);
        assert_eq!(ns, &[Point::new(1, 0), Point::new(0, 1)]);
    }

    #[test]
    fn all_keeps_order() {
        let mut nb = Neighbors::new();
        let ns = nb.all(Point::new(1, 1), |_| true).to_vec();
        assert_eq!(ns.len(), 8);
        assert_eq!(ns[0], Point::new(1, 0));
        assert_eq!(ns[4], Point::new(2, 0));
    }
}
