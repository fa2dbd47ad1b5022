use std::cmp::Ordering;

use tilenav_core::Point;

// ---------------------------------------------------------------------------
// Search node
// ---------------------------------------------------------------------------

/// One open entry of an A* search.
///
/// Lives only for the duration of a single search and is never persisted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchNode {
    pub pos: Point,
    /// `None` for the start node.
    pub parent: Option<Point>,
    pub g: f32,
    pub h: f32,
    pub f: f32,
    /// Push order of the current version of this node.
    pub(crate) seq: u64,
}

impl SearchNode {
    pub(crate) fn new(pos: Point, parent: Option<Point>, g: f32, h: f32, seq: u64) -> Self {
        Self {
            pos,
            parent,
            g,
            h,
            f: g + h,
            seq,
        }
    }
}

/// Heap entry referring to an open node, ordered for use in `BinaryHeap`.
///
/// Lowest `f` pops first; on equal `f`, the entry pushed earliest pops first.
#[derive(Debug, Clone, Copy)]
pub(crate) struct NodeRef {
    pub(crate) pos: Point,
    pub(crate) f: f32,
    pub(crate) seq: u64,
}

impl Ord for NodeRef {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse so BinaryHeap (max-heap) pops smallest f first.
        other
            .f
            .total_cmp(&self.f)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for NodeRef {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for NodeRef {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for NodeRef {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BinaryHeap;

    fn node_ref(x: i32, f: f32, seq: u64) -> NodeRef {
        NodeRef {
            pos: Point::new(x, 0),
            f,
            seq,
        }
    }

    #[test]
    fn heap_pops_lowest_f_then_earliest() {
        let mut heap = BinaryHeap::new();
        heap.push(node_ref(0, 3.0, 0));
        heap.push(node_ref(1, 1.5, 2));
        heap.push(node_ref(2, 1.5, 1));
        heap.push(node_ref(3, 2.0, 3));
        let order: Vec<i32> = std::iter::from_fn(|| heap.pop().map(|n| n.pos.x)).collect();
        assert_eq!(order, vec![2, 1, 3, 0]);
    }

    #[test]
    fn f_is_sum_of_costs() {
        let n = SearchNode::new(Point::new(1, 1), None, 2.0, 1.5, 0);
        assert_eq!(n.f, 3.5);
    }
}
