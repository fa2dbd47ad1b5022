use std::collections::{BinaryHeap, HashMap};

use tilenav_core::{GridModel, Point};

use crate::node::{NodeRef, SearchNode};
use crate::path::Path;
use crate::pather::GridPather;
use crate::traits::AstarPather;

/// Single-source, single-goal shortest-path search.
///
/// Every call builds its own search state and drops it on return, so
/// searches are reentrant and nothing leaks from one call into the next.
/// There is no iteration cap: a search runs until it reaches the goal or
/// exhausts the reachable area.
pub struct PathFinder;

impl PathFinder {
    /// Find a path from `start` to `goal` over `grid`, stepping in eight
    /// directions onto walkable, unoccupied tiles.
    ///
    /// The start tile itself is never tested (the searching agent usually
    /// stands on it). Returns `None` if the goal cannot be reached, and an
    /// empty path if `start == goal`.
    pub fn find_path<G: GridModel + ?Sized>(start: Point, goal: Point, grid: &G) -> Option<Path> {
        Self::astar(&GridPather::new(grid), start, goal)
    }

    /// A* with an arbitrary pather.
    pub fn astar<P: AstarPather>(pather: &P, start: Point, goal: Point) -> Option<Path> {
        let mut search = Search::new(goal);
        let path = search.run(pather, start);
        match &path {
            Some(p) => log::trace!(
                "path {start} -> {goal}: {} steps, {} nodes expanded",
                p.len(),
                search.expanded
            ),
            None => log::trace!(
                "path {start} -> {goal}: unreachable after {} nodes expanded",
                search.expanded
            ),
        }
        path
    }
}

/// State of one A* invocation.
struct Search {
    goal: Point,
    open: BinaryHeap<NodeRef>,
    /// Open nodes keyed by coordinate: at most one live entry per tile.
    open_nodes: HashMap<Point, SearchNode>,
    /// Finalized tiles and their parent.
    closed: HashMap<Point, Option<Point>>,
    seq: u64,
    expanded: usize,
    nbuf: Vec<Point>,
}

impl Search {
    fn new(goal: Point) -> Self {
        Self {
            goal,
            open: BinaryHeap::new(),
            open_nodes: HashMap::new(),
            closed: HashMap::new(),
            seq: 0,
            expanded: 0,
            nbuf: Vec::with_capacity(8),
        }
    }

    fn push(&mut self, node: SearchNode) {
        self.open.push(NodeRef {
            pos: node.pos,
            f: node.f,
            seq: node.seq,
        });
        self.open_nodes.insert(node.pos, node);
    }

    fn next_seq(&mut self) -> u64 {
        let s = self.seq;
        self.seq += 1;
        s
    }

    fn run<P: AstarPather>(&mut self, pather: &P, start: Point) -> Option<Path> {
        let h = pather.estimate(start, self.goal);
        let seq = self.next_seq();
        self.push(SearchNode::new(start, None, 0.0, h, seq));

        while let Some(current) = self.open.pop() {
            // Skip entries superseded by a cheaper push of the same tile.
            let node = match self.open_nodes.get(&current.pos) {
                Some(n) if n.seq == current.seq => *n,
                _ => continue,
            };
            self.open_nodes.remove(&node.pos);
            self.closed.insert(node.pos, node.parent);
            self.expanded += 1;

            if node.pos == self.goal {
                return Some(self.reconstruct());
            }

            let mut nbuf = std::mem::take(&mut self.nbuf);
            nbuf.clear();
            pather.neighbors(node.pos, &mut nbuf);

            for &np in nbuf.iter() {
                if self.closed.contains_key(&np) {
                    continue;
                }
                let tentative_g = node.g + pather.cost(node.pos, np);
                if let Some(existing) = self.open_nodes.get(&np) {
                    if tentative_g >= existing.g {
                        continue;
                    }
                }
                let h = pather.estimate(np, self.goal);
                let seq = self.next_seq();
                self.push(SearchNode::new(np, Some(node.pos), tentative_g, h, seq));
            }

            self.nbuf = nbuf;
        }
        None
    }

    /// Follow parent links back from the goal; the start is left out.
    fn reconstruct(&self) -> Path {
        let mut rev = Vec::new();
        let mut cur = self.goal;
        while let Some(&Some(parent)) = self.closed.get(&cur) {
            rev.push(cur);
            cur = parent;
        }
        rev.into_iter().rev().collect()
    }
}

/// Whether every waypoint of `path` is free on `grid` and each step moves to
/// an adjacent tile, starting next to `start`.
pub fn is_valid_path<G: GridModel + ?Sized>(start: Point, path: &Path, grid: &G) -> bool {
    let mut prev = start;
    for &p in path {
        if !prev.is_adjacent(p) || !grid.is_free(p) {
            return false;
        }
        prev = p;
    }
    true
}
