//! Approach-tile resolution for targets that cannot be entered.
//!
//! Buildings, resource deposits and occupied tiles are reached by standing
//! next to them. The resolver looks at the ring of tiles one cell beyond the
//! target's footprint, prefers cardinal approaches over diagonal ones, and
//! returns a path to the first candidate the path finder can reach.

use tilenav_core::{GridModel, Point, Range};
use tilenav_paths::{Path, PathFinder, approx_distance};

use crate::agent::Agent;
use crate::target::Target;

/// A tile next to a target that an agent could stand on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    pub pos: Point,
    /// Touches the footprint only by a corner.
    pub diagonal: bool,
    /// Ordering score, lower is tried first.
    pub score: f32,
}

/// Finds the best reachable tile to approach a target from.
pub struct AdjacencyResolver;

impl AdjacencyResolver {
    /// Path to the best approach tile of `target` for `agent`.
    ///
    /// Planning starts from [`Agent::planning_origin`]. If the agent is
    /// already stepping towards a waypoint, that waypoint is kept as the head
    /// of the returned path so the movement stays continuous.
    pub fn nearest_approach_tile<G: GridModel + ?Sized>(
        agent: &Agent,
        target: &Target,
        grid: &G,
    ) -> Option<Path> {
        let mut path = Self::route_for(agent, target.footprint(), grid)?;
        if let Some(head) = agent.path.head() {
            path.push_front(head);
        }
        Some(path)
    }

    /// Like [`nearest_approach_tile`](Self::nearest_approach_tile), without
    /// the head waypoint in front.
    ///
    /// Only the tile the agent stands on counts as its own. A head waypoint
    /// it is still walking towards is taken like any other tile when someone
    /// else holds it.
    pub fn route_for<G: GridModel + ?Sized>(agent: &Agent, footprint: Range, grid: &G) -> Option<Path> {
        Self::search(agent.planning_origin(), agent.tile, footprint, grid)
    }

    /// Path from `origin` to the best reachable tile around `footprint`, for
    /// an agent standing on `origin`.
    ///
    /// Returns an empty path when `origin` itself is the chosen tile, and
    /// `None` when no candidate can be reached.
    pub fn approach_from<G: GridModel + ?Sized>(
        origin: Point,
        footprint: Range,
        grid: &G,
    ) -> Option<Path> {
        Self::search(origin, origin, footprint, grid)
    }

    fn search<G: GridModel + ?Sized>(
        origin: Point,
        standing: Point,
        footprint: Range,
        grid: &G,
    ) -> Option<Path> {
        let candidates = Self::ranked(origin, standing, footprint, grid);
        for c in &candidates {
            if let Some(path) = PathFinder::find_path(origin, c.pos, grid) {
                return Some(path);
            }
        }
        log::debug!(
            "no reachable approach tile around {footprint} from {origin} ({} candidates)",
            candidates.len()
        );
        None
    }

    /// Usable approach tiles around `footprint` for an agent standing on
    /// `origin`, best first.
    ///
    /// A candidate must be in bounds, walkable and unoccupied; `origin` is
    /// exempt from the occupancy test since the planning agent stands there.
    /// A diagonal candidate also needs both tiles flanking its corner step to
    /// be free, so agents never cut through a blocked corner. Scores are the
    /// approximate distance from `origin`, doubled for diagonal candidates.
    /// Equal scores keep the row-major ring order.
    pub fn candidates<G: GridModel + ?Sized>(
        origin: Point,
        footprint: Range,
        grid: &G,
    ) -> Vec<Candidate> {
        Self::ranked(origin, origin, footprint, grid)
    }

    fn ranked<G: GridModel + ?Sized>(
        origin: Point,
        standing: Point,
        footprint: Range,
        grid: &G,
    ) -> Vec<Candidate> {
        let mut out = Vec::with_capacity(8);
        if footprint.is_empty() {
            return out;
        }
        for p in footprint.ring() {
            if !grid.in_bounds(p) || !grid.is_walkable(p) {
                continue;
            }
            if p != standing && grid.is_occupied(p) {
                continue;
            }
            let corner = footprint.clamp(p);
            let diagonal = p.x != corner.x && p.y != corner.y;
            if diagonal {
                let flank_a = Point::new(p.x, corner.y);
                let flank_b = Point::new(corner.x, p.y);
                if !grid.is_free(flank_a) || !grid.is_free(flank_b) {
                    continue;
                }
            }
            let mut score = approx_distance(origin, p);
            if diagonal {
                score *= 2.0;
            }
            out.push(Candidate {
                pos: p,
                diagonal,
                score,
            });
        }
        out.sort_by(|a, b| a.score.total_cmp(&b.score));
        out
    }
}
