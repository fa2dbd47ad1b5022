//! Per-tick agent movement with reactive replanning.
//!
//! Nothing is reserved ahead of movement. Occupancy is sampled live when an
//! agent reaches a waypoint: if the next waypoint has been taken in the
//! meantime the route is recomputed on the spot, to the same goal when the
//! goal is still free, or to a fresh approach tile when it is not.

use tilenav_core::{GridModel, Point, Range};
use tilenav_paths::{Path, PathFinder};

use crate::adjacency::AdjacencyResolver;
use crate::agent::Agent;
use crate::config::NavConfig;
use crate::stats::NavStats;
use crate::target::Target;

/// How a route was recomputed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Replan {
    /// An intermediate waypoint was taken: new path to the same goal.
    Full,
    /// The goal itself was taken: new path to an approach tile.
    Adjacent,
}

/// What happens after a waypoint is reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Next {
    /// The next waypoint is free, keep walking.
    Continue,
    /// That was the goal; the agent is idle.
    Done,
    /// The next waypoint was taken and a new route was adopted.
    Replanned(Replan),
    /// The next waypoint was taken and no route exists; the agent is idle.
    Stuck,
}

/// Outcome of one [`Navigator::advance`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// No path: nothing to do.
    Idle,
    /// Moved towards the head waypoint without reaching it.
    Moving,
    /// Snapped onto the head waypoint `to`, leaving tile `from`.
    Arrived { from: Point, to: Point, next: Next },
}

/// The grid as seen by an agent that has just stepped off `vacated`.
///
/// The caller moves occupancy only once the arrival is reported, so until
/// then the tile left behind still counts the agent as an occupant.
struct Departed<'a, G: ?Sized> {
    grid: &'a G,
    vacated: Point,
}

impl<G: GridModel + ?Sized> GridModel for Departed<'_, G> {
    fn bounds(&self) -> Range {
        self.grid.bounds()
    }

    fn is_walkable(&self, p: Point) -> bool {
        self.grid.is_walkable(p)
    }

    fn is_occupied(&self, p: Point) -> bool {
        p != self.vacated && self.grid.is_occupied(p)
    }
}

/// Drives agents along their paths, one tick at a time.
#[derive(Debug, Clone, Default)]
pub struct Navigator {
    pub config: NavConfig,
    stats: NavStats,
}

impl Navigator {
    pub fn new(config: NavConfig) -> Self {
        Self {
            config,
            stats: NavStats::default(),
        }
    }

    /// Counters accumulated since creation or the last reset.
    pub fn stats(&self) -> NavStats {
        self.stats
    }

    pub fn reset_stats(&mut self) {
        self.stats = NavStats::default();
    }

    /// Order `agent` to move to or interact with `target`.
    ///
    /// A ground order onto a free tile is routed straight there; everything
    /// else is routed to the best approach tile. An agent mid-step keeps its
    /// current head waypoint. Returns whether a route was adopted; on failure
    /// the agent is left idle, and reissuing the order searches again.
    pub fn command<G: GridModel + ?Sized>(&mut self, agent: &mut Agent, target: Target, grid: &G) -> bool {
        agent.target = Some(target);
        self.stats.searches += 1;
        let route = if target.requires_approach(grid) {
            AdjacencyResolver::nearest_approach_tile(agent, &target, grid)
        } else {
            let goal = target.anchor();
            PathFinder::find_path(agent.planning_origin(), goal, grid).map(|mut path| {
                if let Some(head) = agent.path.head() {
                    path.push_front(head);
                }
                path
            })
        };
        match route {
            Some(path) => {
                agent.assign_path(path);
                true
            }
            None => {
                self.stats.failed_searches += 1;
                log::debug!("agent {}: no route to {:?} from {}", agent.id, target, agent.tile);
                agent.clear_path();
                false
            }
        }
    }

    /// Advance `agent` by one tick.
    ///
    /// The agent moves `speed` world units towards the head waypoint. When
    /// the remaining distance is within one tick of travel it snaps onto the
    /// waypoint, pops it, and checks the next one against live occupancy.
    pub fn advance<G: GridModel + ?Sized>(&mut self, agent: &mut Agent, grid: &G) -> Step {
        let Some(head) = agent.path.head() else {
            return Step::Idle;
        };
        let dest = self.config.tile_origin(head);
        if agent.pos.distance(dest) > agent.speed {
            agent.pos = agent.pos.step_toward(dest, agent.speed);
            return Step::Moving;
        }

        agent.pos = dest;
        let from = agent.tile;
        agent.tile = head;
        agent.path.pop_head();
        self.stats.arrivals += 1;

        let view = Departed { grid, vacated: from };
        let next = match agent.path.head() {
            None => Next::Done,
            Some(n) => {
                agent.face(n);
                if view.is_occupied(n) {
                    self.replan(agent, &view)
                } else {
                    Next::Continue
                }
            }
        };
        Step::Arrived {
            from,
            to: head,
            next,
        }
    }

    /// Recompute the route of an agent whose next waypoint was taken, from
    /// the tile it just reached.
    fn replan<G: GridModel + ?Sized>(&mut self, agent: &mut Agent, grid: &G) -> Next {
        let Some(goal) = agent.path.goal() else {
            return Next::Done;
        };
        agent.clear_path();
        self.stats.searches += 1;

        let (kind, route) = if grid.is_occupied(goal) {
            // Aim at the standing target when there is one, so a worker
            // pushed off its approach tile still ends up next to the
            // building rather than next to whoever took its spot.
            let footprint = match agent.target {
                Some(t) if t.requires_approach(grid) => t.footprint(),
                _ => Range::single(goal),
            };
            self.stats.adjacency_replans += 1;
            log::debug!("agent {}: goal {goal} taken, resolving approach", agent.id);
            (
                Replan::Adjacent,
                AdjacencyResolver::approach_from(agent.tile, footprint, grid),
            )
        } else {
            self.stats.full_replans += 1;
            log::debug!("agent {}: waypoint taken, replanning to {goal}", agent.id);
            (Replan::Full, PathFinder::find_path(agent.tile, goal, grid))
        };

        match route {
            Some(path) => {
                agent.assign_path(path);
                Next::Replanned(kind)
            }
            None => {
                self.stats.failed_searches += 1;
                self.stats.stuck += 1;
                log::debug!("agent {}: stuck at {}, no route to {goal}", agent.id, agent.tile);
                Next::Stuck
            }
        }
    }

    /// Advance until the agent is idle or `max_ticks` ticks have passed.
    /// Returns the number of ticks used.
    pub fn run_to_idle<G: GridModel + ?Sized>(&mut self, agent: &mut Agent, grid: &G, max_ticks: usize) -> usize {
        for tick in 0..max_ticks {
            if self.advance(agent, grid) == Step::Idle {
                return tick;
            }
        }
        max_ticks
    }
}

/// The path an agent would get for `target` right now, without adopting it.
pub fn preview_route<G: GridModel + ?Sized>(agent: &Agent, target: &Target, grid: &G) -> Option<Path> {
    if target.requires_approach(grid) {
        AdjacencyResolver::route_for(agent, target.footprint(), grid)
    } else {
        PathFinder::find_path(agent.planning_origin(), target.anchor(), grid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::NavState;
    use tilenav_core::{Direction, TileMap};

    fn setup(w: i32, h: i32, at: Point) -> (Navigator, Agent, TileMap) {
        let nav = Navigator::new(NavConfig { tile_size: 10.0 });
        let agent = Agent::new(1, at, 5.0, &nav.config);
        let mut grid = TileMap::new(w, h);
        grid.occupy(at);
        (nav, agent, grid)
    }

    /// Tick until the next arrival, mirroring occupancy like a simulation
    /// would.
    fn tick_to_arrival(nav: &mut Navigator, agent: &mut Agent, grid: &mut TileMap) -> Step {
        for _ in 0..100 {
            let step = nav.advance(agent, grid);
            if let Step::Arrived { from, to, .. } = step {
                grid.relocate(from, to);
                return step;
            }
            if step == Step::Idle {
                return step;
            }
        }
        panic!("agent never arrived");
    }

    #[test]
    fn idle_agent_stays_idle() {
        let (mut nav, mut agent, grid) = setup(4, 4, Point::new(0, 0));
        assert_eq!(nav.advance(&mut agent, &grid), Step::Idle);
        assert_eq!(agent.state(), NavState::Idle);
    }

    #[test]
    fn moves_by_speed_then_snaps() {
        let (mut nav, mut agent, grid) = setup(4, 1, Point::new(0, 0));
        assert!(nav.command(&mut agent, Target::Ground(Point::new(1, 0)), &grid));
        assert_eq!(agent.state(), NavState::Moving);
        assert_eq!(agent.facing, Direction::East);
        // 10 units to cover at 5 per tick.
        assert_eq!(nav.advance(&mut agent, &grid), Step::Moving);
        assert!((agent.pos.x - 5.0).abs() < 1e-5);
        assert_eq!(
            nav.advance(&mut agent, &grid),
            Step::Arrived {
                from: Point::new(0, 0),
                to: Point::new(1, 0),
                next: Next::Done
            }
        );
        assert_eq!(agent.pos, nav.config.tile_origin(Point::new(1, 0)));
        assert_eq!(agent.tile, Point::new(1, 0));
        assert!(agent.is_idle());
    }

    #[test]
    fn never_overshoots() {
        let mut nav = Navigator::new(NavConfig { tile_size: 10.0 });
        let mut agent = Agent::new(1, Point::new(0, 0), 3.0, &nav.config);
        let grid = TileMap::new(3, 1);
        nav.command(&mut agent, Target::Ground(Point::new(1, 0)), &grid);
        let mut ticks = 0;
        while nav.advance(&mut agent, &grid) == Step::Moving {
            assert!(agent.pos.x <= 10.0);
            ticks += 1;
        }
        assert_eq!(ticks, 3);
        assert_eq!(agent.pos.x, 10.0);
    }

    #[test]
    fn walks_whole_path() {
        let (mut nav, mut agent, mut grid) = setup(6, 6, Point::new(0, 0));
        assert!(nav.command(&mut agent, Target::Ground(Point::new(5, 3)), &grid));
        let mut arrivals = 0;
        loop {
            match tick_to_arrival(&mut nav, &mut agent, &mut grid) {
                Step::Arrived { next: Next::Done, .. } => {
                    arrivals += 1;
                    break;
                }
                Step::Arrived { .. } => arrivals += 1,
                other => panic!("unexpected {other:?}"),
            }
        }
        assert_eq!(arrivals, 5);
        assert_eq!(agent.tile, Point::new(5, 3));
        assert!(grid.is_occupied(Point::new(5, 3)));
        assert!(!grid.is_occupied(Point::new(0, 0)));
        assert_eq!(nav.stats().arrivals, 5);
    }

    #[test]
    fn blocked_waypoint_triggers_full_replan() {
        let (mut nav, mut agent, mut grid) = setup(7, 5, Point::new(0, 2));
        assert!(nav.command(&mut agent, Target::Ground(Point::new(6, 2)), &grid));
        assert_eq!(agent.path.head(), Some(Point::new(1, 2)));
        assert!(agent.path.contains(Point::new(2, 2)));

        // Another unit steps onto the second waypoint while we walk.
        grid.occupy(Point::new(2, 2));
        let step = tick_to_arrival(&mut nav, &mut agent, &mut grid);
        assert_eq!(
            step,
            Step::Arrived {
                from: Point::new(0, 2),
                to: Point::new(1, 2),
                next: Next::Replanned(Replan::Full)
            }
        );
        assert_eq!(agent.path.goal(), Some(Point::new(6, 2)));
        assert!(!agent.path.contains(Point::new(2, 2)));
        assert_eq!(nav.stats().full_replans, 1);
        assert_eq!(nav.stats().adjacency_replans, 0);
    }

    #[test]
    fn taken_goal_triggers_adjacency_replan() {
        let (mut nav, mut agent, mut grid) = setup(6, 3, Point::new(0, 1));
        assert!(nav.command(&mut agent, Target::Ground(Point::new(2, 1)), &grid));
        assert_eq!(agent.path.to_vec(), vec![Point::new(1, 1), Point::new(2, 1)]);

        grid.occupy(Point::new(2, 1));
        let step = tick_to_arrival(&mut nav, &mut agent, &mut grid);
        assert_eq!(
            step,
            Step::Arrived {
                from: Point::new(0, 1),
                to: Point::new(1, 1),
                next: Next::Replanned(Replan::Adjacent)
            }
        );
        // Already next to the taken goal: nothing left to walk.
        assert!(agent.is_idle());
        assert_eq!(nav.stats().adjacency_replans, 1);
    }

    #[test]
    fn failed_replan_leaves_agent_stuck() {
        let mut grid = TileMap::from_ascii(
            "
#######
#.....#
#######
",
        )
        .unwrap();
        let mut nav = Navigator::new(NavConfig { tile_size: 10.0 });
        let mut agent = Agent::new(1, Point::new(1, 1), 5.0, &nav.config);
        grid.occupy(agent.tile);
        assert!(nav.command(&mut agent, Target::Ground(Point::new(5, 1)), &grid));

        // Someone parks in the corridor: the goal stays free but is cut off.
        grid.occupy(Point::new(3, 1));
        let step = tick_to_arrival(&mut nav, &mut agent, &mut grid);
        assert_eq!(
            step,
            Step::Arrived {
                from: Point::new(1, 1),
                to: Point::new(2, 1),
                next: Next::Stuck
            }
        );
        assert!(agent.is_idle());
        assert_eq!(nav.stats().full_replans, 1);
        assert_eq!(nav.stats().stuck, 1);
        assert_eq!(nav.stats().failed_searches, 1);
    }

    #[test]
    fn unreachable_order_is_searched_again_each_time() {
        let (mut nav, mut agent, mut grid) = setup(5, 5, Point::new(0, 0));
        grid.fill_terrain(Range::new(2, 0, 3, 5), tilenav_core::Terrain::Water);
        let target = Target::Ground(Point::new(4, 4));
        for _ in 0..3 {
            assert!(!nav.command(&mut agent, target, &grid));
            assert!(agent.is_idle());
        }
        assert_eq!(nav.stats().searches, 3);
        assert_eq!(nav.stats().failed_searches, 3);
        assert_eq!(agent.target, Some(target));
    }

    #[test]
    fn building_order_stops_next_to_footprint() {
        let (mut nav, mut agent, mut grid) = setup(10, 10, Point::new(0, 0));
        let fp = Range::sized(Point::new(6, 6), 2, 2);
        grid.occupy_range(fp);
        let target = Target::Building { id: 5, footprint: fp };
        assert!(nav.command(&mut agent, target, &grid));
        assert!(nav.run_to_idle(&mut agent, &grid, 1000) < 1000);
        assert!(target.is_reached_from(agent.tile));
    }

    #[test]
    fn new_order_mid_step_keeps_head() {
        let (mut nav, mut agent, grid) = setup(8, 8, Point::new(0, 0));
        assert!(nav.command(&mut agent, Target::Ground(Point::new(7, 0)), &grid));
        assert_eq!(nav.advance(&mut agent, &grid), Step::Moving);
        let head = agent.path.head();
        assert!(nav.command(&mut agent, Target::Ground(Point::new(1, 7)), &grid));
        assert_eq!(agent.path.head(), head);
        assert_eq!(agent.path.goal(), Some(Point::new(1, 7)));
    }

    #[test]
    fn facing_follows_next_waypoint() {
        let (mut nav, mut agent, grid) = setup(5, 5, Point::new(2, 2));
        nav.command(&mut agent, Target::Ground(Point::new(2, 0)), &grid);
        assert_eq!(agent.facing, Direction::North);
        nav.command(&mut agent, Target::Ground(Point::new(0, 4)), &grid);
        assert_eq!(agent.facing, Direction::North);
        nav.run_to_idle(&mut agent, &grid, 100);
        assert_eq!(agent.tile, Point::new(0, 4));
        nav.command(&mut agent, Target::Ground(Point::new(4, 4)), &grid);
        assert_eq!(agent.facing, Direction::East);
    }

    #[test]
    fn preview_does_not_touch_agent() {
        let (_, agent, grid) = setup(5, 5, Point::new(0, 0));
        let route = preview_route(&agent, &Target::Ground(Point::new(3, 3)), &grid).unwrap();
        assert_eq!(route.len(), 3);
        assert!(agent.is_idle());
        assert_eq!(agent.target, None);
    }

    #[test]
    fn replan_may_double_back_through_the_tile_just_left() {
        let mut grid = TileMap::from_ascii(
            "
#########
#.......#
#.#####.#
#.......#
#########
",
        )
        .unwrap();
        let mut nav = Navigator::new(NavConfig { tile_size: 10.0 });
        let mut agent = Agent::new(1, Point::new(2, 1), 5.0, &nav.config);
        grid.occupy(agent.tile);
        assert!(nav.command(&mut agent, Target::Ground(Point::new(6, 1)), &grid));
        assert_eq!(agent.path.len(), 4);

        // The top corridor is cut; the only way round starts back at (2,1).
        grid.occupy(Point::new(4, 1));
        let step = tick_to_arrival(&mut nav, &mut agent, &mut grid);
        assert_eq!(
            step,
            Step::Arrived {
                from: Point::new(2, 1),
                to: Point::new(3, 1),
                next: Next::Replanned(Replan::Full)
            }
        );
        assert_eq!(agent.path.head(), Some(Point::new(2, 1)));
        assert_eq!(agent.path.len(), 9);
        assert_eq!(agent.path.goal(), Some(Point::new(6, 1)));

        for _ in 0..9 {
            tick_to_arrival(&mut nav, &mut agent, &mut grid);
        }
        assert!(agent.is_idle());
        assert_eq!(agent.tile, Point::new(6, 1));
        assert_eq!(nav.stats().stuck, 0);
    }

    #[test]
    fn taken_approach_tile_is_replaced_around_the_building() {
        let (mut nav, mut agent, mut grid) = setup(10, 6, Point::new(0, 0));
        let fp = Range::sized(Point::new(6, 2), 2, 2);
        grid.occupy_range(fp);
        let target = Target::Building { id: 4, footprint: fp };
        assert!(nav.command(&mut agent, target, &grid));
        assert_eq!(agent.path.goal(), Some(Point::new(6, 1)));

        // Another worker takes the approach tile first.
        grid.occupy(Point::new(6, 1));
        let step = loop {
            let step = tick_to_arrival(&mut nav, &mut agent, &mut grid);
            if !matches!(step, Step::Arrived { next: Next::Continue, .. }) {
                break step;
            }
        };
        assert_eq!(
            step,
            Step::Arrived {
                from: Point::new(4, 0),
                to: Point::new(5, 0),
                next: Next::Replanned(Replan::Adjacent)
            }
        );
        // Next to the taker would leave the worker out of reach of the base.
        assert!(!target.is_reached_from(agent.tile));
        assert_eq!(agent.path.to_vec(), vec![Point::new(6, 0), Point::new(7, 1)]);
        assert!(target.is_reached_from(Point::new(7, 1)));
        assert_eq!(nav.stats().adjacency_replans, 1);

        nav.run_to_idle(&mut agent, &grid, 100);
        assert_eq!(agent.tile, Point::new(7, 1));
    }

    #[test]
    fn stats_reset_to_zero() {
        let (mut nav, mut agent, grid) = setup(4, 4, Point::new(0, 0));
        assert!(nav.command(&mut agent, Target::Ground(Point::new(3, 3)), &grid));
        nav.run_to_idle(&mut agent, &grid, 100);
        assert_eq!(nav.stats().searches, 1);
        assert_eq!(nav.stats().arrivals, 3);
        nav.reset_stats();
        assert_eq!(nav.stats(), NavStats::default());
    }
}
