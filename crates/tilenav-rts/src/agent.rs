//! Moving agents and their persisted form.

use tilenav_core::{Direction, Point};
use tilenav_paths::Path;

use crate::config::NavConfig;
use crate::target::{EntityId, Target};

/// A continuous (sub-tile) position in world units.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WorldPos {
    pub x: f32,
    pub y: f32,
}

impl WorldPos {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    pub fn distance(self, other: WorldPos) -> f32 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    /// Move `step` units towards `target` along the straight line.
    pub fn step_toward(self, target: WorldPos, step: f32) -> WorldPos {
        let d = self.distance(target);
        if d <= f32::EPSILON {
            return target;
        }
        WorldPos::new(
            self.x + (target.x - self.x) / d * step,
            self.y + (target.y - self.y) / d * step,
        )
    }
}

/// Whether an agent has somewhere to go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavState {
    Idle,
    Moving,
}

/// A unit that walks the grid.
#[derive(Debug, Clone)]
pub struct Agent {
    pub id: EntityId,
    pub pos: WorldPos,
    /// Last tile the agent reached.
    pub tile: Point,
    /// World units travelled per tick.
    pub speed: f32,
    pub path: Path,
    pub facing: Direction,
    /// Standing order, kept so replans can aim at the same thing.
    pub target: Option<Target>,
}

impl Agent {
    /// Create an idle agent standing on `tile`.
    pub fn new(id: EntityId, tile: Point, speed: f32, config: &NavConfig) -> Self {
        Self {
            id,
            pos: config.tile_origin(tile),
            tile,
            speed,
            path: Path::new(),
            facing: Direction::default(),
            target: None,
        }
    }

    /// Idle when the path is empty, moving otherwise.
    pub fn state(&self) -> NavState {
        if self.path.is_empty() {
            NavState::Idle
        } else {
            NavState::Moving
        }
    }

    pub fn is_idle(&self) -> bool {
        self.state() == NavState::Idle
    }

    /// The tile new routes are planned from: the waypoint the agent is
    /// currently stepping towards, or its tile when it stands still.
    pub fn planning_origin(&self) -> Point {
        self.path.head().unwrap_or(self.tile)
    }

    /// Adopt `path` in place of the current one.
    pub fn assign_path(&mut self, path: Path) {
        self.path = path;
        if let Some(next) = self.path.head() {
            self.face(next);
        }
    }

    /// Drop the current path, leaving the agent idle.
    pub fn clear_path(&mut self) {
        self.path.clear();
    }

    /// Turn towards `next`. Facing is unchanged when `next` is the current
    /// tile.
    pub fn face(&mut self, next: Point) {
        if let Some(d) = Direction::toward(self.tile, next) {
            self.facing = d;
        }
    }

    /// The persisted form of this agent: in-flight paths are not saved.
    pub fn snapshot(&self) -> AgentSnapshot {
        AgentSnapshot {
            id: self.id,
            tile: self.tile,
            target: self.target,
        }
    }

    /// Rebuild an idle agent from a snapshot, snapped to its tile.
    pub fn restore(snapshot: &AgentSnapshot, speed: f32, config: &NavConfig) -> Self {
        let mut agent = Agent::new(snapshot.id, snapshot.tile, speed, config);
        agent.target = snapshot.target;
        agent
    }
}

/// What a save file keeps of an agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AgentSnapshot {
    pub id: EntityId,
    pub tile: Point,
    pub target: Option<Target>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_until_path_assigned() {
        let cfg = NavConfig::default();
        let mut a = Agent::new(1, Point::new(2, 2), 4.0, &cfg);
        assert_eq!(a.state(), NavState::Idle);
        assert_eq!(a.planning_origin(), Point::new(2, 2));
        a.assign_path(Path::from(vec![Point::new(3, 1), Point::new(4, 0)]));
        assert_eq!(a.state(), NavState::Moving);
        assert_eq!(a.facing, Direction::NorthEast);
        assert_eq!(a.planning_origin(), Point::new(3, 1));
        a.clear_path();
        assert!(a.is_idle());
    }

    #[test]
    fn step_toward_moves_by_speed() {
        let p = WorldPos::new(0.0, 0.0).step_toward(WorldPos::new(30.0, 40.0), 5.0);
        assert!((p.x - 3.0).abs() < 1e-5);
        assert!((p.y - 4.0).abs() < 1e-5);
    }

    #[test]
    fn snapshot_drops_path() {
        let cfg = NavConfig::default();
        let mut a = Agent::new(9, Point::new(1, 1), 4.0, &cfg);
        a.target = Some(Target::Ground(Point::new(5, 5)));
        a.assign_path(Path::from(vec![Point::new(2, 2), Point::new(3, 3)]));
        a.pos = WorldPos::new(40.0, 40.0);
        let snap = a.snapshot();
        let b = Agent::restore(&snap, 4.0, &cfg);
        assert_eq!(b.tile, Point::new(1, 1));
        assert_eq!(b.pos, cfg.tile_origin(Point::new(1, 1)));
        assert_eq!(b.target, a.target);
        assert!(b.is_idle());
    }
}
