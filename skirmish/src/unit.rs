//! Units: a navigation agent plus team, role and a standing task.

use tilenav_core::Point;
use tilenav_rts::{Agent, EntityId, NavConfig};

/// Index of a unit in [`Game::units`](crate::Game::units).
pub type UnitId = usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Team {
    Red,
    Blue,
}

impl Team {
    pub const ALL: [Team; 2] = [Team::Red, Team::Blue];

    pub fn enemy(self) -> Team {
        match self {
            Team::Red => Team::Blue,
            Team::Blue => Team::Red,
        }
    }

    /// Slot of this team in per-team counters.
    pub fn index(self) -> usize {
        match self {
            Team::Red => 0,
            Team::Blue => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Worker,
    Soldier,
}

/// Fixed numbers of a role.
#[derive(Debug)]
pub struct RoleData {
    pub hp: i32,
    pub attack: i32,
    pub armor: i32,
    /// Firing range in tiles (Chebyshev).
    pub range: i32,
    /// Distance in tiles at which enemies are noticed.
    pub sight: i32,
    /// World units per tick.
    pub speed: f32,
    /// Ticks between two shots.
    pub reload: u32,
}

const WORKER: RoleData = RoleData {
    hp: 6,
    attack: 1,
    armor: 0,
    range: 1,
    sight: 0,
    speed: 8.0,
    reload: 6,
};

const SOLDIER: RoleData = RoleData {
    hp: 10,
    attack: 3,
    armor: 1,
    range: 4,
    sight: 12,
    speed: 6.4,
    reload: 4,
};

impl Role {
    pub fn data(self) -> &'static RoleData {
        match self {
            Role::Worker => &WORKER,
            Role::Soldier => &SOLDIER,
        }
    }
}

/// What a unit is busy with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Task {
    Idle,
    Wander,
    /// Walk to a deposit and mine it.
    Harvest { deposit: EntityId },
    /// Bring the carried ore to a base.
    Return { base: EntityId },
    /// Chase an enemy last seen on `seen_at`.
    Hunt { enemy: UnitId, seen_at: Point },
}

#[derive(Debug, Clone)]
pub struct Unit {
    pub agent: Agent,
    pub team: Team,
    pub role: Role,
    pub hp: i32,
    /// Ore in hand.
    pub carried: i32,
    pub task: Task,
    /// Ticks until the unit may fire or retry a failed order.
    pub cooldown: u32,
}

impl Unit {
    pub fn new(id: UnitId, team: Team, role: Role, tile: Point, config: &NavConfig) -> Self {
        let data = role.data();
        Self {
            agent: Agent::new(id as EntityId, tile, data.speed, config),
            team,
            role,
            hp: data.hp,
            carried: 0,
            task: Task::Idle,
            cooldown: 0,
        }
    }

    pub fn data(&self) -> &'static RoleData {
        self.role.data()
    }

    pub fn tile(&self) -> Point {
        self.agent.tile
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    /// Map glyph: workers lower case, soldiers upper case.
    pub fn rune(&self) -> char {
        match (self.team, self.role) {
            (Team::Red, Role::Worker) => 'r',
            (Team::Red, Role::Soldier) => 'R',
            (Team::Blue, Role::Worker) => 'b',
            (Team::Blue, Role::Soldier) => 'B',
        }
    }
}
