//! Core skirmish state and the per-tick loop.

use rand::rngs::SmallRng;
use rand::{RngExt, SeedableRng};
use tilenav_core::{GridModel, Point, Range, TileMap};
use tilenav_paths::{Path, chebyshev};
use tilenav_rts::{EntityId, LineOfSight, NavConfig, Navigator, Next, Step, Target};

use crate::combat;
use crate::mapgen::{self, Battlefield, Structure, StructureKind};
use crate::unit::*;

/// Ore a worker carries per trip.
pub const CARRY_CAPACITY: i32 = 5;
/// Ticks before a unit reissues an order that found no route.
pub const RETRY_TICKS: u32 = 10;
/// How far a wandering unit strolls per order.
const WANDER_RADIUS: i32 = 6;
/// Radius around a base where its units spawn.
const SPAWN_RADIUS: i32 = 4;

/// Parameters of a new skirmish.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameConfig {
    pub seed: u64,
    pub width: i32,
    pub height: i32,
    /// Units per team, split between workers and soldiers.
    pub units: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            seed: 1,
            width: 64,
            height: 32,
            units: 6,
        }
    }
}

/// Core skirmish state.
pub struct Game {
    pub map: TileMap,
    pub structures: Vec<Structure>,
    /// Unit slots; dead units leave `None` so ids stay stable.
    pub units: Vec<Option<Unit>>,
    pub nav: Navigator,
    pub rng: SmallRng,
    pub tick: u64,
    /// Ore delivered, per team.
    pub harvested: [i32; 2],
    /// Units lost, per team.
    pub casualties: [u32; 2],
}

impl Game {
    /// Generate a battlefield and spawn both teams.
    pub fn new(config: &GameConfig) -> Self {
        let mut rng = SmallRng::seed_from_u64(config.seed);
        let field = mapgen::generate(&mut rng, config.width, config.height);
        let mut game = Self::with_battlefield(field, rng);
        for team in Team::ALL {
            game.spawn_team(team, config.units);
        }
        log::info!(
            "skirmish {}x{}, seed {}, {} units",
            game.map.width(),
            game.map.height(),
            config.seed,
            game.alive_units().count()
        );
        game
    }

    /// A game over a ready-made battlefield, with no units yet.
    pub fn with_battlefield(field: Battlefield, rng: SmallRng) -> Self {
        Self {
            map: field.map,
            structures: field.structures,
            units: Vec::new(),
            nav: Navigator::new(NavConfig::default()),
            rng,
            tick: 0,
            harvested: [0; 2],
            casualties: [0; 2],
        }
    }

    fn spawn_team(&mut self, team: Team, n: usize) {
        let home = self
            .structures
            .iter()
            .find(|s| s.is_base_of(team))
            .map(|s| s.footprint)
            .unwrap_or_else(|| self.map.bounds());
        for i in 0..n {
            let role = if i % 2 == 0 { Role::Worker } else { Role::Soldier };
            match self.spawn_point(home.grow(SPAWN_RADIUS)) {
                Some(p) => {
                    self.spawn(team, role, p);
                }
                None => log::warn!("no free tile to spawn a {team:?} {role:?}"),
            }
        }
    }

    /// A free tile in `area`: a few random picks, then a scan.
    fn spawn_point(&mut self, area: Range) -> Option<Point> {
        let area = area.intersect(self.map.bounds());
        if area.is_empty() {
            return None;
        }
        for _ in 0..50 {
            let p = Point::new(
                self.rng.random_range(area.min.x..area.max.x),
                self.rng.random_range(area.min.y..area.max.y),
            );
            if self.map.is_free(p) {
                return Some(p);
            }
        }
        area.iter().find(|&p| self.map.is_free(p))
    }

    /// Place a new unit on `tile` and occupy it.
    pub fn spawn(&mut self, team: Team, role: Role, tile: Point) -> UnitId {
        let id = self.units.len();
        self.map.occupy(tile);
        self.units.push(Some(Unit::new(id, team, role, tile, &self.nav.config)));
        id
    }

    // -------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------

    pub fn unit(&self, id: UnitId) -> Option<&Unit> {
        self.units.get(id).and_then(|u| u.as_ref())
    }

    pub fn alive_units(&self) -> impl Iterator<Item = (UnitId, &Unit)> {
        self.units
            .iter()
            .enumerate()
            .filter_map(|(i, u)| u.as_ref().map(|u| (i, u)))
    }

    pub fn structure(&self, id: EntityId) -> Option<&Structure> {
        self.structures.get(id as usize)
    }

    /// Whether one team has no units left.
    pub fn is_over(&self) -> bool {
        Team::ALL
            .iter()
            .any(|&t| !self.alive_units().any(|(_, u)| u.team == t))
    }

    fn nearest_deposit(&self, from: Point) -> Option<&Structure> {
        self.structures
            .iter()
            .filter(|s| s.kind == StructureKind::Deposit && s.stock > 0)
            .min_by_key(|s| chebyshev(from, s.footprint.clamp(from)))
    }

    fn nearest_base(&self, team: Team, from: Point) -> Option<&Structure> {
        self.structures
            .iter()
            .filter(|s| s.is_base_of(team))
            .min_by_key(|s| chebyshev(from, s.footprint.clamp(from)))
    }

    fn nearest_enemy(&self, unit: &Unit) -> Option<(UnitId, Point)> {
        let sight = unit.data().sight;
        self.alive_units()
            .filter(|(_, u)| u.team != unit.team)
            .map(|(id, u)| (id, u.tile()))
            .filter(|&(_, p)| chebyshev(unit.tile(), p) <= sight)
            .min_by_key(|&(_, p)| chebyshev(unit.tile(), p))
    }

    // -------------------------------------------------------------------
    // Tick
    // -------------------------------------------------------------------

    /// Run one tick: every living unit decides, then moves.
    pub fn step(&mut self) {
        self.tick += 1;
        for id in 0..self.units.len() {
            // Take the unit out so the rest of the game stays borrowable.
            let Some(mut unit) = self.units[id].take() else {
                continue;
            };
            if unit.cooldown > 0 {
                unit.cooldown -= 1;
            }
            match unit.role {
                Role::Worker => self.think_worker(&mut unit),
                Role::Soldier => self.think_soldier(&mut unit),
            }
            if let Step::Arrived { from, to, next } = self.nav.advance(&mut unit.agent, &self.map) {
                self.map.relocate(from, to);
                if next == Next::Stuck {
                    log::debug!("tick {}: unit {id} stuck at {to}", self.tick);
                    unit.cooldown = RETRY_TICKS;
                }
            }
            self.units[id] = Some(unit);
        }
    }

    /// Issue an order; a failed search arms the retry cooldown.
    fn order(&mut self, unit: &mut Unit, target: Target) -> bool {
        let ok = self.nav.command(&mut unit.agent, target, &self.map);
        if !ok {
            unit.cooldown = RETRY_TICKS;
        }
        ok
    }

    fn wander(&mut self, unit: &mut Unit) {
        unit.task = Task::Wander;
        if !unit.agent.is_idle() || unit.cooldown > 0 {
            return;
        }
        let here = unit.tile();
        let dest = self.map.bounds().clamp(Point::new(
            here.x + self.rng.random_range(-WANDER_RADIUS..=WANDER_RADIUS),
            here.y + self.rng.random_range(-WANDER_RADIUS..=WANDER_RADIUS),
        ));
        if dest != here && self.map.is_free(dest) {
            self.order(unit, Target::Ground(dest));
        }
    }

    fn think_worker(&mut self, unit: &mut Unit) {
        if !unit.agent.is_idle() || unit.cooldown > 0 {
            return;
        }
        let here = unit.tile();
        match unit.task {
            Task::Harvest { deposit } => {
                let Some(s) = self.structures.get_mut(deposit as usize) else {
                    unit.task = Task::Idle;
                    return;
                };
                if s.stock == 0 {
                    unit.task = Task::Idle;
                } else if s.target().is_reached_from(here) {
                    s.stock -= 1;
                    unit.carried += 1;
                    if unit.carried >= CARRY_CAPACITY || s.stock == 0 {
                        self.go_home(unit);
                    }
                } else {
                    let target = s.target();
                    self.order(unit, target);
                }
            }
            Task::Return { base } => {
                let Some(target) = self.structure(base).map(Structure::target) else {
                    unit.task = Task::Idle;
                    return;
                };
                if target.is_reached_from(here) {
                    self.harvested[unit.team.index()] += unit.carried;
                    log::debug!("unit {} delivered {} ore", unit.agent.id, unit.carried);
                    unit.carried = 0;
                    unit.task = Task::Idle;
                } else {
                    self.order(unit, target);
                }
            }
            Task::Idle | Task::Wander | Task::Hunt { .. } => {
                if unit.carried > 0 {
                    self.go_home(unit);
                    return;
                }
                match self.nearest_deposit(here).map(|s| (s.id, s.target())) {
                    Some((deposit, target)) => {
                        unit.task = Task::Harvest { deposit };
                        self.order(unit, target);
                    }
                    None => self.wander(unit),
                }
            }
        }
    }

    fn go_home(&mut self, unit: &mut Unit) {
        match self.nearest_base(unit.team, unit.tile()).map(|s| (s.id, s.target())) {
            Some((base, target)) => {
                unit.task = Task::Return { base };
                self.order(unit, target);
            }
            None => self.wander(unit),
        }
    }

    fn think_soldier(&mut self, unit: &mut Unit) {
        let Some((enemy, seen_at)) = self.nearest_enemy(unit) else {
            self.wander(unit);
            return;
        };
        let data = unit.data();
        let here = unit.tile();
        if chebyshev(here, seen_at) <= data.range && LineOfSight::is_open(here, seen_at, &self.map) {
            // Finish the current step, then hold and fire.
            let head: Path = unit.agent.path.head().into_iter().collect();
            unit.agent.assign_path(head);
            unit.agent.face(seen_at);
            unit.task = Task::Hunt { enemy, seen_at };
            if unit.agent.is_idle() && unit.cooldown == 0 {
                self.fire(unit, enemy);
                unit.cooldown = data.reload;
            }
            return;
        }
        let moved = unit.task != Task::Hunt { enemy, seen_at };
        if moved || (unit.agent.is_idle() && unit.cooldown == 0) {
            unit.task = Task::Hunt { enemy, seen_at };
            self.order(
                unit,
                Target::Unit {
                    id: enemy as EntityId,
                    pos: seen_at,
                },
            );
        }
    }

    fn fire(&mut self, shooter: &Unit, victim: UnitId) {
        let Some(Some(v)) = self.units.get_mut(victim) else {
            return;
        };
        let dmg = combat::roll_damage(&mut self.rng, shooter.data().attack, v.data().armor);
        v.hp -= dmg;
        log::trace!("unit {} hits unit {victim} for {dmg}", shooter.agent.id);
        if !v.is_alive() {
            log::info!(
                "tick {}: {:?} {:?} {victim} killed by unit {}",
                self.tick,
                v.team,
                v.role,
                shooter.agent.id
            );
            self.map.release(v.agent.tile);
            self.casualties[v.team.index()] += 1;
            self.units[victim] = None;
        }
    }

    // -------------------------------------------------------------------
    // Output
    // -------------------------------------------------------------------

    /// The battlefield as text: terrain, structures, then units on top.
    pub fn render(&self) -> String {
        let w = self.map.width() as usize;
        let mut cells: Vec<char> = self
            .map
            .bounds()
            .iter()
            .map(|p| self.map.terrain(p).unwrap_or_default().rune())
            .collect();
        let mut put = |p: Point, ch: char| {
            if self.map.in_bounds(p) {
                cells[p.y as usize * w + p.x as usize] = ch;
            }
        };
        for s in &self.structures {
            for p in s.footprint {
                put(p, s.rune());
            }
        }
        for (_, u) in self.alive_units() {
            put(u.tile(), u.rune());
        }
        let mut out = String::with_capacity(cells.len() + self.map.height() as usize);
        for row in cells.chunks(w.max(1)) {
            out.extend(row);
            out.push('\n');
        }
        out
    }

    /// One-line account of the match so far.
    pub fn summary(&self) -> String {
        let alive = |t: Team| self.alive_units().filter(|(_, u)| u.team == t).count();
        format!(
            "tick {}: red {} alive, {} lost, {} ore | blue {} alive, {} lost, {} ore",
            self.tick,
            alive(Team::Red),
            self.casualties[Team::Red.index()],
            self.harvested[Team::Red.index()],
            alive(Team::Blue),
            self.casualties[Team::Blue.index()],
            self.harvested[Team::Blue.index()],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_field(w: i32, h: i32) -> Battlefield {
        Battlefield::new(TileMap::new(w, h))
    }

    fn game_on(field: Battlefield) -> Game {
        Game::with_battlefield(field, SmallRng::seed_from_u64(42))
    }

    /// Expected occupant count of every tile: structures plus living units.
    fn assert_occupancy_in_sync(game: &Game) {
        for p in game.map.bounds() {
            let structures = game.structures.iter().filter(|s| s.footprint.contains(p)).count();
            let units = game.alive_units().filter(|(_, u)| u.tile() == p).count();
            assert_eq!(
                game.map.occupants(p) as usize,
                structures + units,
                "tick {}: occupancy at {p}",
                game.tick
            );
        }
    }

    #[test]
    fn same_seed_same_battle() {
        let cfg = GameConfig {
            seed: 9,
            ..GameConfig::default()
        };
        let mut a = Game::new(&cfg);
        let mut b = Game::new(&cfg);
        for _ in 0..80 {
            a.step();
            b.step();
        }
        assert_eq!(a.render(), b.render());
        assert_eq!(a.nav.stats(), b.nav.stats());
    }

    #[test]
    fn occupancy_follows_units() {
        let mut game = Game::new(&GameConfig {
            seed: 3,
            units: 8,
            ..GameConfig::default()
        });
        assert_occupancy_in_sync(&game);
        for _ in 0..300 {
            game.step();
            if game.tick % 25 == 0 {
                assert_occupancy_in_sync(&game);
            }
        }
        assert!(game.nav.stats().arrivals > 0);
    }

    #[test]
    fn worker_delivers_ore() {
        let mut field = open_field(16, 6);
        let base = field.add_structure(StructureKind::Base(Team::Red), Range::sized(Point::new(1, 1), 3, 3));
        let deposit = field.add_structure(StructureKind::Deposit, Range::sized(Point::new(11, 2), 2, 2));
        let mut game = game_on(field);
        let w = game.spawn(Team::Red, Role::Worker, Point::new(6, 2));
        for _ in 0..400 {
            game.step();
        }
        assert!(game.harvested[Team::Red.index()] >= CARRY_CAPACITY);
        assert!(game.structure(deposit).is_some_and(|s| s.stock < mapgen::DEPOSIT_STOCK));
        assert!(game.structure(base).is_some());
        assert!(game.unit(w).is_some());
        assert_occupancy_in_sync(&game);
    }

    #[test]
    fn soldiers_fight_to_the_death() {
        let mut game = game_on(open_field(20, 6));
        game.spawn(Team::Red, Role::Soldier, Point::new(3, 2));
        game.spawn(Team::Blue, Role::Soldier, Point::new(14, 3));
        for _ in 0..1000 {
            game.step();
            if game.is_over() {
                break;
            }
        }
        assert!(game.is_over());
        assert_eq!(game.casualties[0] + game.casualties[1], 1);
        assert_occupancy_in_sync(&game);
    }

    #[test]
    fn soldier_holds_fire_without_sight() {
        // Enemy within range but behind a wall of rock.
        let map = TileMap::from_ascii(
            "
.....
.....
#####
#####
.....
",
        )
        .unwrap();
        let mut game = game_on(Battlefield::new(map));
        let red = game.spawn(Team::Red, Role::Soldier, Point::new(2, 0));
        game.spawn(Team::Blue, Role::Soldier, Point::new(2, 4));
        for _ in 0..50 {
            game.step();
        }
        assert_eq!(game.casualties, [0, 0]);
        assert!(game.nav.stats().failed_searches > 0);
        assert!(matches!(game.unit(red).map(|u| u.task), Some(Task::Hunt { .. })));
    }

    #[test]
    fn render_draws_units_over_structures() {
        let mut field = open_field(6, 3);
        field.add_structure(StructureKind::Deposit, Range::sized(Point::new(0, 0), 2, 2));
        let mut game = game_on(field);
        game.spawn(Team::Blue, Role::Worker, Point::new(4, 2));
        assert_eq!(game.render(), "$$....\n$$....\n....b.\n");
    }
}
