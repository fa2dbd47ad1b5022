//! Battlefield generation: terrain, bases and resource deposits.

use rand::{Rng, RngExt};
use tilenav_core::{GridModel, Point, Range, Terrain, TileMap};
use tilenav_rts::{EntityId, Target};

use crate::unit::Team;

/// Side length of a base footprint.
pub const BASE_SIZE: i32 = 3;
/// Side length of a deposit footprint.
pub const DEPOSIT_SIZE: i32 = 2;
/// Ore in a fresh deposit.
pub const DEPOSIT_STOCK: i32 = 60;

/// Smallest map the generator lays out.
pub const MIN_WIDTH: i32 = 24;
pub const MIN_HEIGHT: i32 = 12;

const PLACEMENT_TRIES: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StructureKind {
    Base(Team),
    Deposit,
}

/// A building or deposit. Its footprint is marked occupied on the map for
/// as long as it stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Structure {
    pub id: EntityId,
    pub kind: StructureKind,
    pub footprint: Range,
    /// Ore left, for deposits.
    pub stock: i32,
}

impl Structure {
    /// The order a unit receives to go and interact with this structure.
    pub fn target(&self) -> Target {
        match self.kind {
            StructureKind::Base(_) => Target::Building {
                id: self.id,
                footprint: self.footprint,
            },
            StructureKind::Deposit => Target::Resource {
                id: self.id,
                footprint: self.footprint,
            },
        }
    }

    pub fn rune(&self) -> char {
        match self.kind {
            StructureKind::Base(Team::Red) => 'H',
            StructureKind::Base(Team::Blue) => 'K',
            StructureKind::Deposit => '$',
        }
    }

    pub fn is_base_of(&self, team: Team) -> bool {
        self.kind == StructureKind::Base(team)
    }
}

/// A generated map with its structures placed and occupying their tiles.
#[derive(Debug, Clone)]
pub struct Battlefield {
    pub map: TileMap,
    pub structures: Vec<Structure>,
}

impl Battlefield {
    /// An empty battlefield over `map`.
    pub fn new(map: TileMap) -> Self {
        Self {
            map,
            structures: Vec::new(),
        }
    }

    /// Add a structure over `footprint`, occupying it. Returns its id.
    pub fn add_structure(&mut self, kind: StructureKind, footprint: Range) -> EntityId {
        let id = self.structures.len() as EntityId;
        let stock = match kind {
            StructureKind::Deposit => DEPOSIT_STOCK,
            StructureKind::Base(_) => 0,
        };
        self.map.occupy_range(footprint);
        self.structures.push(Structure {
            id,
            kind,
            footprint,
            stock,
        });
        id
    }

    /// Whether a structure of `size` tiles fits at `origin`: the footprint
    /// and the ring around it must be free, and no two rings overlap, so every
    /// structure keeps its approach tiles.
    pub fn fits(&self, origin: Point, size: i32) -> bool {
        let fp = Range::sized(origin, size, size);
        let ring = fp.grow(1);
        if ring.intersect(self.map.bounds()) != ring {
            return false;
        }
        if !ring.iter().all(|p| self.map.is_free(p)) {
            return false;
        }
        self.structures.iter().all(|s| !s.footprint.grow(1).overlaps(ring))
    }
}

/// Generate a battlefield of `width` × `height` tiles.
///
/// Sizes below [`MIN_WIDTH`] × [`MIN_HEIGHT`] are raised to the minimum.
pub fn generate(rng: &mut impl Rng, width: i32, height: i32) -> Battlefield {
    let width = width.max(MIN_WIDTH);
    let height = height.max(MIN_HEIGHT);
    let mut field = Battlefield::new(TileMap::new(width, height));

    // 1. Terrain
    gen_forest(&mut field.map, rng);
    gen_rocks(&mut field.map, rng);
    gen_river(&mut field.map, rng);

    // 2. One base per side of the river
    let third = width / 3;
    let sides = [
        (Team::Red, Range::new(1, 1, third, height - 1)),
        (Team::Blue, Range::new(width - third, 1, width - 1, height - 1)),
    ];
    for (team, area) in sides {
        if !place_structure(&mut field, rng, StructureKind::Base(team), area, BASE_SIZE) {
            log::warn!("no room for the {team:?} base");
        }
    }

    // 3. Deposits anywhere
    let n_deposits = 2 + (width * height) as usize / 400;
    let bounds = field.map.bounds();
    for _ in 0..n_deposits {
        place_structure(&mut field, rng, StructureKind::Deposit, bounds, DEPOSIT_SIZE);
    }

    log::debug!(
        "generated {width}x{height} battlefield with {} structures",
        field.structures.len()
    );
    field
}

fn random_point_in(rng: &mut impl Rng, r: Range) -> Point {
    Point::new(
        rng.random_range(r.min.x..r.max.x),
        rng.random_range(r.min.y..r.max.y),
    )
}

/// Try random spots inside `area` until the structure fits.
fn place_structure(
    field: &mut Battlefield,
    rng: &mut impl Rng,
    kind: StructureKind,
    area: Range,
    size: i32,
) -> bool {
    // Origins that keep the whole footprint inside `area`.
    let (x1, y1) = (area.max.x - size + 1, area.max.y - size + 1);
    if x1 <= area.min.x || y1 <= area.min.y {
        return false;
    }
    let origins = Range::new(area.min.x, area.min.y, x1, y1);
    for _ in 0..PLACEMENT_TRIES {
        let origin = random_point_in(rng, origins);
        if field.fits(origin, size) {
            field.add_structure(kind, Range::sized(origin, size, size));
            return true;
        }
    }
    false
}

/// Round forest patches.
fn gen_forest(map: &mut TileMap, rng: &mut impl Rng) {
    let patches = (map.width() * map.height()) / 150;
    let bounds = map.bounds();
    for _ in 0..patches {
        let c = random_point_in(rng, bounds);
        let r = rng.random_range(1..=3);
        for p in Range::single(c).grow(r) {
            let d = p - c;
            if d.x * d.x + d.y * d.y <= r * r {
                map.set_terrain(p, Terrain::Forest);
            }
        }
    }
}

/// Small rectangular rock outcrops.
fn gen_rocks(map: &mut TileMap, rng: &mut impl Rng) {
    let outcrops = (map.width() * map.height()) / 250;
    let bounds = map.bounds();
    for _ in 0..outcrops {
        let origin = random_point_in(rng, bounds);
        let w = rng.random_range(1..=3);
        let h = rng.random_range(1..=2);
        map.fill_terrain(Range::sized(origin, w, h), Terrain::Rock);
    }
}

/// A two-tile wide river meandering down the middle third, crossed by sand
/// fords at regular intervals.
fn gen_river(map: &mut TileMap, rng: &mut impl Rng) {
    let (w, h) = (map.width(), map.height());
    let lo = w / 3;
    let hi = 2 * w / 3 - 2;
    let spacing = rng.random_range(5..=8);
    let offset = rng.random_range(0..spacing);
    let mut x = rng.random_range(lo..=hi);
    for y in 0..h {
        let t = if y % spacing == offset {
            Terrain::Sand
        } else {
            Terrain::Water
        };
        map.fill_terrain(Range::new(x, y, x + 2, y + 1), t);
        x = (x + rng.random_range(-1..=1)).clamp(lo, hi);
    }
}
