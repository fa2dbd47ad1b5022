use tilenav_core::{GridModel, Point};

use crate::distance::approx_distance;
use crate::traits::{AstarPather, Pather, WeightedPather};

/// Adapts a [`GridModel`] to the pather traits with the unit movement rules:
/// eight-way steps onto tiles that are in bounds, walkable and unoccupied.
///
/// The grid is read live on every query, so a search sees the occupancy of
/// the moment it runs.
pub struct GridPather<'a, G: GridModel + ?Sized> {
    grid: &'a G,
}

impl<'a, G: GridModel + ?Sized> GridPather<'a, G> {
    pub fn new(grid: &'a G) -> Self {
        Self { grid }
    }
}

impl<G: GridModel + ?Sized> Pather for GridPather<'_, G> {
    fn neighbors(&self, p: Point, buf: &mut Vec<Point>) {
        buf.extend(p.neighbors_8().into_iter().filter(|&n| self.grid.is_free(n)));
    }
}

impl<G: GridModel + ?Sized> WeightedPather for GridPather<'_, G> {
    fn cost(&self, from: Point, to: Point) -> f32 {
        approx_distance(from, to)
    }
}

impl<G: GridModel + ?Sized> AstarPather for GridPather<'_, G> {
    fn estimate(&self, from: Point, to: Point) -> f32 {
        approx_distance(from, to)
    }
}
