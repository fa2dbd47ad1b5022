//! Shortest-path search for grid-based unit navigation.
//!
//! [`PathFinder::find_path`] runs A* over an 8-connected tile grid read
//! through [`GridModel`](tilenav_core::GridModel). Cardinal steps cost 1 and
//! diagonal steps cost √2; the same [`approx_distance`] drives both the edge
//! cost and the heuristic.
//!
//! Search state is local to each call, so searches never share open or
//! closed sets and may be run from anywhere, including recursively.
//!
//! # Trait hierarchy
//!
//! | Trait | Role |
//! |---|---|
//! | [`Pather`] | neighbor enumeration |
//! | [`WeightedPather`] : [`Pather`] | step costs |
//! | [`AstarPather`] : [`WeightedPather`] | remaining-cost estimate |
//!
//! [`GridPather`] implements all three for any grid model.

mod astar;
mod distance;
mod neighbors;
mod node;
mod path;
mod pather;
mod traits;

pub use astar::{PathFinder, is_valid_path};
pub use distance::{CARDINAL_COST, DIAGONAL_COST, approx_distance, chebyshev, manhattan};
pub use neighbors::Neighbors;
pub use node::SearchNode;
pub use path::Path;
pub use pather::GridPather;
pub use traits::{AstarPather, Pather, WeightedPather};
