//! **tilenav-core**: core types for grid-based unit navigation.
//!
//! This crate provides the foundational types shared by the *tilenav*
//! crates: tile geometry, eight-way facing, the [`GridModel`] query trait the
//! navigation engine reads the world through, and [`TileMap`], a concrete
//! terrain and occupancy grid.

pub mod dir;
pub mod geom;
pub mod grid;

pub use dir::Direction;
pub use geom::{Point, Range};
pub use grid::{GridModel, MapError, OCCUPIED_RUNE, Terrain, TileMap};
