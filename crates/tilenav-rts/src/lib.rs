//! Unit navigation for real-time strategy maps.
//!
//! Built on the A* search of `tilenav-paths`, this crate moves [`Agent`]s
//! across a shared, constantly changing grid:
//!
//! - [`AdjacencyResolver`] picks the tile to stand on when the target itself
//!   cannot be entered (buildings, resource deposits, other units).
//! - [`Navigator`] issues orders and advances agents one tick at a time,
//!   replanning on the spot when another unit steps into their way.
//! - [`LineOfSight`] is a cheap tile-walk visibility check for ranged
//!   actions.
//!
//! Occupancy is never reserved ahead of time. Callers keep the grid's
//! occupancy in step with agent arrivals (see [`Step::Arrived`]).

mod adjacency;
mod agent;
mod config;
mod controller;
mod sight;
mod stats;
mod target;

pub use adjacency::{AdjacencyResolver, Candidate};
pub use agent::{Agent, AgentSnapshot, NavState, WorldPos};
pub use config::NavConfig;
pub use controller::{Navigator, Next, Replan, Step, preview_route};
pub use sight::LineOfSight;
pub use stats::NavStats;
pub use target::{EntityId, Target};
