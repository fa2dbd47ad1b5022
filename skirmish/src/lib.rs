//! Skirmish: a headless real-time strategy match driving the tilenav
//! navigation engine.
//!
//! Two teams spawn next to their bases on a generated battlefield. Workers
//! shuttle ore from deposits to their base, soldiers hunt enemies and fire
//! when they have line of sight. Every unit moves through a shared
//! [`Navigator`](tilenav_rts::Navigator), so crowding, blocked waypoints and
//! unreachable targets all exercise its replanning.

pub mod combat;
pub mod game;
pub mod mapgen;
pub mod unit;

pub use game::{Game, GameConfig};
