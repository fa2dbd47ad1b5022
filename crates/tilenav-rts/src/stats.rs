//! Navigation counters.

use std::fmt;

/// Cumulative counts of the work done by a [`Navigator`](crate::Navigator).
///
/// Unreachable targets are searched again every time an order is reissued;
/// these counters make that repeated work visible.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NavStats {
    /// Path or approach searches issued.
    pub searches: u64,
    /// Searches that found no route.
    pub failed_searches: u64,
    /// Replans to the same goal after an intermediate waypoint was taken.
    pub full_replans: u64,
    /// Replans through the adjacency resolver after the goal was taken.
    pub adjacency_replans: u64,
    /// Waypoints reached.
    pub arrivals: u64,
    /// Agents left idle by a failed replan.
    pub stuck: u64,
}

impl fmt::Display for NavStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "searches: {} (failed {}), replans: {} full / {} adjacent, arrivals: {}, stuck: {}",
            self.searches,
            self.failed_searches,
            self.full_replans,
            self.adjacency_replans,
            self.arrivals,
            self.stuck
        )
    }
}
