//! One epoch's traversal: graph nodes, their coordinates, and a speed.

use em_core::{Coord, NodeId};

/// The path prepared by the last `advance()`.
///
/// `nodes` and `waypoints` are aligned 1:1.  A path to the current node holds
/// that single node and has zero length.
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    pub nodes: Vec<NodeId>,

    pub waypoints: Vec<Coord>,

    /// Euclidean length along `waypoints`.
    pub distance: f64,

    /// Travel speed in m/s; `0.0` when the entity only waits.
    pub speed: f64,
}

impl Path {
    pub fn new(nodes: Vec<NodeId>, waypoints: Vec<Coord>, speed: f64) -> Self {
        let distance = Coord::polyline_length(&waypoints);
        Self { nodes, waypoints, distance, speed }
    }

    pub fn origin(&self) -> Option<Coord> {
        self.waypoints.first().copied()
    }

    pub fn destination(&self) -> Option<Coord> {
        self.waypoints.last().copied()
    }

    /// Seconds spent moving (excluding any wait).
    pub fn travel_time(&self) -> f64 {
        if self.speed > 0.0 { self.distance / self.speed } else { 0.0 }
    }
}
