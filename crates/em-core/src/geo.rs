//! Planar coordinate type.
//!
//! Trace samples and topology nodes live in the same flat simulation plane,
//! so distances are plain Euclidean.  `f64` keeps exact equality meaningful
//! for coordinates read from text: `"12.5"` parses to the same value on both
//! the trace side and the topology side.

use serde::Deserialize;

/// A point in the simulation plane, in metres.
#[derive(Copy, Clone, Debug, PartialEq, Default, Deserialize)]
pub struct Coord {
    pub x: f64,
    pub y: f64,
}

impl Coord {
    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    #[inline]
    pub fn distance(self, other: Coord) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    /// This point shifted by `offset`.
    #[inline]
    pub fn translated(self, offset: Coord) -> Coord {
        Coord::new(self.x + offset.x, self.y + offset.y)
    }

    /// This point reflected across the x axis (`y → -y`).
    #[inline]
    pub fn mirrored(self) -> Coord {
        Coord::new(self.x, -self.y)
    }

    /// Total length of the polyline through `points`.
    pub fn polyline_length(points: &[Coord]) -> f64 {
        points.windows(2).map(|w| w[0].distance(w[1])).sum()
    }
}

impl std::fmt::Display for Coord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}
