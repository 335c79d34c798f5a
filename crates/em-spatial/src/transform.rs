//! Trace-to-topology geometry transform.
//!
//! Trace coordinates and topology coordinates may disagree on the sign of
//! the y axis (screen vs. map convention) and on the origin.  The transform
//! is applied once per trace point before graph lookup:
//!
//! ```text
//! topology = mirror?(trace) + offset      mirror?(x, y) = (x, -y)
//! ```

use em_core::{Coord, MapConfig};

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct MapTransform {
    pub mirror: bool,
    pub offset: Coord,
}

impl MapTransform {
    pub fn new(mirror: bool, offset: Coord) -> Self {
        Self { mirror, offset }
    }

    /// Map a trace coordinate into topology space.
    pub fn apply(&self, c: Coord) -> Coord {
        let c = if self.mirror { c.mirrored() } else { c };
        c.translated(self.offset)
    }
}

impl From<&MapConfig> for MapTransform {
    fn from(cfg: &MapConfig) -> Self {
        Self::new(cfg.mirror, cfg.offset)
    }
}
