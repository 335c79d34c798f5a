//! `em-spatial` — topology graph, coordinate resolution, and shortest paths.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                          |
//! |---------------|-------------------------------------------------------------------|
//! | [`network`]   | `TopologyGraph` (CSR + R-tree), builder, `CoordResolver`          |
//! | [`router`]    | `PathFinder` trait, `DijkstraPathFinder`                          |
//! | [`transform`] | `MapTransform` (mirror + offset, trace space → topology space)    |
//! | [`error`]     | `SpatialError`, `SpatialResult<T>`                                |

pub mod error;
pub mod network;
pub mod router;
pub mod transform;


pub use error::{SpatialError, SpatialResult};
pub use network::{CoordResolver, GraphResolver, TopologyGraph, TopologyGraphBuilder};
pub use router::{DijkstraPathFinder, PathFinder};
pub use transform::MapTransform;
