//! `em-trace` — raw location traces into canonical per-entity time series.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                  |
//! |---------------|-----------------------------------------------------------|
//! | [`canonical`] | `EntityTrace`, `CanonicalTrace`                           |
//! | [`loader`]    | `TraceIngestor` (CSV parse, dedup, sort, deltas)          |
//! | [`error`]     | `TraceError`, `TraceResult<T>`                            |
//!
//! # Canonical form (summary)
//!
//! ```text
//! entity "A":  locations = [(0,0), (10,0)]
//!              deltas    = [0,     10   ]   // first from start, then pairwise
//! ```
//!
//! Entities are ordered by raw id string; each entity's samples by time.

pub mod canonical;
pub mod error;
pub mod loader;


pub use canonical::{CanonicalTrace, EntityTrace};
pub use error::{TraceError, TraceResult};
pub use loader::TraceIngestor;
