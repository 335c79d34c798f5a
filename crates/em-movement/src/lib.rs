//! `em-movement` — trace-driven movement scheduling over the topology graph.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                        |
//! |---------------|-----------------------------------------------------------------|
//! | [`scheduler`] | `MovementScheduler<P, S>`, the per-entity epoch state machine   |
//! | [`prototype`] | `MovementPrototype`: route pool + round-robin replication       |
//! | [`path`]      | `Path`: waypoints, distance and speed of one epoch              |
//! | [`speed`]     | `SpeedSampler` trait, `UniformSpeed`, `ConstantSpeed`           |
//! | [`error`]     | `MovementError`, `MovementResult<T>`                            |
//!
//! # Lifecycle
//!
//! 1. `MovementPrototype::from_config` ingests the trace and builds the
//!    route pool (or `MovementPrototype::new` from prebuilt routes).
//! 2. `replicate()` once per simulated entity.
//! 3. The clock calls `initial_location()` to place the entity, then
//!    `advance()` whenever the returned event time is reached and
//!    `is_active(now)` holds; `get_path()` yields the prepared path.

pub mod error;
pub mod path;
pub mod prototype;
pub mod scheduler;
pub mod speed;

#[cfg(test)]
mod tests;

pub use error::{MovementError, MovementResult};
pub use path::Path;
pub use prototype::MovementPrototype;
pub use scheduler::MovementScheduler;
pub use speed::{ConstantSpeed, SpeedSampler, UniformSpeed};
