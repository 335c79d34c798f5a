//! `em-core` — foundational types for the external-trace movement workspace.
//!
//! This crate is a dependency of every other `em-*` crate and has no `em-*`
//! dependencies of its own.
//!
//! # What lives here
//!
//! | Module     | Contents                                                     |
//! |------------|--------------------------------------------------------------|
//! | [`ids`]    | `NodeId`, `EdgeId`                                           |
//! | [`geo`]    | `Coord`, Euclidean distance, mirror/translate                |
//! | [`time`]   | `TimeFormat`, `Timestamp`, `Seconds`                         |
//! | [`rng`]    | `EntityRng` (per-entity, deterministic)                      |
//! | [`config`] | `ExternalMovementConfig` and its sections (TOML via serde)   |
//! | [`error`]  | `CoreError`, `CoreResult`                                    |

pub mod config;
pub mod error;
pub mod geo;
pub mod ids;
pub mod rng;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::{
    ExternalMovementConfig, MapConfig, MovementConfig, MovementMode, SpeedRange, TraceColumns,
    TraceConfig,
};
pub use error::{CoreError, CoreResult};
pub use geo::Coord;
pub use ids::{EdgeId, NodeId};
pub use rng::EntityRng;
pub use time::{Seconds, TimeFormat, Timestamp, DATE_PATTERN};
