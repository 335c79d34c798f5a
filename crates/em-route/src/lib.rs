//! `em-route` — per-entity route schedules over the topology graph.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                    |
//! |-------------|-------------------------------------------------------------|
//! | [`route`]   | `Route` (shared plan + per-replica stop/time cursors)       |
//! | [`builder`] | `build_routes`, `build_route` (canonical trace → routes)    |
//! | [`error`]   | `RouteError`, `RouteResult<T>`                              |
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                 |
//! |------------|--------------------------------------------------------|
//! | `parallel` | Resolves entity routes on Rayon's thread pool.         |

pub mod builder;
pub mod error;
pub mod route;


pub use builder::{build_route, build_routes};
pub use error::{RouteError, RouteResult};
pub use route::Route;
