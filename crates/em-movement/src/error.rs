use em_core::{Coord, CoreError, Seconds};
use em_route::RouteError;
use em_spatial::SpatialError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MovementError {
    #[error("entity {0:?} has not been placed on the graph")]
    NotPlaced(String),

    #[error(
        "no path for entity {entity:?} from {from} to {to} at t={time}; \
         the topology is not fully connected for this trace"
    )]
    Unreachable {
        entity: String,
        from:   Coord,
        to:     Coord,
        time:   Seconds,
    },

    #[error(
        "entity {entity:?} cannot travel {distance} from {from} to {to} within {available}s \
         at t={time}, even at its maximum speed {max_speed}"
    )]
    InfeasibleSchedule {
        entity:    String,
        from:      Coord,
        to:        Coord,
        distance:  f64,
        available: Seconds,
        max_speed: f64,
        time:      Seconds,
    },

    #[error("route pool is empty")]
    NoRoutes,

    #[error("configuration error: {0}")]
    Config(#[from] CoreError),

    #[error("route error: {0}")]
    Route(#[from] RouteError),

    #[error("graph error: {0}")]
    Spatial(#[from] SpatialError),
}

pub type MovementResult<T> = Result<T, MovementError>;
