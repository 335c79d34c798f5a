use thiserror::Error;

use em_core::Coord;
use em_trace::TraceError;

#[derive(Debug, Error)]
pub enum RouteError {
    #[error("route for entity {entity:?} has no stops")]
    EmptyRoute { entity: String },

    #[error("route for entity {entity:?} has {stops} stops but {budgets} time budgets")]
    BudgetMismatch { entity: String, stops: usize, budgets: usize },

    #[error("no graph node for entity {entity:?} at {coord} (trace coordinate {original})")]
    UnresolvedCoordinate { entity: String, coord: Coord, original: Coord },

    #[error("trace error: {0}")]
    Trace(#[from] TraceError),
}

pub type RouteResult<T> = Result<T, RouteError>;
