use thiserror::Error;

use em_core::{Coord, CoreError};

#[derive(Debug, Error)]
pub enum TraceError {
    #[error("trace configuration error: {0}")]
    Config(String),

    #[error("start point {start:?} is later than the earliest time in the trace; the earliest time is {earliest:?}")]
    StartAfterEarliest { start: String, earliest: String },

    #[error("trace line {line}: {reason}")]
    Malformed { line: u64, reason: String },

    #[error("entity {entity:?} cannot be at two different places at the same time: {first} and {second} at {time}")]
    TwoPlacesAtOnce {
        entity: String,
        time:   String,
        first:  Coord,
        second: Coord,
    },

    #[error("trace contains no samples")]
    Empty,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl TraceError {
    /// Settings are malformed or contradict the trace.
    pub fn is_config(&self) -> bool {
        matches!(self, TraceError::Config(_) | TraceError::StartAfterEarliest { .. })
    }

    /// Trace content is unreadable or physically inconsistent.
    pub fn is_data(&self) -> bool {
        matches!(
            self,
            TraceError::Malformed { .. } | TraceError::TwoPlacesAtOnce { .. } | TraceError::Empty
        )
    }
}

impl From<CoreError> for TraceError {
    fn from(e: CoreError) -> Self {
        match e {
            CoreError::Config(msg) => TraceError::Config(msg),
            CoreError::Io(io) => TraceError::Io(io),
        }
    }
}

pub type TraceResult<T> = Result<T, TraceError>;
