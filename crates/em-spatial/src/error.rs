//! Spatial-subsystem error type.

use thiserror::Error;

use em_core::NodeId;

/// Errors produced by `em-spatial`.
#[derive(Debug, Error)]
pub enum SpatialError {
    #[error("node {0} not found in topology")]
    NodeNotFound(NodeId),
}

pub type SpatialResult<T> = Result<T, SpatialError>;
