//! Core error type.
//!
//! Sub-crates define their own error enums and wrap `CoreError` as one
//! variant where configuration values flow through them.

use thiserror::Error;

/// Configuration and parse errors raised by `em-core` types.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shorthand result type for `em-core`.
pub type CoreResult<T> = Result<T, CoreError>;
