//! Error types for the analytics engine.

use thiserror::Error;

/// Errors produced by the engine.
///
/// The engine assumes validated input; coordinate violations are treated as
/// defects and rejected immediately rather than coerced.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A record carried a non-finite or out-of-range coordinate.
    #[error("invalid coordinates for record '{id}': lat {latitude}, lon {longitude}")]
    InvalidCoordinate {
        id: String,
        latitude: f64,
        longitude: f64,
    },

    /// Configuration failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A long-running analysis observed its cancel token and stopped.
    ///
    /// Cancelled computations never return partial results; callers either
    /// get a complete value or this error.
    #[error("analysis cancelled")]
    Cancelled,
}

/// Convenience result type used throughout the crate.
pub type Result<T> = std::result::Result<T, EngineError>;
