//! Configuration error definitions.
//!
//! The predictor has no recoverable runtime errors: every access either matches
//! a stream or starts one. The only failure class is an invalid configuration,
//! which is rejected when the predictor is built rather than clamped.

use thiserror::Error;

use super::access::CacheLevel;

/// Errors raised while building or loading a predictor configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A per-level parameter that must be positive was zero.
    #[error("{level} prefetch parameter `{field}` must be greater than zero")]
    ZeroParameter {
        /// Level whose parameters are invalid.
        level: CacheLevel,
        /// Name of the offending field.
        field: &'static str,
    },

    /// The cache line size is zero or not a power of two.
    #[error("line size {0} is not a non-zero power of two")]
    InvalidLineSize(u64),

    /// A JSON configuration document could not be deserialized.
    #[error("failed to parse predictor configuration: {0}")]
    Parse(#[from] serde_json::Error),
}
