//! Error types for the pipeline crate.
//!
//! Only configuration can fail. Bad input rows are absorbed and counted by
//! the stage that meets them, so nothing past `SocialRecommender::new` ever
//! returns an error.

use thiserror::Error;

/// Invalid pipeline configuration, rejected before any stage runs
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// The smoothing prior would poison every score
    #[error("Smoothing prior must be finite, got {0}")]
    NonFinitePrior(f64),

    #[error("topK must be zero or positive, got {0}")]
    NegativeTopK(i64),

    #[error("Number of reduce partitions must be at least 1")]
    ZeroPartitions,

    #[error("Map chunk size must be at least 1")]
    ZeroChunkSize,
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, ConfigError>;
