//! Knobs consumed by the pipeline stages.

use crate::error::{ConfigError, Result};
use serde::{Deserialize, Serialize};

/// Default smoothing prior: midpoint of the 1-5 rating scale
pub const DEFAULT_PRIOR_AVG: f64 = 3.0;

/// Default number of recommendations kept per user
pub const DEFAULT_TOP_K: i64 = 25;

/// Pipeline configuration.
///
/// `top_k` is signed because values arrive from outside (e.g. a command
/// line) and a negative one must be reported, not wrapped.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Smoothing prior, counted as one pseudo-rating per (user, item)
    pub prior_avg: f64,
    /// Recommendations kept per user
    pub top_k: i64,
    /// Drop ratings whose status field does not mark them visible
    pub visible_only: bool,
    /// Reduce partitions per stage
    pub num_partitions: usize,
    /// Input records per map task
    pub map_chunk_size: usize,
}

impl PipelineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure the smoothing prior (default: 3.0)
    pub fn with_prior_avg(mut self, prior_avg: f64) -> Self {
        self.prior_avg = prior_avg;
        self
    }

    /// Configure recommendations per user (default: 25)
    pub fn with_top_k(mut self, top_k: i64) -> Self {
        self.top_k = top_k;
        self
    }

    /// Only use visible ratings (default: false)
    pub fn with_visible_only(mut self, visible_only: bool) -> Self {
        self.visible_only = visible_only;
        self
    }

    /// Configure reduce partitions per stage (default: 8)
    pub fn with_num_partitions(mut self, num_partitions: usize) -> Self {
        self.num_partitions = num_partitions;
        self
    }

    /// Configure records per map task (default: 4096)
    pub fn with_map_chunk_size(mut self, map_chunk_size: usize) -> Self {
        self.map_chunk_size = map_chunk_size;
        self
    }

    /// Check every knob, returning the first problem found
    pub fn validate(&self) -> Result<()> {
        if !self.prior_avg.is_finite() {
            return Err(ConfigError::NonFinitePrior(self.prior_avg));
        }
        if self.top_k < 0 {
            return Err(ConfigError::NegativeTopK(self.top_k));
        }
        if self.num_partitions == 0 {
            return Err(ConfigError::ZeroPartitions);
        }
        if self.map_chunk_size == 0 {
            return Err(ConfigError::ZeroChunkSize);
        }
        Ok(())
    }

    /// `top_k` as a length, once known to be non-negative
    pub fn top_k_len(&self) -> Result<usize> {
        usize::try_from(self.top_k).map_err(|_| ConfigError::NegativeTopK(self.top_k))
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            prior_avg: DEFAULT_PRIOR_AVG,
            top_k: DEFAULT_TOP_K,
            visible_only: false,
            num_partitions: 8,
            map_chunk_size: 4096,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = PipelineConfig::default();
        assert_eq!(config.prior_avg, 3.0);
        assert_eq!(config.top_k, 25);
        assert!(config.validate().is_ok());
        assert_eq!(config.top_k_len(), Ok(25));
    }

    #[test]
    fn test_rejects_bad_values() {
        let base = PipelineConfig::new();
        assert_eq!(
            base.with_top_k(-1).validate(),
            Err(ConfigError::NegativeTopK(-1))
        );
        assert!(matches!(
            base.with_prior_avg(f64::NAN).validate(),
            Err(ConfigError::NonFinitePrior(_))
        ));
        assert!(matches!(
            base.with_prior_avg(f64::INFINITY).validate(),
            Err(ConfigError::NonFinitePrior(_))
        ));
        assert_eq!(
            base.with_num_partitions(0).validate(),
            Err(ConfigError::ZeroPartitions)
        );
        assert_eq!(
            base.with_map_chunk_size(0).validate(),
            Err(ConfigError::ZeroChunkSize)
        );
    }

    #[test]
    fn test_zero_top_k_is_allowed() {
        assert!(PipelineConfig::new().with_top_k(0).validate().is_ok());
    }
}
