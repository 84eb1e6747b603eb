//! Trust-weighted social recommendation as a chain of map-reduce stages.
//!
//! This crate provides:
//! - MapReduceStage trait and a StageRunner that executes stages on rayon
//! - The three stages: TrustJoin, SmoothedAverage, TopKSelector
//! - SocialRecommender for running them end to end
//!
//! ## Architecture
//! raw lines -> [trust-join] -> (user, item) -> rating
//!           -> shuffle by (user, item) -> [smoothed-average] -> score
//!           -> shuffle by user -> [top-k] -> ranked list per user
//!
//! ## Example Usage
//! ```ignore
//! use pipeline::{PipelineConfig, SocialRecommender};
//!
//! let config = PipelineConfig::new().with_prior_avg(3.0).with_top_k(25);
//! let recommender = SocialRecommender::new(config)?;
//! let output = recommender.run(lines);
//! ```

pub mod config;
pub mod counters;
pub mod error;
pub mod executor;
pub mod recommender;
pub mod shuffle;
pub mod stages;
pub mod traits;
pub mod types;

// Re-export main types
pub use config::PipelineConfig;
pub use counters::Counters;
pub use error::ConfigError;
pub use executor::{MapContext, ReduceContext, StageOutput, StageReport, StageRunner};
pub use recommender::{PipelineOutput, PipelineReport, SocialRecommender};
pub use traits::MapReduceStage;
pub use types::{Contribution, JoinedContribution, RankedItem, Recommendation, ScoredItem};
