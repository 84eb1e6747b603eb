//! Stage implementations for the recommendation pipeline.
//!
//! Stages run in this order, each consuming the previous one's output:
//! TrustJoin -> SmoothedAverage -> TopKSelector

pub mod aggregate;
pub mod join;
pub mod top_k;

// Re-export for convenience
pub use aggregate::{SmoothedAverage, smoothed_mean};
pub use join::TrustJoin;
pub use top_k::{TopKSelector, rank_items};
