//! Core traits for the map-reduce pipeline.
//!
//! This module defines the MapReduceStage trait. Every step of the
//! recommendation pipeline (join, aggregate, top-K) is one stage, and the
//! StageRunner executes any stage the same way.

use crate::executor::{MapContext, ReduceContext};
use std::hash::Hash;

/// One map-reduce step.
///
/// ## Design Note
/// - `Send + Sync` lets the runner call `map` and `reduce` from many
///   rayon tasks at once through a shared reference
/// - Neither method may touch state outside its arguments. Everything a
///   reduction needs is in the grouped values for its key, so any task can
///   be re-run without coordination
pub trait MapReduceStage: Send + Sync {
    /// One record of the stage's input
    type Input: Send;
    /// Shuffle key; values are grouped under it before reduction
    type Key: Hash + Ord + Send;
    /// Intermediate value carried from map to reduce
    type Value: Send;
    /// One record of the stage's output
    type Output: Send;

    /// Returns the name of this stage (for logging/reporting)
    fn name(&self) -> &str;

    /// Turn one input record into zero or more keyed values.
    fn map(&self, input: Self::Input, ctx: &mut MapContext<Self::Key, Self::Value>);

    /// Reduce every value emitted under `key` into zero or more outputs.
    ///
    /// `values` is never empty and holds the complete group for the key.
    fn reduce(&self, key: Self::Key, values: Vec<Self::Value>, ctx: &mut ReduceContext<Self::Output>);
}
