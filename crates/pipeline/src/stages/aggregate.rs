//! Stage 2: smoothed average per (user, item).
//!
//! score = (sum(ratings) + prior) / (count(ratings) + 1)
//!
//! The prior acts as one extra pseudo-rating, so a single 5 from one trusted
//! peer scores 4.0 (with the default prior of 3), not 5.0.

use crate::executor::{MapContext, ReduceContext};
use crate::traits::MapReduceStage;
use crate::types::{JoinedContribution, ScoredItem};
use data_loader::{ItemId, UserId};

/// Smoothed mean of `count` real ratings summing to `sum`.
///
/// `count` excludes the pseudo-observation; the `+ 1` adds it.
pub fn smoothed_mean(sum: u64, count: u64, prior_avg: f64) -> f64 {
    (sum as f64 + prior_avg) / (count as f64 + 1.0)
}

/// Groups joined contributions by (truster, item) and scores them
#[derive(Debug, Clone, Copy)]
pub struct SmoothedAverage {
    prior_avg: f64,
}

impl SmoothedAverage {
    pub fn new(prior_avg: f64) -> Self {
        Self { prior_avg }
    }
}

impl MapReduceStage for SmoothedAverage {
    type Input = JoinedContribution;
    type Key = (UserId, ItemId);
    type Value = u8;
    type Output = ScoredItem;

    fn name(&self) -> &str {
        "smoothed-average"
    }

    fn map(&self, input: JoinedContribution, ctx: &mut MapContext<(UserId, ItemId), u8>) {
        ctx.emit((input.truster, input.item_id), input.rating);
    }

    fn reduce(
        &self,
        (truster, item_id): (UserId, ItemId),
        ratings: Vec<u8>,
        ctx: &mut ReduceContext<ScoredItem>,
    ) {
        let sum: u64 = ratings.iter().map(|&r| u64::from(r)).sum();
        let count = ratings.len() as u64;
        ctx.emit(ScoredItem {
            truster,
            item_id,
            score: smoothed_mean(sum, count, self.prior_avg),
        });
    }
}
