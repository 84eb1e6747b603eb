//! Stage 3: regroup scores by user and keep the best K items.
//!
//! Ordering is total: score descending, then item id ascending. Ties
//! therefore come out the same no matter how the values for a user were
//! interleaved by the shuffle.

use crate::executor::{MapContext, ReduceContext};
use crate::traits::MapReduceStage;
use crate::types::{RankedItem, Recommendation, ScoredItem};
use data_loader::UserId;
use std::cmp::Ordering;

pub const USERS_TRUNCATED: &str = "top_k.users_truncated";

/// Score descending, then item id ascending
pub fn rank_order(a: &RankedItem, b: &RankedItem) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| a.item_id.cmp(&b.item_id))
}

/// Sort items best first and keep at most `k`
pub fn rank_items(mut items: Vec<RankedItem>, k: usize) -> Vec<RankedItem> {
    items.sort_by(rank_order);
    items.truncate(k);
    items
}

/// Per-user top-K selection
#[derive(Debug, Clone, Copy)]
pub struct TopKSelector {
    k: usize,
}

impl TopKSelector {
    pub fn new(k: usize) -> Self {
        Self { k }
    }
}

impl MapReduceStage for TopKSelector {
    type Input = ScoredItem;
    type Key = UserId;
    type Value = RankedItem;
    type Output = Recommendation;

    fn name(&self) -> &str {
        "top-k"
    }

    fn map(&self, input: ScoredItem, ctx: &mut MapContext<UserId, RankedItem>) {
        ctx.emit(
            input.truster,
            RankedItem {
                item_id: input.item_id,
                score: input.score,
            },
        );
    }

    fn reduce(&self, user_id: UserId, items: Vec<RankedItem>, ctx: &mut ReduceContext<Recommendation>) {
        if items.len() > self.k {
            ctx.incr(USERS_TRUNCATED);
        }
        ctx.emit(Recommendation {
            user_id,
            items: rank_items(items, self.k),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, score: f64) -> RankedItem {
        RankedItem {
            item_id: id.to_string(),
            score,
        }
    }

    fn ids(items: &[RankedItem]) -> Vec<&str> {
        items.iter().map(|i| i.item_id.as_str()).collect()
    }

    #[test]
    fn test_ties_broken_by_item_id() {
        let ranked = rank_items(
            vec![item("D", 2.0), item("B", 4.5), item("C", 3.0), item("A", 4.5)],
            2,
        );
        assert_eq!(ids(&ranked), vec!["A", "B"]);
        assert!(ranked.iter().all(|i| i.score == 4.5));
    }

    #[test]
    fn test_fewer_items_than_k_are_not_padded() {
        let ranked = rank_items(vec![item("x", 1.0), item("y", 5.0), item("z", 3.0)], 25);
        assert_eq!(ids(&ranked), vec!["y", "z", "x"]);
    }

    #[test]
    fn test_zero_k_gives_empty_list() {
        let mut ctx = ReduceContext::new();
        TopKSelector::new(0).reduce("u".to_string(), vec![item("a", 4.0)], &mut ctx);

        let out = ctx.into_output();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].user_id, "u");
        assert!(out[0].items.is_empty());
    }

    #[test]
    fn test_input_order_does_not_matter() {
        let forward = vec![item("a", 3.0), item("b", 3.0), item("c", 4.0)];
        let mut backward = forward.clone();
        backward.reverse();
        assert_eq!(rank_items(forward, 3), rank_items(backward, 3));
    }

    #[test]
    fn test_reduce_counts_truncation() {
        let mut ctx = ReduceContext::new();
        TopKSelector::new(1).reduce(
            "u".to_string(),
            vec![item("a", 3.0), item("b", 4.0)],
            &mut ctx,
        );
        assert_eq!(ctx.counters().get(USERS_TRUNCATED), 1);
        assert_eq!(ids(&ctx.into_output()[0].items), vec!["b"]);
    }
}
