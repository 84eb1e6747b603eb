//! Stage 1: classify rows and join trust edges with ratings.
//!
//! ## Algorithm
//! Map, per input line:
//! - rating `(item, user, r)` emits `user -> Rating(item, r)`
//! - positive trust `truster -> trustee` emits `trustee -> Truster(truster)`
//! - distrust, malformed and blank lines emit nothing (counted)
//!
//! Reduce, per user U: every truster of U is paired with every rating U
//! gave, emitting `(truster, item) -> rating`. This is the fan-out of the
//! trust x rating matrix product; cost is |trusters(U)| x |ratings(U)|.

use crate::executor::{MapContext, ReduceContext};
use crate::traits::MapReduceStage;
use crate::types::{Contribution, JoinedContribution};
use data_loader::{InputRecord, RowError, UserId, parse_line};
use tracing::trace;

pub const RATING_ROWS: &str = "join.rating_rows";
pub const HIDDEN_RATINGS_SKIPPED: &str = "join.hidden_ratings_skipped";
pub const TRUST_ROWS: &str = "join.trust_rows";
pub const DISTRUST_ROWS: &str = "join.distrust_rows";
pub const MALFORMED_ROWS: &str = "join.malformed_rows";
pub const INVALID_NUMERIC_ROWS: &str = "join.invalid_numeric_rows";
pub const BLANK_LINES: &str = "join.blank_lines";
pub const KEYS_WITHOUT_TRUSTERS: &str = "join.keys_without_trusters";
pub const KEYS_WITHOUT_RATINGS: &str = "join.keys_without_ratings";

/// Reduce-side join of trust edges and ratings, keyed by the trusted user.
#[derive(Debug, Clone, Default)]
pub struct TrustJoin {
    visible_only: bool,
}

impl TrustJoin {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ignore ratings whose status field does not mark them visible
    pub fn with_visible_only(mut self, visible_only: bool) -> Self {
        self.visible_only = visible_only;
        self
    }
}

impl MapReduceStage for TrustJoin {
    type Input = String;
    type Key = UserId;
    type Value = Contribution;
    type Output = JoinedContribution;

    fn name(&self) -> &str {
        "trust-join"
    }

    fn map(&self, line: String, ctx: &mut MapContext<UserId, Contribution>) {
        match parse_line(&line) {
            None => ctx.incr(BLANK_LINES),
            Some(InputRecord::Rating(r)) => {
                if self.visible_only && !r.visible {
                    ctx.incr(HIDDEN_RATINGS_SKIPPED);
                    return;
                }
                ctx.incr(RATING_ROWS);
                ctx.emit(
                    r.user_id,
                    Contribution::Rating {
                        item_id: r.item_id,
                        rating: r.rating,
                    },
                );
            }
            Some(InputRecord::Trust(edge)) => {
                if edge.is_positive() {
                    ctx.incr(TRUST_ROWS);
                    ctx.emit(edge.trustee, Contribution::Truster(edge.truster));
                } else {
                    ctx.incr(DISTRUST_ROWS);
                }
            }
            Some(InputRecord::Malformed(err)) => {
                trace!("Dropping row: {}", err);
                match err {
                    RowError::MalformedRow { .. } => ctx.incr(MALFORMED_ROWS),
                    RowError::InvalidNumericField { .. } => ctx.incr(INVALID_NUMERIC_ROWS),
                }
            }
        }
    }

    fn reduce(
        &self,
        key: UserId,
        values: Vec<Contribution>,
        ctx: &mut ReduceContext<JoinedContribution>,
    ) {
        let mut trusters = Vec::new();
        let mut ratings = Vec::new();
        for value in values {
            match value {
                Contribution::Truster(truster) => trusters.push(truster),
                Contribution::Rating { item_id, rating } => ratings.push((item_id, rating)),
            }
        }

        // Nobody trusts this user, or this user rated nothing: no output
        if trusters.is_empty() {
            ctx.incr(KEYS_WITHOUT_TRUSTERS);
            return;
        }
        if ratings.is_empty() {
            ctx.incr(KEYS_WITHOUT_RATINGS);
            return;
        }

        trace!(
            "User {} joins {} trusters x {} ratings",
            key,
            trusters.len(),
            ratings.len()
        );
        for (item_id, rating) in &ratings {
            for truster in &trusters {
                ctx.emit(JoinedContribution {
                    truster: truster.clone(),
                    item_id: item_id.clone(),
                    rating: *rating,
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::StageRunner;

    fn lines(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_map_classifies_rows() {
        let stage = TrustJoin::new();
        let mut ctx = MapContext::new(1);
        for line in lines(&[
            "i1\tu1\t4\t1\tx\tx\tx\tx",
            "t1\tu1\t1\tx",
            "t2\tu1\t-1\tx",
            "a\tb\tc\td\te",
            "i1\tu1\t0\t1\tx\tx\tx\tx",
            "",
        ]) {
            stage.map(line, &mut ctx);
        }

        assert_eq!(ctx.emitted(), 2);
        let counters = ctx.counters();
        assert_eq!(counters.get(RATING_ROWS), 1);
        assert_eq!(counters.get(TRUST_ROWS), 1);
        assert_eq!(counters.get(DISTRUST_ROWS), 1);
        assert_eq!(counters.get(MALFORMED_ROWS), 1);
        assert_eq!(counters.get(INVALID_NUMERIC_ROWS), 1);
        assert_eq!(counters.get(BLANK_LINES), 1);
    }

    #[test]
    fn test_tabs_only_lines_count_as_parse_errors() {
        let stage = TrustJoin::new();
        let mut ctx = MapContext::new(1);
        for line in lines(&["\t", "\t\t\t", "\t\t\t\t\t\t\t", "  "]) {
            stage.map(line, &mut ctx);
        }

        assert_eq!(ctx.emitted(), 0);
        let counters = ctx.counters();
        assert_eq!(counters.get(MALFORMED_ROWS), 1);
        assert_eq!(counters.get(INVALID_NUMERIC_ROWS), 2);
        assert_eq!(counters.get(BLANK_LINES), 1);
    }

    #[test]
    fn test_visible_only_skips_hidden_ratings() {
        let stage = TrustJoin::new().with_visible_only(true);
        let mut ctx = MapContext::new(1);
        stage.map("i1\tu1\t4\t0\tx\tx\tx\tx".to_string(), &mut ctx);
        stage.map("i2\tu1\t4\t1\tx\tx\tx\tx".to_string(), &mut ctx);

        assert_eq!(ctx.emitted(), 1);
        assert_eq!(ctx.counters().get(HIDDEN_RATINGS_SKIPPED), 1);
    }

    #[test]
    fn test_reduce_fans_out_trusters_by_ratings() {
        let mut ctx = ReduceContext::new();
        TrustJoin::new().reduce(
            "u".to_string(),
            vec![
                Contribution::Rating { item_id: "i1".to_string(), rating: 5 },
                Contribution::Truster("a".to_string()),
                Contribution::Rating { item_id: "i2".to_string(), rating: 2 },
                Contribution::Truster("b".to_string()),
                Contribution::Truster("c".to_string()),
            ],
            &mut ctx,
        );

        let out = ctx.into_output();
        assert_eq!(out.len(), 6);
        for truster in ["a", "b", "c"] {
            assert!(out.contains(&JoinedContribution {
                truster: truster.to_string(),
                item_id: "i1".to_string(),
                rating: 5,
            }));
            assert!(out.contains(&JoinedContribution {
                truster: truster.to_string(),
                item_id: "i2".to_string(),
                rating: 2,
            }));
        }
    }

    #[test]
    fn test_one_sided_keys_emit_nothing() {
        let stage = TrustJoin::new();

        let mut ctx = ReduceContext::new();
        stage.reduce(
            "lonely".to_string(),
            vec![Contribution::Rating { item_id: "i".to_string(), rating: 3 }],
            &mut ctx,
        );
        assert_eq!(ctx.counters().get(KEYS_WITHOUT_TRUSTERS), 1);
        assert!(ctx.into_output().is_empty());

        let mut ctx = ReduceContext::new();
        stage.reduce(
            "quiet".to_string(),
            vec![Contribution::Truster("a".to_string())],
            &mut ctx,
        );
        assert_eq!(ctx.counters().get(KEYS_WITHOUT_RATINGS), 1);
        assert!(ctx.into_output().is_empty());
    }

    #[test]
    fn test_join_through_runner() {
        let input = lines(&[
            "i1\tbob\t4\t1\tx\tx\tx\tx",
            "alice\tbob\t1\tx",
            "carol\tbob\t-1\tx",
        ]);

        let result = StageRunner::new(4, 1).run(&TrustJoin::new(), input);

        assert_eq!(
            result.output,
            vec![JoinedContribution {
                truster: "alice".to_string(),
                item_id: "i1".to_string(),
                rating: 4,
            }]
        );
        assert_eq!(result.report.counters.get(DISTRUST_ROWS), 1);
    }
}
