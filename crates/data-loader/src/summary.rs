//! Tallies of what a batch of input lines contains.
//!
//! Used to report on a dataset before (or instead of) running the full
//! pipeline. Classification is data-parallel: each rayon task builds its own
//! summary and the partial summaries are merged at the end.

use crate::error::RowError;
use crate::parser::parse_line;
use crate::types::InputRecord;
use rayon::prelude::*;
use serde::Serialize;
use tracing::debug;

/// Row counts by classification
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ParseSummary {
    pub ratings: u64,
    /// Ratings whose status field marks them visible
    pub visible_ratings: u64,
    pub trust_edges: u64,
    pub distrust_edges: u64,
    /// Wrong field count
    pub malformed_rows: u64,
    /// Right field count, unusable numeric field
    pub invalid_numeric: u64,
    pub blank_lines: u64,
}

impl ParseSummary {
    /// Classify every line in parallel and count the outcomes
    pub fn from_lines(lines: &[String]) -> Self {
        let summary = lines
            .par_iter()
            .fold(ParseSummary::default, |mut acc, line| {
                acc.record(parse_line(line).as_ref());
                acc
            })
            .reduce(ParseSummary::default, ParseSummary::merge);

        debug!(?summary, "Classified {} lines", lines.len());
        summary
    }

    /// Count one classified line (`None` is a blank line)
    pub fn record(&mut self, record: Option<&InputRecord>) {
        match record {
            None => self.blank_lines += 1,
            Some(InputRecord::Rating(r)) => {
                self.ratings += 1;
                if r.visible {
                    self.visible_ratings += 1;
                }
            }
            Some(InputRecord::Trust(edge)) if edge.is_positive() => self.trust_edges += 1,
            Some(InputRecord::Trust(_)) => self.distrust_edges += 1,
            Some(InputRecord::Malformed(RowError::MalformedRow { .. })) => self.malformed_rows += 1,
            Some(InputRecord::Malformed(RowError::InvalidNumericField { .. })) => {
                self.invalid_numeric += 1
            }
        }
    }

    /// Combine two partial summaries
    pub fn merge(mut self, other: ParseSummary) -> ParseSummary {
        self.ratings += other.ratings;
        self.visible_ratings += other.visible_ratings;
        self.trust_edges += other.trust_edges;
        self.distrust_edges += other.distrust_edges;
        self.malformed_rows += other.malformed_rows;
        self.invalid_numeric += other.invalid_numeric;
        self.blank_lines += other.blank_lines;
        self
    }

    /// Rows that were dropped for any reason
    pub fn rejected(&self) -> u64 {
        self.malformed_rows + self.invalid_numeric
    }
}
