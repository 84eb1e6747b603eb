//! The SocialRecommender wires the three stages together.
//!
//! Each stage's output key space is the next stage's grouping key:
//! - trust-join emits `(truster, item) -> rating`
//! - smoothed-average groups by `(truster, item)`, emits scores
//! - top-k regroups scores by `truster`

use crate::config::PipelineConfig;
use crate::error::Result;
use crate::executor::{StageReport, StageRunner};
use crate::stages::{SmoothedAverage, TopKSelector, TrustJoin};
use crate::types::Recommendation;
use serde::Serialize;
use std::time::Instant;
use tracing::{debug, info, instrument};

/// Reports for every stage of one run, in execution order
#[derive(Debug, Clone, Serialize)]
pub struct PipelineReport {
    pub stages: Vec<StageReport>,
}

impl PipelineReport {
    /// Look up a stage's report by name
    pub fn stage(&self, name: &str) -> Option<&StageReport> {
        self.stages.iter().find(|s| s.stage == name)
    }
}

/// Result of a full pipeline run
#[derive(Debug)]
pub struct PipelineOutput {
    /// One entry per user with at least one scored item, sorted by user id
    pub recommendations: Vec<Recommendation>,
    pub report: PipelineReport,
}

/// Trust-weighted recommendation pipeline.
///
/// ## Usage
/// ```ignore
/// let recommender = SocialRecommender::new(PipelineConfig::new().with_top_k(10))?;
/// let output = recommender.run(lines);
/// for rec in &output.recommendations {
///     println!("{}: {} items", rec.user_id, rec.items.len());
/// }
/// ```
#[derive(Debug, Clone)]
pub struct SocialRecommender {
    config: PipelineConfig,
    runner: StageRunner,
    join: TrustJoin,
    aggregate: SmoothedAverage,
    select: TopKSelector,
}

impl SocialRecommender {
    /// Build the pipeline, rejecting invalid configuration up front.
    pub fn new(config: PipelineConfig) -> Result<Self> {
        config.validate()?;
        let top_k = config.top_k_len()?;

        Ok(Self {
            config,
            runner: StageRunner::new(config.num_partitions, config.map_chunk_size),
            join: TrustJoin::new().with_visible_only(config.visible_only),
            aggregate: SmoothedAverage::new(config.prior_avg),
            select: TopKSelector::new(top_k),
        })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run all three stages over raw input lines.
    ///
    /// Never fails: bad rows are dropped and show up in the report counters.
    #[instrument(skip_all, fields(lines = lines.len()))]
    pub fn run(&self, lines: Vec<String>) -> PipelineOutput {
        let start = Instant::now();

        let joined = self.runner.run(&self.join, lines);
        let scored = self.runner.run(&self.aggregate, joined.output);
        let ranked = self.runner.run(&self.select, scored.output);

        let mut recommendations = ranked.output;
        recommendations.sort_by(|a, b| a.user_id.cmp(&b.user_id));

        let report = PipelineReport {
            stages: vec![joined.report, scored.report, ranked.report],
        };
        for stage in &report.stages {
            for (name, count) in stage.counters.iter() {
                debug!("{}: {} = {}", stage.stage, name, count);
            }
        }
        info!(
            "Produced recommendations for {} users in {:.2?}",
            recommendations.len(),
            start.elapsed()
        );

        PipelineOutput {
            recommendations,
            report,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigError;

    #[test]
    fn test_invalid_config_fails_before_running() {
        let err = SocialRecommender::new(PipelineConfig::new().with_top_k(-3)).unwrap_err();
        assert_eq!(err, ConfigError::NegativeTopK(-3));

        let err = SocialRecommender::new(PipelineConfig::new().with_prior_avg(f64::NAN)).unwrap_err();
        assert!(matches!(err, ConfigError::NonFinitePrior(_)));
    }

    #[test]
    fn test_report_has_every_stage() {
        let recommender = SocialRecommender::new(PipelineConfig::default()).unwrap();
        let output = recommender.run(vec![
            "i1\tbob\t5\t1\tx\tx\tx\tx".to_string(),
            "alice\tbob\t1\tx".to_string(),
        ]);

        let names: Vec<&str> = output.report.stages.iter().map(|s| s.stage.as_str()).collect();
        assert_eq!(names, vec!["trust-join", "smoothed-average", "top-k"]);
        assert_eq!(output.report.stage("trust-join").unwrap().output_records, 1);
        assert_eq!(output.recommendations.len(), 1);
        assert_eq!(output.recommendations[0].user_id, "alice");
        assert_eq!(output.recommendations[0].items[0].score, 4.0);
    }

    #[test]
    fn test_config_is_kept() {
        let config = PipelineConfig::new().with_top_k(4).with_visible_only(true);
        let recommender = SocialRecommender::new(config).unwrap();

        assert_eq!(recommender.config().top_k, 4);
        assert!(recommender.config().visible_only);
        assert_eq!(recommender.config().prior_avg, 3.0);
    }

    #[test]
    fn test_empty_input() {
        let recommender = SocialRecommender::new(PipelineConfig::default()).unwrap();
        let output = recommender.run(Vec::new());
        assert!(output.recommendations.is_empty());
    }
}
