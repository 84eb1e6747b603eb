//! Benchmarks for the recommendation pipeline
//!
//! Run with: cargo bench --package pipeline
//!
//! Uses a synthetic Epinions-shaped dataset so no download is needed.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use data_loader::SyntheticSpec;
use data_loader::synthetic::generate;
use pipeline::stages::TrustJoin;
use pipeline::{PipelineConfig, SocialRecommender, StageRunner};

const SEED: u64 = 42;

fn dataset(users: usize) -> Vec<String> {
    let spec = SyntheticSpec {
        users,
        items: users * 2,
        ratings_per_user: 10,
        trusts_per_user: 10,
        distrust_ratio: 0.1,
    };
    generate(&spec, SEED)
}

fn bench_full_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("full_pipeline");
    for users in [1_000, 5_000] {
        let lines = dataset(users);
        let recommender = SocialRecommender::new(PipelineConfig::default()).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(users), &lines, |b, lines| {
            b.iter(|| black_box(recommender.run(black_box(lines.clone()))))
        });
    }
    group.finish();
}

fn bench_join_stage(c: &mut Criterion) {
    let lines = dataset(5_000);
    let runner = StageRunner::default();
    let join = TrustJoin::new();

    c.bench_function("trust_join_5000_users", |b| {
        b.iter(|| black_box(runner.run(&join, black_box(lines.clone()))))
    });
}

criterion_group!(benches, bench_full_pipeline, bench_join_stage);
criterion_main!(benches);
