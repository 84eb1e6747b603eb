mod output;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use data_loader::{ParseSummary, SyntheticSpec};
use output::{OutputFormat, print_report, write_recommendations};
use pipeline::{PipelineConfig, SocialRecommender};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::info;

/// socrec - trust-weighted social recommendations
#[derive(Parser)]
#[command(name = "socrec")]
#[command(about = "Recommend items from the ratings of people you trust", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Pipeline knobs shared by `recommend` and `benchmark`
#[derive(clap::Args, Debug, Clone)]
struct PipelineArgs {
    /// Smoothing prior, counted as one pseudo-rating
    #[arg(long = "avg", visible_alias = "avge", default_value = "3", allow_negative_numbers = true)]
    prior_avg: f64,

    /// Number of recommendations to keep per user
    #[arg(long, default_value = "25", allow_negative_numbers = true)]
    topk: i64,

    /// Only use ratings whose status field marks them visible
    #[arg(long)]
    visible_only: bool,

    /// Reduce partitions per stage
    #[arg(long, default_value = "8")]
    partitions: usize,

    /// Input records per map task
    #[arg(long, default_value = "4096")]
    chunk_size: usize,
}

impl PipelineArgs {
    fn to_config(&self) -> PipelineConfig {
        PipelineConfig::new()
            .with_prior_avg(self.prior_avg)
            .with_top_k(self.topk)
            .with_visible_only(self.visible_only)
            .with_num_partitions(self.partitions)
            .with_map_chunk_size(self.chunk_size)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Compute top-K recommendations for every user
    Recommend {
        /// Tab-delimited input files (ratings and trust rows, mixed freely)
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        #[command(flatten)]
        settings: PipelineArgs,

        /// Output format
        #[arg(long, value_enum, default_value = "jsonl")]
        format: OutputFormat,

        /// Write recommendations here instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,

        /// Print per-stage counts to stderr
        #[arg(long)]
        report: bool,
    },

    /// Classify input rows and show what they contain
    Inspect {
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
    },

    /// Time the pipeline on a generated dataset
    Benchmark {
        /// Number of users
        #[arg(long, default_value = "10000")]
        users: usize,

        /// Number of distinct items
        #[arg(long, default_value = "5000")]
        items: usize,

        #[arg(long, default_value = "20")]
        ratings_per_user: usize,

        #[arg(long, default_value = "15")]
        trusts_per_user: usize,

        /// Random seed (random if omitted)
        #[arg(long)]
        seed: Option<u64>,

        /// Number of timed runs
        #[arg(long, default_value = "3")]
        runs: usize,

        #[command(flatten)]
        settings: PipelineArgs,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing; stdout is reserved for recommendations
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // Dispatch to appropriate command handler
    match cli.command {
        Commands::Recommend {
            inputs,
            settings,
            format,
            output,
            report,
        } => handle_recommend(inputs, settings, format, output, report).await?,
        Commands::Inspect { inputs } => handle_inspect(inputs).await?,
        Commands::Benchmark {
            users,
            items,
            ratings_per_user,
            trusts_per_user,
            seed,
            runs,
            settings,
        } => {
            let spec = SyntheticSpec {
                users,
                items,
                ratings_per_user,
                trusts_per_user,
                distrust_ratio: 0.1,
            };
            handle_benchmark(spec, seed, runs, settings).await?
        }
    }

    Ok(())
}

/// Read every input file concurrently, keeping lines in argument order
async fn load_inputs(paths: &[PathBuf]) -> Result<Vec<String>> {
    let start = Instant::now();
    let mut handles = vec![];
    for path in paths {
        let path = path.clone();
        handles.push(tokio::task::spawn_blocking(move || {
            data_loader::read_lines(&path)
                .with_context(|| format!("Failed to read input {}", path.display()))
        }));
    }

    let mut lines = Vec::new();
    for handle in handles {
        lines.extend(handle.await??);
    }
    info!(
        "Read {} lines from {} files in {:.2?}",
        lines.len(),
        paths.len(),
        start.elapsed()
    );
    Ok(lines)
}

/// Handle the 'recommend' command
async fn handle_recommend(
    inputs: Vec<PathBuf>,
    args: PipelineArgs,
    format: OutputFormat,
    output: Option<PathBuf>,
    report: bool,
) -> Result<()> {
    // Reject bad knobs before touching any input
    let recommender =
        SocialRecommender::new(args.to_config()).context("Invalid pipeline configuration")?;
    let config = recommender.config();
    info!(
        "Pipeline: prior {}, top {}, {} partitions{}",
        config.prior_avg,
        config.top_k,
        config.num_partitions,
        if config.visible_only { ", visible ratings only" } else { "" }
    );

    let lines = load_inputs(&inputs).await?;

    // The pipeline is CPU-bound; keep it off the async workers
    let result = tokio::task::spawn_blocking(move || recommender.run(lines)).await?;

    let mut out: Box<dyn Write> = match &output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("Failed to create {}", path.display()))?,
        )),
        None => Box::new(BufWriter::new(std::io::stdout().lock())),
    };
    write_recommendations(&mut out, &result.recommendations, format)?;

    if report {
        print_report(&result.report);
    }
    if let Some(path) = &output {
        eprintln!(
            "{} Wrote {} recommendations to {}",
            "✓".green(),
            result.recommendations.len(),
            path.display()
        );
    }
    Ok(())
}

/// Handle the 'inspect' command
async fn handle_inspect(inputs: Vec<PathBuf>) -> Result<()> {
    let lines = load_inputs(&inputs).await?;
    let summary = tokio::task::spawn_blocking(move || ParseSummary::from_lines(&lines)).await?;

    println!("{}", "Input summary:".bold().blue());
    println!("{}Ratings: {} ({} visible)", "• ".green(), summary.ratings, summary.visible_ratings);
    println!("{}Trust edges: {}", "• ".green(), summary.trust_edges);
    println!("{}Distrust edges: {}", "• ".green(), summary.distrust_edges);
    println!("{}Malformed rows: {}", "• ".yellow(), summary.malformed_rows);
    println!("{}Invalid numeric fields: {}", "• ".yellow(), summary.invalid_numeric);
    println!("{}Blank lines: {}", "• ".cyan(), summary.blank_lines);
    Ok(())
}

/// Handle the 'benchmark' command
async fn handle_benchmark(
    spec: SyntheticSpec,
    seed: Option<u64>,
    runs: usize,
    args: PipelineArgs,
) -> Result<()> {
    let recommender =
        SocialRecommender::new(args.to_config()).context("Invalid pipeline configuration")?;
    let seed = seed.unwrap_or_else(rand::random::<u64>);

    println!(
        "Generating {} users x ({} ratings + {} trusts), seed {}",
        spec.users, spec.ratings_per_user, spec.trusts_per_user, seed
    );
    let lines =
        tokio::task::spawn_blocking(move || data_loader::synthetic::generate(&spec, seed)).await?;
    let line_count = lines.len();

    let timings = tokio::task::spawn_blocking(move || {
        let mut timings = Vec::with_capacity(runs);
        let mut users = 0;
        for _ in 0..runs.max(1) {
            let start = Instant::now();
            let output = recommender.run(lines.clone());
            timings.push(start.elapsed());
            users = output.recommendations.len();
        }
        (timings, users)
    })
    .await?;
    let (mut timings, users) = timings;

    timings.sort();
    let total: Duration = timings.iter().sum();
    let avg = total / timings.len() as u32;
    let throughput = line_count as f64 / avg.as_secs_f64();

    println!("{}", "Benchmark results:".bold().blue());
    println!("Input lines: {}", line_count);
    println!("Users with recommendations: {}", users);
    println!("Runs: {}", timings.len());
    println!("Fastest: {:?}", timings[0]);
    println!("Average: {:?}", avg);
    println!("Slowest: {:?}", timings[timings.len() - 1]);
    println!("Throughput: {:.0} lines/second", throughput);

    Ok(())
}
