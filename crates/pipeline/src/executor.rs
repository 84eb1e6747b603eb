//! Local map-reduce execution on the rayon thread pool.
//!
//! ## Algorithm
//! 1. Split the input into chunks; each chunk is one map task
//! 2. Run all map tasks in parallel. Each task routes its output into
//!    per-partition buffers as it emits
//! 3. Barrier: wait for every map task before any reduction starts
//! 4. Gather each partition's buffers (in map task order) and group by key
//! 5. Run one reduce task per partition, in parallel
//! 6. Concatenate reduce outputs in partition order
//!
//! Tasks share nothing mutable. Counters are task-local and only merged
//! once the tasks that produced them have finished.

use crate::counters::Counters;
use crate::shuffle::{group_by_key, partition_for};
use crate::traits::MapReduceStage;
use rayon::prelude::*;
use serde::Serialize;
use std::hash::Hash;
use std::time::Instant;
use tracing::{debug, instrument};

/// Per-map-task emit buffer
pub struct MapContext<K, V> {
    partitions: Vec<Vec<(K, V)>>,
    counters: Counters,
}

impl<K: Hash, V> MapContext<K, V> {
    pub fn new(num_partitions: usize) -> Self {
        Self {
            partitions: (0..num_partitions.max(1)).map(|_| Vec::new()).collect(),
            counters: Counters::new(),
        }
    }

    /// Emit a keyed value, routed to its reduce partition
    pub fn emit(&mut self, key: K, value: V) {
        let p = partition_for(&key, self.partitions.len());
        self.partitions[p].push((key, value));
    }

    /// Bump a task-local counter
    pub fn incr(&mut self, counter: &'static str) {
        self.counters.incr(counter, 1);
    }

    pub fn counters(&self) -> &Counters {
        &self.counters
    }

    /// Total pairs emitted so far
    pub fn emitted(&self) -> usize {
        self.partitions.iter().map(Vec::len).sum()
    }
}

/// Per-reduce-task output buffer
pub struct ReduceContext<O> {
    output: Vec<O>,
    counters: Counters,
}

impl<O> ReduceContext<O> {
    pub fn new() -> Self {
        Self {
            output: Vec::new(),
            counters: Counters::new(),
        }
    }

    pub fn emit(&mut self, output: O) {
        self.output.push(output);
    }

    pub fn incr(&mut self, counter: &'static str) {
        self.counters.incr(counter, 1);
    }

    pub fn counters(&self) -> &Counters {
        &self.counters
    }

    pub fn into_output(self) -> Vec<O> {
        self.output
    }
}

impl<O> Default for ReduceContext<O> {
    fn default() -> Self {
        Self::new()
    }
}

/// What happened while running one stage
#[derive(Debug, Clone, Serialize)]
pub struct StageReport {
    pub stage: String,
    pub input_records: usize,
    /// Pairs crossing the shuffle
    pub shuffled_records: usize,
    /// Distinct keys reduced
    pub reduce_keys: usize,
    pub output_records: usize,
    pub map_tasks: usize,
    pub reduce_tasks: usize,
    pub counters: Counters,
}

/// Output of one stage plus its report
#[derive(Debug)]
pub struct StageOutput<O> {
    pub output: Vec<O>,
    pub report: StageReport,
}

/// Runs a MapReduceStage over an in-memory input.
#[derive(Debug, Clone, Copy)]
pub struct StageRunner {
    num_partitions: usize,
    map_chunk_size: usize,
}

impl StageRunner {
    /// Create a runner.
    ///
    /// # Arguments
    /// * `num_partitions` - Number of reduce partitions (minimum 1)
    /// * `map_chunk_size` - Input records per map task (minimum 1)
    pub fn new(num_partitions: usize, map_chunk_size: usize) -> Self {
        Self {
            num_partitions: num_partitions.max(1),
            map_chunk_size: map_chunk_size.max(1),
        }
    }

    /// Execute `stage` over `inputs`.
    ///
    /// Outputs are concatenated in partition order, and within a partition
    /// in ascending key order, so the result only depends on the input and
    /// the runner's settings.
    #[instrument(skip_all, fields(stage = stage.name(), inputs = inputs.len()))]
    pub fn run<S: MapReduceStage>(&self, stage: &S, inputs: Vec<S::Input>) -> StageOutput<S::Output> {
        let start = Instant::now();
        let input_records = inputs.len();
        let num_partitions = self.num_partitions;

        // Map phase
        let map_tasks: Vec<MapContext<S::Key, S::Value>> = inputs
            .into_par_iter()
            .chunks(self.map_chunk_size)
            .map(|chunk| {
                let mut ctx = MapContext::new(num_partitions);
                for input in chunk {
                    stage.map(input, &mut ctx);
                }
                ctx
            })
            .collect();

        // Shuffle barrier: every map task has finished
        let mut counters = Counters::new();
        let map_task_count = map_tasks.len();
        let mut buckets: Vec<Vec<Vec<(S::Key, S::Value)>>> = (0..num_partitions)
            .map(|_| Vec::with_capacity(map_task_count))
            .collect();
        for task in map_tasks {
            counters.merge(&task.counters);
            for (bucket, run) in buckets.iter_mut().zip(task.partitions) {
                bucket.push(run);
            }
        }
        let shuffled_records: usize = buckets
            .iter()
            .flat_map(|runs| runs.iter().map(Vec::len))
            .sum();
        debug!(
            "Map phase done: {} tasks, {} records shuffled",
            map_task_count, shuffled_records
        );

        // Reduce phase
        let reduce_tasks: Vec<(usize, ReduceContext<S::Output>)> = buckets
            .into_par_iter()
            .map(|runs| {
                let groups = group_by_key(runs);
                let keys = groups.len();
                let mut ctx = ReduceContext::new();
                for (key, values) in groups {
                    stage.reduce(key, values, &mut ctx);
                }
                (keys, ctx)
            })
            .collect();

        let mut output = Vec::new();
        let mut reduce_keys = 0;
        for (keys, task) in reduce_tasks {
            reduce_keys += keys;
            counters.merge(&task.counters);
            output.extend(task.into_output());
        }

        debug!(
            "Stage {} finished in {:.2?}: {} keys, {} outputs",
            stage.name(),
            start.elapsed(),
            reduce_keys,
            output.len()
        );

        let report = StageReport {
            stage: stage.name().to_string(),
            input_records,
            shuffled_records,
            reduce_keys,
            output_records: output.len(),
            map_tasks: map_task_count,
            reduce_tasks: num_partitions,
            counters,
        };
        StageOutput { output, report }
    }
}

impl Default for StageRunner {
    fn default() -> Self {
        Self::new(8, 4096)
    }
}
