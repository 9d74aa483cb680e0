use crate::dataset::PartitionedDataset;
use crate::shuffle::{new_inboxes, HashShuffle, MessageShuffle, Outbox};
use rankflow_api::function::{StageFunction, TransformContext};
use rankflow_common::error::{RankFlowError, RankFlowResult};
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use std::hash::Hash;
use std::time::Instant;
use tracing::debug;

struct WorkerContext<K, V> {
    outbox: Outbox<K, V>,
}

impl<K, V> TransformContext<K, V> for WorkerContext<K, V> {
    fn emit(&mut self, key: K, value: V) {
        self.outbox.push((key, value));
    }
}

/// Runs "transform then aggregate by key" passes on a local worker pool.
///
/// Transform tasks run one per input partition; every emitted value is routed
/// by key into one of `partitions` inboxes, and one aggregate task per inbox
/// folds each key's values into an output record. The pass is bulk
/// synchronous: aggregation starts only after every transform task finished.
pub struct StageExecutor {
    pool: ThreadPool,
    parallelism: usize,
}

impl StageExecutor {
    pub fn new(parallelism: usize) -> RankFlowResult<Self> {
        let parallelism = parallelism.max(1);
        let pool = ThreadPoolBuilder::new()
            .num_threads(parallelism)
            .thread_name(|i| format!("rankflow-worker-{i}"))
            .build()
            .map_err(|e| RankFlowError::stage("executor", format!("thread pool: {e}")))?;
        Ok(Self { pool, parallelism })
    }

    pub fn parallelism(&self) -> usize {
        self.parallelism
    }

    pub fn run<T, K, V, R, F>(
        &self,
        input: PartitionedDataset<T>,
        function: &F,
        partitions: usize,
    ) -> RankFlowResult<PartitionedDataset<R>>
    where
        T: Send,
        K: Hash + Ord + Send,
        V: Send,
        R: Send,
        F: StageFunction<T, K, V, R>,
    {
        let start = Instant::now();
        let stage = function.name().to_string();
        let partitions = partitions.max(1);
        let records_in = input.len();

        let outboxes: Vec<Outbox<K, V>> = self.pool.install(|| {
            input
                .into_partitions()
                .into_par_iter()
                .map(|split| -> RankFlowResult<Outbox<K, V>> {
                    let mut ctx = WorkerContext { outbox: Vec::new() };
                    for record in split {
                        function.transform(record, &mut ctx)?;
                    }
                    Ok(ctx.outbox)
                })
                .collect::<RankFlowResult<Vec<_>>>()
        })?;

        let mut inboxes = new_inboxes(partitions);
        let mut shuffled: usize = 0;
        for outbox in outboxes {
            shuffled += outbox.len();
            HashShuffle.route_outbox(outbox, partitions, &mut inboxes);
        }

        let output: Vec<Vec<R>> = self.pool.install(|| {
            inboxes
                .into_par_iter()
                .map(|inbox| -> RankFlowResult<Vec<R>> {
                    let mut out = Vec::with_capacity(inbox.len());
                    for (key, values) in inbox {
                        if let Some(record) = function.aggregate(&key, &mut values.into_iter())? {
                            out.push(record);
                        }
                    }
                    Ok(out)
                })
                .collect::<RankFlowResult<Vec<_>>>()
        })?;

        let output = PartitionedDataset::from_partitions(output);
        debug!(
            stage = %stage,
            records_in,
            shuffled,
            records_out = output.len(),
            "stage pass finished"
        );
        metrics::counter!("rankflow_stage_records_in_total", "stage" => stage.clone())
            .increment(records_in as u64);
        metrics::counter!("rankflow_stage_shuffled_total", "stage" => stage.clone())
            .increment(shuffled as u64);
        metrics::counter!("rankflow_stage_records_out_total", "stage" => stage.clone())
            .increment(output.len() as u64);
        metrics::histogram!("rankflow_stage_duration_ms", "stage" => stage)
            .record(start.elapsed().as_secs_f64() * 1000.0);

        Ok(output)
    }
}
