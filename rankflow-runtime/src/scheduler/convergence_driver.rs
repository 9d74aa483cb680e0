use crate::algorithms::loader::GraphLoader;
use crate::algorithms::propagator::{dangling_mass, PropagatorConfig, RankPropagator};
use crate::algorithms::ranker::Ranker;
use crate::dataset::{PartitionedDataset, StageExecutor};
use crate::io::file::{read_rank_records, write_rank_records, write_ranking};
use crate::io::graph_input::{read_input_lines, read_labels};
use crate::io::storage::Storage;
use crate::plan::execution_plan::ExecutionPlan;
use crate::plan::run_spec::{DanglingPolicy, RunSpec};
use crate::state::{RankTable, Termination};
use rankflow_common::error::{RankFlowError, RankFlowResult};
use thiserror::Error;
use tracing::{info, warn};

/// A stage error tagged with the stage that raised it.
#[derive(Debug, Error)]
#[error("stage {stage} failed: {source}")]
pub struct StageFailure {
    pub stage: String,
    pub source: RankFlowError,
}

impl StageFailure {
    pub fn new(stage: impl Into<String>, source: RankFlowError) -> Self {
        Self {
            stage: stage.into(),
            source,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DriverReport {
    pub final_round: u64,
    pub last_diff: Option<f64>,
    pub termination: Termination,
}

#[derive(Debug)]
enum State {
    Init,
    Iterating {
        round: u64,
        last_ranks: RankTable,
        last_diff: Option<f64>,
    },
    Converged {
        final_round: u64,
        diff: f64,
    },
    BudgetExhausted {
        final_round: u64,
        last_diff: Option<f64>,
    },
    Finalizing {
        final_round: u64,
        last_diff: Option<f64>,
        termination: Termination,
    },
    Done(DriverReport),
}

/// Runs the loader once, then propagation rounds until the L1 diff between
/// two consecutive rounds drops below the threshold or `max_rounds` rounds
/// have run, then the ranker on the last completed round.
///
/// Every round is written to storage and read back before the next one
/// starts; a completed round is never run again.
pub struct ConvergenceDriver<'a, S: Storage + ?Sized> {
    spec: &'a RunSpec,
    plan: &'a ExecutionPlan,
    storage: &'a S,
    executor: &'a StageExecutor,
    nodes_count: u64,
}

impl<'a, S: Storage + ?Sized> ConvergenceDriver<'a, S> {
    pub fn new(
        spec: &'a RunSpec,
        plan: &'a ExecutionPlan,
        storage: &'a S,
        executor: &'a StageExecutor,
        nodes_count: u64,
    ) -> Self {
        Self {
            spec,
            plan,
            storage,
            executor,
            nodes_count,
        }
    }

    /// Stage 1: writes round 0 from the raw edge list.
    pub fn load_graph(&self) -> Result<usize, StageFailure> {
        info!(input = %self.spec.input_path.display(), "loading graph");
        self.run_loader()
            .map_err(|e| StageFailure::new("load graph", e))
    }

    fn run_loader(&self) -> RankFlowResult<usize> {
        let loader = GraphLoader::new(self.nodes_count)?;
        let lines = read_input_lines(self.storage, &self.spec.input_path, self.nodes_count)?;
        let input = PartitionedDataset::split(loader.inputs(lines), self.executor.parallelism());
        let output = self.executor.run(input, &loader, self.plan.partitions)?;
        if output.iter().all(|r| r.is_dangling()) {
            warn!(input = %self.spec.input_path.display(), "graph has no edges");
        }
        write_rank_records(self.storage, self.plan.round_dir(0), &output)?;
        Ok(output.len())
    }

    pub fn run(&self) -> Result<DriverReport, StageFailure> {
        let mut state = State::Init;
        loop {
            state = match state {
                State::Init => {
                    let last_ranks = RankTable::load(self.storage, self.plan.round_dir(0))
                        .map_err(|e| StageFailure::new("read round 0", e))?;
                    info!(nodes = last_ranks.len(), "round 0 loaded");
                    State::Iterating {
                        round: 0,
                        last_ranks,
                        last_diff: None,
                    }
                }
                State::Iterating {
                    round,
                    last_ranks,
                    last_diff,
                } => {
                    if round >= self.plan.max_rounds {
                        State::BudgetExhausted {
                            final_round: round,
                            last_diff,
                        }
                    } else {
                        let next = round + 1;
                        self.propagate(round)
                            .map_err(|e| StageFailure::new(format!("propagate round {next}"), e))?;
                        let new_ranks = RankTable::load(self.storage, self.plan.round_dir(next))
                            .map_err(|e| StageFailure::new(format!("read round {next}"), e))?;
                        let diff = new_ranks.l1_diff(&last_ranks);
                        info!(
                            total_mass = new_ranks.total_mass(),
                            "Run #{next} finished (score diff: {diff})"
                        );
                        metrics::counter!("rankflow_rounds_total").increment(1);
                        metrics::gauge!("rankflow_round_diff").set(diff);

                        if diff < self.spec.convergence_threshold {
                            State::Converged {
                                final_round: next,
                                diff,
                            }
                        } else {
                            State::Iterating {
                                round: next,
                                last_ranks: new_ranks,
                                last_diff: Some(diff),
                            }
                        }
                    }
                }
                State::Converged { final_round, diff } => {
                    info!(final_round, diff, "converged");
                    State::Finalizing {
                        final_round,
                        last_diff: Some(diff),
                        termination: Termination::Converged,
                    }
                }
                State::BudgetExhausted {
                    final_round,
                    last_diff,
                } => {
                    info!(final_round, "round budget exhausted");
                    State::Finalizing {
                        final_round,
                        last_diff,
                        termination: Termination::BudgetExhausted,
                    }
                }
                State::Finalizing {
                    final_round,
                    last_diff,
                    termination,
                } => {
                    self.finalize(final_round)
                        .map_err(|e| StageFailure::new("rank nodes", e))?;
                    State::Done(DriverReport {
                        final_round,
                        last_diff,
                        termination,
                    })
                }
                State::Done(report) => return Ok(report),
            };
        }
    }

    fn propagate(&self, round: u64) -> RankFlowResult<()> {
        let records = read_rank_records(self.storage, self.plan.round_dir(round))?;
        let input = PartitionedDataset::split(records, self.executor.parallelism());
        let dangling = match self.spec.dangling_policy {
            DanglingPolicy::Drop => 0.0,
            DanglingPolicy::Redistribute => dangling_mass(&input),
        };
        let propagator = RankPropagator::new(PropagatorConfig {
            damping_factor: self.spec.damping_factor,
            nodes_count: self.nodes_count,
            dangling_mass: dangling,
        });
        let output = self.executor.run(input, &propagator, self.plan.partitions)?;
        write_rank_records(self.storage, self.plan.round_dir(round + 1), &output)
    }

    fn finalize(&self, round: u64) -> RankFlowResult<()> {
        info!(round, "ranking nodes");
        let records = read_rank_records(self.storage, self.plan.round_dir(round))?;
        let ranker = Ranker::new(read_labels(self.storage, &self.spec.graph_data_path)?);
        let input = PartitionedDataset::split(records, self.executor.parallelism());
        // one aggregate partition gives a single, globally ordered part file
        let output = self.executor.run(input, &ranker, 1)?;
        write_ranking(self.storage, self.plan.ranking_dir(), &output)
    }
}
