use rankflow_api::pipeline::PipelineResult;
use rankflow_common::error::{RankFlowError, RankFlowResult};
use std::io::Write;
use tracing::{error, info, warn};

use crate::dataset::StageExecutor;
use crate::io::file::read_ranking;
use crate::io::graph_input::read_header;
use crate::io::storage::{LocalFileSystem, Storage};
use crate::plan::execution_plan::ExecutionPlan;
use crate::plan::run_spec::RunSpec;
use crate::scheduler::convergence_driver::{ConvergenceDriver, StageFailure};
use crate::state::RunSummary;

#[derive(Debug, Clone)]
pub struct JobReport {
    pub result: PipelineResult,
    pub summary: Option<RunSummary>,
}

/// One full PageRank run: output preparation, graph loading, propagation
/// rounds and the final ranking.
pub struct RankJob<S = LocalFileSystem> {
    spec: RunSpec,
    plan: ExecutionPlan,
    storage: S,
}

impl RankJob<LocalFileSystem> {
    pub fn local(spec: RunSpec) -> RankFlowResult<Self> {
        Self::new(spec, LocalFileSystem)
    }
}

impl<S: Storage> RankJob<S> {
    pub fn new(spec: RunSpec, storage: S) -> RankFlowResult<Self> {
        spec.validate()?;
        let plan = ExecutionPlan::from_run_spec(&spec);
        Ok(Self {
            spec,
            plan,
            storage,
        })
    }

    pub fn spec(&self) -> &RunSpec {
        &self.spec
    }

    pub fn plan(&self) -> &ExecutionPlan {
        &self.plan
    }

    pub fn execute(&self) -> JobReport {
        match self.try_execute() {
            Ok(summary) => JobReport {
                result: PipelineResult::success(),
                summary: Some(summary),
            },
            Err(failure) => {
                error!(stage = %failure.stage, error = %failure.source, "run failed");
                JobReport {
                    result: PipelineResult::failure(failure.to_string()),
                    summary: None,
                }
            }
        }
    }

    fn try_execute(&self) -> Result<RunSummary, StageFailure> {
        self.prepare_output()
            .map_err(|e| StageFailure::new("prepare output", e))?;

        let header = read_header(&self.storage, &self.spec.graph_data_path)
            .map_err(|e| StageFailure::new("read header", e))?;
        info!("Nodes count: {}", header.nodes_count);

        let executor = StageExecutor::new(self.spec.parallelism)
            .map_err(|e| StageFailure::new("start executor", e))?;
        let driver = ConvergenceDriver::new(
            &self.spec,
            &self.plan,
            &self.storage,
            &executor,
            header.nodes_count,
        );

        let records = driver.load_graph()?;
        info!(records, "round 0 written");
        let report = driver.run()?;

        let summary = RunSummary {
            nodes_count: header.nodes_count,
            final_round: report.final_round,
            last_diff: report.last_diff,
            termination: report.termination,
            spec: self.spec.clone(),
        };
        summary
            .write_json(self.plan.summary_path())
            .map_err(|e| StageFailure::new("write summary", e))?;
        info!(
            final_round = summary.final_round,
            ranking = %self.plan.ranking_dir().display(),
            "ranking published"
        );
        Ok(summary)
    }

    fn prepare_output(&self) -> RankFlowResult<()> {
        let output = &self.spec.output_path;
        if self.spec.delete_prior_output && self.storage.exists(output) {
            warn!(output = %output.display(), "deleting prior output");
            self.storage.delete_recursive(output)?;
        }
        let round0 = self.plan.round_dir(0);
        if self.storage.exists(&round0) {
            return Err(RankFlowError::Configuration(format!(
                "{} already exists; enable output deletion to overwrite it",
                round0.display()
            )));
        }
        Ok(())
    }

    /// Prints the published ranking to standard output.
    pub fn show_results(&self) -> RankFlowResult<()> {
        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        self.write_results(&mut out)?;
        out.flush()?;
        Ok(())
    }

    /// Writes the published ranking as `label\trank` lines, or a notice when
    /// there is none.
    pub fn write_results<W: Write>(&self, out: &mut W) -> RankFlowResult<()> {
        let ranking = self.plan.ranking_dir();
        if !self.storage.exists(&ranking) {
            warn!(ranking = %ranking.display(), "no ranking to show");
            writeln!(out, "The ranking at {} doesn't exist.", ranking.display())?;
            return Ok(());
        }
        for (label, rank) in read_ranking(&self.storage, &ranking)? {
            writeln!(out, "{label}\t{rank}")?;
        }
        Ok(())
    }
}
