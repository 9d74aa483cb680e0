use crate::plan::run_spec::RunSpec;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Where every stage of a run reads and writes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionPlan {
    pub output_dir: PathBuf,
    pub partitions: usize,
    pub max_rounds: u64,
}

impl ExecutionPlan {
    pub fn from_run_spec(spec: &RunSpec) -> Self {
        Self {
            output_dir: spec.output_path.clone(),
            partitions: spec.parallelism.max(1),
            max_rounds: spec.max_rounds,
        }
    }

    pub fn round_dir(&self, round: u64) -> PathBuf {
        self.output_dir.join(format!("ranks{round}"))
    }

    pub fn ranking_dir(&self) -> PathBuf {
        self.output_dir.join("ranking")
    }

    pub fn summary_path(&self) -> PathBuf {
        self.output_dir.join("_summary.json")
    }
}
