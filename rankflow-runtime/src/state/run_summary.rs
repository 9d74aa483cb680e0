use crate::plan::run_spec::RunSpec;
use rankflow_common::error::{RankFlowError, RankFlowResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Termination {
    Converged,
    BudgetExhausted,
}

/// Written next to the round outputs once the ranking is published.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub nodes_count: u64,
    pub final_round: u64,
    pub last_diff: Option<f64>,
    pub termination: Termination,
    pub spec: RunSpec,
}

impl RunSummary {
    pub fn write_json(&self, path: impl AsRef<Path>) -> RankFlowResult<()> {
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)?;
        }
        let s = serde_json::to_string_pretty(self)
            .map_err(|e| RankFlowError::stage("summary", format!("{e}")))?;
        std::fs::write(path, s)?;
        Ok(())
    }

    pub fn read_json(path: impl AsRef<Path>) -> RankFlowResult<Self> {
        let path = path.as_ref();
        let s = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                RankFlowError::MissingOutput(format!("{} does not exist", path.display()))
            } else {
                RankFlowError::Io(e)
            }
        })?;
        serde_json::from_str(&s)
            .map_err(|e| RankFlowError::malformed(path.display().to_string(), format!("{e}")))
    }
}
