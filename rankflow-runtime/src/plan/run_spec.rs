use rankflow_common::config::{keys, Configuration};
use rankflow_common::error::{RankFlowError, RankFlowResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

pub const DEFAULT_DAMPING_FACTOR: f64 = 0.85;
pub const DEFAULT_MAX_ROUNDS: u64 = 5;
pub const DEFAULT_CONVERGENCE_THRESHOLD: f64 = 0.01;
pub const DEFAULT_PARALLELISM: usize = 4;

/// What happens to the rank held by nodes without outgoing edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DanglingPolicy {
    /// The mass leaves the system each round.
    #[default]
    Drop,
    /// The mass is spread uniformly over all nodes.
    Redistribute,
}

impl fmt::Display for DanglingPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DanglingPolicy::Drop => f.write_str("drop"),
            DanglingPolicy::Redistribute => f.write_str("redistribute"),
        }
    }
}

impl FromStr for DanglingPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "drop" => Ok(DanglingPolicy::Drop),
            "redistribute" => Ok(DanglingPolicy::Redistribute),
            other => Err(format!("unknown dangling policy `{other}`")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSpec {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub graph_data_path: PathBuf,
    pub damping_factor: f64,
    pub max_rounds: u64,
    pub convergence_threshold: f64,
    pub delete_prior_output: bool,
    pub show_results: bool,
    pub parallelism: usize,
    pub dangling_policy: DanglingPolicy,
}

impl RunSpec {
    pub fn new(
        input_path: impl Into<PathBuf>,
        output_path: impl Into<PathBuf>,
        graph_data_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            input_path: input_path.into(),
            output_path: output_path.into(),
            graph_data_path: graph_data_path.into(),
            damping_factor: DEFAULT_DAMPING_FACTOR,
            max_rounds: DEFAULT_MAX_ROUNDS,
            convergence_threshold: DEFAULT_CONVERGENCE_THRESHOLD,
            delete_prior_output: false,
            show_results: false,
            parallelism: DEFAULT_PARALLELISM,
            dangling_policy: DanglingPolicy::Drop,
        }
    }

    pub fn from_configuration(config: &Configuration) -> RankFlowResult<Self> {
        let spec = Self {
            input_path: config.require_string(keys::INPUT_PATH)?.into(),
            output_path: config.require_string(keys::OUTPUT_PATH)?.into(),
            graph_data_path: config.require_string(keys::GRAPH_PATH)?.into(),
            damping_factor: config.get_f64(keys::DAMPING_FACTOR, DEFAULT_DAMPING_FACTOR)?,
            max_rounds: config.get_u64(keys::MAX_ROUNDS, DEFAULT_MAX_ROUNDS)?,
            convergence_threshold: config.get_f64(
                keys::CONVERGENCE_THRESHOLD,
                DEFAULT_CONVERGENCE_THRESHOLD,
            )?,
            delete_prior_output: config.get_bool(keys::DELETE_OUTPUT, false)?,
            show_results: config.get_bool(keys::SHOW_RESULTS, false)?,
            parallelism: config.get_usize(keys::PARALLELISM, DEFAULT_PARALLELISM)?,
            dangling_policy: match config.get(keys::DANGLING_POLICY) {
                Some(raw) => raw.parse().map_err(RankFlowError::Configuration)?,
                None => DanglingPolicy::Drop,
            },
        };
        spec.validate()?;
        Ok(spec)
    }

    pub fn validate(&self) -> RankFlowResult<()> {
        for (name, path) in [
            ("input path", &self.input_path),
            ("output path", &self.output_path),
            ("graph data path", &self.graph_data_path),
        ] {
            if path.as_os_str().is_empty() {
                return Err(RankFlowError::Configuration(format!("{name} is empty")));
            }
        }
        if !self.damping_factor.is_finite()
            || self.damping_factor <= 0.0
            || self.damping_factor >= 1.0
        {
            return Err(RankFlowError::Configuration(format!(
                "damping factor must be in (0, 1), got {}",
                self.damping_factor
            )));
        }
        if !self.convergence_threshold.is_finite() || self.convergence_threshold < 0.0 {
            return Err(RankFlowError::Configuration(format!(
                "convergence threshold must be finite and >= 0, got {}",
                self.convergence_threshold
            )));
        }
        if self.parallelism == 0 {
            return Err(RankFlowError::Configuration(
                "parallelism must be >= 1".to_string(),
            ));
        }
        Ok(())
    }
}
