use crate::error::{RankFlowError, RankFlowResult};
use std::collections::HashMap;
use std::str::FromStr;

pub mod keys {
    pub const INPUT_PATH: &str = "rankflow.input.path";
    pub const OUTPUT_PATH: &str = "rankflow.output.path";
    pub const GRAPH_PATH: &str = "rankflow.graph.path";
    pub const DAMPING_FACTOR: &str = "rankflow.damping.factor";
    pub const MAX_ROUNDS: &str = "rankflow.max.rounds";
    pub const CONVERGENCE_THRESHOLD: &str = "rankflow.convergence.threshold";
    pub const DELETE_OUTPUT: &str = "rankflow.output.delete";
    pub const SHOW_RESULTS: &str = "rankflow.show.results";
    pub const PARALLELISM: &str = "rankflow.parallelism";
    pub const DANGLING_POLICY: &str = "rankflow.dangling.policy";
}

#[derive(Debug, Clone, Default)]
pub struct Configuration {
    config: HashMap<String, String>,
}

impl Configuration {
    pub fn new() -> Self {
        Self {
            config: HashMap::new(),
        }
    }

    pub fn put(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.config.insert(key.into(), value.into());
    }

    /// Applies a `key=value` override, as accepted on the command line.
    pub fn put_assignment(&mut self, assignment: &str) -> RankFlowResult<()> {
        let (key, value) = assignment.split_once('=').ok_or_else(|| {
            RankFlowError::Configuration(format!("expected key=value, got `{assignment}`"))
        })?;
        let key = key.trim();
        if key.is_empty() {
            return Err(RankFlowError::Configuration(format!(
                "empty key in `{assignment}`"
            )));
        }
        self.put(key, value.trim());
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&String> {
        self.config.get(key)
    }

    pub fn require_string(&self, key: &str) -> RankFlowResult<String> {
        match self.config.get(key) {
            Some(v) if !v.trim().is_empty() => Ok(v.clone()),
            _ => Err(RankFlowError::Configuration(format!("missing `{key}`"))),
        }
    }

    pub fn get_f64(&self, key: &str, default_value: f64) -> RankFlowResult<f64> {
        self.parse_or(key, default_value)
    }

    pub fn get_u64(&self, key: &str, default_value: u64) -> RankFlowResult<u64> {
        self.parse_or(key, default_value)
    }

    pub fn get_usize(&self, key: &str, default_value: usize) -> RankFlowResult<usize> {
        self.parse_or(key, default_value)
    }

    pub fn get_bool(&self, key: &str, default_value: bool) -> RankFlowResult<bool> {
        self.parse_or(key, default_value)
    }

    fn parse_or<T>(&self, key: &str, default_value: T) -> RankFlowResult<T>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        match self.config.get(key) {
            None => Ok(default_value),
            Some(raw) => raw.trim().parse().map_err(|e| {
                RankFlowError::Configuration(format!("invalid value `{raw}` for `{key}`: {e}"))
            }),
        }
    }
}
