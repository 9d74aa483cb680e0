use crate::io::file::read_rank_records;
use crate::io::storage::Storage;
use rankflow_common::error::RankFlowResult;
use rankflow_common::types::{AdjacencyRankRecord, NodeId};
use std::collections::HashMap;
use std::path::Path;

/// Node id to rank for one round, held fully in memory.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RankTable {
    ranks: HashMap<NodeId, f64>,
}

impl RankTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a AdjacencyRankRecord>) -> Self {
        let ranks = records.into_iter().map(|r| (r.node_id, r.rank)).collect();
        Self { ranks }
    }

    pub fn load<S: Storage + ?Sized>(storage: &S, location: impl AsRef<Path>) -> RankFlowResult<Self> {
        let records = read_rank_records(storage, location)?;
        Ok(Self::from_records(&records))
    }

    pub fn insert(&mut self, node_id: NodeId, rank: f64) {
        self.ranks.insert(node_id, rank);
    }

    pub fn get(&self, node_id: NodeId) -> Option<f64> {
        self.ranks.get(&node_id).copied()
    }

    pub fn len(&self) -> usize {
        self.ranks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranks.is_empty()
    }

    pub fn total_mass(&self) -> f64 {
        self.ranks.values().sum()
    }

    /// L1 distance from `self` (the newer round) to `last`.
    ///
    /// Only keys of `self` are visited; a key missing from `last` counts as 0
    /// there, and keys present only in `last` are ignored.
    pub fn l1_diff(&self, last: &RankTable) -> f64 {
        self.ranks
            .iter()
            .map(|(k, v)| (v - last.get(*k).unwrap_or(0.0)).abs())
            .sum()
    }
}
