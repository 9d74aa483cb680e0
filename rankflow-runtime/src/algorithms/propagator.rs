use crate::dataset::PartitionedDataset;
use rankflow_api::function::{StageFunction, TransformContext};
use rankflow_common::error::{RankFlowError, RankFlowResult};
use rankflow_common::types::{AdjacencyRankRecord, NodeId};

/// What a node sends under a key during propagation.
#[derive(Debug, Clone, PartialEq)]
pub enum RankMessage {
    /// Share of the sender's rank, `rank / out_degree`.
    Mass(f64),
    /// The keyed node's own edge list, carried into the next round.
    Structure(Vec<NodeId>),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PropagatorConfig {
    pub damping_factor: f64,
    pub nodes_count: u64,
    /// Rank held by dangling nodes that is spread uniformly over all nodes.
    /// Zero keeps the lossy formula.
    pub dangling_mass: f64,
}

/// Sum of the ranks of records without outgoing edges.
pub fn dangling_mass(records: &PartitionedDataset<AdjacencyRankRecord>) -> f64 {
    records
        .iter()
        .filter(|r| r.is_dangling())
        .map(|r| r.rank)
        .sum()
}

#[derive(Debug, Clone)]
pub struct RankPropagator {
    config: PropagatorConfig,
}

impl RankPropagator {
    pub fn new(config: PropagatorConfig) -> Self {
        Self { config }
    }

    /// `(1 - d) / N + d * (incoming + dangling / N)`
    pub fn new_rank(&self, incoming: f64) -> f64 {
        let d = self.config.damping_factor;
        let n = self.config.nodes_count as f64;
        (1.0 - d) / n + d * (incoming + self.config.dangling_mass / n)
    }
}

impl StageFunction<AdjacencyRankRecord, NodeId, RankMessage, AdjacencyRankRecord>
    for RankPropagator
{
    fn name(&self) -> &str {
        "propagate-ranks"
    }

    fn transform(
        &self,
        record: AdjacencyRankRecord,
        context: &mut dyn TransformContext<NodeId, RankMessage>,
    ) -> RankFlowResult<()> {
        if record.node_id >= self.config.nodes_count {
            return Err(RankFlowError::unknown_node(
                record.node_id,
                format!("outside [0, {})", self.config.nodes_count),
            ));
        }
        if !record.is_dangling() {
            let share = record.rank / record.out_degree() as f64;
            for dst in &record.edges {
                context.emit(*dst, RankMessage::Mass(share));
            }
        }
        context.emit(record.node_id, RankMessage::Structure(record.edges));
        Ok(())
    }

    fn aggregate(
        &self,
        key: &NodeId,
        values: &mut dyn Iterator<Item = RankMessage>,
    ) -> RankFlowResult<Option<AdjacencyRankRecord>> {
        let mut incoming = 0.0;
        let mut structure: Option<Vec<NodeId>> = None;
        for msg in values {
            match msg {
                RankMessage::Mass(m) => incoming += m,
                RankMessage::Structure(edges) => {
                    if structure.is_some() {
                        return Err(RankFlowError::malformed(
                            format!("node {key}"),
                            "more than one adjacency record in the round",
                        ));
                    }
                    structure = Some(edges);
                }
            }
        }
        let edges = structure.ok_or_else(|| {
            RankFlowError::unknown_node(*key, "referenced as a destination but has no record")
        })?;
        Ok(Some(AdjacencyRankRecord::new(
            *key,
            self.new_rank(incoming),
            edges,
        )))
    }
}
