use rankflow_api::function::{StageFunction, TransformContext};
use rankflow_common::error::RankFlowResult;
use rankflow_common::types::{AdjacencyRankRecord, NodeId, RankedEntry};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Sort key of the final ranking: rank descending, then node id ascending.
#[derive(Debug, Clone, Copy)]
pub struct RankOrder {
    pub rank: f64,
    pub node_id: NodeId,
}

impl RankOrder {
    pub fn new(rank: f64, node_id: NodeId) -> Self {
        Self { rank, node_id }
    }
}

impl Ord for RankOrder {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .rank
            .total_cmp(&self.rank)
            .then_with(|| self.node_id.cmp(&other.node_id))
    }
}

impl PartialOrd for RankOrder {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for RankOrder {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for RankOrder {}

impl Hash for RankOrder {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.rank.to_bits().hash(state);
        self.node_id.hash(state);
    }
}

/// Orders the final round by [`RankOrder`] and attaches external labels.
///
/// Must run with a single aggregate partition so the output is one globally
/// sorted list.
#[derive(Debug, Clone)]
pub struct Ranker {
    labels: Arc<HashMap<NodeId, String>>,
}

impl Ranker {
    pub fn new(labels: HashMap<NodeId, String>) -> Self {
        Self {
            labels: Arc::new(labels),
        }
    }

    pub fn label_of(&self, node_id: NodeId) -> String {
        self.labels
            .get(&node_id)
            .cloned()
            .unwrap_or_else(|| node_id.to_string())
    }
}

impl StageFunction<AdjacencyRankRecord, RankOrder, (), RankedEntry> for Ranker {
    fn name(&self) -> &str {
        "rank-nodes"
    }

    fn transform(
        &self,
        record: AdjacencyRankRecord,
        context: &mut dyn TransformContext<RankOrder, ()>,
    ) -> RankFlowResult<()> {
        context.emit(RankOrder::new(record.rank, record.node_id), ());
        Ok(())
    }

    fn aggregate(
        &self,
        key: &RankOrder,
        _values: &mut dyn Iterator<Item = ()>,
    ) -> RankFlowResult<Option<RankedEntry>> {
        Ok(Some(RankedEntry::new(
            key.node_id,
            self.label_of(key.node_id),
            key.rank,
        )))
    }
}
