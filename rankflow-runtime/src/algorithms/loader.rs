use crate::io::graph_input::{parse_graph_line, GraphLine, InputLine};
use rankflow_api::function::{StageFunction, TransformContext};
use rankflow_common::error::{RankFlowError, RankFlowResult};
use rankflow_common::types::{AdjacencyRankRecord, NodeId};

/// Input of the loader pass: a body line of the graph file, or a seed that
/// guarantees a record for a node id even when it has no outgoing edges.
#[derive(Debug, Clone)]
pub enum LoaderInput {
    Line(InputLine),
    Seed(NodeId),
}

/// Groups edges by source and emits one record per node in `[0, N)` with the
/// uniform initial rank `1/N`.
#[derive(Debug, Clone)]
pub struct GraphLoader {
    nodes_count: u64,
}

impl GraphLoader {
    pub fn new(nodes_count: u64) -> RankFlowResult<Self> {
        if nodes_count == 0 {
            return Err(RankFlowError::EmptyGraph(
                "nodes count in header is 0".to_string(),
            ));
        }
        Ok(Self { nodes_count })
    }

    pub fn initial_rank(&self) -> f64 {
        1.0 / self.nodes_count as f64
    }

    /// Body lines followed by one seed per node id.
    pub fn inputs(&self, lines: Vec<InputLine>) -> Vec<LoaderInput> {
        let mut out: Vec<LoaderInput> = lines.into_iter().map(LoaderInput::Line).collect();
        out.extend((0..self.nodes_count).map(LoaderInput::Seed));
        out
    }

    fn check_range(&self, id: NodeId, location: &str) -> RankFlowResult<()> {
        if id >= self.nodes_count {
            return Err(RankFlowError::unknown_node(
                id,
                format!(
                    "{location}: outside [0, {}) declared by the header",
                    self.nodes_count
                ),
            ));
        }
        Ok(())
    }
}

impl StageFunction<LoaderInput, NodeId, Option<NodeId>, AdjacencyRankRecord> for GraphLoader {
    fn name(&self) -> &str {
        "load-graph"
    }

    fn transform(
        &self,
        record: LoaderInput,
        context: &mut dyn TransformContext<NodeId, Option<NodeId>>,
    ) -> RankFlowResult<()> {
        match record {
            LoaderInput::Seed(id) => context.emit(id, None),
            LoaderInput::Line(line) => {
                if let GraphLine::Edge { src, dst } = parse_graph_line(&line.text, &line.location)?
                {
                    self.check_range(src, &line.location)?;
                    self.check_range(dst, &line.location)?;
                    context.emit(src, Some(dst));
                }
            }
        }
        Ok(())
    }

    fn aggregate(
        &self,
        key: &NodeId,
        values: &mut dyn Iterator<Item = Option<NodeId>>,
    ) -> RankFlowResult<Option<AdjacencyRankRecord>> {
        let edges: Vec<NodeId> = values.flatten().collect();
        Ok(Some(AdjacencyRankRecord::new(
            *key,
            self.initial_rank(),
            edges,
        )))
    }
}
