use crate::error::{RankFlowError, RankFlowResult};
use std::fmt;

pub type NodeId = u64;

/// One node's state between rounds: its current rank and its outgoing edges.
///
/// The text form is `<id>\t<rank>,<dst1>,<dst2>,...`; a node without outgoing
/// edges is written as `<id>\t<rank>`.
#[derive(Debug, Clone, PartialEq)]
pub struct AdjacencyRankRecord {
    pub node_id: NodeId,
    pub rank: f64,
    pub edges: Vec<NodeId>,
}

impl AdjacencyRankRecord {
    pub fn new(node_id: NodeId, rank: f64, edges: Vec<NodeId>) -> Self {
        Self {
            node_id,
            rank,
            edges,
        }
    }

    pub fn out_degree(&self) -> usize {
        self.edges.len()
    }

    pub fn is_dangling(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn key_field(&self) -> String {
        self.node_id.to_string()
    }

    pub fn value_field(&self) -> String {
        let mut out = self.rank.to_string();
        for dst in &self.edges {
            out.push(',');
            out.push_str(&dst.to_string());
        }
        out
    }

    /// Rebuilds a record from its key and value fields. `location` names the
    /// source line in error messages.
    pub fn from_fields(key: &str, value: &str, location: &str) -> RankFlowResult<Self> {
        let node_id = parse_node_id(key.trim(), location)?;
        let mut parts = value.trim().split(',');
        let rank_raw = parts.next().unwrap_or_default();
        let rank: f64 = rank_raw.trim().parse().map_err(|e| {
            RankFlowError::malformed(location, format!("rank `{rank_raw}` parse: {e}"))
        })?;
        if !rank.is_finite() {
            return Err(RankFlowError::malformed(
                location,
                format!("rank `{rank_raw}` is not finite"),
            ));
        }
        let edges = parts
            .map(|d| parse_node_id(d.trim(), location))
            .collect::<RankFlowResult<Vec<_>>>()?;
        Ok(Self::new(node_id, rank, edges))
    }

    pub fn parse_line(line: &str, location: &str) -> RankFlowResult<Self> {
        let (key, value) = line.split_once('\t').ok_or_else(|| {
            RankFlowError::malformed(location, "expected `<id>\\t<rank>[,<dst>...]`")
        })?;
        Self::from_fields(key, value, location)
    }
}

impl fmt::Display for AdjacencyRankRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\t{}", self.key_field(), self.value_field())
    }
}

pub fn parse_node_id(raw: &str, location: &str) -> RankFlowResult<NodeId> {
    raw.parse()
        .map_err(|e| RankFlowError::malformed(location, format!("node id `{raw}` parse: {e}")))
}

#[derive(Debug, Clone, PartialEq)]
pub struct RankedEntry {
    pub node_id: NodeId,
    pub label: String,
    pub rank: f64,
}

impl RankedEntry {
    pub fn new(node_id: NodeId, label: impl Into<String>, rank: f64) -> Self {
        Self {
            node_id,
            label: label.into(),
            rank,
        }
    }
}

impl fmt::Display for RankedEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\t{}", self.label, self.rank)
    }
}
