use crate::io::storage::Storage;
use rankflow_common::error::{RankFlowError, RankFlowResult};
use rankflow_common::types::{parse_node_id, NodeId};
use std::collections::HashMap;
use std::io::BufRead;
use std::path::Path;

const LABEL_KEYWORD: &str = "label";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GraphHeader {
    pub nodes_count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphLine {
    Edge { src: NodeId, dst: NodeId },
    Label { node_id: NodeId, text: String },
    Blank,
}

/// A body line of a graph file together with its `file:line` position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputLine {
    pub location: String,
    pub text: String,
}

fn is_skippable(line: &str) -> bool {
    let t = line.trim();
    t.is_empty() || t.starts_with('#')
}

pub fn parse_header(line: &str, location: &str) -> RankFlowResult<GraphHeader> {
    let first = line
        .split_whitespace()
        .next()
        .ok_or_else(|| RankFlowError::malformed(location, "empty header line"))?;
    let nodes_count: u64 = first.parse().map_err(|e| {
        RankFlowError::malformed(location, format!("nodes count `{first}` parse: {e}"))
    })?;
    Ok(GraphHeader { nodes_count })
}

/// Parses a body line: `<src> <dst>`, `label <id> <text...>`, or a blank or
/// `#` comment line.
pub fn parse_graph_line(line: &str, location: &str) -> RankFlowResult<GraphLine> {
    if is_skippable(line) {
        return Ok(GraphLine::Blank);
    }
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens[0] == LABEL_KEYWORD {
        if tokens.len() < 3 {
            return Err(RankFlowError::malformed(
                location,
                "expected `label <id> <text>`",
            ));
        }
        let node_id = parse_node_id(tokens[1], location)?;
        return Ok(GraphLine::Label {
            node_id,
            text: tokens[2..].join(" "),
        });
    }
    if tokens.len() != 2 {
        return Err(RankFlowError::malformed(
            location,
            format!("expected `<src> <dst>`, found {} tokens", tokens.len()),
        ));
    }
    Ok(GraphLine::Edge {
        src: parse_node_id(tokens[0], location)?,
        dst: parse_node_id(tokens[1], location)?,
    })
}

/// Reads the header of the graph data file.
pub fn read_header<S: Storage + ?Sized>(
    storage: &S,
    path: impl AsRef<Path>,
) -> RankFlowResult<GraphHeader> {
    let path = path.as_ref();
    let reader = storage.open(path)?;
    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        if is_skippable(&line) {
            continue;
        }
        return parse_header(&line, &format!("{}:{}", path.display(), i + 1));
    }
    Err(RankFlowError::EmptyGraph(format!(
        "{} has no header line",
        path.display()
    )))
}

/// Splits a location into its header and body lines. The first line that is
/// neither blank nor a comment, across all data files in read order, is the
/// header; every later line of every file is body.
fn read_body<S: Storage + ?Sized>(
    storage: &S,
    path: &Path,
) -> RankFlowResult<(GraphHeader, String, Vec<InputLine>)> {
    let mut header: Option<(GraphHeader, String)> = None;
    let mut out = Vec::new();
    for file in storage.list_files(path)? {
        for (i, line) in storage.open(&file)?.lines().enumerate() {
            let line = line?;
            let location = format!("{}:{}", file.display(), i + 1);
            if header.is_none() {
                if !is_skippable(&line) {
                    header = Some((parse_header(&line, &location)?, location));
                }
                continue;
            }
            out.push(InputLine {
                location,
                text: line,
            });
        }
    }
    let (header, location) = header.ok_or_else(|| {
        RankFlowError::EmptyGraph(format!("{} has no header line", path.display()))
    })?;
    Ok((header, location, out))
}

/// Reads the body lines of the loader input. Its header must declare the same
/// node count as the graph data file.
pub fn read_input_lines<S: Storage + ?Sized>(
    storage: &S,
    path: impl AsRef<Path>,
    nodes_count: u64,
) -> RankFlowResult<Vec<InputLine>> {
    let (header, location, lines) = read_body(storage, path.as_ref())?;
    if header.nodes_count != nodes_count {
        return Err(RankFlowError::malformed(
            location,
            format!(
                "header declares {} nodes, graph data declares {nodes_count}",
                header.nodes_count
            ),
        ));
    }
    Ok(lines)
}

/// Collects the `label` lines of the graph data file. Later lines win.
pub fn read_labels<S: Storage + ?Sized>(
    storage: &S,
    path: impl AsRef<Path>,
) -> RankFlowResult<HashMap<NodeId, String>> {
    let (_, _, lines) = read_body(storage, path.as_ref())?;
    let mut labels = HashMap::new();
    for line in lines {
        if let GraphLine::Label { node_id, text } = parse_graph_line(&line.text, &line.location)? {
            labels.insert(node_id, text);
        }
    }
    Ok(labels)
}
