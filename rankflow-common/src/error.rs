use thiserror::Error;

pub type RankFlowResult<T> = Result<T, RankFlowError>;

#[derive(Debug, Error)]
pub enum RankFlowError {
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("malformed input at {location}: {reason}")]
    MalformedInput { location: String, reason: String },

    #[error("empty graph: {0}")]
    EmptyGraph(String),

    #[error("unknown node {node_id}: {reason}")]
    UnknownNode { node_id: u64, reason: String },

    #[error("missing output: {0}")]
    MissingOutput(String),

    #[error("stage {stage} failed: {message}")]
    StageExecution { stage: String, message: String },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl RankFlowError {
    pub fn malformed(location: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedInput {
            location: location.into(),
            reason: reason.into(),
        }
    }

    pub fn unknown_node(node_id: u64, reason: impl Into<String>) -> Self {
        Self::UnknownNode {
            node_id,
            reason: reason.into(),
        }
    }

    pub fn stage(stage: impl Into<String>, message: impl Into<String>) -> Self {
        Self::StageExecution {
            stage: stage.into(),
            message: message.into(),
        }
    }
}
