use rankflow_common::error::RankFlowResult;

#[derive(Debug, Clone)]
pub struct PipelineResult {
    pub success: bool,
    pub error_message: Option<String>,
}

impl PipelineResult {
    pub fn success() -> Self {
        Self {
            success: true,
            error_message: None,
        }
    }

    pub fn failure(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            error_message: Some(msg.into()),
        }
    }

    pub fn from_stage<T>(stage: &str, result: &RankFlowResult<T>) -> Self {
        match result {
            Ok(_) => Self::success(),
            Err(e) => Self::failure(format!("stage {stage} failed: {e}")),
        }
    }

    /// Logical AND of two results; the first failure message wins.
    pub fn and(self, other: PipelineResult) -> Self {
        if !self.success {
            return self;
        }
        other
    }
}
