use super::PipelineResult;
use crate::lexical::NodeCounts;
use crate::tree::SerializedNode;
use serde::Serialize;

/// JSON form of a pipeline run
#[derive(Debug, Serialize)]
pub struct PipelineOutput {
    pub file: String,
    pub counts: NodeCounts,
    pub recoveries: usize,
    pub tree: SerializedNode,
}

impl PipelineOutput {
    pub fn new(result: &PipelineResult) -> Self {
        Self {
            file: result.file_metadata.path.display().to_string(),
            counts: result.node_counts.clone(),
            recoveries: result.lexical_metrics.recoveries,
            tree: result.tree.to_serialized(&result.source),
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
