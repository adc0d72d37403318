use crate::file_processor::FileMetadata;
use crate::lexical::{LexicalMetrics, NodeCounts};
use crate::tree::{LexicalTree, NodeId};
use crate::utils::SourceMap;
use std::time::Duration;

/// A lexed file together with everything gathered along the way
#[derive(Debug, Clone)]
pub struct PipelineResult {
    pub tree: LexicalTree,
    /// Bytes the tree's spans index into
    pub source: Vec<u8>,
    pub file_metadata: FileMetadata,
    pub lexical_metrics: LexicalMetrics,
    pub node_counts: NodeCounts,
    pub processing_duration: Duration,
}

impl PipelineResult {
    pub fn new(
        tree: LexicalTree,
        source: Vec<u8>,
        file_metadata: FileMetadata,
        lexical_metrics: LexicalMetrics,
        node_counts: NodeCounts,
        processing_duration: Duration,
    ) -> Self {
        Self {
            tree,
            source,
            file_metadata,
            lexical_metrics,
            node_counts,
            processing_duration,
        }
    }

    pub fn is_clean(&self) -> bool {
        self.node_counts.is_clean()
    }

    /// Invalid nodes whose parent is valid: the outermost point of each
    /// malformed construct
    pub fn invalid_roots(&self) -> Vec<NodeId> {
        self.tree
            .invalid_nodes()
            .filter(|&id| {
                self.tree
                    .node(id)
                    .parent()
                    .map_or(true, |parent| self.tree.node(parent).valid)
            })
            .collect()
    }

    /// One rendered diagnostic per malformed construct
    pub fn diagnostics(&self) -> Vec<String> {
        let source_map = SourceMap::new(self.source.clone());
        let filename = self.file_metadata.path.display().to_string();

        self.invalid_roots()
            .into_iter()
            .map(|id| {
                let node = self.tree.node(id);
                let message = format!("malformed {}", node.kind_name());
                source_map.format_diagnostic(&filename, &node.span, &message)
            })
            .collect()
    }

    pub fn log_success(&self, file_path: &str) {
        let seconds = self.processing_duration.as_secs_f64();
        crate::log_success!(
            crate::logging::codes::success::PIPELINE_COMPLETE,
            "Lexing pipeline succeeded",
            "file" => file_path,
            "nodes" => self.node_counts.total,
            "invalid" => self.node_counts.invalid,
            "duration_ms" => format!("{:.2}", seconds * 1000.0),
            "processing_rate_bytes_per_sec" => format!("{:.0}",
                self.file_metadata.size as f64 / seconds.max(f64::EPSILON))
        );
    }
}
