//! Owned, serde-serializable snapshot of a lexical tree

use super::{LexicalTree, NodeId, NodeKind};
use crate::utils::Span;
use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SerializedNode {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub span: Span,
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub numeric: Option<NumericDetail>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<SerializedNode>,
}

/// Raw parts of a numeric literal
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NumericDetail {
    pub base: u32,
    pub int_negative: bool,
    pub exp_negative: bool,
    pub integer: Vec<u8>,
    pub fraction: Vec<u8>,
    pub exponent: Vec<u8>,
    pub value: f64,
}

impl LexicalTree {
    /// Snapshot the whole tree.
    ///
    /// Children always precede their branch in production order, so the
    /// snapshot is assembled bottom-up from the thread without recursion.
    pub fn to_serialized(&self, input: &[u8]) -> SerializedNode {
        let mut finished: HashMap<NodeId, SerializedNode> = HashMap::new();

        for id in self.production_order().filter(|&id| id != self.root()) {
            let snapshot = self.snapshot(id, input, &mut finished);
            finished.insert(id, snapshot);
        }

        self.snapshot(self.root(), input, &mut finished)
    }

    fn snapshot(
        &self,
        id: NodeId,
        input: &[u8],
        finished: &mut HashMap<NodeId, SerializedNode>,
    ) -> SerializedNode {
        let node = self.node(id);
        let numeric = match &node.kind {
            NodeKind::Numeric(numeric) => Some(NumericDetail {
                base: numeric.base,
                int_negative: numeric.int_negative,
                exp_negative: numeric.exp_negative,
                integer: numeric.integer.clone(),
                fraction: numeric.fraction.clone(),
                exponent: numeric.exponent.clone(),
                value: numeric.value,
            }),
            _ => None,
        };

        SerializedNode {
            kind: node.kind_name(),
            span: node.span,
            valid: node.valid,
            value: self.describe(id, input),
            numeric,
            children: node
                .children()
                .iter()
                .filter_map(|child| finished.remove(child))
                .collect(),
        }
    }

    pub fn to_json(&self, input: &[u8]) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.to_serialized(input))
    }
}
