//! Lexical node tree
//!
//! Nodes live in an arena owned by [`LexicalTree`] and refer to each other by
//! [`NodeId`]. Structure is owned top-down through `children`. A second,
//! non-owning overlay threads every node into production order: the root
//! first, then every other node in the order it was finalized, so a closed
//! branch follows its last child.

pub mod node;
pub mod serialize;
pub mod walk;

pub use node::{
    CdxSyntax, ColorValidity, CommentSyntax, Escape, Group, Hash, LazyText, Node, NodeKind,
    Numeric, Placement,
};
pub use serialize::SerializedNode;
pub use walk::{Descendants, ProductionOrder};

use crate::utils::Span;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Index of a node inside its [`LexicalTree`]
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct NodeId(u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The output of a lexer run.
///
/// Node accessors index the arena directly; passing a [`NodeId`] from another
/// tree is a programming error and panics when out of range.
#[derive(Debug, Clone)]
pub struct LexicalTree {
    nodes: Vec<Node>,
    root: NodeId,
    filename: Option<String>,
}

impl LexicalTree {
    /// Create a tree holding only an empty root
    pub fn new(filename: Option<String>) -> Self {
        Self {
            nodes: vec![Node::new(NodeKind::Root, Span::empty())],
            root: NodeId(0),
            filename,
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Diagnostic label of the source
    pub fn filename(&self) -> Option<&str> {
        self.filename.as_deref()
    }

    /// Number of nodes, root included
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True when nothing but the root exists
    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.index()]
    }

    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.node(id).kind
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.node(id).children
    }

    /// Number of branches between `id` and the root
    pub fn depth(&self, id: NodeId) -> usize {
        let mut depth = 0;
        let mut current = self.node(id).parent;
        while let Some(parent) = current {
            depth += 1;
            current = self.node(parent).parent;
        }
        depth
    }

    pub(crate) fn alloc(&mut self, kind: NodeKind, span: Span) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node::new(kind, span));
        id
    }

    /// Append `child` to the children of `parent`
    pub(crate) fn attach(&mut self, parent: NodeId, child: NodeId) {
        self.nodes[child.index()].parent = Some(parent);
        self.nodes[parent.index()].children.push(child);
    }

    /// Splice `id` into the production thread right after `anchor`
    pub(crate) fn link_after(&mut self, anchor: NodeId, id: NodeId) {
        let next = self.nodes[anchor.index()].next;

        let node = &mut self.nodes[id.index()];
        node.prev = Some(anchor);
        node.next = next;

        self.nodes[anchor.index()].next = Some(id);
        if let Some(next) = next {
            self.nodes[next.index()].prev = Some(id);
        }
    }

    /// Node after which new children of `parent` belong in production order
    pub(crate) fn thread_anchor(&self, parent: NodeId) -> NodeId {
        let node = self.node(parent);
        if parent == self.root {
            return node.children.last().copied().unwrap_or(parent);
        }
        node.children
            .last()
            .copied()
            .or(node.prev)
            .unwrap_or(parent)
    }

    /// Decoded text carried by a node.
    ///
    /// Runs of source text decode lazily on first access. Identifiers, hashes
    /// and escapes return their evaluated value. Other kinds have no text.
    pub fn text<'a>(&'a self, id: NodeId, input: &[u8]) -> Option<&'a str> {
        let node = self.node(id);
        if let Some(text) = node.kind.lazy_text() {
            return Some(text.read(&node.span, input));
        }

        match &node.kind {
            NodeKind::Identifier { value } => Some(value),
            NodeKind::Hash(hash) => Some(&hash.value),
            NodeKind::Escape(escape) => Some(&escape.value),
            _ => None,
        }
    }

    /// Recompute the value of an Identifier or Hash by concatenating the
    /// decoded text of its children
    pub fn evaluate(&mut self, id: NodeId, input: &[u8]) -> Option<&str> {
        if !matches!(self.kind(id), NodeKind::Identifier { .. } | NodeKind::Hash(_)) {
            return None;
        }

        let mut value = String::new();
        for &child in self.children(id) {
            if let Some(text) = self.text(child, input) {
                value.push_str(text);
            }
        }

        match &mut self.nodes[id.index()].kind {
            NodeKind::Identifier { value: slot } => {
                *slot = value;
                Some(slot.as_str())
            }
            NodeKind::Hash(hash) => {
                hash.value = value;
                Some(hash.value.as_str())
            }
            _ => None,
        }
    }

    /// Short human-readable payload of a node
    pub fn describe(&self, id: NodeId, input: &[u8]) -> Option<String> {
        let node = self.node(id);
        let described = match &node.kind {
            NodeKind::Root | NodeKind::Url => return None,
            NodeKind::Group(group) => {
                format!("{}{}", group.begin as char, group.end as char)
            }
            NodeKind::Quoted { quote } => (*quote as char).to_string(),
            NodeKind::Comment(CommentSyntax::Block) => "block".to_string(),
            NodeKind::Comment(CommentSyntax::Line) => "line".to_string(),
            NodeKind::Quasi { syntax } => syntax.clone(),
            NodeKind::Annotation { syntax, placement } => {
                format!("{} {}", syntax, placement.as_str())
            }
            NodeKind::Numeric(numeric) => numeric.value.to_string(),
            NodeKind::Separator(byte) | NodeKind::Operator(byte) => (*byte as char).to_string(),
            NodeKind::Cdx(syntax) => syntax.as_str().to_string(),
            NodeKind::Identifier { .. }
            | NodeKind::Hash(_)
            | NodeKind::Escape(_)
            | NodeKind::Blank(_)
            | NodeKind::Unexpected(_)
            | NodeKind::Raw(_) => self.text(id, input)?.to_string(),
        };
        Some(described)
    }

    /// Indented text rendering, one node per line in pre-order
    pub fn dump(&self, input: &[u8]) -> String {
        let mut output = String::new();
        for id in self.descendants(self.root) {
            let node = self.node(id);
            output.push_str(&"  ".repeat(self.depth(id)));
            output.push_str(node.kind_name());
            if let Some(payload) = self.describe(id, input) {
                output.push_str(&format!(" {:?}", payload));
            }
            output.push_str(&format!(" @ {}", node.span));
            if !node.valid {
                output.push_str(" (invalid)");
            }
            output.push('\n');
        }
        output
    }
}
