//! Tree traversal without recursion

use super::{LexicalTree, NodeId};

/// Follows the `next` thread starting at the root
pub struct ProductionOrder<'t> {
    tree: &'t LexicalTree,
    next: Option<NodeId>,
}

impl Iterator for ProductionOrder<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.tree.node(current).next;
        Some(current)
    }
}

/// Pre-order walk of a subtree, the starting node included
pub struct Descendants<'t> {
    tree: &'t LexicalTree,
    stack: Vec<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.stack.pop()?;
        self.stack
            .extend(self.tree.children(current).iter().rev().copied());
        Some(current)
    }
}

impl LexicalTree {
    pub fn production_order(&self) -> ProductionOrder<'_> {
        ProductionOrder {
            tree: self,
            next: Some(self.root()),
        }
    }

    pub fn descendants(&self, id: NodeId) -> Descendants<'_> {
        Descendants {
            tree: self,
            stack: vec![id],
        }
    }

    /// Leaves in source order
    pub fn leaves(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.descendants(self.root())
            .filter(move |&id| self.node(id).is_leaf())
    }

    /// Nodes flagged malformed, in source order
    pub fn invalid_nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.descendants(self.root())
            .filter(move |&id| !self.node(id).valid)
    }
}

#[cfg(test)]
mod tests {
    use crate::tree::{LexicalTree, NodeKind};
    use crate::utils::Span;

    #[test]
    fn test_walks_on_small_tree() {
        let mut tree = LexicalTree::new(None);
        let root = tree.root();
        let group = tree.alloc(
            NodeKind::Group(crate::tree::Group::new(b'(')),
            Span::empty(),
        );
        let inner = tree.alloc(NodeKind::Separator(b','), Span::empty());
        let after = tree.alloc(NodeKind::Separator(b';'), Span::empty());

        tree.attach(root, group);
        tree.attach(group, inner);
        tree.attach(root, after);
        tree.link_after(root, inner);
        tree.link_after(inner, group);
        tree.link_after(group, after);
        tree.node_mut(after).valid = false;

        let production: Vec<_> = tree.production_order().collect();
        assert_eq!(production, vec![root, inner, group, after]);

        let preorder: Vec<_> = tree.descendants(root).collect();
        assert_eq!(preorder, vec![root, group, inner, after]);

        let leaves: Vec<_> = tree.leaves().collect();
        assert_eq!(leaves, vec![inner, after]);

        let invalid: Vec<_> = tree.invalid_nodes().collect();
        assert_eq!(invalid, vec![after]);
    }
}
