//! Lexical analysis of CSS-superset source
//!
//! Turns a byte buffer into a [`LexicalTree`]. Malformed input never stops
//! the lexer: the affected nodes are flagged invalid and reported through the
//! global logging service, and the tree always covers the whole input.
//!

pub mod context;
pub mod definitions;
pub mod lexer;
mod scanner;

pub use context::Context;
pub use definitions::{AnnotationDefinition, Definitions, QuasiDefinition};
pub use lexer::{Lexer, LexerError, LexerInput, LexicalMetrics};

use crate::config::{ConfigError, LexerOptions};
use crate::tree::LexicalTree;
use serde::Serialize;
use std::collections::BTreeMap;

// ============================================================================
// MODULE API
// ============================================================================

/// Lex a buffer with default options
pub fn tokenize(bytes: &[u8]) -> LexicalTree {
    Lexer::new().tokenize(bytes)
}

/// Lex a buffer with the given dialect options
pub fn tokenize_with_options(
    bytes: &[u8],
    options: LexerOptions,
) -> Result<LexicalTree, ConfigError> {
    Ok(Lexer::with_options(options)?.tokenize(bytes))
}

/// Check that every lexical code is registered (for system startup)
pub fn init_lexical_analysis_logging() -> Result<(), String> {
    use crate::logging::codes::{self, lexical};

    let lexical_codes = [
        lexical::UNTERMINATED_QUOTED,
        lexical::UNTERMINATED_GROUP,
        lexical::UNTERMINATED_COMMENT,
        lexical::UNTERMINATED_URL,
        lexical::UNTERMINATED_FRAGMENT,
        lexical::DANGLING_CLOSER,
        lexical::INVALID_HASH_COLOR,
        lexical::UNTERMINATED_ESCAPE,
        lexical::UNEXPECTED_CHARACTER,
        lexical::INVALID_RESUME_TARGET,
        codes::success::TOKENIZATION_COMPLETE,
    ];

    for code in &lexical_codes {
        if codes::get_error_metadata(code.as_str()).is_none() {
            return Err(format!(
                "Lexical code {} not found in metadata registry",
                code.as_str()
            ));
        }
    }

    crate::log_debug!("Lexical analysis codes validated",
        "count" => lexical_codes.len());

    Ok(())
}

// ============================================================================
// TREE STATISTICS
// ============================================================================

/// Node distribution of a tree, the root excluded
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct NodeCounts {
    pub total: usize,
    pub branches: usize,
    pub leaves: usize,
    pub invalid: usize,
    pub blanks: usize,
    pub comments: usize,
    /// Deepest node, counted in branches below the root
    pub max_depth: usize,
    pub by_kind: BTreeMap<&'static str, usize>,
}

impl NodeCounts {
    /// Nodes other than blanks and comments
    pub fn significant_nodes(&self) -> usize {
        self.total - self.blanks - self.comments
    }

    pub fn has_content(&self) -> bool {
        self.significant_nodes() > 0
    }

    pub fn is_clean(&self) -> bool {
        self.invalid == 0
    }

    pub fn count_of(&self, kind: &str) -> usize {
        self.by_kind.get(kind).copied().unwrap_or(0)
    }
}

pub fn get_node_counts(tree: &LexicalTree) -> NodeCounts {
    let mut counts = NodeCounts::default();
    let root = tree.root();

    // A comment's own children are not counted as comments
    for id in tree.descendants(root).filter(|&id| id != root) {
        let node = tree.node(id);
        counts.total += 1;

        if node.is_branch() {
            counts.branches += 1;
        } else {
            counts.leaves += 1;
        }
        if !node.valid {
            counts.invalid += 1;
        }

        match node.kind_name() {
            "blank" => counts.blanks += 1,
            "comment" => counts.comments += 1,
            _ => {}
        }

        *counts.by_kind.entry(node.kind_name()).or_insert(0) += 1;
        counts.max_depth = counts.max_depth.max(tree.depth(id));
    }

    counts
}
