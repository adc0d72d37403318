//! Lexer entry points with per-call metrics and logging integration
//!
//! A [`Lexer`] owns its options and the pre-validated fragment tables. Each
//! call sets up a fresh scanner over the input and tears it down afterwards,
//! so one instance can be reused for any number of inputs.

use super::scanner::{ScanSummary, Scanner};
use super::{Context, Definitions};
use crate::config::constants::lexical::DEFAULT_FILENAME;
use crate::config::{ConfigError, LexerOptions};
use crate::logging::codes;
use crate::tree::{LexicalTree, NodeId};
use crate::utils::{Span, Stop};
use crate::{log_debug, log_error, log_success};
use std::time::{Duration, Instant};

/// Errors of the lexer surface. Malformed input is never an error; it shows
/// up as invalid nodes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LexerError {
    #[error("Node {node} does not exist in the tree")]
    UnknownNode { node: NodeId },

    #[error("Node {node} is a {kind} leaf and cannot hold children")]
    NotABranch { node: NodeId, kind: &'static str },
}

impl LexerError {
    pub fn error_code(&self) -> crate::logging::Code {
        match self {
            LexerError::UnknownNode { .. } | LexerError::NotABranch { .. } => {
                codes::lexical::INVALID_RESUME_TARGET
            }
        }
    }
}

/// Source handed to the lexer
#[derive(Debug, Clone, Copy)]
pub struct LexerInput<'a> {
    pub bytes: &'a [u8],
    /// Diagnostic label only
    pub filename: Option<&'a str>,
    /// Starting position; its byte offset is where scanning begins
    pub begin: Option<Stop>,
    /// Exclusive byte bound, clamped to the buffer length
    pub end: Option<usize>,
}

impl<'a> LexerInput<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self {
            bytes,
            filename: None,
            begin: None,
            end: None,
        }
    }

    pub fn with_filename(mut self, filename: &'a str) -> Self {
        self.filename = Some(filename);
        self
    }

    pub fn with_begin(mut self, begin: Stop) -> Self {
        self.begin = Some(begin);
        self
    }

    pub fn with_end(mut self, end: usize) -> Self {
        self.end = Some(end);
        self
    }

    fn bound(&self) -> usize {
        self.end.unwrap_or(self.bytes.len()).min(self.bytes.len())
    }

    fn label(&self) -> &str {
        self.filename.unwrap_or(DEFAULT_FILENAME)
    }
}

/// Counters of the most recent lexer call
#[derive(Debug, Default, Clone)]
pub struct LexicalMetrics {
    /// Nodes finalized by the call, the base branch excluded
    pub nodes_produced: usize,
    pub bytes_scanned: usize,
    /// Deepest frame stack reached
    pub max_depth: usize,
    /// Constructs closed or flagged by error recovery
    pub recoveries: usize,
    pub duration: Duration,
}

impl LexicalMetrics {
    fn record(&mut self, summary: ScanSummary, bytes: usize, duration: Duration) {
        self.nodes_produced = summary.produced;
        self.bytes_scanned = bytes;
        self.max_depth = summary.max_depth;
        self.recoveries = summary.recoveries;
        self.duration = duration;
    }
}

#[derive(Debug)]
pub struct Lexer {
    options: LexerOptions,
    definitions: Definitions,
    metrics: LexicalMetrics,
}

impl Lexer {
    /// Lexer with environment-derived options and no fragment definitions
    pub fn new() -> Self {
        Self {
            options: LexerOptions::default(),
            definitions: Definitions::default(),
            metrics: LexicalMetrics::default(),
        }
    }

    /// Lexer for the given dialect; fails when a fragment syntax is malformed
    pub fn with_options(options: LexerOptions) -> Result<Self, ConfigError> {
        let definitions = Definitions::build(
            &options.quasi_definitions,
            &options.annotation_definitions,
        )
        .map_err(|error| {
            log_error!(error.error_code(), "Rejected lexer options",
                "error" => &error);
            error
        })?;

        Ok(Self {
            options,
            definitions,
            metrics: LexicalMetrics::default(),
        })
    }

    pub fn options(&self) -> &LexerOptions {
        &self.options
    }

    pub fn definitions(&self) -> &Definitions {
        &self.definitions
    }

    /// Metrics of the most recent call
    pub fn metrics(&self) -> &LexicalMetrics {
        &self.metrics
    }

    pub fn reset_metrics(&mut self) {
        self.metrics = LexicalMetrics::default();
    }

    /// Lex a whole buffer into a new tree
    pub fn tokenize(&mut self, bytes: &[u8]) -> LexicalTree {
        self.tokenize_input(LexerInput::new(bytes))
    }

    /// Lex `input` into a new tree rooted at its begin position
    pub fn tokenize_input(&mut self, input: LexerInput<'_>) -> LexicalTree {
        let mut tree = LexicalTree::new(input.filename.map(str::to_string));
        let root = tree.root();
        let begin = input.begin.unwrap_or_else(Stop::empty);
        tree.node_mut(root).span = Span::at(begin);

        self.scan(&mut tree, root, Context::ROOT, input);
        tree
    }

    /// Lex `input` into an existing branch.
    ///
    /// New nodes become children of `parent` and are threaded into the
    /// production order right where the parent's children belong. The parent
    /// itself stays open, keeps its kind and has its end moved to the final
    /// position.
    pub fn resume(
        &mut self,
        tree: &mut LexicalTree,
        parent: NodeId,
        input: LexerInput<'_>,
    ) -> Result<(), LexerError> {
        let node = tree
            .get(parent)
            .ok_or(LexerError::UnknownNode { node: parent })?;
        let context = Context::of(&node.kind).ok_or(LexerError::NotABranch {
            node: parent,
            kind: node.kind_name(),
        })?;

        log_debug!("Resuming lexical analysis",
            "parent" => parent,
            "context" => context.name());

        self.scan(tree, parent, context, input);
        Ok(())
    }

    fn scan(
        &mut self,
        tree: &mut LexicalTree,
        parent: NodeId,
        context: Context,
        input: LexerInput<'_>,
    ) {
        let begin = input.begin.unwrap_or_else(Stop::empty);
        let end = input.bound();

        log_debug!("Starting lexical analysis",
            "file" => input.label(),
            "begin" => begin,
            "end" => end,
            "extended_numbers" => self.options.extended_numbers,
            "extended_escapes" => self.options.extended_escapes,
            "extended_strings" => self.options.extended_strings,
            "extended_comments" => self.options.extended_comments);

        let started = Instant::now();
        let summary = Scanner::new(
            &self.options,
            &self.definitions,
            tree,
            parent,
            context,
            input.bytes,
            begin,
            end,
        )
        .run();

        let scanned = end.saturating_sub(begin.byte());
        self.metrics.record(summary, scanned, started.elapsed());

        log_success!(codes::success::TOKENIZATION_COMPLETE, "Tokenization completed",
            "file" => input.label(),
            "nodes" => self.metrics.nodes_produced,
            "bytes" => self.metrics.bytes_scanned,
            "max_depth" => self.metrics.max_depth,
            "recoveries" => self.metrics.recoveries,
            "duration_us" => self.metrics.duration.as_micros());
    }
}

impl Default for Lexer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn standard() -> Lexer {
        Lexer::with_options(LexerOptions::standard()).unwrap()
    }

    fn kinds(tree: &LexicalTree, id: NodeId) -> Vec<&'static str> {
        tree.children(id)
            .iter()
            .map(|&child| tree.node(child).kind_name())
            .collect()
    }

    fn thread_len(tree: &LexicalTree) -> usize {
        tree.production_order().count()
    }

    #[test]
    fn test_create_lexer() {
        let lexer = Lexer::with_options(LexerOptions::extended()).unwrap();
        assert!(lexer.options().extended_numbers);
        assert!(lexer.definitions().is_empty());
        assert_eq!(lexer.metrics().nodes_produced, 0);
    }

    #[test]
    fn test_filename_and_bounds() {
        let mut lexer = standard();
        let input = LexerInput::new(b"a b c")
            .with_filename("style.cssx")
            .with_end(3);
        let tree = lexer.tokenize_input(input);

        assert_eq!(tree.filename(), Some("style.cssx"));
        assert_eq!(tree.node(tree.root()).span.end.byte(), 3);
        assert_eq!(kinds(&tree, tree.root()), vec!["identifier", "blank", "identifier"]);
        assert_eq!(lexer.metrics().bytes_scanned, 3);
    }

    #[test]
    fn test_end_past_buffer_is_clamped() {
        let mut lexer = standard();
        let tree = lexer.tokenize_input(LexerInput::new(b"ab").with_end(100));
        assert_eq!(tree.node(tree.root()).span.end.byte(), 2);
    }

    #[test]
    fn test_resume_into_group() {
        let input = b"(a b)";
        let mut lexer = standard();
        let mut tree = lexer.tokenize_input(LexerInput::new(input).with_end(2));

        let group = tree.children(tree.root())[0];
        assert!(!tree.node(group).valid);
        let identifier = tree.children(group)[0];
        let resume_at = tree.node(identifier).span.end;

        lexer
            .resume(&mut tree, group, LexerInput::new(input).with_begin(resume_at))
            .unwrap();

        // The closer belongs to the caller's branch, so it is not consumed as one
        assert_eq!(
            kinds(&tree, group),
            vec!["identifier", "blank", "identifier", "unexpected"]
        );
        assert_eq!(tree.node(group).span.end.byte(), 5);
        assert_eq!(thread_len(&tree), tree.len());

        // New nodes sit between the old children and the group itself
        let order: Vec<NodeId> = tree.production_order().collect();
        assert_eq!(order.last(), Some(&group));
    }

    #[test]
    fn test_resume_into_root() {
        let input = b"a b";
        let mut lexer = standard();
        let mut tree = lexer.tokenize_input(LexerInput::new(input).with_end(1));
        let root = tree.root();
        let resume_at = tree.node(root).span.end;

        lexer
            .resume(&mut tree, root, LexerInput::new(input).with_begin(resume_at))
            .unwrap();

        assert_eq!(kinds(&tree, root), vec!["identifier", "blank", "identifier"]);
        assert_eq!(tree.node(root).span.end.byte(), 3);
        assert_eq!(thread_len(&tree), tree.len());
        assert_eq!(lexer.metrics().nodes_produced, 3);
    }

    #[test]
    fn test_bound_between_cr_and_lf() {
        let input = b"a\r\nb";
        let mut lexer = standard();
        let mut tree = lexer.tokenize_input(LexerInput::new(input).with_end(2));
        let root = tree.root();
        let resume_at = tree.node(root).span.end;

        // The CR is the head of a CRLF even though the LF lies past the bound
        assert_eq!(resume_at.byte(), 2);
        assert_eq!(resume_at.line, 0);

        lexer
            .resume(&mut tree, root, LexerInput::new(input).with_begin(resume_at))
            .unwrap();

        let last = *tree.children(root).last().unwrap();
        assert_eq!(tree.text(last, input), Some("b"));
        assert_eq!(tree.node(last).span.begin.line, 1);
        assert_eq!(tree.node(last).span.begin.relative.byte, 0);
        assert_eq!(tree.node(root).span.end.line, 1);
    }

    #[test]
    fn test_resume_into_identifier() {
        let input = b"ab c";
        let mut lexer = standard();
        let mut tree = lexer.tokenize_input(LexerInput::new(input).with_end(1));
        let identifier = tree.children(tree.root())[0];
        let resume_at = tree.node(identifier).span.end;

        lexer
            .resume(&mut tree, identifier, LexerInput::new(input).with_begin(resume_at))
            .unwrap();

        // The identifier cannot close itself, so the scan stops at its end
        assert_eq!(tree.text(identifier, input), Some("ab"));
        assert_eq!(tree.node(identifier).span.end.byte(), 2);
        assert_eq!(kinds(&tree, identifier), vec!["raw", "raw"]);
    }

    #[test]
    fn test_resume_into_leaf() {
        let mut lexer = standard();
        let mut tree = lexer.tokenize(b"a ");
        let blank = tree.children(tree.root())[1];

        let result = lexer.resume(&mut tree, blank, LexerInput::new(b"a "));
        assert_matches!(result, Err(LexerError::NotABranch { kind: "blank", .. }));
        assert_eq!(
            result.unwrap_err().error_code(),
            codes::lexical::INVALID_RESUME_TARGET
        );
    }

    #[test]
    fn test_resume_unknown_node() {
        let mut lexer = standard();
        let large = lexer.tokenize(b"a b c d");
        let foreign = large.children(large.root())[6];

        let mut tree = lexer.tokenize(b"a");
        let result = lexer.resume(&mut tree, foreign, LexerInput::new(b"a"));
        assert_matches!(result, Err(LexerError::UnknownNode { node }) if node == foreign);
    }

    #[test]
    fn test_metrics() {
        let mut lexer = standard();
        let tree = lexer.tokenize(b"((a))");

        let metrics = lexer.metrics().clone();
        assert_eq!(metrics.max_depth, 3);
        assert_eq!(metrics.nodes_produced, tree.len() - 1);
        assert_eq!(metrics.bytes_scanned, 5);
        assert_eq!(metrics.recoveries, 0);

        lexer.tokenize(b"( \"x");
        assert_eq!(lexer.metrics().recoveries, 2);

        lexer.reset_metrics();
        assert_eq!(lexer.metrics().nodes_produced, 0);
    }

    #[test]
    fn test_invalid_definitions_rejected() {
        let options = LexerOptions::standard().with_annotation(Default::default(), "@");
        assert_matches!(
            Lexer::with_options(options),
            Err(ConfigError::InvalidSyntax { .. })
        );
    }
}
