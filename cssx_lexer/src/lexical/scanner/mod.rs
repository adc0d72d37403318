//! The scanning automaton behind [`Lexer`](super::Lexer)
//!
//! A `Scanner` lives for exactly one lexer call. It keeps the nesting state on
//! an explicit frame stack rather than the call stack, so deeply nested input
//! cannot overflow and a scan can start inside an existing branch.
//!
//! Readers are grouped by construct in the child modules. Each one inspects
//! the bytes at the cursor and either declines (`false`) or produces nodes
//! and consumes input (`true`). `read_node` tries them in a fixed order per
//! context; earlier readers shadow later ones.

mod escape;
mod leaves;
mod names;
mod numeric;
mod structure;

use super::{Context, Definitions};
use crate::config::LexerOptions;
use crate::logging::Code;
use crate::tree::{LexicalTree, NodeId, NodeKind};
use crate::utils::{ascii, Span, Stop};

/// Nesting level: the branch under construction and its pending child
#[derive(Debug, Clone, Copy)]
struct Frame {
    context: Context,
    parent: NodeId,
    /// Most recently produced child, not yet flushed into `parent`
    focus: Option<NodeId>,
}

/// Counters gathered during one scan
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct ScanSummary {
    pub produced: usize,
    pub max_depth: usize,
    pub recoveries: usize,
}

pub(crate) struct Scanner<'a> {
    options: &'a LexerOptions,
    definitions: &'a Definitions,
    input: &'a [u8],
    /// Exclusive scan bound, never past the end of `input`
    length: usize,
    cursor: usize,
    stop: Stop,
    stack: Vec<Frame>,
    frame: Frame,
    tree: &'a mut LexicalTree,
    /// Last node spliced into the production thread
    tail: NodeId,
    /// Set when the base frame would have to close itself
    halted: bool,
    report: bool,
    summary: ScanSummary,
}

impl<'a> Scanner<'a> {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        options: &'a LexerOptions,
        definitions: &'a Definitions,
        tree: &'a mut LexicalTree,
        parent: NodeId,
        context: Context,
        input: &'a [u8],
        begin: Stop,
        end: usize,
    ) -> Self {
        let tail = tree.thread_anchor(parent);
        Self {
            options,
            definitions,
            input,
            length: end.min(input.len()),
            cursor: begin.byte(),
            stop: begin,
            stack: Vec::with_capacity(crate::config::constants::lexical::INITIAL_STACK_CAPACITY),
            frame: Frame {
                context,
                parent,
                focus: None,
            },
            tree,
            tail,
            halted: false,
            report: crate::logging::config::log_recoveries(),
            summary: ScanSummary::default(),
        }
    }

    /// Scan up to the bound, close whatever is still open and finalize the
    /// base branch
    pub(crate) fn run(mut self) -> ScanSummary {
        while self.cursor < self.length && !self.halted {
            self.read_node();
        }

        self.read_eof();
        self.advance(None);
        self.settle_base();

        let parent = self.frame.parent;
        self.tree.node_mut(parent).span.end = self.stop;

        self.summary
    }

    // ========================================================================
    // DISPATCH
    // ========================================================================

    fn read_node(&mut self) -> bool {
        let context = self.frame.context;

        if context.intersects(Context::GROUP) {
            self.read_blank()
                || self.read_numeric()
                || self.read_url_opening()
                || self.read_comment_opening()
                || self.read_cdx()
                || self.read_quasi_opening()
                || self.read_annotation_opening()
                || self.read_identifier_opening()
                || self.read_hash_opening()
                || self.read_quoted_opening()
                || self.read_separator()
                || self.read_operator()
                || self.read_group_opening()
                || self.read_group_ending()
                || self.read_escape_newline()
                || self.read_unexpected()
        } else if context.intersects(Context::QUOTED) {
            self.read_escape_regular()
                || self.read_escape_newline()
                || self.read_quasi_opening()
                || self.read_quoted_ending()
                || self.read_raw()
                || self.read_unexpected()
        } else if context == Context::URL {
            self.read_escape_regular()
                || self.read_escape_newline()
                || self.read_blank()
                || self.read_url_comment()
                || self.read_quoted_opening()
                || self.read_quasi_opening()
                || self.read_url_ending()
                || self.read_raw()
                || self.read_unexpected()
        } else if context == Context::BLOCK {
            self.read_comment_block_opening()
                || self.read_comment_block_ending()
                || self.read_quasi_opening()
                || self.read_raw()
                || self.read_unexpected()
        } else if context == Context::LINE {
            self.read_quasi_opening()
                || self.read_comment_line_ending()
                || self.read_raw()
                || self.read_unexpected()
        } else if context.intersects(Context::FRAGMENT) {
            self.read_fragment_ending()
                || self.read_operator()
                || self.read_group_opening()
                || self.read_unexpected()
        } else if context == Context::IDENTIFIER {
            self.read_escape_regular() || self.read_identifier_raw() || self.read_identifier_ending()
        } else if context == Context::HASH {
            if self.read_escape_regular() {
                self.accumulate_escape();
                true
            } else {
                self.read_hash_raw() || self.read_hash_ending()
            }
        } else {
            self.read_unexpected()
        }
    }

    /// Close every frame left open at the end of input
    fn read_eof(&mut self) {
        while !self.stack.is_empty() {
            let context = self.frame.context;

            if context == Context::HASH {
                self.close_hash();
            } else if context == Context::IDENTIFIER {
                self.close_identifier();
            } else if context.intersects(Context::ROOT.union(Context::LINE)) {
                self.pop();
            } else {
                let parent = self.frame.parent;
                let span = Span::new(self.tree.node(parent).span.begin, self.stop);
                self.tree.node_mut(parent).valid = false;
                self.recover(
                    unterminated_code(context),
                    &format!("Unterminated {} at the end of input", context.name()),
                    span,
                );
                self.pop();
            }
        }
    }

    /// Refresh the derived value of a resumed name branch
    fn settle_base(&mut self) {
        let parent = self.frame.parent;
        match self.frame.context {
            Context::IDENTIFIER => {
                self.tree.evaluate(parent, self.input);
            }
            Context::HASH => {
                let valid = match &mut self.tree.node_mut(parent).kind {
                    NodeKind::Hash(hash) => hash.classify(),
                    _ => true,
                };
                self.tree.node_mut(parent).valid = valid;
                self.tree.evaluate(parent, self.input);
            }
            _ => {}
        }
    }

    // ========================================================================
    // CURSOR
    // ========================================================================

    /// Byte `n` positions ahead of the cursor, inside the scan bound
    fn peek(&self, n: usize) -> Option<u8> {
        let index = self.cursor + n;
        if index < self.length {
            self.input.get(index).copied()
        } else {
            None
        }
    }

    fn at(&self, n: usize, byte: u8) -> bool {
        self.peek(n) == Some(byte)
    }

    fn is(&self, n: usize, class: fn(u8) -> bool) -> bool {
        self.peek(n).is_some_and(class)
    }

    /// Case-insensitive comparison against a lowercase ASCII letter
    fn letter(&self, n: usize, lowercase: u8) -> bool {
        self.peek(n).is_some_and(|x| x | 0x20 == lowercase)
    }

    fn crlf(&self, n: usize) -> bool {
        self.at(n, ascii::CR) && self.at(n + 1, ascii::LF)
    }

    /// Byte count of the newline sequence at `n`, if any
    fn newline_length(&self, n: usize) -> Option<usize> {
        if self.crlf(n) {
            Some(2)
        } else if self.is(n, ascii::is_newline) {
            Some(1)
        } else {
            None
        }
    }

    /// Whether `pattern` occurs at the cursor, entirely inside the bound
    fn matches(&self, pattern: &[u8]) -> bool {
        let end = self.cursor + pattern.len();
        end <= self.length && self.input.get(self.cursor..end) == Some(pattern)
    }

    /// Move past `n` bytes, stopping at the bound
    ///
    /// Line counting sees past the bound so a CRLF split by it still counts once.
    fn consume(&mut self, n: usize) {
        for _ in 0..n {
            let Some(byte) = self.peek(0) else {
                break;
            };
            self.stop.advance(byte, self.input.get(self.cursor + 1).copied());
            self.cursor += 1;
        }
    }

    // ========================================================================
    // FRAMES
    // ========================================================================

    /// Flush the focus into the current branch and focus `node` instead
    fn advance(&mut self, node: Option<NodeId>) {
        if let Some(focus) = self.frame.focus.take() {
            self.tree.node_mut(focus).span.end = self.stop;
            self.tree.attach(self.frame.parent, focus);
            self.tree.link_after(self.tail, focus);
            self.tail = focus;
            self.summary.produced += 1;
        }
        self.frame.focus = node;
    }

    /// Allocate a node starting at the cursor and make it the focus
    fn produce(&mut self, kind: NodeKind) -> NodeId {
        let id = self.tree.alloc(kind, Span::at(self.stop));
        self.advance(Some(id));
        id
    }

    /// Open a branch and make it the current frame
    fn push(&mut self, kind: NodeKind, context: Context) -> NodeId {
        self.advance(None);

        let id = self.tree.alloc(kind, Span::at(self.stop));
        let outer = std::mem::replace(
            &mut self.frame,
            Frame {
                context,
                parent: id,
                focus: None,
            },
        );
        self.stack.push(outer);
        self.summary.max_depth = self.summary.max_depth.max(self.stack.len());

        id
    }

    /// Close the current branch; it becomes the focus of the outer frame
    fn pop(&mut self) {
        let closed = self.frame.parent;
        self.advance(None);

        if let Some(outer) = self.stack.pop() {
            self.frame = outer;
            self.advance(Some(closed));
        }
    }

    /// The base frame belongs to the caller and is never popped
    fn can_pop(&self) -> bool {
        !self.stack.is_empty()
    }

    fn focus_kind(&self) -> Option<&NodeKind> {
        self.frame.focus.map(|id| &self.tree.node(id).kind)
    }

    fn parent_kind(&self) -> &NodeKind {
        &self.tree.node(self.frame.parent).kind
    }

    fn invalidate(&mut self, id: NodeId) {
        self.tree.node_mut(id).valid = false;
    }

    /// Count a recovered construct and report it when enabled
    fn recover(&mut self, code: Code, message: &str, span: Span) {
        self.summary.recoveries += 1;
        if self.report {
            crate::log_warning!(code, message, span = span,
                "context" => self.frame.context.name());
        }
    }
}

fn unterminated_code(context: Context) -> Code {
    use crate::logging::codes::lexical;

    if context.intersects(Context::QUOTED) {
        lexical::UNTERMINATED_QUOTED
    } else if context.intersects(Context::COMMENT) {
        lexical::UNTERMINATED_COMMENT
    } else if context == Context::URL {
        lexical::UNTERMINATED_URL
    } else if context.intersects(Context::FRAGMENT) {
        lexical::UNTERMINATED_FRAGMENT
    } else {
        lexical::UNTERMINATED_GROUP
    }
}

#[cfg(test)]
mod tests {
    use crate::config::{ContextSelector, LexerOptions};
    use crate::lexical::Lexer;
    use crate::tree::{ColorValidity, CommentSyntax, LexicalTree, NodeId, NodeKind, Placement};

    fn lex(input: &[u8], options: LexerOptions) -> LexicalTree {
        Lexer::with_options(options).unwrap().tokenize(input)
    }

    fn standard(input: &[u8]) -> LexicalTree {
        lex(input, LexerOptions::standard())
    }

    fn extended(input: &[u8]) -> LexicalTree {
        lex(input, LexerOptions::extended())
    }

    fn kinds(tree: &LexicalTree, id: NodeId) -> Vec<&'static str> {
        tree.children(id)
            .iter()
            .map(|&child| tree.node(child).kind_name())
            .collect()
    }

    /// First node of the given kind in source order
    fn first(tree: &LexicalTree, name: &str) -> NodeId {
        tree.descendants(tree.root())
            .find(|&id| tree.node(id).kind_name() == name)
            .unwrap()
    }

    fn range(tree: &LexicalTree, id: NodeId) -> (usize, usize) {
        let span = tree.node(id).span;
        (span.begin.byte(), span.end.byte())
    }

    fn numeric_value(tree: &LexicalTree) -> f64 {
        match tree.kind(first(tree, "numeric")) {
            NodeKind::Numeric(numeric) => numeric.value,
            other => panic!("expected a numeric, got {:?}", other),
        }
    }

    /// Root children tile the input and every branch covers its children
    fn assert_partition(tree: &LexicalTree, input: &[u8]) {
        let root = tree.root();
        let mut offset = 0;
        for &child in tree.children(root) {
            assert_eq!(tree.node(child).span.begin.byte(), offset);
            offset = tree.node(child).span.end.byte();
        }
        assert_eq!(offset, input.len());

        for id in tree.descendants(root) {
            let span = tree.node(id).span;
            for &child in tree.children(id) {
                assert!(span.contains_span(&tree.node(child).span));
            }
        }
    }

    /// The production thread visits every node once, children before parents
    fn assert_thread(tree: &LexicalTree) {
        let order: Vec<NodeId> = tree.production_order().collect();
        assert_eq!(order.len(), tree.len());
        assert_eq!(order[0], tree.root());

        let mut seen = vec![false; tree.len()];
        for (position, &id) in order.iter().enumerate() {
            assert!(!seen[id.index()]);
            seen[id.index()] = true;

            if let Some(next) = tree.node(id).next() {
                assert_eq!(tree.node(next).prev(), Some(id));
            }
            if position > 0 {
                for &child in tree.children(id) {
                    assert!(seen[child.index()]);
                }
            }
        }
    }

    // ========================================================================
    // QUOTED
    // ========================================================================

    #[test]
    fn test_unterminated_quoted() {
        let tree = standard(b"\"123");
        let quoted = first(&tree, "quoted");

        assert!(!tree.node(quoted).valid);
        assert_eq!(range(&tree, quoted), (0, 4));
        assert_eq!(kinds(&tree, quoted), vec!["raw"]);
        assert_eq!(tree.text(tree.children(quoted)[0], b"\"123"), Some("123"));
    }

    #[test]
    fn test_quoted_closed_by_newline() {
        let input = b"\"ab\nc";
        let tree = standard(input);
        let root = tree.root();
        let quoted = first(&tree, "quoted");

        assert!(!tree.node(quoted).valid);
        assert_eq!(range(&tree, quoted), (0, 4));
        assert_eq!(kinds(&tree, root), vec!["quoted", "identifier"]);
        assert_partition(&tree, input);
    }

    #[test]
    fn test_backtick_strings() {
        let input = b"`a\nb`";
        let tree = extended(input);
        let quoted = first(&tree, "quoted");

        assert_eq!(tree.kind(quoted), &NodeKind::Quoted { quote: b'`' });
        assert!(tree.node(quoted).valid);
        assert_eq!(tree.text(tree.children(quoted)[0], input), Some("a\nb"));

        let tree = standard(b"`");
        assert_eq!(kinds(&tree, tree.root()), vec!["unexpected"]);
    }

    // ========================================================================
    // HASHES
    // ========================================================================

    fn hash_of(tree: &LexicalTree) -> (crate::tree::Hash, bool) {
        let id = first(tree, "hash");
        match tree.kind(id) {
            NodeKind::Hash(hash) => (hash.clone(), tree.node(id).valid),
            other => panic!("expected a hash, got {:?}", other),
        }
    }

    #[test]
    fn test_hash_color() {
        let tree = standard(b"#1a2B3c");
        let (hash, valid) = hash_of(&tree);

        assert!(valid);
        assert!(!hash.id);
        assert_eq!(hash.color, ColorValidity::Valid);
        assert_eq!(hash.bytes, b"1a2B3c".to_vec());
        assert_eq!(hash.value, "1a2B3c");
        assert_eq!(range(&tree, first(&tree, "hash")), (0, 7));
    }

    #[test]
    fn test_hash_classification() {
        let (hash, valid) = hash_of(&standard(b"#abc"));
        assert!(valid && hash.id);
        assert_eq!(hash.color, ColorValidity::Valid);

        let (hash, valid) = hash_of(&standard(b"#12"));
        assert!(!valid);
        assert_eq!(hash.color, ColorValidity::Invalid);
        assert!(hash.bytes.is_empty());

        let (hash, valid) = hash_of(&standard(b"#zz"));
        assert!(valid && hash.id);
        assert_eq!(hash.color, ColorValidity::Invalid);

        let (hash, valid) = hash_of(&standard(b"#1g"));
        assert!(!valid && !hash.id);
        assert_eq!(hash.color, ColorValidity::Invalid);
    }

    #[test]
    fn test_hash_with_escape() {
        let tree = standard(b"#\\31 23");
        let (hash, valid) = hash_of(&tree);

        assert!(valid && hash.id);
        assert_eq!(hash.bytes, b"123".to_vec());
        assert_eq!(hash.value, "123");
        assert_eq!(kinds(&tree, first(&tree, "hash")), vec!["escape", "raw"]);
    }

    #[test]
    fn test_lone_hash_is_operator() {
        let tree = standard(b"# a");
        assert_eq!(
            kinds(&tree, tree.root()),
            vec!["operator", "blank", "identifier"]
        );
    }

    // ========================================================================
    // GROUPS
    // ========================================================================

    #[test]
    fn test_group_mismatch_recovery() {
        let input = b"( a ] b )";
        let tree = standard(input);
        let group = first(&tree, "group");

        assert!(tree.node(group).valid);
        assert_eq!(
            kinds(&tree, group),
            vec!["blank", "identifier", "blank", "unexpected", "blank", "identifier", "blank"]
        );

        let invalid: Vec<NodeId> = tree.invalid_nodes().collect();
        assert_eq!(invalid.len(), 1);
        assert_eq!(tree.node(invalid[0]).kind_name(), "unexpected");
        assert_eq!(range(&tree, invalid[0]), (4, 5));
        assert_partition(&tree, input);
    }

    #[test]
    fn test_closer_inside_unexpected_run() {
        let mut lexer = Lexer::with_options(LexerOptions::standard()).unwrap();
        let tree = lexer.tokenize(b"\x01]");

        assert_eq!(kinds(&tree, tree.root()), vec!["unexpected"]);
        assert_eq!(range(&tree, first(&tree, "unexpected")), (0, 2));
        // One report for the stray byte, one for the closer folded into its run
        assert_eq!(lexer.metrics().recoveries, 2);
    }

    #[test]
    fn test_unterminated_group() {
        let tree = standard(b"{ a");
        let group = first(&tree, "group");
        assert!(!tree.node(group).valid);
        assert_eq!(range(&tree, group), (0, 3));
    }

    // ========================================================================
    // ESCAPES
    // ========================================================================

    fn escape_values(tree: &LexicalTree, parent: NodeId) -> Vec<String> {
        tree.children(parent)
            .iter()
            .filter_map(|&child| match tree.kind(child) {
                NodeKind::Escape(escape) => Some(escape.value.clone()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_trailing_backslash() {
        let tree = standard(b"\\");
        let escape = first(&tree, "escape");

        assert_eq!(tree.node(escape).parent(), Some(tree.root()));
        assert_eq!(range(&tree, escape), (0, 1));
        assert!(matches!(tree.kind(escape), NodeKind::Escape(e) if e.codepoint.is_none()));
    }

    #[test]
    fn test_identifier_with_standard_escape() {
        let tree = standard(b"\\41 x");
        let identifier = first(&tree, "identifier");

        assert_eq!(tree.text(identifier, b"\\41 x"), Some("Ax"));
        assert_eq!(range(&tree, identifier), (0, 5));
        assert_eq!(kinds(&tree, identifier), vec!["escape", "raw"]);
    }

    #[test]
    fn test_extended_escapes_in_string() {
        let input = b"\"\\n\\x41\\u0042\\d7\\u{1F600}\"";
        let tree = extended(input);
        let quoted = first(&tree, "quoted");

        assert!(tree.node(quoted).valid);
        assert_eq!(
            escape_values(&tree, quoted),
            vec!["\n", "A", "B", "7", "\u{1F600}"]
        );
        assert_eq!(range(&tree, quoted), (0, input.len()));
    }

    #[test]
    fn test_unterminated_supplementary_escape() {
        let tree = extended(b"\\u{41");
        let escape = first(&tree, "escape");

        assert!(!tree.node(escape).valid);
        assert!(matches!(tree.kind(escape), NodeKind::Escape(e) if e.codepoint == Some(0x41)));
        assert_eq!(range(&tree, escape), (0, 5));
        assert!(tree.node(first(&tree, "identifier")).valid);
    }

    #[test]
    fn test_literal_escape_of_multibyte_codepoint() {
        let input = "\\é".as_bytes();
        let tree = standard(input);
        let escape = first(&tree, "escape");

        assert_eq!(range(&tree, escape), (0, 3));
        assert_eq!(tree.node(escape).span.end.absolute.codepoint, 2);
        assert_eq!(tree.text(first(&tree, "identifier"), input), Some("é"));
    }

    #[test]
    fn test_escaped_newline_in_string() {
        let input = b"\"a\\\nb\"";
        let tree = standard(input);
        let quoted = first(&tree, "quoted");

        assert!(tree.node(quoted).valid);
        assert_eq!(kinds(&tree, quoted), vec!["raw", "escape", "raw"]);
        assert_eq!(range(&tree, tree.children(quoted)[1]), (2, 4));
        assert_eq!(range(&tree, quoted), (0, 6));
    }

    #[test]
    fn test_escaped_crlf_is_one_escape() {
        let input = b"\"a\\\r\nb\"";
        let tree = standard(input);
        let quoted = first(&tree, "quoted");

        assert!(tree.node(quoted).valid);
        assert_eq!(kinds(&tree, quoted), vec!["raw", "escape", "raw"]);
        let escape = tree.children(quoted)[1];
        assert_eq!(range(&tree, escape), (2, 5));
        assert!(matches!(tree.kind(escape), NodeKind::Escape(e) if e.codepoint.is_none()));
        assert_eq!(tree.node(tree.children(quoted)[2]).span.begin.line, 1);
    }

    #[test]
    fn test_standard_escape_terminator() {
        let input = b"\\41\r\nb";
        let tree = standard(input);
        let identifier = first(&tree, "identifier");
        let escape = first(&tree, "escape");

        assert_eq!(range(&tree, escape), (0, 5));
        assert!(matches!(tree.kind(escape), NodeKind::Escape(e) if e.codepoint == Some(0x41)));
        assert_eq!(tree.text(identifier, input), Some("Ab"));

        let tree = standard(b"\\41\tb");
        assert_eq!(range(&tree, first(&tree, "escape")), (0, 4));

        // Only one whitespace byte belongs to the escape
        let tree = standard(b"\\41  b");
        assert_eq!(range(&tree, first(&tree, "escape")), (0, 4));
        assert_eq!(
            kinds(&tree, tree.root()),
            vec!["identifier", "blank", "identifier"]
        );
    }

    // ========================================================================
    // NUMERICS
    // ========================================================================

    #[test]
    fn test_integer_values() {
        for value in [0u64, 7, 42, 1234567890, 9007199254740991] {
            let input = value.to_string();
            let tree = standard(input.as_bytes());
            assert_eq!(kinds(&tree, tree.root()), vec!["numeric"]);
            assert_eq!(numeric_value(&tree), value as f64);
        }
    }

    #[test]
    fn test_decimal_forms() {
        assert!((numeric_value(&standard(b"1.5e3")) - 1500.0).abs() < 1e-9);
        assert_eq!(numeric_value(&standard(b"-.5")), -0.5);
        assert!((numeric_value(&standard(b"1e-2")) - 0.01).abs() < 1e-12);
        assert!((numeric_value(&standard(b"+3.25")) - 3.25).abs() < 1e-12);
    }

    #[test]
    fn test_dimension_splits_into_numeric_and_identifier() {
        let tree = standard(b"10px");
        assert_eq!(kinds(&tree, tree.root()), vec!["numeric", "identifier"]);
        assert_eq!(numeric_value(&tree), 10.0);
    }

    #[test]
    fn test_prefixed_numbers() {
        assert_eq!(numeric_value(&extended(b"0b101_10")), 22.0);
        assert_eq!(numeric_value(&extended(b"0o17")), 15.0);
        assert_eq!(numeric_value(&extended(b"0xFF_FF")), 65535.0);
        assert_eq!(numeric_value(&extended(b"-0X10")), -16.0);

        let tree = standard(b"0x1");
        assert_eq!(kinds(&tree, tree.root()), vec!["numeric", "identifier"]);
    }

    #[test]
    fn test_digit_separators() {
        let tree = extended(b"1_000");
        assert_eq!(kinds(&tree, tree.root()), vec!["numeric"]);
        assert_eq!(numeric_value(&tree), 1000.0);

        let tree = standard(b"1_000");
        assert_eq!(kinds(&tree, tree.root()), vec!["numeric", "identifier"]);
        assert_eq!(numeric_value(&tree), 1.0);

        let tree = extended(b"12__");
        assert_eq!(kinds(&tree, tree.root()), vec!["numeric"]);
        assert_eq!(range(&tree, first(&tree, "numeric")), (0, 4));
        assert_eq!(numeric_value(&tree), 12.0);
    }

    #[test]
    fn test_trailing_dot() {
        let tree = extended(b"1.");
        assert_eq!(kinds(&tree, tree.root()), vec!["numeric"]);
        assert_eq!(range(&tree, first(&tree, "numeric")), (0, 2));

        let tree = standard(b"1.");
        assert_eq!(kinds(&tree, tree.root()), vec!["numeric", "operator"]);
    }

    // ========================================================================
    // URLS, COMMENTS, CDX
    // ========================================================================

    #[test]
    fn test_url() {
        let input = b"url(a.png)";
        let tree = standard(input);
        let url = first(&tree, "url");

        assert!(tree.node(url).valid);
        assert_eq!(range(&tree, url), (0, 10));
        assert_eq!(kinds(&tree, url), vec!["raw"]);
        assert_eq!(tree.text(tree.children(url)[0], input), Some("a.png"));

        let tree = standard(b"URL(x)");
        assert_eq!(kinds(&tree, tree.root()), vec!["url"]);
    }

    #[test]
    fn test_unterminated_url() {
        let tree = standard(b"url(a");
        let url = first(&tree, "url");
        assert!(!tree.node(url).valid);
        assert_eq!(range(&tree, url), (0, 5));
    }

    #[test]
    fn test_url_comment_needs_blank() {
        let input = b"url(/* c */x)";
        let tree = extended(input);
        let url = first(&tree, "url");

        assert!(tree.node(url).valid);
        assert_eq!(range(&tree, url), (0, 13));
        assert_eq!(kinds(&tree, url), vec!["comment", "raw"]);

        let input = b"url(//host/a)";
        let tree = extended(input);
        let url = first(&tree, "url");

        assert!(tree.node(url).valid);
        assert_eq!(kinds(&tree, url), vec!["raw"]);
        assert_eq!(tree.text(tree.children(url)[0], input), Some("//host/a"));
    }

    #[test]
    fn test_block_comment() {
        let input = b"/* a */";
        let tree = standard(input);
        let comment = first(&tree, "comment");

        assert_eq!(tree.kind(comment), &NodeKind::Comment(CommentSyntax::Block));
        assert_eq!(range(&tree, comment), (0, 7));
        assert_eq!(tree.text(tree.children(comment)[0], input), Some(" a "));
    }

    #[test]
    fn test_nested_block_comments() {
        let input = b"/* a /* b */ c */";
        let tree = extended(input);
        let outer = first(&tree, "comment");

        assert!(tree.node(outer).valid);
        assert_eq!(range(&tree, outer), (0, input.len()));
        assert_eq!(kinds(&tree, outer), vec!["raw", "comment", "raw"]);

        let tree = standard(input);
        let root = tree.root();
        assert_eq!(range(&tree, tree.children(root)[0]), (0, 12));
    }

    #[test]
    fn test_line_comment() {
        let input = b"// x\ny";
        let tree = extended(input);
        let root = tree.root();

        assert_eq!(kinds(&tree, root), vec!["comment", "identifier"]);
        let comment = tree.children(root)[0];
        assert_eq!(tree.kind(comment), &NodeKind::Comment(CommentSyntax::Line));
        assert_eq!(range(&tree, comment), (0, 5));
    }

    #[test]
    fn test_unterminated_comment() {
        let tree = standard(b"/* x");
        assert!(!tree.node(first(&tree, "comment")).valid);

        // Line comments may end with the input
        let tree = extended(b"// x");
        assert!(tree.node(first(&tree, "comment")).valid);
    }

    #[test]
    fn test_cdx() {
        let tree = standard(b"<!-- a -->");
        assert_eq!(
            kinds(&tree, tree.root()),
            vec!["cdx", "blank", "identifier", "blank", "cdx"]
        );
    }

    // ========================================================================
    // FRAGMENTS
    // ========================================================================

    fn with_quasi() -> LexerOptions {
        LexerOptions::standard().with_quasi(vec![ContextSelector::Any], vec!["#{}"])
    }

    #[test]
    fn test_quasi_in_root() {
        let input = b"a #{b} c";
        let tree = lex(input, with_quasi());
        let quasi = first(&tree, "quasi");

        assert_eq!(
            tree.kind(quasi),
            &NodeKind::Quasi {
                syntax: "#{}".to_string()
            }
        );
        assert!(tree.node(quasi).valid);
        assert_eq!(range(&tree, quasi), (2, 6));
        assert_eq!(kinds(&tree, quasi), vec!["operator", "group"]);
        assert_eq!(
            kinds(&tree, tree.root()),
            vec!["identifier", "blank", "quasi", "blank", "identifier"]
        );
        assert_partition(&tree, input);
    }

    #[test]
    fn test_quasi_in_string() {
        let tree = lex(b"\"x#{y}z\"", with_quasi());
        let quoted = first(&tree, "quoted");

        assert!(tree.node(quoted).valid);
        assert_eq!(kinds(&tree, quoted), vec!["raw", "quasi", "raw"]);
    }

    #[test]
    fn test_quasi_outside_selected_contexts() {
        let options =
            LexerOptions::standard().with_quasi(vec![ContextSelector::Quoted], vec!["#{}"]);
        let tree = lex(b"#{b}", options);
        assert_eq!(kinds(&tree, tree.root()), vec!["operator", "group"]);
    }

    #[test]
    fn test_annotation() {
        let options = LexerOptions::standard().with_annotation(Placement::Inner, "@[]");
        let tree = lex(b"@[x] ", options);
        let annotation = first(&tree, "annotation");

        assert!(tree.node(annotation).valid);
        assert_eq!(
            tree.kind(annotation),
            &NodeKind::Annotation {
                syntax: "@[]".to_string(),
                placement: Placement::Inner,
            }
        );
        assert_eq!(range(&tree, annotation), (0, 4));
    }

    #[test]
    fn test_unterminated_quasi() {
        let tree = lex(b"#{a", with_quasi());
        assert!(!tree.node(first(&tree, "quasi")).valid);
        assert!(!tree.node(first(&tree, "group")).valid);
    }

    #[test]
    fn test_fragment_at_end_of_input_is_invalid() {
        let mut lexer = Lexer::with_options(with_quasi()).unwrap();
        let tree = lexer.tokenize(b"#{b}");
        let quasi = first(&tree, "quasi");

        // The group closed, but the fragment itself was still open
        assert!(!tree.node(quasi).valid);
        assert!(tree.node(first(&tree, "group")).valid);
        assert_eq!(range(&tree, quasi), (0, 4));
        assert_eq!(lexer.metrics().recoveries, 1);

        let options = LexerOptions::standard().with_annotation(Placement::Outer, "@[]");
        let tree = lex(b"@[x]", options);
        assert!(!tree.node(first(&tree, "annotation")).valid);
    }

    #[test]
    fn test_long_fragment_prefix() {
        let options = LexerOptions::standard().with_quasi(vec![ContextSelector::Any], vec!["!@#{}"]);
        let input = b"!@#{x} ";
        let tree = lex(input, options);
        let quasi = first(&tree, "quasi");

        assert!(tree.node(quasi).valid);
        assert_eq!(range(&tree, quasi), (0, 6));
        assert_eq!(
            kinds(&tree, quasi),
            vec!["operator", "operator", "operator", "group"]
        );
        assert_partition(&tree, input);
    }

    // ========================================================================
    // POSITIONS
    // ========================================================================

    #[test]
    fn test_crlf_positions() {
        let tree = standard(b"a\r\nb");
        let root = tree.root();
        let b = tree.children(root)[2];
        let begin = tree.node(b).span.begin;

        assert_eq!(begin.absolute.byte, 3);
        assert_eq!(begin.line, 1);
        assert_eq!(begin.relative.byte, 0);
        assert_eq!(range(&tree, tree.children(root)[1]), (1, 3));
    }

    #[test]
    fn test_multibyte_positions() {
        let input = "é x".as_bytes();
        let tree = standard(input);
        let root = tree.root();

        assert_eq!(kinds(&tree, root), vec!["identifier", "blank", "identifier"]);
        let x = tree.node(tree.children(root)[2]).span.begin;
        assert_eq!(x.absolute.byte, 3);
        assert_eq!(x.absolute.codepoint, 2);
        assert_eq!(x.column(), 3);
    }

    // ========================================================================
    // PROPERTIES
    // ========================================================================

    const SAMPLES: [&[u8]; 6] = [
        b"a { color: #fff; margin: -1.5em 0 }",
        b"( a ] b ) }",
        b"url( x.png ) /* c */ \"s\\\"q\" 'u\n",
        b"<!-- @media (min-width: 10px) { a[b=\"c\"] {} } -->",
        b"\\41\\ \\",
        b"x\r\ny\n#{z\"",
    ];

    #[test]
    fn test_partition_and_nesting() {
        for input in SAMPLES {
            assert_partition(&standard(input), input);
            assert_partition(&extended(input), input);
        }
    }

    #[test]
    fn test_production_thread() {
        for input in SAMPLES {
            assert_thread(&standard(input));
            assert_thread(&lex(input, with_quasi()));
        }
    }

    #[test]
    fn test_relexing_runs_is_stable() {
        for input in [&b" \t\n "[..], b"]]", b"}"] {
            let tree = standard(input);
            let root = tree.root();
            assert_eq!(tree.children(root).len(), 1);

            let node = tree.node(tree.children(root)[0]);
            let again = standard(node.span.slice(input));
            let child = again.node(again.children(again.root())[0]);
            assert_eq!(child.kind_name(), node.kind_name());
            assert_eq!(child.span, node.span);
        }
    }

    #[test]
    fn test_empty_input() {
        let tree = standard(b"");
        assert!(tree.is_empty());
        assert_thread(&tree);
    }
}
