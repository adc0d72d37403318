//! Node types of the lexical tree

use super::NodeId;
use crate::utils::{ascii, Span};
use serde::{Deserialize, Serialize};
use std::cell::OnceCell;

/// Where an annotation attaches relative to the construct it annotates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Placement {
    #[default]
    Outer,
    Inner,
}

impl Placement {
    pub fn as_str(&self) -> &'static str {
        match self {
            Placement::Outer => "outer",
            Placement::Inner => "inner",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommentSyntax {
    /// `/* ... */`
    Block,
    /// `// ...` up to the end of the line
    Line,
}

/// HTML comment markers tolerated in stylesheets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CdxSyntax {
    /// `<!--`
    Open,
    /// `-->`
    Close,
}

impl CdxSyntax {
    pub fn as_str(&self) -> &'static str {
        match self {
            CdxSyntax::Open => "<!--",
            CdxSyntax::Close => "-->",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ColorValidity {
    #[default]
    Unchecked,
    Valid,
    Invalid,
}

/// Parenthesis, bracket or brace group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Group {
    pub begin: u8,
    pub end: u8,
}

impl Group {
    /// # Panics
    ///
    /// Panics when `begin` is not an opening delimiter.
    pub fn new(begin: u8) -> Self {
        Self {
            begin,
            end: ascii::complement(begin),
        }
    }
}

/// `#`-prefixed name or color literal
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Hash {
    /// Whether the text after `#` qualifies as an identifier
    pub id: bool,
    pub color: ColorValidity,
    /// Hex digits collected as ASCII bytes; emptied once the color is invalid
    pub bytes: Vec<u8>,
    pub value: String,
}

impl Hash {
    /// Record one hex digit, or invalidate the color on anything else
    pub fn accumulate(&mut self, byte: u8) {
        if self.color == ColorValidity::Invalid {
            return;
        }
        if ascii::is_hexadecimal(byte) {
            self.bytes.push(byte);
        } else {
            self.invalidate();
        }
    }

    pub fn invalidate(&mut self) {
        self.color = ColorValidity::Invalid;
        self.bytes.clear();
    }

    /// Settle the color by digit count; returns the node validity
    pub fn classify(&mut self) -> bool {
        if self.color != ColorValidity::Invalid
            && crate::config::constants::VALID_COLOR_DIGIT_COUNTS.contains(&self.bytes.len())
        {
            self.color = ColorValidity::Valid;
        } else {
            self.invalidate();
        }
        self.id || self.color == ColorValidity::Valid
    }
}

/// Numeric literal with its digits kept per part
#[derive(Debug, Clone, PartialEq)]
pub struct Numeric {
    /// 2, 8, 10 or 16
    pub base: u32,
    pub int_negative: bool,
    pub exp_negative: bool,
    /// Digit values, most significant first
    pub integer: Vec<u8>,
    pub fraction: Vec<u8>,
    pub exponent: Vec<u8>,
    pub value: f64,
}

impl Numeric {
    pub fn new(base: u32) -> Self {
        Self {
            base,
            int_negative: false,
            exp_negative: false,
            integer: Vec::new(),
            fraction: Vec::new(),
            exponent: Vec::new(),
            value: 0.0,
        }
    }

    /// Recompute `value` from the accumulated digits
    pub fn evaluate(&mut self) -> f64 {
        self.value = self.compute();
        self.value
    }

    pub fn compute(&self) -> f64 {
        let base = self.base as f64;

        let mut integer = self
            .integer
            .iter()
            .fold(0.0, |value, &digit| value * base + digit as f64);
        let mut fraction = self
            .fraction
            .iter()
            .rev()
            .fold(0.0, |value, &digit| (value + digit as f64) / base);
        let mut exponent = self
            .exponent
            .iter()
            .fold(0.0, |value, &digit| value * base + digit as f64);

        if self.int_negative {
            integer = -integer;
            fraction = -fraction;
        }
        if self.exp_negative {
            exponent = -exponent;
        }

        (integer + fraction) * base.powf(exponent)
    }
}

/// One decoded escape sequence
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Escape {
    /// `None` for an escaped line break or a trailing backslash
    pub codepoint: Option<u32>,
    pub value: String,
}

impl Escape {
    pub fn new(codepoint: Option<u32>) -> Self {
        let mut escape = Self {
            codepoint,
            value: String::new(),
        };
        escape.evaluate();
        escape
    }

    /// Recompute `value` from the codepoint.
    ///
    /// Surrogates and values above U+10FFFF decode to U+FFFD.
    pub fn evaluate(&mut self) -> &str {
        self.value.clear();
        if let Some(codepoint) = self.codepoint {
            self.value
                .push(char::from_u32(codepoint).unwrap_or(char::REPLACEMENT_CHARACTER));
        }
        &self.value
    }
}

/// Source text decoded on first read
#[derive(Debug, Clone, Default)]
pub struct LazyText(OnceCell<String>);

impl LazyText {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn read(&self, span: &Span, input: &[u8]) -> &str {
        self.0.get_or_init(|| span.read(input))
    }

    /// Text decoded so far, if any read happened
    pub fn cached(&self) -> Option<&str> {
        self.0.get().map(String::as_str)
    }
}

impl PartialEq for LazyText {
    fn eq(&self, _other: &Self) -> bool {
        // The text is a view of the span, which nodes compare separately
        true
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    // Branches
    Root,
    Group(Group),
    Quoted { quote: u8 },
    Url,
    Comment(CommentSyntax),
    Quasi { syntax: String },
    Annotation { syntax: String, placement: Placement },
    Identifier { value: String },
    Hash(Hash),

    // Leaves
    Numeric(Numeric),
    Separator(u8),
    Operator(u8),
    Blank(LazyText),
    Cdx(CdxSyntax),
    Unexpected(LazyText),
    Escape(Escape),
    Raw(LazyText),
}

impl NodeKind {
    pub fn is_branch(&self) -> bool {
        matches!(
            self,
            NodeKind::Root
                | NodeKind::Group(_)
                | NodeKind::Quoted { .. }
                | NodeKind::Url
                | NodeKind::Comment(_)
                | NodeKind::Quasi { .. }
                | NodeKind::Annotation { .. }
                | NodeKind::Identifier { .. }
                | NodeKind::Hash(_)
        )
    }

    pub fn name(&self) -> &'static str {
        match self {
            NodeKind::Root => "root",
            NodeKind::Group(_) => "group",
            NodeKind::Quoted { .. } => "quoted",
            NodeKind::Url => "url",
            NodeKind::Comment(_) => "comment",
            NodeKind::Quasi { .. } => "quasi",
            NodeKind::Annotation { .. } => "annotation",
            NodeKind::Identifier { .. } => "identifier",
            NodeKind::Hash(_) => "hash",
            NodeKind::Numeric(_) => "numeric",
            NodeKind::Separator(_) => "separator",
            NodeKind::Operator(_) => "operator",
            NodeKind::Blank(_) => "blank",
            NodeKind::Cdx(_) => "cdx",
            NodeKind::Unexpected(_) => "unexpected",
            NodeKind::Escape(_) => "escape",
            NodeKind::Raw(_) => "raw",
        }
    }

    /// Lazily decoded text cell for run-of-text leaves
    pub fn lazy_text(&self) -> Option<&LazyText> {
        match self {
            NodeKind::Blank(text) | NodeKind::Unexpected(text) | NodeKind::Raw(text) => Some(text),
            _ => None,
        }
    }
}

/// A node of the lexical tree.
///
/// `parent`, `prev` and `next` are non-owning indices into the owning tree;
/// `children` is the owning structure.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub kind: NodeKind,
    pub span: Span,
    pub valid: bool,
    pub(crate) parent: Option<NodeId>,
    pub(crate) prev: Option<NodeId>,
    pub(crate) next: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
}

impl Node {
    pub(crate) fn new(kind: NodeKind, span: Span) -> Self {
        Self {
            kind,
            span,
            valid: true,
            parent: None,
            prev: None,
            next: None,
            children: Vec::new(),
        }
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Previous node in production order
    pub fn prev(&self) -> Option<NodeId> {
        self.prev
    }

    /// Next node in production order
    pub fn next(&self) -> Option<NodeId> {
        self.next
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn is_branch(&self) -> bool {
        self.kind.is_branch()
    }

    pub fn is_leaf(&self) -> bool {
        !self.kind.is_branch()
    }

    pub fn kind_name(&self) -> &'static str {
        self.kind.name()
    }
}
