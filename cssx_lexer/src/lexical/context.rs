//! Lexical contexts as bit flags, so that families can be tested with one mask

use crate::tree::{CommentSyntax, NodeKind};
use crate::utils::ascii;
use std::fmt;
use std::ops::BitOr;

#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Context(u16);

impl Context {
    pub const ROOT: Self = Self(1 << 0);
    pub const PARENTHESES: Self = Self(1 << 1);
    pub const BRACKETS: Self = Self(1 << 2);
    pub const BRACES: Self = Self(1 << 3);
    pub const DOUBLE: Self = Self(1 << 4);
    pub const SINGLE: Self = Self(1 << 5);
    pub const BACKTICK: Self = Self(1 << 6);
    pub const URL: Self = Self(1 << 7);
    pub const BLOCK: Self = Self(1 << 8);
    pub const LINE: Self = Self(1 << 9);
    pub const QUASI: Self = Self(1 << 10);
    pub const ANNOTATION: Self = Self(1 << 11);
    pub const IDENTIFIER: Self = Self(1 << 12);
    pub const HASH: Self = Self(1 << 13);

    pub const GROUP: Self = Self::ROOT
        .union(Self::PARENTHESES)
        .union(Self::BRACKETS)
        .union(Self::BRACES);
    pub const QUOTED: Self = Self::DOUBLE.union(Self::SINGLE).union(Self::BACKTICK);
    pub const COMMENT: Self = Self::BLOCK.union(Self::LINE);
    pub const FRAGMENT: Self = Self::QUASI.union(Self::ANNOTATION);
    pub const NAME: Self = Self::IDENTIFIER.union(Self::HASH);
    pub const ANY: Self = Self((1 << 14) - 1);

    /// Every single context, in flag order
    pub const ALL: [Self; 14] = [
        Self::ROOT,
        Self::PARENTHESES,
        Self::BRACKETS,
        Self::BRACES,
        Self::DOUBLE,
        Self::SINGLE,
        Self::BACKTICK,
        Self::URL,
        Self::BLOCK,
        Self::LINE,
        Self::QUASI,
        Self::ANNOTATION,
        Self::IDENTIFIER,
        Self::HASH,
    ];

    /// Mask from raw bits; bits above the last context are dropped
    pub const fn from_bits(bits: u16) -> Self {
        Self(bits & Self::ANY.0)
    }

    pub const fn bits(self) -> u16 {
        self.0
    }

    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// True when the two share at least one flag
    pub const fn intersects(self, mask: Self) -> bool {
        self.0 & mask.0 != 0
    }

    /// Position of a single flag, used to index per-context tables
    pub(crate) fn index(self) -> usize {
        self.0.trailing_zeros() as usize
    }

    /// Single contexts contained in this mask
    pub fn iter(self) -> impl Iterator<Item = Context> {
        Self::ALL.into_iter().filter(move |c| self.intersects(*c))
    }

    /// Context opened by a group delimiter
    pub fn for_group(begin: u8) -> Self {
        match begin {
            ascii::BRACKET_LEFT => Self::BRACKETS,
            ascii::BRACE_LEFT => Self::BRACES,
            _ => Self::PARENTHESES,
        }
    }

    /// Context opened by a quote character
    pub fn for_quote(quote: u8) -> Self {
        match quote {
            ascii::SINGLE_QUOTE => Self::SINGLE,
            ascii::BACKTICK => Self::BACKTICK,
            _ => Self::DOUBLE,
        }
    }

    /// Context whose contents a branch of this kind holds; leaves have none
    pub fn of(kind: &NodeKind) -> Option<Self> {
        let context = match kind {
            NodeKind::Root => Self::ROOT,
            NodeKind::Group(group) => Self::for_group(group.begin),
            NodeKind::Quoted { quote } => Self::for_quote(*quote),
            NodeKind::Url => Self::URL,
            NodeKind::Comment(CommentSyntax::Block) => Self::BLOCK,
            NodeKind::Comment(CommentSyntax::Line) => Self::LINE,
            NodeKind::Quasi { .. } => Self::QUASI,
            NodeKind::Annotation { .. } => Self::ANNOTATION,
            NodeKind::Identifier { .. } => Self::IDENTIFIER,
            NodeKind::Hash(_) => Self::HASH,
            _ => return None,
        };
        Some(context)
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::ROOT => "root",
            Self::PARENTHESES => "parentheses",
            Self::BRACKETS => "brackets",
            Self::BRACES => "braces",
            Self::DOUBLE => "double",
            Self::SINGLE => "single",
            Self::BACKTICK => "backtick",
            Self::URL => "url",
            Self::BLOCK => "block",
            Self::LINE => "line",
            Self::QUASI => "quasi",
            Self::ANNOTATION => "annotation",
            Self::IDENTIFIER => "identifier",
            Self::HASH => "hash",
            _ => "mask",
        }
    }
}

impl BitOr for Context {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Context({}, {:#06x})", self.name(), self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::{Group, Hash};

    #[test]
    fn test_masks() {
        assert!(Context::ROOT.intersects(Context::GROUP));
        assert!(Context::BRACES.intersects(Context::GROUP));
        assert!(!Context::URL.intersects(Context::GROUP));
        assert!(Context::BACKTICK.intersects(Context::QUOTED));
        assert!(Context::LINE.intersects(Context::COMMENT));
        assert!(Context::ANNOTATION.intersects(Context::FRAGMENT));
        assert!(Context::HASH.intersects(Context::NAME));
        assert_eq!(Context::ANY.iter().count(), 14);
        assert_eq!(Context::GROUP.iter().count(), 4);
    }

    #[test]
    fn test_index() {
        for (index, context) in Context::ALL.iter().enumerate() {
            assert_eq!(context.index(), index);
        }
    }

    #[test]
    fn test_context_of_kind() {
        assert_eq!(
            Context::of(&NodeKind::Group(Group::new(b'['))),
            Some(Context::BRACKETS)
        );
        assert_eq!(
            Context::of(&NodeKind::Quoted { quote: b'`' }),
            Some(Context::BACKTICK)
        );
        assert_eq!(Context::of(&NodeKind::Hash(Hash::default())), Some(Context::HASH));
        assert_eq!(Context::of(&NodeKind::Separator(b',')), None);
    }

    #[test]
    fn test_names() {
        assert_eq!(Context::URL.name(), "url");
        assert_eq!((Context::URL | Context::ROOT).name(), "mask");
    }
}
