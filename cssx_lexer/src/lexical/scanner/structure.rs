//! Readers for nesting constructs: groups, quoted strings, `url(`, comments
//! and quasi/annotation fragments

use super::Scanner;
use crate::lexical::Context;
use crate::logging::codes;
use crate::tree::{CommentSyntax, Group, NodeKind};
use crate::utils::{ascii, Span};

impl Scanner<'_> {
    // ========================================================================
    // GROUPS
    // ========================================================================

    /// `(`, `[` or `{`
    pub(super) fn read_group_opening(&mut self) -> bool {
        let Some(begin) = self.peek(0).filter(|&x| ascii::is_begin(x)) else {
            return false;
        };

        self.push(NodeKind::Group(Group::new(begin)), Context::for_group(begin));
        self.consume(1);
        true
    }

    /// The closer of the innermost group. Any other closer is declined and
    /// ends up in an Unexpected run.
    pub(super) fn read_group_ending(&mut self) -> bool {
        let Some(end) = self.peek(0).filter(|&x| ascii::is_end(x)) else {
            return false;
        };

        let matching = matches!(self.parent_kind(), NodeKind::Group(group) if group.end == end);
        if !matching || !self.can_pop() {
            return false;
        }

        self.pop();
        self.consume(1);
        true
    }

    // ========================================================================
    // QUOTED
    // ========================================================================

    /// `"` or `'`, and `` ` `` with extended strings
    pub(super) fn read_quoted_opening(&mut self) -> bool {
        let Some(quote) = self.peek(0) else {
            return false;
        };
        if !ascii::is_extended_quote(quote)
            || (!self.options.extended_strings && quote == ascii::BACKTICK)
        {
            return false;
        }

        self.push(NodeKind::Quoted { quote }, Context::for_quote(quote));
        self.consume(1);
        true
    }

    /// The matching quote, or a line break when strings cannot span lines
    pub(super) fn read_quoted_ending(&mut self) -> bool {
        if !self.can_pop() {
            return false;
        }
        let &NodeKind::Quoted { quote } = self.parent_kind() else {
            return false;
        };

        if self.at(0, quote) {
            self.pop();
            self.consume(1);
            return true;
        }

        if self.options.extended_strings {
            return false;
        }
        let Some(length) = self.newline_length(0) else {
            return false;
        };

        let parent = self.frame.parent;
        let span = Span::new(self.tree.node(parent).span.begin, self.stop);
        self.invalidate(parent);
        self.recover(
            codes::lexical::UNTERMINATED_QUOTED,
            "String closed by a line break",
            span,
        );

        self.pop();
        self.consume(length);
        true
    }

    // ========================================================================
    // URLS
    // ========================================================================

    /// `url(`, case-insensitive
    pub(super) fn read_url_opening(&mut self) -> bool {
        if !self.options.standard_urls
            || !self.letter(0, b'u')
            || !self.letter(1, b'r')
            || !self.letter(2, b'l')
            || !self.at(3, ascii::PAREN_LEFT)
        {
            return false;
        }

        self.push(NodeKind::Url, Context::URL);
        self.consume(4);
        true
    }

    pub(super) fn read_url_ending(&mut self) -> bool {
        if !self.at(0, ascii::PAREN_RIGHT) || !self.can_pop() {
            return false;
        }

        self.pop();
        self.consume(1);
        true
    }

    /// A comment inside `url(` only when a blank follows the marker, so that
    /// `url(//host/a.png)` stays a plain path
    pub(super) fn read_url_comment(&mut self) -> bool {
        let marker = self.at(0, ascii::SLASH)
            && (self.at(1, ascii::ASTERISK)
                || (self.options.extended_comments && self.at(1, ascii::SLASH)));

        marker && self.is(2, ascii::is_blank) && self.read_comment_opening()
    }

    // ========================================================================
    // COMMENTS
    // ========================================================================

    pub(super) fn read_comment_opening(&mut self) -> bool {
        self.read_comment_block_opening() || self.read_comment_line_opening()
    }

    /// `/*`; inside a block comment only when comments nest
    pub(super) fn read_comment_block_opening(&mut self) -> bool {
        if !self.at(0, ascii::SLASH) || !self.at(1, ascii::ASTERISK) {
            return false;
        }
        if self.frame.context == Context::BLOCK && !self.options.extended_comments {
            return false;
        }

        self.push(NodeKind::Comment(CommentSyntax::Block), Context::BLOCK);
        self.consume(2);
        true
    }

    /// `//` with extended comments
    pub(super) fn read_comment_line_opening(&mut self) -> bool {
        if !self.options.extended_comments
            || !self.at(0, ascii::SLASH)
            || !self.at(1, ascii::SLASH)
        {
            return false;
        }

        self.push(NodeKind::Comment(CommentSyntax::Line), Context::LINE);
        self.consume(2);
        true
    }

    /// `*/`
    pub(super) fn read_comment_block_ending(&mut self) -> bool {
        if !self.at(0, ascii::ASTERISK) || !self.at(1, ascii::SLASH) || !self.can_pop() {
            return false;
        }

        self.pop();
        self.consume(2);
        true
    }

    /// A line comment ends with its line break, which it includes
    pub(super) fn read_comment_line_ending(&mut self) -> bool {
        let Some(length) = self.newline_length(0) else {
            return false;
        };
        if !self.can_pop() {
            return false;
        }

        self.pop();
        self.consume(length);
        true
    }

    // ========================================================================
    // FRAGMENTS
    // ========================================================================

    /// A quasi syntax defined for the current context. Nothing is consumed:
    /// the prefix is read as operators and the bracket as a group.
    pub(super) fn read_quasi_opening(&mut self) -> bool {
        let definitions = self.definitions;
        let Some(definition) = definitions
            .quasi_for(self.frame.context)
            .iter()
            .find(|definition| self.matches(&definition.pattern))
        else {
            return false;
        };

        self.push(
            NodeKind::Quasi {
                syntax: definition.syntax.clone(),
            },
            Context::QUASI,
        );
        true
    }

    pub(super) fn read_annotation_opening(&mut self) -> bool {
        let definitions = self.definitions;
        let Some(definition) = definitions
            .annotations()
            .iter()
            .find(|definition| self.matches(&definition.pattern))
        else {
            return false;
        };

        self.push(
            NodeKind::Annotation {
                syntax: definition.syntax.clone(),
                placement: definition.placement,
            },
            Context::ANNOTATION,
        );
        true
    }

    /// A fragment closes as soon as its group has
    pub(super) fn read_fragment_ending(&mut self) -> bool {
        if !matches!(self.focus_kind(), Some(NodeKind::Group(_))) || !self.can_pop() {
            return false;
        }

        self.pop();
        true
    }
}
