//! Single-production leaf readers

use super::Scanner;
use crate::logging::codes;
use crate::tree::{CdxSyntax, LazyText, NodeKind};
use crate::utils::{ascii, Span};

impl Scanner<'_> {
    /// A run of spaces, tabs and line breaks
    pub(super) fn read_blank(&mut self) -> bool {
        if !self.is(0, ascii::is_blank) {
            return false;
        }

        self.produce(NodeKind::Blank(LazyText::new()));
        while self.is(0, ascii::is_blank) {
            self.consume(1);
        }
        true
    }

    /// `,` or `;`
    pub(super) fn read_separator(&mut self) -> bool {
        let Some(separator) = self.peek(0).filter(|&x| ascii::is_separator(x)) else {
            return false;
        };

        self.produce(NodeKind::Separator(separator));
        self.consume(1);
        true
    }

    pub(super) fn read_operator(&mut self) -> bool {
        let Some(operator) = self.peek(0).filter(|&x| ascii::is_operator(x)) else {
            return false;
        };

        self.produce(NodeKind::Operator(operator));
        self.consume(1);
        true
    }

    /// `<!--` or `-->`
    pub(super) fn read_cdx(&mut self) -> bool {
        if !self.options.standard_cdx {
            return false;
        }

        if self.matches(b"<!--") {
            self.produce(NodeKind::Cdx(CdxSyntax::Open));
            self.consume(4);
            true
        } else if self.matches(b"-->") {
            self.produce(NodeKind::Cdx(CdxSyntax::Close));
            self.consume(3);
            true
        } else {
            false
        }
    }

    /// One byte of verbatim text, extending the pending run if there is one
    pub(super) fn read_raw(&mut self) -> bool {
        if !matches!(self.focus_kind(), Some(NodeKind::Raw(_))) {
            self.produce(NodeKind::Raw(LazyText::new()));
        }
        self.consume(1);
        true
    }

    /// Catch-all: one byte that starts nothing, extending the pending
    /// Unexpected run if there is one
    ///
    /// Only the first byte of a run reports an unexpected character, but
    /// every stray closer in it is reported.
    pub(super) fn read_unexpected(&mut self) -> bool {
        let closer = self.is(0, ascii::is_end);
        let begin = self.stop;

        if matches!(self.focus_kind(), Some(NodeKind::Unexpected(_))) {
            self.consume(1);
            if closer {
                self.recover(
                    codes::lexical::DANGLING_CLOSER,
                    "Closing delimiter does not match the innermost group",
                    Span::new(begin, self.stop),
                );
            }
            return true;
        }

        let id = self.produce(NodeKind::Unexpected(LazyText::new()));
        self.invalidate(id);
        self.consume(1);

        let span = Span::new(begin, self.stop);
        if closer {
            self.recover(
                codes::lexical::DANGLING_CLOSER,
                "Closing delimiter does not match the innermost group",
                span,
            );
        } else {
            self.recover(
                codes::lexical::UNEXPECTED_CHARACTER,
                "Unexpected character",
                span,
            );
        }
        true
    }
}
