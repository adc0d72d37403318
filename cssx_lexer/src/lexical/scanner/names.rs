//! Identifier and hash readers

use super::Scanner;
use crate::lexical::Context;
use crate::logging::codes;
use crate::tree::{ColorValidity, Hash, LazyText, NodeKind};
use crate::utils::{ascii, Span};

impl Scanner<'_> {
    /// Backslash followed by something other than a line break or the end
    fn escape_starts_at(&self, n: usize) -> bool {
        self.at(n, ascii::BACKSLASH) && self.peek(n + 1).is_some_and(|x| !ascii::is_newline(x))
    }

    // ========================================================================
    // IDENTIFIERS
    // ========================================================================

    /// Identifier start: an IDS byte (a hyphen only when an IDC byte or an
    /// escape follows), or an escape. Only switches the context.
    pub(super) fn read_identifier_opening(&mut self) -> bool {
        let starts = match self.peek(0) {
            Some(ascii::HYPHEN) => self.is(1, ascii::is_idc) || self.escape_starts_at(1),
            Some(x) if ascii::is_ids(x) => true,
            _ => self.escape_starts_at(0),
        };
        if !starts {
            return false;
        }

        self.push(
            NodeKind::Identifier {
                value: String::new(),
            },
            Context::IDENTIFIER,
        );
        true
    }

    /// A run of IDC bytes
    pub(super) fn read_identifier_raw(&mut self) -> bool {
        if !self.is(0, ascii::is_idc) {
            return false;
        }

        self.produce(NodeKind::Raw(LazyText::new()));
        while self.is(0, ascii::is_idc) {
            self.consume(1);
        }
        true
    }

    /// Reached when neither an escape nor an IDC byte follows
    pub(super) fn read_identifier_ending(&mut self) -> bool {
        if !self.can_pop() {
            self.halted = true;
            return true;
        }

        self.close_identifier();
        true
    }

    pub(super) fn close_identifier(&mut self) {
        self.advance(None);
        self.tree.evaluate(self.frame.parent, self.input);
        self.pop();
    }

    // ========================================================================
    // HASHES
    // ========================================================================

    /// `#` followed by an IDC byte or an escape. An IDS byte or an escape
    /// makes the hash an identifier; a non-hex IDC byte rules out a color.
    pub(super) fn read_hash_opening(&mut self) -> bool {
        if !self.at(0, ascii::HASH) {
            return false;
        }

        let id = match self.peek(1) {
            Some(x) if ascii::is_ids(x) => true,
            Some(x) if ascii::is_idc(x) => false,
            _ if self.escape_starts_at(1) => true,
            _ => return false,
        };

        let mut hash = Hash {
            id,
            ..Hash::default()
        };
        if self.peek(1).is_some_and(|x| ascii::is_idc(x) && !ascii::is_hexadecimal(x)) {
            hash.color = ColorValidity::Invalid;
        }

        self.push(NodeKind::Hash(hash), Context::HASH);
        self.consume(1);
        true
    }

    /// A run of IDC bytes, each one fed to the color digits
    pub(super) fn read_hash_raw(&mut self) -> bool {
        if !self.is(0, ascii::is_idc) {
            return false;
        }

        self.produce(NodeKind::Raw(LazyText::new()));
        while let Some(byte) = self.peek(0).filter(|&x| ascii::is_idc(x)) {
            self.consume(1);
            if let NodeKind::Hash(hash) = &mut self.tree.node_mut(self.frame.parent).kind {
                hash.accumulate(byte);
            }
        }
        true
    }

    /// Feed the codepoint of the escape just produced to the color digits
    pub(super) fn accumulate_escape(&mut self) {
        let Some(focus) = self.frame.focus else {
            return;
        };
        let codepoint = match &self.tree.node(focus).kind {
            NodeKind::Escape(escape) => escape.codepoint,
            _ => return,
        };

        if let NodeKind::Hash(hash) = &mut self.tree.node_mut(self.frame.parent).kind {
            match codepoint.and_then(|cp| u8::try_from(cp).ok()) {
                Some(byte) => hash.accumulate(byte),
                None => hash.invalidate(),
            }
        }
    }

    pub(super) fn read_hash_ending(&mut self) -> bool {
        if !self.can_pop() {
            self.halted = true;
            return true;
        }

        self.close_hash();
        true
    }

    /// Classify the color, evaluate the value and close the hash
    pub(super) fn close_hash(&mut self) {
        self.advance(None);

        let parent = self.frame.parent;
        let valid = match &mut self.tree.node_mut(parent).kind {
            NodeKind::Hash(hash) => hash.classify(),
            _ => true,
        };
        self.tree.node_mut(parent).valid = valid;
        self.tree.evaluate(parent, self.input);

        if !valid {
            let span = Span::new(self.tree.node(parent).span.begin, self.stop);
            self.recover(
                codes::lexical::INVALID_HASH_COLOR,
                "Hash is neither a name nor a valid color",
                span,
            );
        }

        self.pop();
    }
}
