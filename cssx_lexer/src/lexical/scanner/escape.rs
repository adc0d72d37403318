//! Escape sequence readers
//!
//! A regular escape is tried as an extended escape, then as a CSS hex escape,
//! then as a literal escape of the next codepoint. A backslash before a line
//! break or at the end of input is a line continuation with no codepoint.

use super::Scanner;
use crate::config::constants::lexical::MAX_STANDARD_ESCAPE_DIGITS;
use crate::logging::codes;
use crate::tree::{Escape, NodeKind};
use crate::utils::{ascii, utf8, Span};

/// Codepoint of a named single-character escape such as `\n`
fn named(x: u8) -> Option<u32> {
    let codepoint = match x {
        b'0' => ascii::NUL,
        b'a' => ascii::BEL,
        b'b' => ascii::BS,
        b'e' => ascii::ESC,
        b'f' => ascii::FF,
        b'n' => ascii::LF,
        b'r' => ascii::CR,
        b't' => ascii::TAB,
        b'v' => ascii::VT,
        _ => return None,
    };
    Some(codepoint as u32)
}

impl Scanner<'_> {
    pub(super) fn read_escape_regular(&mut self) -> bool {
        self.read_escape_extended() || self.read_escape_standard() || self.read_escape_literal()
    }

    fn produce_escape(&mut self, codepoint: Option<u32>, length: usize) {
        self.produce(NodeKind::Escape(Escape::new(codepoint)));
        self.consume(length);
    }

    /// Exactly `count` hex digits starting at `n`
    fn hex_digits(&self, n: usize, count: usize) -> Option<u32> {
        (n..n + count).try_fold(0u32, |codepoint, index| {
            let digit = self.peek(index).filter(|&x| ascii::is_hexadecimal(x))?;
            Some(codepoint << 4 | ascii::parse_digit(digit) as u32)
        })
    }

    /// `\n` and friends, `\xHH`, `\uHHHH`, `\dD` and `\u{H+}`
    fn read_escape_extended(&mut self) -> bool {
        if !self.options.extended_escapes || !self.at(0, ascii::BACKSLASH) {
            return false;
        }
        let Some(b) = self.peek(1) else {
            return false;
        };

        if let Some(codepoint) = named(b) {
            self.produce_escape(Some(codepoint), 2);
            return true;
        }

        if b == b'x' {
            if let Some(codepoint) = self.hex_digits(2, 2) {
                self.produce_escape(Some(codepoint), 4);
                return true;
            }
        }

        if b == b'u' {
            if let Some(codepoint) = self.hex_digits(2, 4) {
                self.produce_escape(Some(codepoint), 6);
                return true;
            }
        }

        // The digit's own character code, not its value
        if b == b'd' {
            if let Some(digit) = self.peek(2).filter(|&x| ascii::is_decimal(x)) {
                self.produce_escape(Some(digit as u32), 3);
                return true;
            }
        }

        if b == b'u' && self.at(2, ascii::BRACE_LEFT) && !self.at(3, ascii::BRACE_RIGHT) {
            self.read_escape_supplementary();
            return true;
        }

        false
    }

    /// `\u{H+}`; without the closing brace the escape keeps the digits seen
    /// so far and is marked invalid
    fn read_escape_supplementary(&mut self) {
        let mut codepoint = 0u32;
        let mut length = 3;

        while let Some(digit) = self.peek(length).filter(|&x| ascii::is_hexadecimal(x)) {
            codepoint = codepoint
                .saturating_mul(16)
                .saturating_add(ascii::parse_digit(digit) as u32);
            length += 1;
        }

        let closed = self.at(length, ascii::BRACE_RIGHT);
        if closed {
            length += 1;
        }

        let begin = self.stop;
        let id = self.produce(NodeKind::Escape(Escape::new(Some(codepoint))));
        self.consume(length);

        if !closed {
            self.invalidate(id);
            self.recover(
                codes::lexical::UNTERMINATED_ESCAPE,
                "Escape is missing its closing brace",
                Span::new(begin, self.stop),
            );
        }
    }

    /// CSS escape: up to six hex digits, then one optional space, tab or CRLF
    fn read_escape_standard(&mut self) -> bool {
        if !self.options.standard_escapes
            || !self.at(0, ascii::BACKSLASH)
            || !self.is(1, ascii::is_hexadecimal)
        {
            return false;
        }

        let mut codepoint = 0u32;
        let mut length = 1;

        while length <= MAX_STANDARD_ESCAPE_DIGITS {
            let Some(digit) = self.peek(length).filter(|&x| ascii::is_hexadecimal(x)) else {
                break;
            };
            codepoint = codepoint << 4 | ascii::parse_digit(digit) as u32;
            length += 1;
        }

        if self.crlf(length) {
            length += 2;
        } else if self.is(length, ascii::is_whitespace) {
            length += 1;
        }

        self.produce_escape(Some(codepoint), length);
        true
    }

    /// Backslash and the single codepoint after it
    fn read_escape_literal(&mut self) -> bool {
        if !self.at(0, ascii::BACKSLASH) {
            return false;
        }
        let Some(b) = self.peek(1).filter(|&x| !ascii::is_newline(x)) else {
            return false;
        };

        let codepoint = utf8::value(&self.input[..self.length], self.cursor + 1);
        self.produce_escape(Some(codepoint), utf8::length(b) + 1);
        true
    }

    /// Backslash before a line break, or as the last byte
    pub(super) fn read_escape_newline(&mut self) -> bool {
        if !self.at(0, ascii::BACKSLASH) {
            return false;
        }
        if self.peek(1).is_some_and(|x| !ascii::is_newline(x)) {
            return false;
        }

        let length = 1 + self.newline_length(1).unwrap_or(0);
        self.produce_escape(None, length);
        true
    }
}
