//! Numeric literal readers
//!
//! Digits are stored by value per part and evaluated once the literal ends.
//! With extended numbers, `_` separates digits; a trailing `_` or `__` ends
//! the literal and is swallowed by it.

use super::Scanner;
use crate::tree::{NodeId, NodeKind, Numeric};
use crate::utils::ascii;

/// Part of a decimal literal that receives the next digit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Part {
    Integer,
    Fraction,
    Exponent,
}

impl Scanner<'_> {
    pub(super) fn read_numeric(&mut self) -> bool {
        self.read_numeric_prefixed(2, b'b')
            || self.read_numeric_prefixed(8, b'o')
            || self.read_numeric_prefixed(16, b'x')
            || self.read_numeric_decimal()
    }

    fn digit_of(&self, n: usize, base: u32) -> bool {
        self.peek(n).is_some_and(|x| ascii::is_digit_of(base, x))
    }

    /// `[+-]?0b101`, `0o17` or `0xFF`, with extended numbers only
    fn read_numeric_prefixed(&mut self, base: u32, letter: u8) -> bool {
        if !self.options.extended_numbers {
            return false;
        }

        let (negative, prefix) =
            if self.at(0, b'0') && self.letter(1, letter) && self.digit_of(2, base) {
                (false, 2)
            } else if self.is(0, ascii::is_sign)
                && self.at(1, b'0')
                && self.letter(2, letter)
                && self.digit_of(3, base)
            {
                (self.at(0, ascii::HYPHEN), 3)
            } else {
                return false;
            };

        let id = self.produce(NodeKind::Numeric(Numeric::new(base)));
        self.consume(prefix);

        let mut numeric = Numeric::new(base);
        numeric.int_negative = negative;

        while let Some(a) = self.peek(0) {
            if ascii::is_digit_of(base, a) {
                numeric.integer.push(ascii::parse_digit(a));
                self.consume(1);
            } else if a == ascii::UNDERSCORE && self.digit_of(1, base) {
                if let Some(b) = self.peek(1) {
                    numeric.integer.push(ascii::parse_digit(b));
                }
                self.consume(2);
            } else if a == ascii::UNDERSCORE {
                self.consume(self.trailing_separator_length());
                break;
            } else {
                break;
            }
        }

        self.finish_numeric(id, numeric);
        true
    }

    /// `[+-]?(digits)(.digits)?(e[+-]?digits)?` or a leading-dot fraction
    fn read_numeric_decimal(&mut self) -> bool {
        let extended = self.options.extended_numbers;

        let (negative, mut part, prefix) = if self.is(0, ascii::is_decimal) {
            (false, Part::Integer, 0)
        } else if self.at(0, ascii::DOT) && self.is(1, ascii::is_decimal) {
            (false, Part::Fraction, 1)
        } else if self.is(0, ascii::is_sign) && self.is(1, ascii::is_decimal) {
            (self.at(0, ascii::HYPHEN), Part::Integer, 1)
        } else if self.is(0, ascii::is_sign)
            && self.at(1, ascii::DOT)
            && self.is(2, ascii::is_decimal)
        {
            (self.at(0, ascii::HYPHEN), Part::Fraction, 2)
        } else {
            return false;
        };

        let id = self.produce(NodeKind::Numeric(Numeric::new(10)));
        self.consume(prefix);

        let mut numeric = Numeric::new(10);
        numeric.int_negative = negative;

        while let Some(a) = self.peek(0) {
            let digit = |n: usize| self.peek(n).filter(|&x| ascii::is_decimal(x));

            if ascii::is_decimal(a) {
                push_digit(&mut numeric, part, a);
                self.consume(1);
            } else if extended && a == ascii::UNDERSCORE && digit(1).is_some() {
                if let Some(b) = digit(1) {
                    push_digit(&mut numeric, part, b);
                }
                self.consume(2);
            } else if part == Part::Integer && a == ascii::DOT && digit(1).is_some() {
                part = Part::Fraction;
                if let Some(b) = digit(1) {
                    push_digit(&mut numeric, part, b);
                }
                self.consume(2);
            } else if extended && part == Part::Integer && a == ascii::DOT {
                part = Part::Fraction;
                self.consume(1);
            } else if part != Part::Exponent && a | 0x20 == b'e' && digit(1).is_some() {
                part = Part::Exponent;
                if let Some(b) = digit(1) {
                    push_digit(&mut numeric, part, b);
                }
                self.consume(2);
            } else if part != Part::Exponent
                && a | 0x20 == b'e'
                && self.is(1, ascii::is_sign)
                && digit(2).is_some()
            {
                part = Part::Exponent;
                numeric.exp_negative = self.at(1, ascii::HYPHEN);
                if let Some(c) = digit(2) {
                    push_digit(&mut numeric, part, c);
                }
                self.consume(3);
            } else if extended && a == ascii::UNDERSCORE {
                self.consume(self.trailing_separator_length());
                break;
            } else {
                break;
            }
        }

        self.finish_numeric(id, numeric);
        true
    }

    /// `__` or `_` at the end of a literal
    fn trailing_separator_length(&self) -> usize {
        if self.at(1, ascii::UNDERSCORE) {
            2
        } else {
            1
        }
    }

    fn finish_numeric(&mut self, id: NodeId, mut numeric: Numeric) {
        numeric.evaluate();
        if let NodeKind::Numeric(slot) = &mut self.tree.node_mut(id).kind {
            *slot = numeric;
        }
    }
}

fn push_digit(numeric: &mut Numeric, part: Part, byte: u8) {
    let digit = ascii::parse_digit(byte);
    match part {
        Part::Integer => numeric.integer.push(digit),
        Part::Fraction => numeric.fraction.push(digit),
        Part::Exponent => numeric.exponent.push(digit),
    }
}
