//! Source location tracking for the lexer
//!
//! A [`Stop`] is a snapshot of the scanner position: absolute and line-relative
//! offsets, each counted both in bytes and in codepoints, plus the current line.
//! The engine indexes the raw buffer in bytes while consumers report positions
//! as human-readable line/column pairs. A [`Span`] pairs two stops.
use super::{ascii, utf8};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;

/// A byte offset paired with the matching codepoint offset.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct Offset {
    pub byte: usize,
    pub codepoint: usize,
}

impl Offset {
    pub fn new(byte: usize, codepoint: usize) -> Self {
        Self { byte, codepoint }
    }
}

/// A position in the source buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Stop {
    /// Offset from the start of the buffer
    pub absolute: Offset,
    /// Offset from the start of the current line
    pub relative: Offset,
    /// Line number (0-based)
    pub line: usize,
}

impl Stop {
    /// The zeroed stop at the very start of a buffer
    pub fn empty() -> Self {
        Self::default()
    }

    /// Advance past one byte.
    ///
    /// `next` is the byte following `byte`, if any. A CR directly followed by
    /// an LF is a plain byte; the LF then accounts for the single line break.
    pub fn advance(&mut self, byte: u8, next: Option<u8>) {
        self.absolute.byte += 1;
        self.relative.byte += 1;

        if !utf8::is_continuation(byte) {
            self.absolute.codepoint += 1;
            self.relative.codepoint += 1;
        }

        let crlf_head = byte == ascii::CR && next == Some(ascii::LF);
        if ascii::is_newline(byte) && !crlf_head {
            self.line += 1;
            self.relative = Offset::default();
        }
    }

    /// Advance past every byte of `bytes`
    pub fn advance_bytes(&mut self, bytes: &[u8]) {
        for (index, &byte) in bytes.iter().enumerate() {
            self.advance(byte, bytes.get(index + 1).copied());
        }
    }

    /// Byte offset into the buffer
    pub fn byte(&self) -> usize {
        self.absolute.byte
    }

    /// Line number (1-based)
    pub fn line_number(&self) -> usize {
        self.line + 1
    }

    /// Column in codepoints (1-based)
    pub fn column(&self) -> usize {
        self.relative.codepoint + 1
    }
}

impl fmt::Display for Stop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line_number(), self.column())
    }
}

/// A range of source text from `begin` (inclusive) to `end` (exclusive).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Span {
    pub begin: Stop,
    pub end: Stop,
}

impl Span {
    /// Create a new span
    pub fn new(begin: Stop, end: Stop) -> Self {
        debug_assert!(
            begin.absolute.byte <= end.absolute.byte,
            "Span begin must not be after end"
        );
        Self { begin, end }
    }

    /// Create an open span that begins and ends at `stop`
    pub fn at(stop: Stop) -> Self {
        Self {
            begin: stop,
            end: stop,
        }
    }

    /// Zeroed span
    pub fn empty() -> Self {
        Self::default()
    }

    /// Byte length of the span
    pub fn len(&self) -> usize {
        self.end.absolute.byte.saturating_sub(self.begin.absolute.byte)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Byte range into the source buffer
    pub fn range(&self) -> Range<usize> {
        self.begin.absolute.byte..self.end.absolute.byte
    }

    /// Check if this span contains a byte offset
    pub fn contains(&self, byte: usize) -> bool {
        byte >= self.begin.absolute.byte && byte < self.end.absolute.byte
    }

    /// Check if this span contains another span
    pub fn contains_span(&self, other: &Span) -> bool {
        other.begin.absolute.byte >= self.begin.absolute.byte
            && other.end.absolute.byte <= self.end.absolute.byte
    }

    /// The bytes covered by this span, clamped to the buffer
    pub fn slice<'a>(&self, input: &'a [u8]) -> &'a [u8] {
        let end = self.end.absolute.byte.min(input.len());
        let begin = self.begin.absolute.byte.min(end);
        &input[begin..end]
    }

    /// Decode the covered bytes as text
    pub fn read(&self, input: &[u8]) -> String {
        utf8::decode(self.slice(input))
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.begin.line == self.end.line {
            write!(
                f,
                "{}:{}-{}",
                self.begin.line_number(),
                self.begin.column(),
                self.end.column()
            )
        } else {
            write!(f, "{}-{}", self.begin, self.end)
        }
    }
}

/// Line index over a source buffer, used to render diagnostics
#[derive(Debug, Clone)]
pub struct SourceMap {
    source: Vec<u8>,
    /// Byte offsets of line starts
    line_starts: Vec<usize>,
}

impl SourceMap {
    /// Build a line index, breaking lines exactly where [`Stop::advance`] does
    pub fn new(source: Vec<u8>) -> Self {
        let mut line_starts = vec![0];
        for (offset, &byte) in source.iter().enumerate() {
            let crlf_head = byte == ascii::CR && source.get(offset + 1) == Some(&ascii::LF);
            if ascii::is_newline(byte) && !crlf_head {
                line_starts.push(offset + 1);
            }
        }
        Self {
            source,
            line_starts,
        }
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Text of a line by 1-based number, without its terminator
    pub fn get_line(&self, line_number: usize) -> Option<String> {
        let index = line_number.checked_sub(1)?;
        let start = *self.line_starts.get(index)?;
        let end = self
            .line_starts
            .get(index + 1)
            .copied()
            .unwrap_or(self.source.len());

        let line = &self.source[start..end];
        let trimmed = match line.iter().rposition(|&b| !ascii::is_newline(b)) {
            Some(last) => &line[..=last],
            None => &line[..0],
        };
        Some(utf8::decode(trimmed))
    }

    /// Render a message with the first line of the span underlined
    pub fn format_diagnostic(&self, filename: &str, span: &Span, message: &str) -> String {
        let mut result = String::new();

        result.push_str(&format!("warning: {}\n", message));
        result.push_str(&format!("  --> {}:{}\n", filename, span.begin));

        if let Some(line) = self.get_line(span.begin.line_number()) {
            let number = span.begin.line_number().to_string();
            let padding = " ".repeat(number.len());

            result.push_str(&format!("{} |\n", padding));
            result.push_str(&format!("{} | {}\n", number, line));

            let width = if span.begin.line == span.end.line {
                span.end.column().saturating_sub(span.begin.column())
            } else {
                line.chars().count().saturating_sub(span.begin.column() - 1)
            };

            result.push_str(&format!(
                "{} | {}{}\n",
                padding,
                " ".repeat(span.begin.column() - 1),
                "^".repeat(width.max(1))
            ));
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stop_after(input: &[u8]) -> Stop {
        let mut stop = Stop::empty();
        stop.advance_bytes(input);
        stop
    }

    #[test]
    fn test_empty_stop() {
        let stop = Stop::empty();
        assert_eq!(stop.absolute, Offset::new(0, 0));
        assert_eq!(stop.relative, Offset::new(0, 0));
        assert_eq!(stop.line, 0);
        assert_eq!(stop.to_string(), "1:1");
    }

    #[test]
    fn test_advance_counts_codepoints() {
        let stop = stop_after("aé€".as_bytes());
        assert_eq!(stop.absolute.byte, 6);
        assert_eq!(stop.absolute.codepoint, 3);
        assert_eq!(stop.relative.codepoint, 3);
    }

    #[test]
    fn test_newline_resets_relative_offsets() {
        let stop = stop_after(b"ab\ncd");
        assert_eq!(stop.line, 1);
        assert_eq!(stop.relative, Offset::new(2, 2));
        assert_eq!(stop.absolute, Offset::new(5, 5));
    }

    #[test]
    fn test_crlf_is_single_line_break() {
        let stop = stop_after(b"a\r\nb");
        assert_eq!(stop.line, 1);
        assert_eq!(stop.relative, Offset::new(1, 1));

        let lone = stop_after(b"a\rb\x0cc");
        assert_eq!(lone.line, 2);
    }

    #[test]
    fn test_span_slice_and_read() {
        let input = b"hello world";
        let begin = stop_after(b"hello ");
        let end = stop_after(b"hello world");
        let span = Span::new(begin, end);

        assert_eq!(span.len(), 5);
        assert_eq!(span.range(), 6..11);
        assert_eq!(span.slice(input), b"world");
        assert_eq!(span.read(input), "world");
        assert!(span.contains(6));
        assert!(!span.contains(11));
    }

    #[test]
    fn test_span_display() {
        let span = Span::new(stop_after(b"ab"), stop_after(b"abcd"));
        assert_eq!(span.to_string(), "1:3-5");
    }

    #[test]
    fn test_source_map_lines() {
        let map = SourceMap::new(b"one\r\ntwo\nthree".to_vec());
        assert_eq!(map.line_count(), 3);
        assert_eq!(map.get_line(1).as_deref(), Some("one"));
        assert_eq!(map.get_line(2).as_deref(), Some("two"));
        assert_eq!(map.get_line(3).as_deref(), Some("three"));
        assert_eq!(map.get_line(0), None);
        assert_eq!(map.get_line(4), None);
    }

    #[test]
    fn test_format_diagnostic() {
        let source = b"a {\n  color: \"red\n}".to_vec();
        let map = SourceMap::new(source.clone());
        let span = Span::new(stop_after(b"a {\n  color: "), stop_after(b"a {\n  color: \"red"));

        let rendered = map.format_diagnostic("style.cssx", &span, "unterminated string");
        assert!(rendered.contains("style.cssx:2:10"));
        assert!(rendered.contains("2 |   color: \"red"));
        assert!(rendered.contains("^^^^"));
    }
}
