//! Shared primitives for the lexer: byte classes, UTF-8 helpers and positions

pub mod ascii;
pub mod span;
pub mod utf8;

pub use span::{Offset, SourceMap, Span, Stop};
