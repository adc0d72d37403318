//! Byte classification tables for the lexer
//!
//! Every predicate takes a single byte. Bytes above 0x7F belong to no ASCII
//! class but are identifier-start and identifier-continue bytes.

pub const NUL: u8 = 0x00;
pub const BEL: u8 = 0x07;
pub const BS: u8 = 0x08;
pub const TAB: u8 = 0x09;
pub const LF: u8 = 0x0A;
pub const VT: u8 = 0x0B;
pub const FF: u8 = 0x0C;
pub const CR: u8 = 0x0D;
pub const ESC: u8 = 0x1B;
pub const SPACE: u8 = 0x20;
pub const DEL: u8 = 0x7F;

pub const BANG: u8 = b'!';
pub const DOUBLE_QUOTE: u8 = b'"';
pub const HASH: u8 = b'#';
pub const SINGLE_QUOTE: u8 = b'\'';
pub const PAREN_LEFT: u8 = b'(';
pub const PAREN_RIGHT: u8 = b')';
pub const ASTERISK: u8 = b'*';
pub const PLUS: u8 = b'+';
pub const COMMA: u8 = b',';
pub const HYPHEN: u8 = b'-';
pub const DOT: u8 = b'.';
pub const SLASH: u8 = b'/';
pub const SEMICOLON: u8 = b';';
pub const LESS_THAN: u8 = b'<';
pub const GREATER_THAN: u8 = b'>';
pub const BRACKET_LEFT: u8 = b'[';
pub const BACKSLASH: u8 = b'\\';
pub const BRACKET_RIGHT: u8 = b']';
pub const UNDERSCORE: u8 = b'_';
pub const BACKTICK: u8 = b'`';
pub const BRACE_LEFT: u8 = b'{';
pub const BRACE_RIGHT: u8 = b'}';

pub fn is_control(x: u8) -> bool {
    x < SPACE || x == DEL
}

pub fn is_whitespace(x: u8) -> bool {
    x == SPACE || x == TAB
}

pub fn is_newline(x: u8) -> bool {
    x == LF || x == CR || x == FF
}

pub fn is_blank(x: u8) -> bool {
    is_whitespace(x) || is_newline(x)
}

pub fn is_decimal(x: u8) -> bool {
    x.is_ascii_digit()
}

pub fn is_uppercase(x: u8) -> bool {
    x.is_ascii_uppercase()
}

pub fn is_lowercase(x: u8) -> bool {
    x.is_ascii_lowercase()
}

pub fn is_letter(x: u8) -> bool {
    is_uppercase(x) || is_lowercase(x)
}

pub fn is_alphanumeric(x: u8) -> bool {
    is_letter(x) || is_decimal(x)
}

pub fn is_non_ascii(x: u8) -> bool {
    x > DEL
}

/// Identifier-start
pub fn is_ids(x: u8) -> bool {
    is_letter(x) || x == HYPHEN || x == UNDERSCORE || is_non_ascii(x)
}

/// Identifier-continue
pub fn is_idc(x: u8) -> bool {
    is_ids(x) || is_decimal(x)
}

pub fn is_binary(x: u8) -> bool {
    x == b'0' || x == b'1'
}

pub fn is_octal(x: u8) -> bool {
    (b'0'..=b'7').contains(&x)
}

pub fn is_hexadecimal(x: u8) -> bool {
    x.is_ascii_hexdigit()
}

/// Digit predicate for a numeric base (2, 8, 10 or 16)
pub fn is_digit_of(base: u32, x: u8) -> bool {
    match base {
        2 => is_binary(x),
        8 => is_octal(x),
        16 => is_hexadecimal(x),
        _ => is_decimal(x),
    }
}

pub fn is_separator(x: u8) -> bool {
    x == COMMA || x == SEMICOLON
}

pub fn is_operator(x: u8) -> bool {
    matches!(
        x,
        b'!' | b'#'
            | b'$'
            | b'%'
            | b'&'
            | b'*'
            | b'+'
            | b'-'
            | b'.'
            | b'/'
            | b':'
            | b'<'
            | b'='
            | b'>'
            | b'?'
            | b'@'
            | b'^'
            | b'|'
            | b'~'
    )
}

/// Bytes allowed in the prefix of a quasi or annotation syntax
pub fn is_fragment_prefix(x: u8) -> bool {
    is_operator(x)
}

pub fn is_escape(x: u8) -> bool {
    x == BACKSLASH
}

pub fn is_quote(x: u8) -> bool {
    x == DOUBLE_QUOTE || x == SINGLE_QUOTE
}

pub fn is_extended_quote(x: u8) -> bool {
    is_quote(x) || x == BACKTICK
}

pub fn is_begin(x: u8) -> bool {
    x == PAREN_LEFT || x == BRACKET_LEFT || x == BRACE_LEFT
}

pub fn is_end(x: u8) -> bool {
    x == PAREN_RIGHT || x == BRACKET_RIGHT || x == BRACE_RIGHT
}

pub fn is_sign(x: u8) -> bool {
    x == PLUS || x == HYPHEN
}

/// Check whether `begin` and `end` form a matching delimiter pair
pub fn is_complement(begin: u8, end: u8) -> bool {
    is_begin(begin) && complement(begin) == end
}

/// Closing delimiter for an opening one.
///
/// # Panics
///
/// Panics when `begin` is not `(`, `[` or `{`. Callers only pass bytes that
/// already satisfy [`is_begin`].
pub fn complement(begin: u8) -> u8 {
    match begin {
        PAREN_LEFT => PAREN_RIGHT,
        BRACKET_LEFT => BRACKET_RIGHT,
        BRACE_LEFT => BRACE_RIGHT,
        other => panic!("no closing delimiter for byte {:#04x}", other),
    }
}

/// Value of a hexadecimal (or lower base) digit
pub fn parse_digit(x: u8) -> u8 {
    let value = x & 0x0F;
    if x > b'9' {
        value + 9
    } else {
        value
    }
}
