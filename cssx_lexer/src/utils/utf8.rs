//! UTF-8 codec helpers working on raw byte buffers

/// Check whether a byte continues a multi-byte sequence
pub fn is_continuation(byte: u8) -> bool {
    byte & 0xC0 == 0x80
}

/// Expected sequence length for a leading byte
pub fn length(lead: u8) -> usize {
    if lead & 0xF8 == 0xF0 {
        4
    } else if lead & 0xF0 == 0xE0 {
        3
    } else if lead & 0xE0 == 0xC0 {
        2
    } else {
        1
    }
}

/// Decode the codepoint value starting at `offset`.
///
/// Sequences cut short by the end of `input` decode from the bytes present.
pub fn value(input: &[u8], offset: usize) -> u32 {
    let Some(&lead) = input.get(offset) else {
        return 0;
    };

    let size = length(lead);
    let mut codepoint = match size {
        4 => (lead & 0x07) as u32,
        3 => (lead & 0x0F) as u32,
        2 => (lead & 0x1F) as u32,
        _ => return lead as u32,
    };

    for index in 1..size {
        match input.get(offset + index) {
            Some(&byte) => codepoint = (codepoint << 6) | (byte & 0x3F) as u32,
            None => break,
        }
    }

    codepoint
}

/// Decode bytes to text, replacing malformed sequences
pub fn decode(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

/// Encode text to bytes
pub fn encode(text: &str) -> Vec<u8> {
    text.as_bytes().to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length() {
        assert_eq!(length(b'a'), 1);
        assert_eq!(length(0xC3), 2);
        assert_eq!(length(0xE2), 3);
        assert_eq!(length(0xF0), 4);
        assert_eq!(length(0x80), 1);
    }

    #[test]
    fn test_value() {
        let input = "aé€😀".as_bytes();
        assert_eq!(value(input, 0), 'a' as u32);
        assert_eq!(value(input, 1), 'é' as u32);
        assert_eq!(value(input, 3), '€' as u32);
        assert_eq!(value(input, 6), '😀' as u32);
        assert_eq!(value(input, 99), 0);
    }

    #[test]
    fn test_value_truncated() {
        let input = [0xE2, 0x82];
        assert_eq!(value(&input, 0), (0x02 << 6) | 0x02);
    }

    #[test]
    fn test_decode_and_encode() {
        assert_eq!(decode("héllo".as_bytes()), "héllo");
        assert_eq!(decode(&[0x61, 0xFF]), "a\u{FFFD}");
        assert_eq!(encode("é"), vec![0xC3, 0xA9]);
        assert!(is_continuation(0xA9));
        assert!(!is_continuation(0xC3));
    }
}
