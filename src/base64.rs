//! Fixed-width base64 numbers.
//!
//! This is not RFC 4648 base64: there is no padding to 3-byte groups. A value is
//! written in base 64, most significant digit first, using the base64 alphabet, and
//! always with exactly the number of characters the field asks for. Bits that do not
//! fit are dropped.

use crate::error::DecodeError;

pub const ALPHABET: &[u8; 64] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

/// Bits carried per character
pub const BITS_PER_CHAR: u32 = 6;

/// Longest text `decode` accepts. Six characters cover all 32 bits of a `u32`.
pub const MAX_WIDTH: usize = 6;

/// Writes `value` into `out`, one character per 6 bits, filling `out` completely.
///
/// The last character holds the lowest 6 bits. High bits beyond `6 * out.len()`
/// are discarded. The loop always runs `out.len()` times, whatever the value.
#[inline]
pub fn encode(value: impl Into<u32>, out: &mut [u8]) {
    let mut value = value.into();
    for slot in out.iter_mut().rev() {
        *slot = ALPHABET[(value & 0x3F) as usize];
        value >>= BITS_PER_CHAR;
    }
}

/// [`encode`] into a fresh array of `N` characters.
pub fn encode_array<const N: usize>(value: impl Into<u32>) -> [u8; N] {
    let mut out = [b'A'; N];
    encode(value, &mut out);
    out
}

/// Position of `byte` in [`ALPHABET`].
pub const fn symbol_index(byte: u8) -> Option<u8> {
    match byte {
        b'A'..=b'Z' => Some(byte - b'A'),
        b'a'..=b'z' => Some(byte - b'a' + 26),
        b'0'..=b'9' => Some(byte - b'0' + 52),
        b'+' => Some(62),
        b'/' => Some(63),
        _ => None,
    }
}

/// Parses base64 digits, first character most significant.
///
/// Accepts 1 to [`MAX_WIDTH`] characters of any width; callers that read fixed
/// fields check the width themselves (see [`crate::frame::Frame::parse`]).
pub fn decode(text: &[u8]) -> Result<u32, DecodeError> {
    if text.is_empty() {
        return Err(DecodeError::Empty);
    }
    if text.len() > MAX_WIDTH {
        return Err(DecodeError::TooLong { len: text.len() });
    }

    let mut value: u64 = 0;
    for (position, &byte) in text.iter().enumerate() {
        let digit = symbol_index(byte).ok_or(DecodeError::InvalidCharacter { position, byte })?;
        value = (value << BITS_PER_CHAR) | digit as u64;
    }

    u32::try_from(value).map_err(|_| DecodeError::Overflow)
}
