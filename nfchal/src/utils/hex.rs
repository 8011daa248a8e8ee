// nfchal/src/utils/hex.rs
//! Hex formatting of bus traffic and frames for trace logs.

use std::fmt::Write;

use crate::constants::BITS_IN_BYTE;

/// `&[0xde, 0xad]` -> `"dead"`
pub fn bytes_to_hex(bytes: &[u8]) -> String {
    bytes.iter().fold(String::with_capacity(bytes.len() * 2), |mut s, b| {
        // Writing to a String cannot fail
        let _ = write!(s, "{:02x}", b);
        s
    })
}

/// `&[0xde, 0xad]` -> `"de ad"`
pub fn bytes_to_hex_spaced(bytes: &[u8]) -> String {
    let mut s = String::with_capacity(bytes.len() * 3);
    for (i, b) in bytes.iter().enumerate() {
        if i != 0 {
            s.push(' ');
        }
        let _ = write!(s, "{:02x}", b);
    }
    s
}

/// Spaced hex of the first `bits` bits, marking a partial last byte with
/// its bit count, e.g. `"93 20"` or `"93 2/4"`.
pub fn frame_to_hex(data: &[u8], bits: usize) -> String {
    let bytes = bits.div_ceil(BITS_IN_BYTE).min(data.len());
    let mut s = bytes_to_hex_spaced(&data[..bytes]);
    let partial = bits % BITS_IN_BYTE;
    if partial != 0 && bytes == bits.div_ceil(BITS_IN_BYTE) {
        let _ = write!(s, "/{}", partial);
    }
    s
}

/// Parse hex with optional ASCII whitespace between digits.
pub fn parse_hex(s: &str) -> Result<Vec<u8>, String> {
    let digits: Vec<u8> = s.bytes().filter(|c| !c.is_ascii_whitespace()).collect();
    if digits.len() % 2 != 0 {
        return Err(format!("odd number of hex digits ({})", digits.len()));
    }
    digits
        .chunks(2)
        .map(|pair| {
            let text = std::str::from_utf8(pair).map_err(|e| e.to_string())?;
            u8::from_str_radix(text, 16).map_err(|e| format!("bad hex byte '{}': {}", text, e))
        })
        .collect()
}
