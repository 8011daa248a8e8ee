// nfchal/src/codec/iso15693.rs
//! ISO15693 framing in subcarrier stream mode.
//!
//! Outbound (reader to card) frames are 1-out-of-4 coded: every 2-bit
//! group becomes one stream byte whose single set bit marks the pulse
//! position. Inbound (card to reader) frames arrive as the raw subcarrier
//! bit stream; each data bit is a 2-bit pattern between a 5-bit SOF and a
//! 5-bit EOF.

use crate::constants::BITS_IN_BYTE;
use crate::{Error, Result};

const TX_SOF: u8 = 0x21;
const TX_SOF_256: u8 = 0x81;
const TX_EOF: u8 = 0x04;
/// Stream bytes per 1-out-of-256 symbol (512 half-slots).
const TX_SYMBOL_256: usize = 64;
/// Pulse position bytes for 2-bit values 0..=3.
const TX_PATTERNS: [u8; 4] = [0x02, 0x08, 0x20, 0x80];

const RX_SOF_SIZE: usize = 5;
const RX_SOF_MASK: u8 = 0x1F;
const RX_SOF: u8 = 0x17;
const RX_EOF_SIZE: usize = 5;
const RX_EOF_MASK: u8 = 0x1F;
const RX_EOF: u8 = 0x1D;
const RX_PATTERN_SIZE: usize = 2;
const RX_PATTERN_MASK: u8 = 0x03;
const RX_PATTERN_0: u8 = 0x01;
const RX_PATTERN_1: u8 = 0x02;

/// Bytes `encode_frame` produces for `bits` input bits.
pub const fn encoded_len(bits: usize) -> usize {
    bits / 2 + 2
}

/// Encode `bits` bits of `data` into `out`, returning the byte count.
///
/// # Panics
/// If `out` is shorter than `bits / 2 + 2` bytes.
pub fn encode_frame(data: &[u8], bits: usize, out: &mut [u8]) -> usize {
    assert!(
        out.len() >= encoded_len(bits),
        "iso15693 encode buffer too small: {} < {}",
        out.len(),
        encoded_len(bits)
    );
    let bytes = bits / BITS_IN_BYTE;
    let mut pos = 0;
    out[pos] = TX_SOF;
    pos += 1;
    for &byte in &data[..bytes] {
        for pair in 0..4 {
            out[pos] = TX_PATTERNS[((byte >> (pair * 2)) & 0x03) as usize];
            pos += 1;
        }
    }
    out[pos] = TX_EOF;
    pos + 1
}

/// Bytes `encode_frame_1_of_256` produces for `bytes` input bytes.
pub const fn encoded_len_1_of_256(bytes: usize) -> usize {
    bytes * TX_SYMBOL_256 + 2
}

/// Encode `data` with 1-out-of-256 coding, returning the byte count.
/// Every data byte becomes a 64 byte symbol with one pulse.
///
/// # Panics
/// If `out` is shorter than `encoded_len_1_of_256(data.len())` bytes.
pub fn encode_frame_1_of_256(data: &[u8], out: &mut [u8]) -> usize {
    let len = encoded_len_1_of_256(data.len());
    assert!(
        out.len() >= len,
        "iso15693 encode buffer too small: {} < {}",
        out.len(),
        len
    );
    out[..len].fill(0);
    out[0] = TX_SOF_256;
    for (i, &byte) in data.iter().enumerate() {
        let symbol = 1 + i * TX_SYMBOL_256;
        out[symbol + byte as usize / 4] = TX_PATTERNS[(byte & 0x03) as usize];
    }
    out[len - 1] = TX_EOF;
    len
}

/// Decode a raw response stream of `buf_bits` bits into `out`, returning
/// the number of data bits.
///
/// `DataFormat` when the stream does not start with SOF, holds an
/// unexpected pattern or ends without EOF; `IncompleteFrame` when exactly
/// one byte arrived; `BufferOverflow` when `out` cannot hold the data.
pub fn decode_frame(buf: &[u8], buf_bits: usize, out: &mut [u8]) -> Result<usize> {
    if buf_bits == 0 || buf.is_empty() || buf[0] & RX_SOF_MASK != RX_SOF {
        return Err(Error::DataFormat);
    }
    if buf_bits == BITS_IN_BYTE {
        return Err(Error::IncompleteFrame);
    }
    out.fill(0);
    let capacity = out.len() * BITS_IN_BYTE;
    let mut bit_pos = 0;

    let mut i = RX_SOF_SIZE;
    while i < buf_bits.saturating_sub(RX_SOF_SIZE) {
        let pattern = bits_at(buf, i);
        if pattern & RX_EOF_MASK == RX_EOF {
            return Ok(bit_pos);
        }
        let bit = match pattern & RX_PATTERN_MASK {
            RX_PATTERN_0 => 0,
            RX_PATTERN_1 => 1,
            _ => return Err(Error::DataFormat),
        };
        if bit_pos >= capacity {
            return Err(Error::BufferOverflow);
        }
        out[bit_pos / BITS_IN_BYTE] |= bit << (bit_pos % BITS_IN_BYTE);
        bit_pos += 1;
        i += RX_PATTERN_SIZE;
    }
    Err(Error::DataFormat)
}

/// Eight stream bits starting at bit `i`, LSB first. Missing bytes past
/// the end read as zero.
fn bits_at(buf: &[u8], i: usize) -> u8 {
    let idx = i / BITS_IN_BYTE;
    let off = i % BITS_IN_BYTE;
    let lo = buf.get(idx).copied().unwrap_or(0) as u16;
    let hi = buf.get(idx + 1).copied().unwrap_or(0) as u16;
    (((hi << 8) | lo) >> off) as u8
}

/// Bytes `encode_response` produces for `bits` data bits.
pub const fn response_len(bits: usize) -> usize {
    (RX_SOF_SIZE + bits * RX_PATTERN_SIZE + RX_EOF_SIZE).div_ceil(BITS_IN_BYTE)
}

/// Build the card-side stream `decode_frame` accepts: SOF, one pattern
/// per data bit, EOF, zero padded to whole bytes. Returns the byte count.
///
/// # Panics
/// If `out` is shorter than [`response_len`].
pub fn encode_response(data: &[u8], bits: usize, out: &mut [u8]) -> usize {
    let len = response_len(bits);
    assert!(out.len() >= len, "iso15693 response buffer too small");
    out[..len].fill(0);
    let mut w = BitWriter { out, pos: 0 };
    w.push(RX_SOF, RX_SOF_SIZE);
    for n in 0..bits {
        let bit = (data[n / BITS_IN_BYTE] >> (n % BITS_IN_BYTE)) & 1;
        let pattern = if bit == 0 { RX_PATTERN_0 } else { RX_PATTERN_1 };
        w.push(pattern, RX_PATTERN_SIZE);
    }
    w.push(RX_EOF, RX_EOF_SIZE);
    len
}

struct BitWriter<'a> {
    out: &'a mut [u8],
    pos: usize,
}

impl BitWriter<'_> {
    fn push(&mut self, value: u8, bits: usize) {
        for b in 0..bits {
            if (value >> b) & 1 != 0 {
                self.out[self.pos / BITS_IN_BYTE] |= 1 << (self.pos % BITS_IN_BYTE);
            }
            self.pos += 1;
        }
    }
}
