// nfchal/src/signal/iso15693_parser.rs
//! Reader frame decoder for the ISO15693 listener.
//!
//! Input is the start time (in fc) of every reader modulation pause.
//! Positions are measured in half-slots of 128 fc. SOF spans 8 half-slots
//! with pauses at half-slot 0 and at half-slot 5 (1-out-of-4) or 7
//! (1-out-of-256). Data starts 8 half-slots after the first SOF pause.
//! Within a symbol a pause at half-slot `2n + 1` carries value `n`. A pause
//! at half-slot 2 of the slot after the last symbol is EOF.

use crate::constants::{BITS_IN_BYTE, ISO15693_MAX_FRAME_SIZE};
use crate::{Error, Result};

pub const HALF_SLOT_FC: u32 = 128;
/// SOF length, from its first pause to the first data symbol.
pub const SOF_HALF_SLOTS: u32 = 8;
const EOF_HALF_SLOT: u32 = 2;
const TOLERANCE_FC: u32 = 32;
const MAX_EDGES: usize = 2 + ISO15693_MAX_FRAME_SIZE * 4 + 1;

/// Pulse position coding chosen by the reader in its SOF.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Iso15693Coding {
    /// 2 bits per 8 half-slot symbol.
    OneOf4,
    /// 8 bits per 512 half-slot symbol.
    OneOf256,
}

impl Iso15693Coding {
    /// Distance between the two SOF pauses.
    pub const fn sof_half_slots(&self) -> u32 {
        match self {
            Iso15693Coding::OneOf4 => 5,
            Iso15693Coding::OneOf256 => 7,
        }
    }

    pub const fn symbol_half_slots(&self) -> u32 {
        match self {
            Iso15693Coding::OneOf4 => 8,
            Iso15693Coding::OneOf256 => 512,
        }
    }

    const fn bits_per_symbol(&self) -> usize {
        match self {
            Iso15693Coding::OneOf4 => 2,
            Iso15693Coding::OneOf256 => 8,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Iso15693Parser {
    edges: Vec<u32>,
    frame: [u8; ISO15693_MAX_FRAME_SIZE],
    frame_len: usize,
    coding: Option<Iso15693Coding>,
}

impl Iso15693Parser {
    pub fn new() -> Self {
        Self {
            edges: Vec::with_capacity(MAX_EDGES),
            frame: [0; ISO15693_MAX_FRAME_SIZE],
            frame_len: 0,
            coding: None,
        }
    }

    pub fn reset(&mut self) {
        self.edges.clear();
        self.frame_len = 0;
        self.coding = None;
    }

    /// Append captured pause timestamps.
    pub fn extend(&mut self, edges: &[u32]) {
        self.edges.extend_from_slice(edges);
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Decode the collected pauses, returning the frame length in bytes.
    ///
    /// `IncompleteFrame` means more pauses are needed; on any other error
    /// the collected pauses are useless and the caller should `reset`.
    pub fn parse(&mut self) -> Result<usize> {
        if self.edges.len() < 2 {
            return Err(Error::IncompleteFrame);
        }
        self.frame_len = 0;
        self.coding = None;
        let coding = match half_slots(self.edges[1].wrapping_sub(self.edges[0])) {
            Some(h) if h == Iso15693Coding::OneOf4.sof_half_slots() => Iso15693Coding::OneOf4,
            Some(h) if h == Iso15693Coding::OneOf256.sof_half_slots() => Iso15693Coding::OneOf256,
            _ => return Err(Error::DataFormat),
        };
        let symbol_fc = coding.symbol_half_slots() * HALF_SLOT_FC;
        let mut symbol_start = self.edges[0].wrapping_add(SOF_HALF_SLOTS * HALF_SLOT_FC);

        self.frame.fill(0);
        let mut bit_pos = 0usize;
        let rest = &self.edges[2..];
        for (i, &edge) in rest.iter().enumerate() {
            let h = half_slots(edge.wrapping_sub(symbol_start)).ok_or(Error::DataFormat)?;
            if h == EOF_HALF_SLOT {
                if i + 1 != rest.len() || bit_pos == 0 || bit_pos % BITS_IN_BYTE != 0 {
                    return Err(Error::DataFormat);
                }
                self.frame_len = bit_pos / BITS_IN_BYTE;
                self.coding = Some(coding);
                // Pauses are consumed; the frame stays readable until the next parse
                self.edges.clear();
                return Ok(self.frame_len);
            }
            if h % 2 == 0 || h >= coding.symbol_half_slots() {
                return Err(Error::DataFormat);
            }
            if bit_pos + coding.bits_per_symbol() > ISO15693_MAX_FRAME_SIZE * BITS_IN_BYTE {
                return Err(Error::BufferOverflow);
            }
            let value = (h - 1) / 2;
            // Symbols never straddle a byte: 2 or 8 bits at an aligned position
            self.frame[bit_pos / BITS_IN_BYTE] |= (value << (bit_pos % BITS_IN_BYTE)) as u8;
            bit_pos += coding.bits_per_symbol();
            symbol_start = symbol_start.wrapping_add(symbol_fc);
        }
        Err(Error::IncompleteFrame)
    }

    /// Last successfully parsed frame.
    pub fn data(&self) -> &[u8] {
        &self.frame[..self.frame_len]
    }

    pub fn coding(&self) -> Option<Iso15693Coding> {
        self.coding
    }
}

impl Default for Iso15693Parser {
    fn default() -> Self {
        Self::new()
    }
}

/// Whole half-slots in `delta_fc`, if within tolerance of a boundary.
fn half_slots(delta_fc: u32) -> Option<u32> {
    let h = delta_fc.saturating_add(HALF_SLOT_FC / 2) / HALF_SLOT_FC;
    (delta_fc.abs_diff(h * HALF_SLOT_FC) <= TOLERANCE_FC).then_some(h)
}
