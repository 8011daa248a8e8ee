// nfchal/src/signal/iso14443a.rs
//! NFC-A card response with caller supplied parity.
//!
//! Load modulation at 106 kbps: Manchester coding on an fc/16 subcarrier.
//! A bit lasts 128 fc; logic 1 carries the subcarrier in the first half,
//! logic 0 in the second half.

use super::Runs;
use crate::constants::BITS_IN_BYTE;
use crate::platform::SignalOutput;

const BIT_FC: u32 = 128;
const HALF_BIT_FC: u32 = BIT_FC / 2;
const SUBCARRIER_HALF_FC: u32 = 8;
const SUBCARRIER_PERIODS_PER_HALF: u32 = HALF_BIT_FC / (2 * SUBCARRIER_HALF_FC);

#[derive(Debug, Clone)]
pub struct Iso14443aSignal {
    runs: Runs,
}

impl Iso14443aSignal {
    pub fn new() -> Self {
        // SOF + EOF plus up to 16 runs per bit of a 64 byte frame
        Self {
            runs: Runs::with_capacity(16 * 9 * 64 + 32),
        }
    }

    fn push_bit(&mut self, bit: bool) {
        if bit {
            self.runs
                .push_subcarrier(SUBCARRIER_PERIODS_PER_HALF, SUBCARRIER_HALF_FC);
            self.runs.push(false, HALF_BIT_FC);
        } else {
            self.runs.push(false, HALF_BIT_FC);
            self.runs
                .push_subcarrier(SUBCARRIER_PERIODS_PER_HALF, SUBCARRIER_HALF_FC);
        }
    }

    /// Build the sequence for `bits` bits of `data`. After every complete
    /// byte the matching bit of `parity` (packed MSB first) is sent.
    pub fn build(&mut self, data: &[u8], parity: &[u8], bits: usize) -> &Runs {
        self.runs.clear();
        // SOF is a logic 1
        self.push_bit(true);
        for i in 0..bits {
            let bit = (data[i / BITS_IN_BYTE] >> (i % BITS_IN_BYTE)) & 1 != 0;
            self.push_bit(bit);
            if i % BITS_IN_BYTE == BITS_IN_BYTE - 1 {
                self.push_bit(parity_bit(parity, i / BITS_IN_BYTE));
            }
        }
        // EOF: one bit period without modulation
        self.runs.push(false, BIT_FC);
        &self.runs
    }

    pub fn tx(&mut self, out: &mut dyn SignalOutput, data: &[u8], parity: &[u8], bits: usize) {
        let runs = self.build(data, parity, bits);
        out.play(runs.start_level(), runs.as_slice());
    }
}

impl Default for Iso14443aSignal {
    fn default() -> Self {
        Self::new()
    }
}

fn parity_bit(parity: &[u8], byte: usize) -> bool {
    let packed = parity.get(byte / BITS_IN_BYTE).copied().unwrap_or(0);
    (packed >> (7 - byte % BITS_IN_BYTE)) & 1 != 0
}
