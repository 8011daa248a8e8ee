// nfchal/src/signal/iso15693.rs
//! ISO15693 card response signal, single subcarrier (fc/32).
//!
//! High data rate: a bit lasts 512 fc, logic 0 is 8 subcarrier pulses
//! followed by 256 fc unmodulated, logic 1 the reverse. Low data rate
//! stretches every element by four.

use super::Runs;
use crate::constants::BITS_IN_BYTE;
use crate::platform::SignalOutput;

const SUBCARRIER_HALF_FC: u32 = 16;
const HALF_BIT_PULSES: u32 = 8;
const HALF_BIT_FC: u32 = HALF_BIT_PULSES * 2 * SUBCARRIER_HALF_FC;
const FRAME_PULSES: u32 = 24;
const FRAME_UNMODULATED_FC: u32 = 768;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Iso15693DataRate {
    /// 26.48 kbps
    #[default]
    High,
    /// 6.62 kbps
    Low,
}

impl Iso15693DataRate {
    fn stretch(&self) -> u32 {
        match self {
            Iso15693DataRate::High => 1,
            Iso15693DataRate::Low => 4,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Iso15693Signal {
    runs: Runs,
}

impl Iso15693Signal {
    pub fn new() -> Self {
        Self {
            runs: Runs::with_capacity(2 * HALF_BIT_PULSES as usize * 8 * 64 + 128),
        }
    }

    fn pulses(&mut self, count: u32, k: u32) {
        self.runs.push_subcarrier(count * k, SUBCARRIER_HALF_FC);
    }

    fn bit(&mut self, bit: bool, k: u32) {
        if bit {
            self.runs.push(false, HALF_BIT_FC * k);
            self.pulses(HALF_BIT_PULSES, k);
        } else {
            self.pulses(HALF_BIT_PULSES, k);
            self.runs.push(false, HALF_BIT_FC * k);
        }
    }

    fn sof(&mut self, k: u32) {
        self.runs.push(false, FRAME_UNMODULATED_FC * k);
        self.pulses(FRAME_PULSES, k);
        self.bit(true, k);
    }

    fn eof(&mut self, k: u32) {
        self.bit(false, k);
        self.pulses(FRAME_PULSES, k);
        self.runs.push(false, FRAME_UNMODULATED_FC * k);
    }

    /// Full response: SOF, `data` LSB first, EOF.
    pub fn build(&mut self, rate: Iso15693DataRate, data: &[u8]) -> &Runs {
        let k = rate.stretch();
        self.runs.clear();
        self.sof(k);
        for &byte in data {
            for b in 0..BITS_IN_BYTE {
                self.bit((byte >> b) & 1 != 0, k);
            }
        }
        self.eof(k);
        &self.runs
    }

    pub fn build_sof(&mut self, rate: Iso15693DataRate) -> &Runs {
        let k = rate.stretch();
        self.runs.clear();
        self.sof(k);
        &self.runs
    }

    pub fn tx(&mut self, out: &mut dyn SignalOutput, rate: Iso15693DataRate, data: &[u8]) {
        let runs = self.build(rate, data);
        out.play(runs.start_level(), runs.as_slice());
    }

    pub fn tx_sof(&mut self, out: &mut dyn SignalOutput, rate: Iso15693DataRate) {
        let runs = self.build_sof(rate);
        out.play(runs.start_level(), runs.as_slice());
    }
}

impl Default for Iso15693Signal {
    fn default() -> Self {
        Self::new()
    }
}
