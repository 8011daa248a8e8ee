// nfchal/src/signal/mod.rs
//! Software generated line signals for transparent mode.
//!
//! Generators turn frames into run-length level sequences timed in carrier
//! cycles; [`crate::platform::SignalOutput`] plays them.

pub mod iso14443a;
pub mod iso15693;
pub mod iso15693_parser;

pub use iso14443a::Iso14443aSignal;
pub use iso15693::{Iso15693DataRate, Iso15693Signal};
pub use iso15693_parser::{Iso15693Coding, Iso15693Parser};

/// Run-length sequence of line levels. Adjacent runs at the same level
/// are merged so the sequence strictly alternates.
#[derive(Debug, Clone, Default)]
pub struct Runs {
    start_level: bool,
    runs: Vec<u32>,
}

impl Runs {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            start_level: false,
            runs: Vec::with_capacity(capacity),
        }
    }

    /// Drop the content, keeping the allocation.
    pub fn clear(&mut self) {
        self.runs.clear();
        self.start_level = false;
    }

    pub fn push(&mut self, level: bool, fc: u32) {
        if fc == 0 {
            return;
        }
        if self.runs.is_empty() {
            self.start_level = level;
            self.runs.push(fc);
            return;
        }
        if self.level_at(self.runs.len() - 1) == level {
            if let Some(last) = self.runs.last_mut() {
                *last += fc;
            }
        } else {
            self.runs.push(fc);
        }
    }

    /// `count` subcarrier periods of `half` fc high then `half` fc low.
    pub fn push_subcarrier(&mut self, count: u32, half: u32) {
        for _ in 0..count {
            self.push(true, half);
            self.push(false, half);
        }
    }

    fn level_at(&self, index: usize) -> bool {
        self.start_level ^ (index % 2 == 1)
    }

    pub fn start_level(&self) -> bool {
        self.start_level
    }

    pub fn as_slice(&self) -> &[u32] {
        &self.runs
    }

    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    /// Total duration in carrier cycles.
    pub fn duration(&self) -> u64 {
        self.runs.iter().map(|&r| r as u64).sum()
    }
}
