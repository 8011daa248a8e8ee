// nfchal/src/constants.rs
//! Common constants used across the crate

/// `log` target used by every message emitted from this crate.
pub const LOG_TARGET: &str = "nfchal";

/// RF carrier frequency (fc) in Hz.
pub const CARRIER_FREQUENCY_HZ: u32 = 13_560_000;

/// Pass as a wait timeout to block until an event arrives.
pub const EVENT_WAIT_FOREVER: u32 = u32::MAX;

/// Depth of the ST25R3916 FIFO in bytes.
pub const FIFO_DEPTH: usize = 512;

/// Bits per byte on the wire.
pub const BITS_IN_BYTE: usize = 8;

/// Largest ISO15693 logical frame handled by the poller, in bytes.
pub const ISO15693_MAX_FRAME_SIZE: usize = 64;

/// SAK bit telling the poller another cascade level follows.
pub const ISO14443A_UID_INCOMPLETE: u8 = 0x04;
