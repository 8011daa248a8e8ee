// nfchal/src/codec/mod.rs
//! Bit-level framing that the chip does not do in hardware.

pub mod iso15693;

pub use iso15693::{decode_frame, encode_frame, encode_response};
