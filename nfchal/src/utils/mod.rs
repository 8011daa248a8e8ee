// nfchal/src/utils/mod.rs
//! Small helpers shared across the crate: hex formatting for logs and
//! millisecond deadline arithmetic for the wait loops.

pub mod hex;
pub mod timeout;

pub use hex::*;
pub use timeout::*;
