// nfchal/src/lib.rs

//! nfchal
//!
//! NFC hardware abstraction for the ST25R3916 front end: register and FIFO
//! access, interrupt driven events, frame timers and ISO14443A/B, ISO15693
//! and FeliCa in poller and listener roles behind one technology-agnostic
//! controller.
#![warn(missing_docs)]

#[allow(missing_docs)]
pub mod chip;
pub mod codec;
pub mod config;
pub mod constants;
pub mod error;
#[allow(missing_docs)]
pub mod event;
mod frontend;
#[allow(missing_docs)]
pub mod hal;
pub mod platform;
pub mod prelude;
#[allow(missing_docs)]
pub mod signal;
#[allow(missing_docs)]
pub mod tech;
pub mod test_support;
#[allow(missing_docs)]
pub mod timer;
pub mod types;
pub mod utils;

// Re-export common types at crate root so `crate::Error`, `crate::Result`
// and the newtypes in `types` are available everywhere.
pub use crate::config::HalConfig;
pub use crate::error::*;
pub use crate::hal::{HalGuard, NfcHal, NfcHalBuilder, Ready, Uninitialized};
pub use crate::types::*;

pub use prelude::*;
