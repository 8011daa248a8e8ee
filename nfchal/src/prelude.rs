// nfchal/src/prelude.rs

pub use crate::config::HalConfig;
pub use crate::constants::EVENT_WAIT_FOREVER;
pub use crate::hal::{HalGuard, NfcHal, NfcHalBuilder, Ready, Uninitialized};
pub use crate::platform::Platform;
pub use crate::{
    Atqa, Error, Event, Idm, Mode, Pmm, Result, ShortFrame, SystemCode, Technology, Uid,
};

// Small utilities for convenience
pub use crate::utils::{bytes_to_hex, bytes_to_hex_spaced, frame_to_hex, parse_hex};
