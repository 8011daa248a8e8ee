// nfchal/src/hal/mod.rs
//! Controller facade: lifecycle, arbitration, mode selection and the
//! technology-agnostic transfer API.

mod builder;
mod guard;
mod handle;
mod lock;

pub use builder::NfcHalBuilder;
pub use guard::HalGuard;
pub use handle::{vdd_from_adc, NfcHal, Ready, Uninitialized};

use log::error;

use crate::constants::LOG_TARGET;

/// Usage contract check. A violation panics in debug builds; in release
/// it is logged and the caller skips the offending operation.
pub(crate) fn contract(ok: bool, what: &str) -> bool {
    if !ok {
        error!(target: LOG_TARGET, "contract violation: {}", what);
        debug_assert!(ok, "{}", what);
    }
    ok
}
