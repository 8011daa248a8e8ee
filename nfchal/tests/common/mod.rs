// Shared helpers for the integration tests.
#![allow(dead_code)]

pub mod fixtures;

pub use fixtures::*;

/// Route crate logging through the test harness.
pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Bring a mock controller up and leave it acquired, out of low power and
/// with clean bus logs.
pub fn active_hal() -> anyhow::Result<(nfchal::NfcHal, nfchal::platform::mock::MockHandles)> {
    init_logger();
    let (hal, handles) = nfchal::test_support::ready_mock_hal()?;
    hal.acquire()?;
    hal.low_power_mode_stop()?;
    handles.chip.clear_logs();
    Ok((hal, handles))
}
