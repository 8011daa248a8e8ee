//! Test support helpers intended for use by unit and integration tests.
//!
//! These helpers centralize mock platform setup and synthetic reader
//! signals so tests across the crate and the tests/ directory share them.
#![allow(dead_code)]

use crate::codec::iso15693;
use crate::config::HalConfig;
use crate::hal::{NfcHal, NfcHalBuilder, Ready, Uninitialized};
use crate::platform::mock::{mock_platform, MockHandles};
use crate::signal::iso15693_parser::HALF_SLOT_FC;
use crate::signal::Iso15693Coding;
use crate::Result;

/// Controller over a fresh mock platform, not yet brought up.
#[doc(hidden)]
pub fn mock_hal() -> (NfcHal<Uninitialized>, MockHandles) {
    mock_hal_with_config(HalConfig::default())
}

#[doc(hidden)]
pub fn mock_hal_with_config(config: HalConfig) -> (NfcHal<Uninitialized>, MockHandles) {
    let (platform, handles) = mock_platform();
    let hal = NfcHalBuilder::new()
        .with_platform(platform)
        .with_config(config)
        .build_uninitialized()
        .unwrap_or_else(|e| panic!("mock platform rejected: {}", e));
    (hal, handles)
}

/// Controller over a mock platform after bring-up, with the bus logs of
/// the bring-up sequence cleared.
#[doc(hidden)]
pub fn ready_mock_hal() -> Result<(NfcHal<Ready>, MockHandles)> {
    let (hal, handles) = mock_hal();
    let hal = hal.init()?;
    handles.chip.clear_logs();
    Ok((hal, handles))
}

/// Pause start times a reader produces for `data`, in carrier cycles,
/// beginning at `start`. Built from the stream mode encoding: every stream
/// bit is one half-slot and every set bit a pause.
#[doc(hidden)]
pub fn iso15693_reader_pauses(data: &[u8], coding: Iso15693Coding, start: u32) -> Vec<u32> {
    let stream = match coding {
        Iso15693Coding::OneOf4 => {
            let mut out = vec![0u8; iso15693::encoded_len(data.len() * 8)];
            let n = iso15693::encode_frame(data, data.len() * 8, &mut out);
            out.truncate(n);
            out
        }
        Iso15693Coding::OneOf256 => {
            let mut out = vec![0u8; iso15693::encoded_len_1_of_256(data.len())];
            let n = iso15693::encode_frame_1_of_256(data, &mut out);
            out.truncate(n);
            out
        }
    };
    (0..stream.len() * 8)
        .filter(|&k| stream[k / 8] & (1 << (k % 8)) != 0)
        .map(|k| start.wrapping_add(k as u32 * HALF_SLOT_FC))
        .collect()
}
