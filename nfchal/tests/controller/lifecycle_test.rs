#[path = "../common/mod.rs"]
mod common;

use nfchal::chip::commands;
use nfchal::chip::registers::{aux_display, io_conf2, op_control, regulator_control};
use nfchal::chip::Register;
use nfchal::test_support::{mock_hal, mock_hal_with_config};
use nfchal::{Error, HalConfig};

#[test]
fn bring_up_ends_in_low_power() {
    common::init_logger();
    let (hal, handles) = mock_hal();
    let hal = hal.init().unwrap();

    let chip = &handles.chip;
    assert_eq!(chip.commands().first(), Some(&commands::SET_DEFAULT));
    assert!(chip.commands().contains(&commands::MEASURE_VDD));
    assert_eq!(chip.commands().last(), Some(&commands::STOP));
    // 3352 mV supply selects 3 V I/O
    assert_ne!(chip.register(Register::IO_CONF2) & io_conf2::SUP3V, 0);
    assert_eq!(chip.register(Register::ANT_TUNE_A), 0x82);
    assert_eq!(chip.register(Register::ANT_TUNE_B), 0x82);
    assert_eq!(chip.register(Register::FIELD_THRESHOLD_ACTV), 0x11);
    assert_eq!(chip.register(Register::OP_CONTROL) & op_control::EN, 0);
    assert!(!chip.isr_installed());
    assert!(!handles.fwt_timer.isr_installed());
    assert_eq!(chip.model().test_register(0x04) & 0x10, 0x10);

    // Lock fully released
    assert_eq!(handles.bus_lock.locks(), handles.bus_lock.unlocks());
    assert!(hal.is_ready().is_ok());
}

#[test]
fn five_volt_supply_keeps_5v_io() {
    let (hal, handles) = mock_hal();
    // 160 -> 3750 mV
    handles.chip.model().vdd_ad_result = 160;
    hal.init().unwrap();
    assert_eq!(handles.chip.register(Register::IO_CONF2) & io_conf2::SUP3V, 0);
}

#[test]
fn regulator_calibration_can_be_skipped() {
    let (hal, handles) = mock_hal_with_config(HalConfig::default().with_regulator_calibration(false));
    hal.init().unwrap();
    assert!(!handles.chip.commands().contains(&commands::ADJUST_REGULATORS));
    assert!(handles
        .chip
        .model()
        .writes_to(Register::REGULATOR_CONTROL)
        .iter()
        .all(|v| v & regulator_control::REG_S == 0));
}

#[test]
fn calibration_runs_in_automatic_mode() {
    let (hal, handles) = mock_hal();
    hal.init().unwrap();
    assert!(handles.chip.commands().contains(&commands::ADJUST_REGULATORS));
}

#[test]
fn dead_oscillator_fails_bring_up() {
    let (hal, handles) = mock_hal_with_config(HalConfig {
        osc_timeout_ms: 2,
        ..HalConfig::default()
    });
    handles.chip.model().oscillator_works = false;
    assert_eq!(hal.init().unwrap_err(), Error::Oscillator);
    assert_eq!(handles.bus_lock.locks(), handles.bus_lock.unlocks());
    assert_eq!(
        handles.chip.register(Register::AUX_DISPLAY) & aux_display::OSC_OK,
        0
    );
}

#[test]
fn bus_fault_is_communication_error() {
    let (hal, handles) = mock_hal();
    handles.chip.model().bus_fault = true;
    assert_eq!(hal.init().unwrap_err(), Error::Communication);
}

#[test]
fn low_power_round_trip() {
    let (hal, handles) = common::active_hal().unwrap();
    assert!(handles.chip.isr_installed());
    assert!(handles.fwt_timer.isr_installed());
    assert_ne!(handles.chip.register(Register::OP_CONTROL) & op_control::EN, 0);
    assert_eq!(
        handles.chip.register(Register::OP_CONTROL) & op_control::EN_FD_MASK,
        op_control::EN_FD_AUTO_EFD
    );

    hal.low_power_mode_start().unwrap();
    assert!(!handles.chip.isr_installed());
    assert_eq!(handles.chip.register(Register::OP_CONTROL), 0);
    hal.release();
}

#[test]
fn deinit_returns_to_low_power() {
    let (hal, handles) = common::active_hal().unwrap();
    hal.release();
    hal.deinit().unwrap();
    assert!(!handles.chip.isr_installed());
    assert_eq!(handles.bus_lock.locks(), handles.bus_lock.unlocks());
}

#[test]
fn field_detection() {
    let (hal, handles) = common::active_hal().unwrap();
    hal.field_detect_start().unwrap();
    assert!(!hal.field_is_present().unwrap());
    handles.chip.set_external_field(true);
    assert!(hal.field_is_present().unwrap());
    hal.field_detect_stop().unwrap();
    assert_eq!(
        handles.chip.register(Register::OP_CONTROL) & (op_control::EN | op_control::EN_FD_MASK),
        0
    );
    hal.release();
}

#[cfg(feature = "diagnostics")]
#[test]
fn register_dump_skips_irq_status() {
    let (hal, _handles) = common::active_hal().unwrap();
    let dump = hal.dump_registers().unwrap();
    assert_eq!(dump.len(), 124);
    assert!(dump.iter().all(|(r, _)| r.addr() < 0x1A || r.addr() > 0x1D || r.space() == nfchal::chip::RegisterSpace::B));
    hal.release();
}
