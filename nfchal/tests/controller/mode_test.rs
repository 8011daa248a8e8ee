#[path = "../common/mod.rs"]
mod common;

use nfchal::chip::registers::{
    aux, bit_rate, corr_conf1, mode, op_control, passive_target, rx_conf2,
};
use nfchal::chip::Register;
use nfchal::platform::mock::MockChip;
use nfchal::{Mode, Technology};

fn assert_baseline(chip: &MockChip) {
    assert_eq!(chip.register(Register::MODE), mode::OM0);
    assert_eq!(chip.register(Register::STREAM_MODE), 0);
    assert_eq!(chip.register(Register::AUX) & aux::NO_CRC_RX, 0);
    assert_eq!(
        chip.register(Register::BIT_RATE) & (bit_rate::TXRATE_MASK | bit_rate::RXRATE_MASK),
        0
    );
    assert_eq!(chip.register(Register::RX_CONF1), 0);
    assert_eq!(
        chip.register(Register::RX_CONF2),
        rx_conf2::SQM_DYN | rx_conf2::AGC_EN | rx_conf2::AGC_M
    );
    assert_eq!(
        chip.register(Register::CORR_CONF1),
        corr_conf1::S7 | corr_conf1::S4 | corr_conf1::S1 | corr_conf1::S0
    );
    assert_eq!(chip.register(Register::CORR_CONF2), 0);
}

#[test]
fn every_poller_resets_to_baseline() {
    let (hal, handles) = common::active_hal().unwrap();
    for tech in Technology::ALL {
        hal.set_mode(Mode::Poller, tech).unwrap();
        assert_eq!(hal.mode(), Some((Mode::Poller, tech)));
        hal.reset_mode().unwrap();
        assert_eq!(hal.mode(), None);
        assert_baseline(&handles.chip);
    }
    hal.release();
}

#[test]
fn every_listener_resets_to_baseline() {
    let (hal, handles) = common::active_hal().unwrap();
    for tech in [Technology::Iso14443a, Technology::Iso15693, Technology::Felica] {
        hal.set_mode(Mode::Listener, tech).unwrap();
        hal.reset_mode().unwrap();
        assert_baseline(&handles.chip);
    }
    // Transparent mode was left
    assert!(!handles.signal.is_active());
    assert!(!handles.capture.is_started());
    assert!(handles.chip.isr_installed());
    hal.release();
}

#[test]
fn poller_selection_programs_the_chip() {
    let (hal, handles) = common::active_hal().unwrap();
    hal.set_mode(Mode::Poller, Technology::Iso14443a).unwrap();
    assert_eq!(
        handles.chip.register(Register::MODE) & mode::OM_MASK,
        mode::OM_ISO14443A
    );
    assert_eq!(handles.chip.register(Register::OP_CONTROL) & op_control::WU, 0);
    assert_eq!(handles.chip.register(Register::AUX) & aux::DIS_CORR, 0);
    hal.reset_mode().unwrap();

    hal.set_mode(Mode::Poller, Technology::Felica).unwrap();
    assert_eq!(
        handles.chip.register(Register::MODE) & mode::OM_MASK,
        mode::OM_FELICA
    );
    assert_eq!(
        handles.chip.register(Register::BIT_RATE),
        bit_rate::TXRATE_212 | bit_rate::RXRATE_212
    );
    hal.reset_mode().unwrap();

    hal.set_mode(Mode::Poller, Technology::Iso15693).unwrap();
    assert_eq!(
        handles.chip.register(Register::MODE) & mode::OM_MASK,
        mode::OM_SUBCARRIER_STREAM
    );
    hal.reset_mode().unwrap();
    hal.release();
}

#[test]
fn iso14443a_listener_enables_collision_resolution() {
    let (hal, handles) = common::active_hal().unwrap();
    hal.set_mode(Mode::Listener, Technology::Iso14443a).unwrap();
    assert_eq!(
        handles.chip.register(Register::MODE),
        mode::TARG | mode::OM_TARG_NFCA
    );
    assert_eq!(
        handles.chip.register(Register::PASSIVE_TARGET) & passive_target::D_106_AC_A,
        0
    );
    hal.reset_mode().unwrap();
    hal.release();
}

#[test]
#[should_panic(expected = "has no listener role")]
fn iso14443b_listener_is_rejected() {
    let (hal, _handles) = common::active_hal().unwrap();
    let _ = hal.set_mode(Mode::Listener, Technology::Iso14443b);
}

#[test]
#[should_panic(expected = "still active")]
fn set_mode_twice_is_rejected() {
    let (hal, _handles) = common::active_hal().unwrap();
    hal.set_mode(Mode::Poller, Technology::Iso14443a).unwrap();
    let _ = hal.set_mode(Mode::Poller, Technology::Felica);
}

#[test]
#[should_panic(expected = "needs poller mode")]
fn poller_call_in_listener_mode_is_rejected() {
    let (hal, _handles) = common::active_hal().unwrap();
    hal.set_mode(Mode::Listener, Technology::Felica).unwrap();
    let _ = hal.poller_tx(&[0x00], 8);
}
