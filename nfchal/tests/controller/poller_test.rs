#[path = "../common/mod.rs"]
mod common;

use std::time::Duration;

use nfchal::chip::commands;
use nfchal::chip::registers::{aux, iso14443a_nfc, op_control};
use nfchal::chip::Register;
use nfchal::codec::iso15693::{encode_frame, encode_response, encoded_len, response_len};
use nfchal::{Error, Event, Mode, ShortFrame, Technology, EVENT_WAIT_FOREVER};

#[test]
fn field_on_is_idempotent() {
    let (hal, handles) = common::active_hal().unwrap();
    hal.set_mode(Mode::Poller, Technology::Iso14443a).unwrap();
    hal.poller_field_on().unwrap();
    hal.poller_field_on().unwrap();
    let m = handles.chip.model();
    assert_eq!(m.writes_to(Register::FIELD_ON_GT), vec![0]);
    let op = m.register(Register::OP_CONTROL);
    assert_eq!(op & (op_control::TX_EN | op_control::RX_EN), op_control::TX_EN | op_control::RX_EN);
    drop(m);
    hal.release();
}

#[test]
fn reqa_exchange() {
    let (hal, handles) = common::active_hal().unwrap();
    hal.set_mode(Mode::Poller, Technology::Iso14443a).unwrap();
    hal.poller_field_on().unwrap();
    handles.chip.queue_response(&[0x44, 0x00]);

    hal.iso14443a_poller_trx_short_frame(ShortFrame::SensReq).unwrap();
    assert_eq!(handles.chip.commands().last(), Some(&commands::TRANSMIT_REQA));
    assert_ne!(handles.chip.register(Register::AUX) & aux::NO_CRC_RX, 0);

    let ev = hal.poller_wait_event(100);
    assert!(ev.contains(Event::TX_END | Event::RX_END), "{:?}", ev);

    let mut buf = [0u8; 8];
    assert_eq!(hal.poller_rx(&mut buf).unwrap(), 16);
    assert_eq!(&buf[..2], &[0x44, 0x00]);
    hal.release();
}

#[test]
fn wupa_uses_its_own_command() {
    let (hal, handles) = common::active_hal().unwrap();
    hal.set_mode(Mode::Poller, Technology::Iso14443a).unwrap();
    hal.iso14443a_poller_trx_short_frame(ShortFrame::AllReq).unwrap();
    assert_eq!(handles.chip.commands().last(), Some(&commands::TRANSMIT_WUPA));
    hal.release();
}

#[test]
fn anticollision_frame_keeps_partial_bits() {
    let (hal, handles) = common::active_hal().unwrap();
    hal.set_mode(Mode::Poller, Technology::Iso14443a).unwrap();
    handles.chip.queue_response_bits(&[0x0a, 0x0b, 0x05], 20);

    hal.iso14443a_tx_sdd_frame(&[0x93, 0x20], 16).unwrap();
    assert_eq!(handles.chip.model().fifo_loads.last(), Some(&vec![0x93, 0x20]));
    assert!(hal.poller_wait_event(100).contains(Event::RX_END));

    let mut buf = [0u8; 5];
    assert_eq!(hal.iso14443a_rx_sdd_frame(&mut buf).unwrap(), 20);
    assert_eq!(&buf[..3], &[0x0a, 0x0b, 0x05]);
    hal.release();
}

#[test]
fn tx_programs_the_bit_count() {
    let (hal, handles) = common::active_hal().unwrap();
    hal.set_mode(Mode::Poller, Technology::Iso14443a).unwrap();
    hal.poller_tx(&[0x50, 0x00], 16).unwrap();
    let m = handles.chip.model();
    assert_eq!(m.writes_to(Register::NUM_TX_BYTES1).last(), Some(&0x00));
    assert_eq!(m.writes_to(Register::NUM_TX_BYTES2).last(), Some(&16));
    assert_eq!(m.commands.last(), Some(&commands::TRANSMIT_WITHOUT_CRC));
    drop(m);
    hal.release();
}

#[test]
fn custom_parity_disables_hardware_parity() {
    let (hal, handles) = common::active_hal().unwrap();
    hal.set_mode(Mode::Poller, Technology::Iso14443a).unwrap();
    hal.iso14443a_poller_tx_custom_parity(&[0x50, 0x00, 0x00], 18).unwrap();
    let parity = iso14443a_nfc::NO_TX_PAR | iso14443a_nfc::NO_RX_PAR;
    assert_eq!(handles.chip.register(Register::ISO14443A_NFC) & parity, parity);

    // Plain transmit turns it back on
    hal.poller_tx(&[0x50, 0x00], 16).unwrap();
    assert_eq!(handles.chip.register(Register::ISO14443A_NFC) & parity, 0);
    hal.release();
}

#[test]
fn empty_fifo_is_incomplete_frame() {
    let (hal, _handles) = common::active_hal().unwrap();
    hal.set_mode(Mode::Poller, Technology::Iso14443b).unwrap();
    let mut buf = [0u8; 8];
    assert_eq!(hal.poller_rx(&mut buf), Err(Error::IncompleteFrame));
    hal.release();
}

#[test]
fn oversized_response_overflows() {
    let (hal, handles) = common::active_hal().unwrap();
    hal.set_mode(Mode::Poller, Technology::Felica).unwrap();
    handles.chip.queue_response(&[0u8; 20]);
    hal.poller_tx(&[0x06, 0x00, 0xff, 0xff, 0x01, 0x00], 48).unwrap();
    let mut buf = [0u8; 8];
    assert_eq!(hal.poller_rx(&mut buf), Err(Error::BufferOverflow));
    hal.release();
}

#[test]
fn iso15693_inventory_round_trip() {
    let (hal, handles) = common::active_hal().unwrap();
    hal.set_mode(Mode::Poller, Technology::Iso15693).unwrap();
    hal.poller_field_on().unwrap();

    let response = common::inventory_response();
    let mut stream = vec![0u8; response_len(response.len() * 8)];
    let n = encode_response(&response, response.len() * 8, &mut stream);
    handles.chip.queue_response(&stream[..n]);

    let request = common::inventory_request();
    hal.poller_tx(&request, request.len() * 8).unwrap();
    let mut expected = vec![0u8; encoded_len(request.len() * 8)];
    let len = encode_frame(&request, request.len() * 8, &mut expected);
    assert_eq!(handles.chip.model().fifo_loads.last(), Some(&expected[..len].to_vec()));

    assert!(hal.poller_wait_event(100).contains(Event::RX_END));
    let mut buf = [0u8; 32];
    let bits = hal.poller_rx(&mut buf).unwrap();
    assert_eq!(bits, response.len() * 8);
    assert_eq!(&buf[..response.len()], &response[..]);
    hal.release();
}

#[test]
fn iso15693_garbage_is_rejected() {
    let (hal, handles) = common::active_hal().unwrap();
    hal.set_mode(Mode::Poller, Technology::Iso15693).unwrap();
    handles.chip.queue_response(&[0xff, 0xff, 0xff]);
    hal.poller_tx(&[0x26, 0x01, 0x00], 24).unwrap();
    let mut buf = [0u8; 32];
    assert!(hal.poller_rx(&mut buf).is_err());
    hal.release();
}

#[test]
fn abort_wakes_a_blocked_waiter() {
    let (hal, _handles) = common::active_hal().unwrap();
    hal.set_mode(Mode::Poller, Technology::Iso14443a).unwrap();
    std::thread::scope(|s| {
        s.spawn(|| {
            std::thread::sleep(Duration::from_millis(20));
            hal.abort();
        });
        let ev = hal.poller_wait_event(EVENT_WAIT_FOREVER);
        assert!(ev.contains(Event::ABORT_REQUEST));
    });
    hal.release();
}

#[test]
fn quiet_link_times_out() {
    let (hal, _handles) = common::active_hal().unwrap();
    hal.set_mode(Mode::Poller, Technology::Iso14443a).unwrap();
    assert_eq!(hal.poller_wait_event(15), Event::TIMEOUT);
    hal.release();
}

#[test]
fn trx_reset_stops_the_chip() {
    let (hal, handles) = common::active_hal().unwrap();
    hal.set_mode(Mode::Poller, Technology::Iso14443a).unwrap();
    hal.trx_reset().unwrap();
    assert_eq!(handles.chip.commands().last(), Some(&commands::STOP));
    hal.release();
}
