#[path = "../common/mod.rs"]
mod common;

use nfchal::chip::commands;
use nfchal::chip::registers::{aux, passive_target};
use nfchal::chip::{Irq, Register};
use nfchal::signal::{Iso14443aSignal, Iso15693Coding, Iso15693DataRate, Iso15693Signal};
use nfchal::tech::{col_res_memory, sensf_res_memory};
use nfchal::test_support::iso15693_reader_pauses;
use nfchal::{Error, Event, Mode, Technology};

#[test]
fn iso14443a_selection_hands_over_to_the_application() {
    let (hal, handles) = common::active_hal().unwrap();
    hal.set_mode(Mode::Listener, Technology::Iso14443a).unwrap();
    let uid = common::sample_uid4();
    hal.iso14443a_listener_set_col_res_data(&uid, &common::sample_atqa(), 0x08)
        .unwrap();
    assert_eq!(
        handles.chip.model().pt_mem_a,
        col_res_memory(&uid, &common::sample_atqa(), 0x08).to_vec()
    );
    assert_eq!(
        handles.chip.register(Register::AUX) & aux::NFC_ID_MASK,
        aux::NFC_ID_4BYTES
    );

    handles.chip.raise_irq(Irq::WU_A);
    let ev = hal.listener_wait_event(100);
    assert!(ev.contains(Event::LISTENER_ACTIVE), "{:?}", ev);
    assert_ne!(
        handles.chip.register(Register::PASSIVE_TARGET) & passive_target::D_106_AC_A,
        0
    );

    hal.listener_sleep().unwrap();
    assert_eq!(
        handles.chip.register(Register::PASSIVE_TARGET) & passive_target::D_106_AC_A,
        0
    );
    assert_eq!(handles.chip.commands().last(), Some(&commands::GOTO_SLEEP));
    hal.listener_idle().unwrap();
    assert_eq!(handles.chip.commands().last(), Some(&commands::GOTO_SENSE));
    hal.reset_mode().unwrap();
    hal.release();
}

#[test]
fn seven_byte_uid_selects_double_size_id() {
    let (hal, handles) = common::active_hal().unwrap();
    hal.set_mode(Mode::Listener, Technology::Iso14443a).unwrap();
    hal.iso14443a_listener_set_col_res_data(&common::sample_uid7(), &common::sample_atqa(), 0x20)
        .unwrap();
    assert_eq!(
        handles.chip.register(Register::AUX) & aux::NFC_ID_MASK,
        aux::NFC_ID_7BYTES
    );
    hal.reset_mode().unwrap();
    hal.release();
}

#[test]
#[should_panic(expected = "4 or 7 byte uid")]
fn ten_byte_uid_is_rejected() {
    let (hal, _handles) = common::active_hal().unwrap();
    hal.set_mode(Mode::Listener, Technology::Iso14443a).unwrap();
    let uid = nfchal::Uid::try_from(&[1u8; 10][..]).unwrap();
    let _ = hal.iso14443a_listener_set_col_res_data(&uid, &common::sample_atqa(), 0x20);
}

#[test]
fn iso14443a_custom_parity_is_bit_banged() {
    let (hal, handles) = common::active_hal().unwrap();
    hal.set_mode(Mode::Listener, Technology::Iso14443a).unwrap();
    handles.chip.clear_logs();
    let data = [0x0a];
    let parity = [0x80];
    hal.iso14443a_listener_tx_custom_parity(&data, &parity, 4).unwrap();

    let mut expected = Iso14443aSignal::new();
    let runs = expected.build(&data, &parity, 4);
    let played = handles.signal.sequences();
    assert_eq!(played.last(), Some(&(runs.start_level(), runs.as_slice().to_vec())));
    assert!(!handles.signal.is_active());
    assert_eq!(
        handles.chip.commands(),
        vec![commands::TRANSPARENT_MODE, commands::UNMASK_RECEIVE_DATA]
    );
    hal.reset_mode().unwrap();
    hal.release();
}

#[test]
fn iso14443a_listener_frames_use_the_fifo() {
    let (hal, handles) = common::active_hal().unwrap();
    hal.set_mode(Mode::Listener, Technology::Iso14443a).unwrap();
    handles.chip.model().load_rx_fifo(&[0x30, 0x04], 0);
    let mut buf = [0u8; 16];
    assert_eq!(hal.listener_rx(&mut buf).unwrap(), 16);
    assert_eq!(&buf[..2], &[0x30, 0x04]);

    hal.listener_tx(&[0x0a], 4).unwrap();
    assert_eq!(handles.chip.model().fifo_loads.last(), Some(&vec![0x0a]));
    hal.listener_enable_rx().unwrap();
    assert_eq!(handles.chip.commands().last(), Some(&commands::UNMASK_RECEIVE_DATA));
    hal.reset_mode().unwrap();
    hal.release();
}

#[test]
fn iso15693_reader_frame_is_parsed() {
    let (hal, handles) = common::active_hal().unwrap();
    hal.set_mode(Mode::Listener, Technology::Iso15693).unwrap();
    assert!(handles.capture.is_started());
    assert!(!handles.chip.isr_installed());

    let request = common::inventory_request();
    let pauses = iso15693_reader_pauses(&request, Iso15693Coding::OneOf4, 40_000);
    // Delivered in two bursts; the first alone is incomplete
    handles.capture.push_burst(&pauses[..2]);
    handles.capture.push_burst(&pauses[2..]);
    assert_eq!(hal.listener_wait_event(100), Event::RX_END);

    let mut buf = [0u8; 16];
    assert_eq!(hal.listener_rx(&mut buf).unwrap(), request.len() * 8);
    assert_eq!(&buf[..request.len()], &request[..]);
    let mut small = [0u8; 2];
    assert_eq!(hal.listener_rx(&mut small), Err(Error::BufferOverflow));

    let response = common::inventory_response();
    hal.listener_tx(&response, response.len() * 8).unwrap();
    let mut expected = Iso15693Signal::new();
    let runs = expected.build(Iso15693DataRate::High, &response);
    assert_eq!(
        handles.signal.sequences().last(),
        Some(&(runs.start_level(), runs.as_slice().to_vec()))
    );

    hal.iso15693_listener_tx_sof().unwrap();
    let sof = expected.build_sof(Iso15693DataRate::High);
    assert_eq!(
        handles.signal.sequences().last(),
        Some(&(sof.start_level(), sof.as_slice().to_vec()))
    );

    hal.reset_mode().unwrap();
    assert!(!handles.capture.is_started());
    assert!(handles.chip.isr_installed());
    hal.release();
}

#[test]
fn iso15693_malformed_frame_is_dropped() {
    let (hal, handles) = common::active_hal().unwrap();
    hal.set_mode(Mode::Listener, Technology::Iso15693).unwrap();
    // SOF pauses 4 half-slots apart match neither coding
    handles.capture.push_burst(&[0, 512, 1000]);
    assert_eq!(hal.listener_wait_event(20), Event::TIMEOUT);

    let request = common::inventory_request();
    handles
        .capture
        .push_burst(&iso15693_reader_pauses(&request, Iso15693Coding::OneOf256, 7));
    assert_eq!(hal.listener_wait_event(100), Event::RX_END);
    let mut buf = [0u8; 16];
    assert_eq!(hal.listener_rx(&mut buf).unwrap(), 24);
    hal.reset_mode().unwrap();
    hal.release();
}

#[test]
fn iso15693_abort() {
    let (hal, _handles) = common::active_hal().unwrap();
    hal.set_mode(Mode::Listener, Technology::Iso15693).unwrap();
    hal.abort();
    assert_eq!(hal.listener_wait_event(100), Event::ABORT_REQUEST);
    hal.reset_mode().unwrap();
    hal.release();
}

#[test]
fn felica_listener_loads_sensf_res() {
    let (hal, handles) = common::active_hal().unwrap();
    hal.set_mode(Mode::Listener, Technology::Felica).unwrap();
    let (idm, pmm, sc) = (
        common::sample_idm(),
        common::sample_pmm(),
        common::sample_system_code(),
    );
    hal.felica_listener_set_sensf_res_data(&idm, &pmm, sc).unwrap();
    assert_eq!(
        handles.chip.model().pt_mem_f,
        sensf_res_memory(&idm, &pmm, sc).to_vec()
    );

    handles.chip.raise_irq(Irq::WU_F);
    assert!(hal.listener_wait_event(100).contains(Event::LISTENER_ACTIVE));

    hal.listener_tx(&[0x07, 0x01], 16).unwrap();
    assert_eq!(handles.chip.commands().last(), Some(&commands::TRANSMIT_WITH_CRC));
    hal.reset_mode().unwrap();
    hal.release();
}

#[test]
fn field_events_reach_the_listener() {
    let (hal, handles) = common::active_hal().unwrap();
    hal.set_mode(Mode::Listener, Technology::Iso14443a).unwrap();
    handles.chip.raise_irq(Irq::EON);
    assert!(hal.listener_wait_event(100).contains(Event::FIELD_ON));
    handles.chip.raise_irq(Irq::EOF);
    assert!(hal.listener_wait_event(100).contains(Event::FIELD_OFF));
    hal.reset_mode().unwrap();
    hal.release();
}
