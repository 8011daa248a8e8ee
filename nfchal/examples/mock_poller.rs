// ISO14443A poll against the simulated front end.
//
// Brings the controller up, switches to NFC-A poller, sends REQA and
// prints the ATQA the simulated card answers with. Run with
// RUST_LOG=nfchal=trace to see the register traffic.

use nfchal::prelude::*;
use nfchal::platform::mock::mock_platform;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let (platform, handles) = mock_platform();
    let hal = NfcHalBuilder::new()
        .with_platform(platform)
        .with_config(HalConfig::default())
        .build()?;

    let hal = hal.guard()?;
    hal.low_power_mode_stop()?;
    hal.set_mode(Mode::Poller, Technology::Iso14443a)?;
    hal.poller_field_on()?;

    handles.chip.queue_response(&[0x44, 0x00]);
    hal.iso14443a_poller_trx_short_frame(ShortFrame::SensReq)?;
    let event = hal.poller_wait_event(100);
    println!("event: {:?}", event);

    if event.contains(Event::RX_END) {
        let mut buf = [0u8; 2];
        let bits = hal.poller_rx(&mut buf)?;
        println!("ATQA ({} bits): {}", bits, frame_to_hex(&buf, bits));
    }

    hal.reset_mode()?;
    hal.low_power_mode_start()?;
    Ok(())
}
