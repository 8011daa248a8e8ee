// nfchal/src/tech/iso14443a.rs
//! NFC-A at 106 kbps: OOK poller and passive target listener.

use log::debug;

use super::{ListenerTechnology, PollerTechnology};
use crate::chip::registers::{
    aux, corr_conf1, iso14443a_nfc, mode, op_control, passive_target, rx_conf1, rx_conf2,
    timer_emv_control,
};
use crate::chip::{commands, Irq, Register, St25r3916};
use crate::constants::{ISO14443A_UID_INCOMPLETE, LOG_TARGET};
use crate::frontend::Frontend;
use crate::signal::Iso14443aSignal;
use crate::types::{Atqa, Event, ShortFrame, Uid};
use crate::Result;

const PARITY_OFF: u8 = iso14443a_nfc::NO_TX_PAR | iso14443a_nfc::NO_RX_PAR;

fn common_init(chip: &mut St25r3916) -> Result<()> {
    chip.write_reg(Register::RX_CONF1, rx_conf1::Z600K)?;
    chip.write_reg(
        Register::RX_CONF2,
        rx_conf2::AGC6_3 | rx_conf2::AGC_M | rx_conf2::AGC_EN | rx_conf2::SQM_DYN,
    )?;
    chip.write_reg(Register::RX_CONF3, 0x00)?;
    chip.write_reg(Register::RX_CONF4, 0x00)?;
    chip.write_reg(
        Register::CORR_CONF1,
        corr_conf1::S0 | corr_conf1::S4 | corr_conf1::S6,
    )?;
    chip.write_reg(Register::CORR_CONF2, 0x00)
}

pub(crate) struct Iso14443aPoller;

impl PollerTechnology for Iso14443aPoller {
    fn init(&mut self, fe: &mut Frontend) -> Result<()> {
        let chip = &mut fe.chip;
        chip.change_reg_bits(
            Register::MODE,
            mode::OM_MASK | mode::TR_AM,
            mode::OM_ISO14443A | mode::TR_AM_OOK,
        )?;
        // Modulation shaping
        chip.change_reg_bits(Register::OVERSHOOT_CONF1, 0xff, 0x40)?;
        chip.change_reg_bits(Register::OVERSHOOT_CONF2, 0xff, 0x03)?;
        chip.change_reg_bits(Register::UNDERSHOOT_CONF1, 0xff, 0x40)?;
        chip.change_reg_bits(Register::UNDERSHOOT_CONF2, 0xff, 0x03)?;
        common_init(chip)
    }

    fn deinit(&mut self, fe: &mut Frontend) -> Result<()> {
        fe.chip
            .change_reg_bits(Register::ISO14443A_NFC, PARITY_OFF, 0)?;
        Ok(())
    }
}

pub(crate) struct Iso14443aListener {
    signal: Iso14443aSignal,
}

impl Iso14443aListener {
    pub fn new() -> Self {
        Self {
            signal: Iso14443aSignal::new(),
        }
    }

    /// Send a frame with explicit parity by bit-banging the data line in
    /// transparent mode.
    pub fn tx_custom_parity(
        &mut self,
        fe: &mut Frontend,
        data: &[u8],
        parity: &[u8],
        bits: usize,
    ) -> Result<()> {
        fe.chip.direct_cmd(commands::TRANSPARENT_MODE)?;
        fe.signal.begin();
        self.signal.tx(&mut *fe.signal, data, parity, bits);
        fe.signal.end();
        fe.chip.direct_cmd(commands::UNMASK_RECEIVE_DATA)
    }
}

impl ListenerTechnology for Iso14443aListener {
    fn init(&mut self, fe: &mut Frontend) -> Result<()> {
        let chip = &mut fe.chip;
        chip.write_reg(
            Register::OP_CONTROL,
            op_control::EN | op_control::RX_EN | op_control::EN_FD_AUTO_EFD,
        )?;
        chip.write_reg(Register::MODE, mode::TARG | mode::OM_TARG_NFCA)?;
        chip.write_reg(
            Register::PASSIVE_TARGET,
            (5 << passive_target::FDEL_SHIFT)
                | passive_target::D_AC_AP2P
                | passive_target::D_212_424_1R,
        )?;
        chip.write_reg(Register::MASK_RX_TIMER, 0x02)?;
        common_init(chip)?;

        chip.direct_cmd(commands::STOP)?;
        chip.get_irq()?;
        chip.mask_irq(Irq::LISTENER)?;
        // Automatic collision resolution on
        chip.clear_reg_bits(Register::PASSIVE_TARGET, passive_target::D_106_AC_A)?;
        chip.direct_cmd(commands::GOTO_SENSE)
    }

    fn wait_event(&mut self, fe: &mut Frontend, timeout_ms: u32) -> Event {
        let event = fe.wait_event_common(timeout_ms);
        if event.contains(Event::LISTENER_ACTIVE) {
            // Selected: the application answers from here on
            if let Err(e) = fe
                .chip
                .set_reg_bits(Register::PASSIVE_TARGET, passive_target::D_106_AC_A)
            {
                debug!(target: LOG_TARGET, "failed to disable collision resolution: {}", e);
            }
        }
        event
    }

    fn sleep(&mut self, fe: &mut Frontend) -> Result<()> {
        fe.chip
            .clear_reg_bits(Register::PASSIVE_TARGET, passive_target::D_106_AC_A)?;
        fe.chip.direct_cmd(commands::STOP)?;
        fe.chip.direct_cmd(commands::GOTO_SLEEP)
    }

    fn idle(&mut self, fe: &mut Frontend) -> Result<()> {
        fe.chip
            .clear_reg_bits(Register::PASSIVE_TARGET, passive_target::D_106_AC_A)?;
        fe.chip.direct_cmd(commands::STOP)?;
        fe.chip.direct_cmd(commands::GOTO_SENSE)
    }
}

/// REQA or WUPA, sent by the chip with parity on and CRC check off.
pub(crate) fn poller_trx_short_frame(fe: &mut Frontend, frame: ShortFrame) -> Result<()> {
    let chip = &mut fe.chip;
    chip.set_reg_bits(Register::AUX, aux::NO_CRC_RX)?;
    chip.change_reg_bits(Register::ISO14443A_NFC, PARITY_OFF, 0)?;
    chip.write_reg(Register::NUM_TX_BYTES2, 0)?;
    chip.get_irq()?;
    chip.mask_irq(Irq::POLLER_TRX)?;
    let cmd = match frame {
        ShortFrame::AllReq => commands::TRANSMIT_WUPA,
        ShortFrame::SensReq => commands::TRANSMIT_REQA,
    };
    chip.direct_cmd(cmd)
}

/// Transmit with hardware parity off; `data` already carries the parity
/// bits interleaved after every byte.
pub(crate) fn poller_tx_custom_parity(fe: &mut Frontend, data: &[u8], bits: usize) -> Result<()> {
    let chip = &mut fe.chip;
    chip.direct_cmd(commands::CLEAR_FIFO)?;
    chip.clear_reg_bits(Register::TIMER_EMV_CONTROL, timer_emv_control::NRT_EMV)?;
    chip.change_reg_bits(Register::ISO14443A_NFC, PARITY_OFF, PARITY_OFF)?;
    chip.get_irq()?;
    chip.mask_irq(Irq::POLLER_TRX)?;
    chip.write_fifo(data, bits)?;
    chip.direct_cmd(commands::TRANSMIT_WITHOUT_CRC)
}

/// Passive target memory image for automatic anticollision.
pub fn col_res_memory(uid: &Uid, atqa: &Atqa, sak: u8) -> [u8; commands::PTM_A_LEN] {
    let mut mem = [0u8; commands::PTM_A_LEN];
    let uid = uid.as_bytes();
    mem[..uid.len()].copy_from_slice(uid);
    mem[10..12].copy_from_slice(atqa.as_bytes());
    let sak_complete = sak & !ISO14443A_UID_INCOMPLETE;
    // First cascade level SAK announces a second level for 7 byte UIDs
    mem[12] = if uid.len() == 4 {
        sak_complete
    } else {
        ISO14443A_UID_INCOMPLETE
    };
    mem[13] = sak_complete;
    mem[14] = sak_complete;
    mem
}

pub(crate) fn listener_set_col_res_data(
    fe: &mut Frontend,
    uid: &Uid,
    atqa: &Atqa,
    sak: u8,
) -> Result<()> {
    let id_len = if uid.len() == 4 {
        aux::NFC_ID_4BYTES
    } else {
        aux::NFC_ID_7BYTES
    };
    fe.chip.change_reg_bits(Register::AUX, aux::NFC_ID_MASK, id_len)?;
    fe.chip.write_pta_mem(&col_res_memory(uid, atqa, sak))
}
