// nfchal/src/tech/iso15693.rs
//! ISO15693 (NFC-V).
//!
//! The poller runs the chip in subcarrier stream mode and frames in
//! software. The listener runs in transparent mode: reader pauses are
//! captured and parsed here, responses are bit-banged.

use log::{debug, trace};

use super::{poller_tx_common, ListenerTechnology, PollerTechnology};
use crate::chip::registers::{
    aux_mod, corr_conf1, corr_conf2, mode, op_control, rx_conf1, rx_conf2, stream_mode,
};
use crate::chip::{Register, St25r3916};
use crate::codec::iso15693::{decode_frame, encode_frame, encoded_len};
use crate::constants::{BITS_IN_BYTE, FIFO_DEPTH, ISO15693_MAX_FRAME_SIZE, LOG_TARGET};
use crate::event::InternalEvent;
use crate::frontend::Frontend;
use crate::signal::{Iso15693DataRate, Iso15693Parser, Iso15693Signal};
use crate::types::Event;
use crate::{Error, Result};

const TX_BUF_LEN: usize = encoded_len(ISO15693_MAX_FRAME_SIZE * BITS_IN_BYTE);
const CAPTURE_CHUNK: usize = 64;

fn common_init(chip: &mut St25r3916) -> Result<()> {
    chip.change_reg_bits(
        Register::RX_CONF1,
        rx_conf1::Z12K | rx_conf1::H80 | rx_conf1::LP_MASK,
        rx_conf1::H80 | rx_conf1::Z12K,
    )?;
    chip.change_reg_bits(
        Register::RX_CONF2,
        rx_conf2::AGC6_3 | rx_conf2::AGC_M | rx_conf2::AGC_ALG | rx_conf2::SQM_DYN,
        rx_conf2::AGC_M | rx_conf2::AGC_ALG | rx_conf2::SQM_DYN,
    )?;
    chip.write_reg(Register::RX_CONF3, 0x00)?;
    chip.write_reg(Register::RX_CONF4, 0x00)?;
    chip.write_reg(
        Register::CORR_CONF1,
        corr_conf1::S0 | corr_conf1::S1 | corr_conf1::S4,
    )?;
    chip.write_reg(Register::CORR_CONF2, corr_conf2::S8 | corr_conf2::S9)
}

pub(crate) struct Iso15693Poller {
    tx_buf: [u8; TX_BUF_LEN],
    fifo_buf: [u8; FIFO_DEPTH],
    frame_buf: [u8; ISO15693_MAX_FRAME_SIZE],
}

impl Iso15693Poller {
    pub fn new() -> Self {
        Self {
            tx_buf: [0; TX_BUF_LEN],
            fifo_buf: [0; FIFO_DEPTH],
            frame_buf: [0; ISO15693_MAX_FRAME_SIZE],
        }
    }
}

impl PollerTechnology for Iso15693Poller {
    fn init(&mut self, fe: &mut Frontend) -> Result<()> {
        let chip = &mut fe.chip;
        chip.change_reg_bits(
            Register::MODE,
            mode::OM_MASK | mode::TR_AM,
            mode::OM_SUBCARRIER_STREAM | mode::TR_AM_OOK,
        )?;
        chip.write_reg(
            Register::STREAM_MODE,
            stream_mode::SCF_SC424 | stream_mode::STX_106 | stream_mode::SCP_8PULSES,
        )?;
        chip.clear_reg_bits(Register::AUX_MOD, aux_mod::DIS_REG_AM | aux_mod::RES_AM)?;
        common_init(chip)
    }

    fn tx(&mut self, fe: &mut Frontend, data: &[u8], bits: usize) -> Result<()> {
        let len = encode_frame(data, bits, &mut self.tx_buf);
        poller_tx_common(fe, &self.tx_buf[..len], len * BITS_IN_BYTE)
    }

    fn rx(&mut self, fe: &mut Frontend, buf: &mut [u8]) -> Result<usize> {
        let raw_bits = fe
            .chip
            .read_fifo(&mut self.fifo_buf)
            .map_err(|_| Error::Communication)?;
        let raw_bytes = raw_bits.div_ceil(BITS_IN_BYTE);
        let bits = decode_frame(&self.fifo_buf[..raw_bytes], raw_bits, &mut self.frame_buf)?;
        let bytes = bits.div_ceil(BITS_IN_BYTE);
        if bytes > buf.len() {
            return Err(Error::BufferOverflow);
        }
        buf[..bytes].copy_from_slice(&self.frame_buf[..bytes]);
        Ok(bits)
    }
}

pub(crate) struct Iso15693Listener {
    signal: Iso15693Signal,
    parser: Iso15693Parser,
    capture_buf: [u32; CAPTURE_CHUNK],
}

impl Iso15693Listener {
    pub fn new() -> Self {
        Self {
            signal: Iso15693Signal::new(),
            parser: Iso15693Parser::new(),
            capture_buf: [0; CAPTURE_CHUNK],
        }
    }

    /// Send only a response SOF.
    pub fn tx_sof(&mut self, fe: &mut Frontend) -> Result<()> {
        self.signal
            .tx_sof(&mut *fe.signal, Iso15693DataRate::High);
        Ok(())
    }

    fn collect_edges(&mut self, fe: &mut Frontend) {
        loop {
            let n = fe.capture.drain(&mut self.capture_buf);
            self.parser.extend(&self.capture_buf[..n]);
            if n < CAPTURE_CHUNK {
                break;
            }
        }
    }
}

impl ListenerTechnology for Iso15693Listener {
    fn init(&mut self, fe: &mut Frontend) -> Result<()> {
        let chip = &mut fe.chip;
        chip.write_reg(Register::MODE, mode::OM_TARG_NFCA | mode::TR_AM_OOK)?;
        chip.set_reg_bits(Register::OP_CONTROL, op_control::RX_EN)?;
        chip.set_reg_bits(Register::MODE, mode::TARG)?;
        common_init(chip)?;
        self.parser.reset();
        fe.transparent_enter()
    }

    fn deinit(&mut self, fe: &mut Frontend) -> Result<()> {
        fe.transparent_exit()
    }

    fn wait_event(&mut self, fe: &mut Frontend, timeout_ms: u32) -> Event {
        let deadline = fe.deadline(timeout_ms);
        let mask = InternalEvent::ABORT | InternalEvent::TRANSPARENT_DATA_RECEIVED;
        loop {
            let Some(remaining) = fe.remaining(deadline) else {
                return Event::TIMEOUT;
            };
            let flags = fe.events.wait_any(mask, remaining);
            if flags.is_empty() {
                return Event::TIMEOUT;
            }
            if flags.contains(InternalEvent::ABORT) {
                return Event::ABORT_REQUEST;
            }
            self.collect_edges(fe);
            match self.parser.parse() {
                Ok(len) => {
                    trace!(target: LOG_TARGET, "iso15693 reader frame, {} bytes", len);
                    return Event::RX_END;
                }
                Err(Error::IncompleteFrame) => {}
                Err(e) => {
                    debug!(target: LOG_TARGET, "dropping reader frame: {}", e);
                    self.parser.reset();
                }
            }
        }
    }

    fn tx(&mut self, fe: &mut Frontend, data: &[u8], bits: usize) -> Result<()> {
        let bytes = bits / BITS_IN_BYTE;
        self.signal
            .tx(&mut *fe.signal, Iso15693DataRate::High, &data[..bytes]);
        Ok(())
    }

    fn rx(&mut self, _fe: &mut Frontend, buf: &mut [u8]) -> Result<usize> {
        let frame = self.parser.data();
        if frame.is_empty() {
            return Err(Error::IncompleteFrame);
        }
        if frame.len() > buf.len() {
            return Err(Error::BufferOverflow);
        }
        buf[..frame.len()].copy_from_slice(frame);
        Ok(frame.len() * BITS_IN_BYTE)
    }

    fn sleep(&mut self, _fe: &mut Frontend) -> Result<()> {
        Ok(())
    }

    fn idle(&mut self, _fe: &mut Frontend) -> Result<()> {
        Ok(())
    }
}
