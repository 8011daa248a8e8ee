// nfchal/src/chip/mod.rs
//! Register/FIFO driver for the ST25R3916.
//!
//! Every call is one `SpiDevice` transaction, so chip select brackets it. The driver has
//! no protocol knowledge and never retries.

pub mod commands;
pub mod irq;
pub mod registers;

use log::trace;

use crate::constants::{BITS_IN_BYTE, LOG_TARGET};
use crate::platform::traits::Operation;
use crate::platform::FrontendSpi;
use crate::{Error, Result};

pub use irq::Irq;
pub use registers::{Register, RegisterSpace};

/// Why a FIFO read produced no data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FifoReadError {
    /// The FIFO holds no bytes.
    Empty,
    /// The FIFO holds more bytes than the destination can take.
    Overflow { available: usize },
    /// The bus transfer failed.
    Bus,
}

/// ST25R3916 driver over an `embedded-hal` SPI device.
pub struct St25r3916 {
    spi: FrontendSpi,
}

impl St25r3916 {
    pub fn new(spi: FrontendSpi) -> Self {
        Self { spi }
    }

    fn transfer(&mut self, header: &[u8], out: &[u8], input: &mut [u8]) -> Result<()> {
        let mut ops = [
            Operation::Write(header),
            Operation::Write(out),
            Operation::Read(input),
        ];
        self.spi.transaction(&mut ops).map_err(|e| {
            trace!(target: LOG_TARGET, "spi: {:?}", e);
            Error::Communication
        })
    }

    fn header(reg: Register, op: u8) -> ([u8; 2], usize) {
        match reg.space() {
            RegisterSpace::A => ([reg.addr() | op, 0], 1),
            RegisterSpace::B => ([commands::SPACE_B_ACCESS, reg.addr() | op], 2),
        }
    }

    pub fn read_reg(&mut self, reg: Register) -> Result<u8> {
        let mut val = [0u8; 1];
        self.read_burst_regs(reg, &mut val)?;
        Ok(val[0])
    }

    pub fn read_burst_regs(&mut self, start: Register, values: &mut [u8]) -> Result<()> {
        let (hdr, n) = Self::header(start, commands::READ_MODE);
        self.transfer(&hdr[..n], &[], values)?;
        trace!(target: LOG_TARGET, "rd {:?}: {}", start, crate::utils::bytes_to_hex_spaced(values));
        Ok(())
    }

    pub fn write_reg(&mut self, reg: Register, value: u8) -> Result<()> {
        self.write_burst_regs(reg, &[value])
    }

    pub fn write_burst_regs(&mut self, start: Register, values: &[u8]) -> Result<()> {
        trace!(target: LOG_TARGET, "wr {:?}: {}", start, crate::utils::bytes_to_hex_spaced(values));
        let (hdr, n) = Self::header(start, commands::WRITE_MODE);
        self.transfer(&hdr[..n], values, &mut [])
    }

    pub fn read_test_reg(&mut self, addr: u8) -> Result<u8> {
        let mut val = [0u8; 1];
        self.transfer(
            &[commands::TEST_ACCESS, addr | commands::READ_MODE],
            &[],
            &mut val,
        )?;
        Ok(val[0])
    }

    pub fn write_test_reg(&mut self, addr: u8, value: u8) -> Result<()> {
        self.transfer(
            &[commands::TEST_ACCESS, addr | commands::WRITE_MODE],
            &[value],
            &mut [],
        )
    }

    pub fn direct_cmd(&mut self, cmd: u8) -> Result<()> {
        debug_assert_eq!(cmd & commands::MODE_MASK, commands::CMD_MODE);
        trace!(target: LOG_TARGET, "cmd {:#04x}", cmd);
        self.transfer(&[cmd], &[], &mut [])
    }

    /// Read-modify-write: clears `clr_mask`, sets `set_mask`, and only
    /// writes when the value changes. Returns whether a write happened.
    pub fn modify_reg(&mut self, reg: Register, clr_mask: u8, set_mask: u8) -> Result<bool> {
        let old = self.read_reg(reg)?;
        let new = (old & !clr_mask) | set_mask;
        if new != old {
            self.write_reg(reg, new)?;
            return Ok(true);
        }
        Ok(false)
    }

    pub fn change_reg_bits(&mut self, reg: Register, mask: u8, value: u8) -> Result<bool> {
        self.modify_reg(reg, mask, mask & value)
    }

    pub fn set_reg_bits(&mut self, reg: Register, bits: u8) -> Result<bool> {
        self.modify_reg(reg, 0, bits)
    }

    pub fn clear_reg_bits(&mut self, reg: Register, bits: u8) -> Result<bool> {
        self.modify_reg(reg, bits, 0)
    }

    pub fn change_test_reg_bits(&mut self, addr: u8, mask: u8, value: u8) -> Result<bool> {
        let old = self.read_test_reg(addr)?;
        let new = (old & !mask) | (mask & value);
        if new != old {
            self.write_test_reg(addr, new)?;
            return Ok(true);
        }
        Ok(false)
    }

    /// True when `(reg & mask) == value`.
    pub fn check_reg(&mut self, reg: Register, mask: u8, value: u8) -> Result<bool> {
        Ok(self.read_reg(reg)? & mask == value)
    }

    /// Read and thereby clear all four interrupt status registers.
    pub fn get_irq(&mut self) -> Result<Irq> {
        let mut raw = [0u8; 4];
        self.read_burst_regs(Register::IRQ_MAIN, &mut raw)?;
        Ok(Irq::from_bits_retain(u32::from_le_bytes(raw)))
    }

    /// Enable exactly the causes in `enabled`; the chip takes a disable mask.
    pub fn mask_irq(&mut self, enabled: Irq) -> Result<()> {
        let raw = (!enabled.bits()).to_le_bytes();
        self.write_burst_regs(Register::IRQ_MASK_MAIN, &raw)
    }

    /// Program the TX bit count and load `bits` worth of `data` into the FIFO.
    pub fn write_fifo(&mut self, data: &[u8], bits: usize) -> Result<()> {
        let bytes = bits.div_ceil(BITS_IN_BYTE);
        debug_assert!(bytes <= data.len());
        debug_assert!(bytes <= crate::constants::FIFO_DEPTH);
        // NUM_TX_BYTES1:2 hold ntx[12:0] << 3 | nbtx[2:0], which is the bit count
        let count = (bits as u16).to_be_bytes();
        self.write_burst_regs(Register::NUM_TX_BYTES1, &count)?;
        self.transfer(&[commands::FIFO_LOAD], &data[..bytes], &mut [])
    }

    /// Drain the FIFO into `buf`, returning the exact received bit count.
    pub fn read_fifo(&mut self, buf: &mut [u8]) -> std::result::Result<usize, FifoReadError> {
        let mut status = [0u8; 2];
        self.read_burst_regs(Register::FIFO_STATUS1, &mut status)
            .map_err(|_| FifoReadError::Bus)?;
        let (bytes, bits) = fifo_level(status);
        if bytes == 0 {
            return Err(FifoReadError::Empty);
        }
        if bytes > buf.len() {
            return Err(FifoReadError::Overflow { available: bytes });
        }
        self.transfer(&[commands::FIFO_READ], &[], &mut buf[..bytes])
            .map_err(|_| FifoReadError::Bus)?;
        Ok(fifo_bit_count(bytes, bits))
    }

    pub fn write_pta_mem(&mut self, data: &[u8]) -> Result<()> {
        debug_assert!(data.len() <= commands::PTM_A_LEN);
        self.transfer(&[commands::PT_A_CONFIG_LOAD], data, &mut [])
    }

    pub fn write_ptf_mem(&mut self, data: &[u8]) -> Result<()> {
        debug_assert!(data.len() <= commands::PTM_F_LEN);
        self.transfer(&[commands::PT_F_CONFIG_LOAD], data, &mut [])
    }

    pub fn write_pttsn_mem(&mut self, data: &[u8]) -> Result<()> {
        debug_assert!(data.len() <= commands::PTM_TSN_LEN);
        self.transfer(&[commands::PT_TSN_DATA_LOAD], data, &mut [])
    }

    pub fn read_pt_mem(&mut self, buf: &mut [u8]) -> Result<()> {
        self.transfer(&[commands::PT_MEM_READ], &[], buf)
    }

    /// True when the IC type field matches the ST25R3916.
    pub fn check_identity(&mut self) -> Result<bool> {
        let id = self.read_reg(Register::IC_IDENTITY)?;
        Ok(id & registers::ic_identity::IC_TYPE_MASK == registers::ic_identity::IC_TYPE_ST25R3916)
    }
}

/// Split the two FIFO status bytes into (byte count, partial bits of the last byte).
pub fn fifo_level(status: [u8; 2]) -> (usize, u8) {
    use registers::fifo_status2::*;
    let high = ((status[1] & FIFO_B_MASK) >> FIFO_B_SHIFT) as usize;
    let bytes = (high << 8) | status[0] as usize;
    let bits = (status[1] & FIFO_LB_MASK) >> FIFO_LB_SHIFT;
    (bytes, bits)
}

/// `bytes * 8` for whole bytes, `(bytes - 1) * 8 + bits` with a partial last byte.
pub fn fifo_bit_count(bytes: usize, bits: u8) -> usize {
    if bits != 0 {
        (bytes - 1) * BITS_IN_BYTE + bits as usize
    } else {
        bytes * BITS_IN_BYTE
    }
}
