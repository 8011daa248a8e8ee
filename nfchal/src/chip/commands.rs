// nfchal/src/chip/commands.rs
//! SPI operation modes and direct command codes.

/// Register write: `addr | WRITE_MODE`.
pub const WRITE_MODE: u8 = 0x00;
/// Register read: `addr | READ_MODE`.
pub const READ_MODE: u8 = 0x40;
/// Mask selecting the operation mode bits of the first byte.
pub const MODE_MASK: u8 = 0xC0;
/// Any byte with both top bits set is a direct command.
pub const CMD_MODE: u8 = 0xC0;

pub const FIFO_LOAD: u8 = 0x80;
pub const FIFO_READ: u8 = 0x9F;
pub const PT_A_CONFIG_LOAD: u8 = 0xA0;
pub const PT_F_CONFIG_LOAD: u8 = 0xA8;
pub const PT_TSN_DATA_LOAD: u8 = 0xAC;
pub const PT_MEM_READ: u8 = 0xBF;

pub const SET_DEFAULT: u8 = 0xC1;
pub const STOP: u8 = 0xC2;
pub const TRANSMIT_WITH_CRC: u8 = 0xC4;
pub const TRANSMIT_WITHOUT_CRC: u8 = 0xC5;
pub const TRANSMIT_REQA: u8 = 0xC6;
pub const TRANSMIT_WUPA: u8 = 0xC7;
pub const GOTO_SENSE: u8 = 0xCD;
pub const GOTO_SLEEP: u8 = 0xCE;
pub const MASK_RECEIVE_DATA: u8 = 0xD0;
pub const UNMASK_RECEIVE_DATA: u8 = 0xD1;
pub const ADJUST_REGULATORS: u8 = 0xD6;
pub const CLEAR_FIFO: u8 = 0xDB;
pub const TRANSPARENT_MODE: u8 = 0xDC;
pub const MEASURE_VDD: u8 = 0xDF;
pub const SPACE_B_ACCESS: u8 = 0xFB;
pub const TEST_ACCESS: u8 = 0xFC;

/// Passive target memory layout lengths.
pub const PTM_A_LEN: usize = 15;
pub const PTM_F_LEN: usize = 21;
pub const PTM_TSN_LEN: usize = 12;
