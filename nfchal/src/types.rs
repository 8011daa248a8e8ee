// nfchal/src/types.rs

use crate::Error;
use derive_more::Display;
use std::convert::TryFrom;

/// Role the front end plays on the RF link.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Mode {
    /// Reader: generates the field and initiates every exchange.
    #[display(fmt = "poller")]
    Poller,
    /// Card emulation: answers a remote poller.
    #[display(fmt = "listener")]
    Listener,
}

/// Card technologies the controller can be configured for.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Technology {
    #[display(fmt = "ISO14443-A")]
    Iso14443a,
    #[display(fmt = "ISO14443-B")]
    Iso14443b,
    #[display(fmt = "ISO15693")]
    Iso15693,
    #[display(fmt = "FeliCa")]
    Felica,
}

impl Technology {
    /// All registered technologies in table order.
    pub const ALL: [Technology; 4] = [
        Technology::Iso14443a,
        Technology::Iso14443b,
        Technology::Iso15693,
        Technology::Felica,
    ];
}

bitflags::bitflags! {
    /// Events reported to callers of the `wait_event` family.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct Event: u32 {
        const OSC_ON = 1 << 0;
        const FIELD_ON = 1 << 1;
        const FIELD_OFF = 1 << 2;
        const LISTENER_ACTIVE = 1 << 3;
        const TX_START = 1 << 4;
        const TX_END = 1 << 5;
        const RX_START = 1 << 6;
        const RX_END = 1 << 7;
        const COLLISION = 1 << 8;
        const TIMER_FWT_EXPIRED = 1 << 9;
        const TIMER_BLOCK_TX_EXPIRED = 1 << 10;
        const TIMEOUT = 1 << 11;
        const ABORT_REQUEST = 1 << 12;
    }
}

/// ISO14443-3A short frames sent by dedicated chip commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortFrame {
    /// WUPA (0x52): wakes idle and halted cards.
    AllReq,
    /// REQA (0x26): wakes idle cards only.
    SensReq,
}

/// ISO14443-3A UID (4, 7 or 10 bytes).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Uid {
    bytes: [u8; 10],
    len: usize,
}

impl Uid {
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len]
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn to_hex(&self) -> String {
        crate::utils::bytes_to_hex(self.as_bytes())
    }
}

impl TryFrom<&[u8]> for Uid {
    type Error = Error;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        if !matches!(bytes.len(), 4 | 7 | 10) {
            return Err(Error::DataFormat);
        }
        let mut arr = [0u8; 10];
        arr[..bytes.len()].copy_from_slice(bytes);
        Ok(Self {
            bytes: arr,
            len: bytes.len(),
        })
    }
}

/// ISO14443-3A ATQA, transmitted LSB first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Atqa([u8; 2]);

impl Atqa {
    pub const fn from_bytes(bytes: [u8; 2]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 2] {
        &self.0
    }
}

/// IDm - Newtype Pattern (8 バイト)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Idm([u8; 8]);

impl Idm {
    pub fn from_bytes(bytes: [u8; 8]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 8] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        crate::utils::bytes_to_hex(self.as_bytes())
    }
}

/// PMm - Newtype Pattern (8 バイト)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Pmm([u8; 8]);

impl Pmm {
    pub fn from_bytes(bytes: [u8; 8]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 8] {
        &self.0
    }
}

/// FeliCa system code, sent big-endian in SENSF_RES.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SystemCode(u16);

impl SystemCode {
    pub const ANY: Self = Self(0xffff);
    pub const COMMON: Self = Self(0xfe00);

    pub const fn new(code: u16) -> Self {
        Self(code)
    }

    pub fn as_u16(&self) -> u16 {
        self.0
    }

    pub fn to_be_bytes(&self) -> [u8; 2] {
        self.0.to_be_bytes()
    }
}
