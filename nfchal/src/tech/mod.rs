// nfchal/src/tech/mod.rs
//! Technology dispatch.
//!
//! Every technology implements [`PollerTechnology`] and, when it can
//! emulate a card, [`ListenerTechnology`]. The per-mode runtime context
//! lives in a [`Session`] that exists from `set_mode` to `reset_mode`.

pub(crate) mod felica;
pub(crate) mod iso14443a;
pub(crate) mod iso14443b;
pub(crate) mod iso15693;

pub use felica::sensf_res_memory;
pub use iso14443a::col_res_memory;

use crate::chip::registers::{iso14443a_nfc, timer_emv_control};
use crate::chip::{commands, FifoReadError, Irq, Register};
use crate::frontend::Frontend;
use crate::types::{Event, Mode, Technology};
use crate::{Error, Result};

/// Latency correction in carrier cycles, subtracted from requested timer
/// durations. Negative values lengthen the timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Compensation {
    /// Frame delay (block transmit timer).
    pub fdt: i32,
    /// Frame wait (FWT timer).
    pub fwt: i32,
}

/// Static facts about a technology.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TechDescriptor {
    pub technology: Technology,
    pub poller: Compensation,
    /// `None` when the technology has no listener role.
    pub listener: Option<Compensation>,
}

impl TechDescriptor {
    pub fn compensation(&self, mode: Mode) -> Option<Compensation> {
        match mode {
            Mode::Poller => Some(self.poller),
            Mode::Listener => self.listener,
        }
    }

    pub fn supports(&self, mode: Mode) -> bool {
        self.compensation(mode).is_some()
    }
}

/// Registered technologies, indexed in [`Technology::ALL`] order.
pub static TECHNOLOGIES: [TechDescriptor; 4] = [
    TechDescriptor {
        technology: Technology::Iso14443a,
        poller: Compensation { fdt: -500, fwt: 0 },
        listener: Some(Compensation { fdt: 2000, fwt: 0 }),
    },
    TechDescriptor {
        technology: Technology::Iso14443b,
        poller: Compensation { fdt: 0, fwt: 0 },
        listener: None,
    },
    TechDescriptor {
        technology: Technology::Iso15693,
        poller: Compensation { fdt: 0, fwt: -1300 },
        listener: Some(Compensation { fdt: 2850, fwt: 0 }),
    },
    TechDescriptor {
        technology: Technology::Felica,
        poller: Compensation { fdt: 0, fwt: 0 },
        listener: Some(Compensation { fdt: 0, fwt: 0 }),
    },
];

pub fn descriptor(tech: Technology) -> &'static TechDescriptor {
    match tech {
        Technology::Iso14443a => &TECHNOLOGIES[0],
        Technology::Iso14443b => &TECHNOLOGIES[1],
        Technology::Iso15693 => &TECHNOLOGIES[2],
        Technology::Felica => &TECHNOLOGIES[3],
    }
}

/// Reader side of a technology.
pub(crate) trait PollerTechnology {
    fn init(&mut self, fe: &mut Frontend) -> Result<()>;

    fn deinit(&mut self, _fe: &mut Frontend) -> Result<()> {
        Ok(())
    }

    fn wait_event(&mut self, fe: &mut Frontend, timeout_ms: u32) -> Event {
        fe.wait_event_common(timeout_ms)
    }

    fn tx(&mut self, fe: &mut Frontend, data: &[u8], bits: usize) -> Result<()> {
        poller_tx_common(fe, data, bits)
    }

    fn rx(&mut self, fe: &mut Frontend, buf: &mut [u8]) -> Result<usize> {
        common_fifo_rx(fe, buf)
    }
}

/// Card emulation side of a technology.
pub(crate) trait ListenerTechnology {
    fn init(&mut self, fe: &mut Frontend) -> Result<()>;

    fn deinit(&mut self, _fe: &mut Frontend) -> Result<()> {
        Ok(())
    }

    fn wait_event(&mut self, fe: &mut Frontend, timeout_ms: u32) -> Event {
        fe.wait_event_common(timeout_ms)
    }

    fn tx(&mut self, fe: &mut Frontend, data: &[u8], bits: usize) -> Result<()> {
        common_fifo_tx(fe, data, bits)
    }

    fn rx(&mut self, fe: &mut Frontend, buf: &mut [u8]) -> Result<usize> {
        common_fifo_rx(fe, buf)
    }

    fn sleep(&mut self, fe: &mut Frontend) -> Result<()>;

    fn idle(&mut self, fe: &mut Frontend) -> Result<()>;
}

pub(crate) enum PollerSession {
    Iso14443a(iso14443a::Iso14443aPoller),
    Iso14443b(iso14443b::Iso14443bPoller),
    Iso15693(iso15693::Iso15693Poller),
    Felica(felica::FelicaPoller),
}

impl PollerSession {
    pub fn new(tech: Technology) -> Self {
        match tech {
            Technology::Iso14443a => Self::Iso14443a(iso14443a::Iso14443aPoller),
            Technology::Iso14443b => Self::Iso14443b(iso14443b::Iso14443bPoller),
            Technology::Iso15693 => Self::Iso15693(iso15693::Iso15693Poller::new()),
            Technology::Felica => Self::Felica(felica::FelicaPoller),
        }
    }

    pub fn as_dyn(&mut self) -> &mut dyn PollerTechnology {
        match self {
            Self::Iso14443a(t) => t,
            Self::Iso14443b(t) => t,
            Self::Iso15693(t) => t,
            Self::Felica(t) => t,
        }
    }
}

pub(crate) enum ListenerSession {
    Iso14443a(iso14443a::Iso14443aListener),
    Iso15693(iso15693::Iso15693Listener),
    Felica(felica::FelicaListener),
}

impl ListenerSession {
    /// `None` for technologies without a listener.
    pub fn new(tech: Technology) -> Option<Self> {
        match tech {
            Technology::Iso14443a => Some(Self::Iso14443a(iso14443a::Iso14443aListener::new())),
            Technology::Iso14443b => None,
            Technology::Iso15693 => Some(Self::Iso15693(iso15693::Iso15693Listener::new())),
            Technology::Felica => Some(Self::Felica(felica::FelicaListener)),
        }
    }

    pub fn as_dyn(&mut self) -> &mut dyn ListenerTechnology {
        match self {
            Self::Iso14443a(t) => t,
            Self::Iso15693(t) => t,
            Self::Felica(t) => t,
        }
    }
}

/// Runtime context of the selected mode and technology.
pub(crate) enum Session {
    Poller(PollerSession),
    Listener(ListenerSession),
}

impl Session {
    pub fn new(mode: Mode, tech: Technology) -> Option<Self> {
        match mode {
            Mode::Poller => Some(Session::Poller(PollerSession::new(tech))),
            Mode::Listener => ListenerSession::new(tech).map(Session::Listener),
        }
    }

    pub fn init(&mut self, fe: &mut Frontend) -> Result<()> {
        match self {
            Session::Poller(p) => p.as_dyn().init(fe),
            Session::Listener(l) => l.as_dyn().init(fe),
        }
    }

    pub fn deinit(&mut self, fe: &mut Frontend) -> Result<()> {
        match self {
            Session::Poller(p) => p.as_dyn().deinit(fe),
            Session::Listener(l) => l.as_dyn().deinit(fe),
        }
    }
}

/// Poller transmit: FIFO load with parity generation on, poller interrupts
/// enabled, no CRC appended.
pub(crate) fn poller_tx_common(fe: &mut Frontend, data: &[u8], bits: usize) -> Result<()> {
    let chip = &mut fe.chip;
    chip.direct_cmd(commands::CLEAR_FIFO)?;
    chip.clear_reg_bits(Register::TIMER_EMV_CONTROL, timer_emv_control::NRT_EMV)?;
    chip.clear_reg_bits(
        Register::ISO14443A_NFC,
        iso14443a_nfc::NO_TX_PAR | iso14443a_nfc::NO_RX_PAR,
    )?;
    chip.get_irq()?;
    chip.mask_irq(Irq::POLLER_TRX)?;
    chip.write_fifo(data, bits)?;
    chip.direct_cmd(commands::TRANSMIT_WITHOUT_CRC)
}

/// Plain FIFO transmit used by listeners.
pub(crate) fn common_fifo_tx(fe: &mut Frontend, data: &[u8], bits: usize) -> Result<()> {
    fe.chip.direct_cmd(commands::CLEAR_FIFO)?;
    fe.chip.write_fifo(data, bits)?;
    fe.chip.direct_cmd(commands::TRANSMIT_WITHOUT_CRC)
}

/// Drain the FIFO into `buf`, returning the received bit count.
pub(crate) fn common_fifo_rx(fe: &mut Frontend, buf: &mut [u8]) -> Result<usize> {
    fe.chip.read_fifo(buf).map_err(|e| match e {
        FifoReadError::Empty => Error::IncompleteFrame,
        FifoReadError::Overflow { .. } => Error::BufferOverflow,
        FifoReadError::Bus => Error::Communication,
    })
}
