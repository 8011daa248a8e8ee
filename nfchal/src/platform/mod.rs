// nfchal/src/platform/mod.rs
//! Board services the controller runs on.
//!
//! The core never touches hardware directly. Everything it needs from the
//! board is bundled into a [`Platform`] handed to the builder. Bus, pin
//! level and delays come in as `embedded-hal` traits; timers, the
//! transparent mode data line and edge capture have no `embedded-hal`
//! counterpart and use the traits in [`traits`].

#[allow(missing_docs)]
pub mod mock;
mod std_clock;
pub mod traits;

use std::sync::Arc;

pub use std_clock::StdClock;
pub use traits::{
    frontend_spi, irq_pin, BusLock, Clock, Delay, EdgeCapture, FrontendSpi, HwTimer, IrqLine,
    IrqPin, Isr, SignalOutput,
};

/// Everything the controller owns on the board side.
pub struct Platform {
    /// Bus to the front end.
    pub spi: FrontendSpi,
    /// Arbitration with other users of the same bus.
    pub bus_lock: Arc<dyn BusLock>,
    /// Chip interrupt pin level.
    pub irq_pin: IrqPin,
    /// Chip interrupt pin edge handler.
    pub irq_line: Box<dyn IrqLine>,
    /// Frame wait timer.
    pub fwt_timer: Box<dyn HwTimer>,
    /// Block transmit (frame delay) timer.
    pub block_tx_timer: Box<dyn HwTimer>,
    pub clock: Box<dyn Clock>,
    pub delay: Delay,
    /// Transparent mode data output.
    pub signal: Box<dyn SignalOutput>,
    /// Transparent mode pause capture.
    pub capture: Box<dyn EdgeCapture>,
}

impl std::fmt::Debug for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Platform")
            .field("fwt_timer_hz", &self.fwt_timer.clock_hz())
            .field("block_tx_timer_hz", &self.block_tx_timer.clock_hz())
            .finish_non_exhaustive()
    }
}
