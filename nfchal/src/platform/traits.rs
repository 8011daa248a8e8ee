// nfchal/src/platform/traits.rs

use std::sync::Arc;
use std::time::Duration;

pub use embedded_hal::delay::DelayNs;
pub use embedded_hal::digital::InputPin;
pub use embedded_hal::spi::{Operation, SpiDevice};
use embedded_hal::{digital, spi};

/// Interrupt service callback installed by the core on a platform source.
/// Runs in interrupt context: it only sets event flags.
pub type Isr = Arc<dyn Fn() + Send + Sync>;

/// SPI device of the front end. Chip select is handled per transaction;
/// errors are reduced to their kind.
pub type FrontendSpi = Box<dyn SpiDevice<u8, Error = spi::ErrorKind> + Send>;

/// Level of the (active high) chip interrupt pin.
pub type IrqPin = Box<dyn InputPin<Error = digital::ErrorKind> + Send>;

/// Blocking delay provider.
pub type Delay = Box<dyn DelayNs + Send>;

/// Box any [`SpiDevice`] as the front end bus.
pub fn frontend_spi<S>(dev: S) -> FrontendSpi
where
    S: SpiDevice + Send + 'static,
{
    Box::new(KindSpi(dev))
}

/// Box any [`InputPin`] as the interrupt level input.
pub fn irq_pin<P>(pin: P) -> IrqPin
where
    P: InputPin + Send + 'static,
{
    Box::new(KindPin(pin))
}

/// Maps a device specific SPI error onto [`spi::ErrorKind`].
pub struct KindSpi<S>(pub S);

impl<S: SpiDevice> spi::ErrorType for KindSpi<S> {
    type Error = spi::ErrorKind;
}

impl<S: SpiDevice> SpiDevice for KindSpi<S> {
    fn transaction(&mut self, operations: &mut [Operation<'_, u8>]) -> Result<(), spi::ErrorKind> {
        self.0
            .transaction(operations)
            .map_err(|e| spi::Error::kind(&e))
    }
}

/// Maps a pin specific error onto [`digital::ErrorKind`].
pub struct KindPin<P>(pub P);

impl<P: InputPin> digital::ErrorType for KindPin<P> {
    type Error = digital::ErrorKind;
}

impl<P: InputPin> InputPin for KindPin<P> {
    fn is_high(&mut self) -> Result<bool, digital::ErrorKind> {
        self.0.is_high().map_err(|e| digital::Error::kind(&e))
    }

    fn is_low(&mut self) -> Result<bool, digital::ErrorKind> {
        self.0.is_low().map_err(|e| digital::Error::kind(&e))
    }
}

/// Arbitration for a bus shared with other peripherals.
pub trait BusLock: Send + Sync {
    /// Take the bus, giving up after `timeout`. `false` when it stayed busy.
    fn try_lock(&self, timeout: Duration) -> bool;

    fn unlock(&self);
}

/// Edge interrupt on the chip interrupt pin. The level itself is read
/// through the platform's [`IrqPin`].
pub trait IrqLine: Send {
    /// Install the rising edge handler, or remove it with `None`.
    fn set_isr(&mut self, isr: Option<Isr>);
}

/// A general purpose countdown timer with an update interrupt.
pub trait HwTimer: Send {
    /// Counter input clock in Hz.
    fn clock_hz(&self) -> u32;

    /// Install the update interrupt handler, or remove it with `None`.
    fn set_isr(&mut self, isr: Option<Isr>);

    /// Load prescaler and auto-reload and start counting in one-pulse mode.
    fn arm(&mut self, prescaler: u16, auto_reload: u16);

    /// Stop counting and clear a pending update flag.
    fn disarm(&mut self);

    /// True between `arm` and expiry or `disarm`.
    fn is_running(&self) -> bool;
}

/// Monotonic millisecond tick counter.
pub trait Clock: Send {
    fn ticks_ms(&self) -> u64;
}

/// Data line driven directly while the chip is in transparent mode.
pub trait SignalOutput: Send {
    /// Take the line over from the bus peripheral.
    fn begin(&mut self);

    /// Play a run-length sequence: `runs[i]` carrier cycles at the level
    /// `start_level` for even `i` and its inverse for odd `i`.
    fn play(&mut self, start_level: bool, runs: &[u32]);

    /// Drive the line low and hand it back to the bus peripheral.
    fn end(&mut self);
}

/// Edge capture on the interrupt pin while the chip is in transparent mode.
///
/// The capture reports the start of every reader modulation pause as a
/// timestamp in carrier cycles and fires its ISR once the line has been
/// idle longer than a symbol.
pub trait EdgeCapture: Send {
    fn start(&mut self, isr: Isr);

    fn stop(&mut self);

    /// Move captured timestamps into `out`, returning how many were written.
    fn drain(&mut self, out: &mut [u32]) -> usize;
}
