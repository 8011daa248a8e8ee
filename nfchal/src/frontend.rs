// nfchal/src/frontend.rs
//! The chip plus the board lines that travel with it.

use std::sync::Arc;

use log::warn;

use crate::chip::{Irq, St25r3916};
use crate::constants::LOG_TARGET;
use crate::event::{flags_to_event, irq_to_event, EventSignal, InternalEvent};
use crate::platform::traits::{DelayNs, InputPin};
use crate::platform::{Clock, Delay, EdgeCapture, IrqLine, IrqPin, Isr, SignalOutput};
use crate::types::Event;
use crate::utils::{deadline_after, remaining_ms};
use crate::Result;

pub(crate) struct Frontend {
    pub chip: St25r3916,
    pub irq_pin: IrqPin,
    pub irq_line: Box<dyn IrqLine>,
    pub clock: Box<dyn Clock>,
    pub delay: Delay,
    pub signal: Box<dyn SignalOutput>,
    pub capture: Box<dyn EdgeCapture>,
    pub events: Arc<EventSignal>,
}

impl Frontend {
    fn isr_for(&self, flag: InternalEvent) -> Isr {
        let events = self.events.clone();
        Arc::new(move || events.set(flag))
    }

    pub fn irq_isr_install(&mut self) {
        let isr = self.isr_for(InternalEvent::IRQ);
        self.irq_line.set_isr(Some(isr));
    }

    pub fn irq_isr_remove(&mut self) {
        self.irq_line.set_isr(None);
    }

    /// Interrupt pin level. A pin read error counts as deasserted.
    pub fn irq_asserted(&mut self) -> bool {
        self.irq_pin.is_high().unwrap_or_else(|e| {
            warn!(target: LOG_TARGET, "irq pin read failed: {:?}", e);
            false
        })
    }

    /// Read status registers until the line drops, accumulating every cause.
    pub fn drain_irq(&mut self) -> Result<Irq> {
        let mut irq = self.chip.get_irq()?;
        while self.irq_asserted() {
            irq |= self.chip.get_irq()?;
        }
        Ok(irq)
    }

    /// Poll for `mask` until it shows up or `timeout_ms` passes.
    pub fn wait_for_specific_irq(&mut self, mask: Irq, timeout_ms: u32) -> Result<bool> {
        let deadline = self.clock.ticks_ms() + timeout_ms as u64;
        loop {
            if self.irq_asserted() && self.chip.get_irq()?.intersects(mask) {
                return Ok(true);
            }
            if self.clock.ticks_ms() >= deadline {
                return Ok(false);
            }
            self.delay.delay_ms(1);
        }
    }

    /// Default `wait_event`: interrupts, timers and abort.
    pub fn wait_event_common(&mut self, timeout_ms: u32) -> Event {
        let deadline = self.deadline(timeout_ms);
        // Level triggered: a cause raised before the waiter started still counts
        if self.irq_asserted() {
            self.events.set(InternalEvent::IRQ);
        }
        loop {
            let Some(remaining) = self.remaining(deadline) else {
                return Event::TIMEOUT;
            };
            let flags = self.events.wait_any(InternalEvent::COMMON, remaining);
            if flags.is_empty() {
                return Event::TIMEOUT;
            }
            let mut event = flags_to_event(flags);
            if flags.contains(InternalEvent::IRQ) {
                match self.drain_irq() {
                    Ok(irq) => event |= irq_to_event(irq),
                    Err(e) => warn!(target: LOG_TARGET, "irq drain failed: {}", e),
                }
            }
            if !event.is_empty() {
                return event;
            }
        }
    }

    pub fn deadline(&self, timeout_ms: u32) -> Option<u64> {
        deadline_after(self.clock.ticks_ms(), timeout_ms)
    }

    /// Milliseconds left until `deadline`, `None` once it passed.
    pub fn remaining(&self, deadline: Option<u64>) -> Option<u32> {
        remaining_ms(self.clock.ticks_ms(), deadline)
    }

    /// Hand the data line to software and route pause captures to the
    /// transparent data event.
    pub fn transparent_enter(&mut self) -> Result<()> {
        self.chip.direct_cmd(crate::chip::commands::TRANSPARENT_MODE)?;
        self.signal.begin();
        self.irq_isr_remove();
        let isr = self.isr_for(InternalEvent::TRANSPARENT_DATA_RECEIVED);
        self.capture.start(isr);
        Ok(())
    }

    pub fn transparent_exit(&mut self) -> Result<()> {
        self.capture.stop();
        self.irq_isr_install();
        self.signal.end();
        self.chip
            .direct_cmd(crate::chip::commands::UNMASK_RECEIVE_DATA)
    }
}
