// nfchal/src/event.rs
//! Interrupt-to-thread event signalling.
//!
//! Interrupt handlers only set bits here. The registered receiver thread
//! waits on a subset of the bits and consumes the ones that fired.

use std::sync::{Condvar, Mutex, MutexGuard};
use std::thread::ThreadId;
use std::time::{Duration, Instant};

use log::trace;

use crate::chip::Irq;
use crate::constants::{EVENT_WAIT_FOREVER, LOG_TARGET};
use crate::types::Event;

bitflags::bitflags! {
    /// Flags raised by interrupt handlers or `abort`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct InternalEvent: u32 {
        const ABORT = 1 << 0;
        const IRQ = 1 << 1;
        const FWT_EXPIRED = 1 << 2;
        const BLOCK_TX_EXPIRED = 1 << 3;
        const TRANSPARENT_DATA_RECEIVED = 1 << 4;
    }
}

impl InternalEvent {
    /// Flags every default `wait_event` listens to.
    pub const COMMON: InternalEvent = InternalEvent::ABORT
        .union(InternalEvent::IRQ)
        .union(InternalEvent::FWT_EXPIRED)
        .union(InternalEvent::BLOCK_TX_EXPIRED);
}

#[derive(Debug)]
struct SignalState {
    receiver: Option<ThreadId>,
    flags: InternalEvent,
}

/// Thread-addressed flag word with a condition variable.
#[derive(Debug)]
pub struct EventSignal {
    state: Mutex<SignalState>,
    cond: Condvar,
}

impl EventSignal {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(SignalState {
                receiver: None,
                flags: InternalEvent::empty(),
            }),
            cond: Condvar::new(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, SignalState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Register the calling thread as receiver and drop stale flags.
    pub fn start(&self) {
        let mut st = self.lock();
        st.receiver = Some(std::thread::current().id());
        st.flags = InternalEvent::empty();
        trace!(target: LOG_TARGET, "event receiver {:?}", st.receiver);
    }

    pub fn stop(&self) {
        let mut st = self.lock();
        st.receiver = None;
        st.flags = InternalEvent::empty();
    }

    pub fn is_started(&self) -> bool {
        self.lock().receiver.is_some()
    }

    /// Raise flags. Dropped while no receiver is registered.
    pub fn set(&self, flags: InternalEvent) {
        let mut st = self.lock();
        if st.receiver.is_none() {
            return;
        }
        st.flags |= flags;
        self.cond.notify_all();
    }

    pub fn clear(&self, flags: InternalEvent) {
        self.lock().flags.remove(flags);
    }

    /// Flags currently pending, without consuming them.
    pub fn pending(&self) -> InternalEvent {
        self.lock().flags
    }

    /// Block until any flag in `mask` is set or `timeout_ms` passes.
    /// Returns the consumed flags, empty on timeout.
    pub fn wait_any(&self, mask: InternalEvent, timeout_ms: u32) -> InternalEvent {
        let deadline = if timeout_ms == EVENT_WAIT_FOREVER {
            None
        } else {
            Some(Instant::now() + Duration::from_millis(timeout_ms as u64))
        };
        let mut st = self.lock();
        loop {
            let hit = st.flags & mask;
            if !hit.is_empty() {
                st.flags.remove(hit);
                return hit;
            }
            st = match deadline {
                None => self.cond.wait(st).unwrap_or_else(|e| e.into_inner()),
                Some(deadline) => {
                    let now = Instant::now();
                    if now >= deadline {
                        return InternalEvent::empty();
                    }
                    self.cond
                        .wait_timeout(st, deadline - now)
                        .unwrap_or_else(|e| e.into_inner())
                        .0
                }
            };
        }
    }
}

impl Default for EventSignal {
    fn default() -> Self {
        Self::new()
    }
}

/// Map drained chip interrupt causes onto public events.
pub fn irq_to_event(irq: Irq) -> Event {
    let mut event = Event::empty();
    if irq.contains(Irq::OSC) {
        event |= Event::OSC_ON;
    }
    if irq.contains(Irq::TXE) {
        event |= Event::TX_END;
    }
    if irq.contains(Irq::RXS) {
        event |= Event::RX_START;
    }
    if irq.contains(Irq::RXE) {
        event |= Event::RX_END;
    }
    if irq.contains(Irq::COL) {
        event |= Event::COLLISION;
    }
    if irq.contains(Irq::EON) {
        event |= Event::FIELD_ON;
    }
    if irq.contains(Irq::EOF) {
        event |= Event::FIELD_OFF;
    }
    if irq.intersects(Irq::WU_A | Irq::WU_A_X | Irq::WU_F) {
        event |= Event::LISTENER_ACTIVE;
    }
    event
}

/// Map the non-interrupt flags onto public events.
pub fn flags_to_event(flags: InternalEvent) -> Event {
    let mut event = Event::empty();
    if flags.contains(InternalEvent::FWT_EXPIRED) {
        event |= Event::TIMER_FWT_EXPIRED;
    }
    if flags.contains(InternalEvent::BLOCK_TX_EXPIRED) {
        event |= Event::TIMER_BLOCK_TX_EXPIRED;
    }
    if flags.contains(InternalEvent::ABORT) {
        event |= Event::ABORT_REQUEST;
    }
    event
}
