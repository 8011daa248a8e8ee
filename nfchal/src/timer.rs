// nfchal/src/timer.rs
//! Frame wait and block transmit timers.
//!
//! Durations come in carrier cycles (fc) and are converted into
//! prescaler/auto-reload pairs for a 16-bit countdown timer.

use std::sync::Arc;

use log::{error, trace};

use crate::constants::{CARRIER_FREQUENCY_HZ, LOG_TARGET};
use crate::event::{EventSignal, InternalEvent};
use crate::platform::HwTimer;

const TIMER_MAX: u64 = 0xFFFF;

/// Timer ticks for `fc` carrier cycles, at least one.
pub fn fc_to_ticks(fc: u32, clock_hz: u32) -> u32 {
    let ticks = fc as u64 * clock_hz as u64 / CARRIER_FREQUENCY_HZ as u64;
    ticks.clamp(1, u32::MAX as u64) as u32
}

/// Timer ticks for `us` microseconds, at least one.
pub fn us_to_ticks(us: u32, clock_hz: u32) -> u32 {
    let ticks = us as u64 * clock_hz as u64 / 1_000_000;
    ticks.clamp(1, u32::MAX as u64) as u32
}

/// Split `ticks` into (prescaler, auto_reload), both 16 bit.
pub fn timer_registers(ticks: u32) -> (u16, u16) {
    let ticks = ticks.max(1) as u64;
    let prescaler = (ticks - 1) / TIMER_MAX;
    let auto_reload = ticks / (prescaler + 1);
    debug_assert!(prescaler <= TIMER_MAX, "timer prescaler overflow");
    debug_assert!(auto_reload <= TIMER_MAX, "timer auto-reload overflow");
    (
        prescaler.min(TIMER_MAX) as u16,
        auto_reload.min(TIMER_MAX) as u16,
    )
}

/// `requested - compensation` in fc, or `None` when the deadline has
/// already passed.
pub fn compensated(requested_fc: u32, compensation_fc: i32) -> Option<u32> {
    let remaining = requested_fc as i64 - compensation_fc as i64;
    (remaining > 0).then(|| remaining.min(u32::MAX as i64) as u32)
}

/// One hardware countdown timer bound to an expiry flag.
pub(crate) struct NfcTimer {
    name: &'static str,
    hw: Box<dyn HwTimer>,
    flag: InternalEvent,
    events: Arc<EventSignal>,
}

impl NfcTimer {
    pub fn new(
        name: &'static str,
        hw: Box<dyn HwTimer>,
        flag: InternalEvent,
        events: Arc<EventSignal>,
    ) -> Self {
        Self {
            name,
            hw,
            flag,
            events,
        }
    }

    pub fn init(&mut self) {
        let events = self.events.clone();
        let flag = self.flag;
        self.hw.set_isr(Some(Arc::new(move || events.set(flag))));
    }

    pub fn deinit(&mut self) {
        self.hw.disarm();
        self.hw.set_isr(None);
        self.events.clear(self.flag);
    }

    pub fn is_running(&self) -> bool {
        self.hw.is_running()
    }

    fn start_ticks(&mut self, ticks: u32) {
        if self.hw.is_running() {
            debug_assert!(false, "{} timer already running", self.name);
            error!(target: LOG_TARGET, "{} timer already running, restarting", self.name);
            self.stop();
        }
        let (prescaler, auto_reload) = timer_registers(ticks);
        trace!(
            target: LOG_TARGET,
            "{} timer psc={} arr={}", self.name, prescaler, auto_reload
        );
        self.hw.arm(prescaler, auto_reload);
    }

    /// Start for `fc` carrier cycles minus `compensation`. Not started at
    /// all when the compensation swallows the whole duration.
    pub fn start_fc(&mut self, fc: u32, compensation: i32) {
        match compensated(fc, compensation) {
            Some(fc) => {
                let ticks = fc_to_ticks(fc, self.hw.clock_hz());
                self.start_ticks(ticks);
            }
            None => trace!(target: LOG_TARGET, "{} timer skipped ({} fc)", self.name, fc),
        }
    }

    pub fn start_us(&mut self, us: u32) {
        let ticks = us_to_ticks(us, self.hw.clock_hz());
        self.start_ticks(ticks);
    }

    /// Disarm and drop a pending expiry. No-op when not running.
    pub fn stop(&mut self) {
        if self.hw.is_running() {
            self.hw.disarm();
        }
        self.events.clear(self.flag);
    }
}

/// The two timers the controller owns.
pub(crate) struct NfcTimers {
    pub fwt: NfcTimer,
    pub block_tx: NfcTimer,
}

impl NfcTimers {
    pub fn new(
        fwt: Box<dyn HwTimer>,
        block_tx: Box<dyn HwTimer>,
        events: Arc<EventSignal>,
    ) -> Self {
        Self {
            fwt: NfcTimer::new("fwt", fwt, InternalEvent::FWT_EXPIRED, events.clone()),
            block_tx: NfcTimer::new(
                "block_tx",
                block_tx,
                InternalEvent::BLOCK_TX_EXPIRED,
                events,
            ),
        }
    }

    pub fn init(&mut self) {
        self.fwt.init();
        self.block_tx.init();
    }

    pub fn deinit(&mut self) {
        self.fwt.deinit();
        self.block_tx.deinit();
    }
}
