// nfchal/src/hal/handle.rs

use std::marker::PhantomData;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use log::{debug, error, info, warn};

use super::contract;
use super::guard::HalGuard;
use super::lock::OwnerLock;
use crate::chip::registers::{
    self, aux, aux_display, aux_mod, bit_rate, corr_conf1, emd_sup_conf, io_conf1, io_conf2,
    op_control, passive_target, pt_mod, regulator_control, res_am_mod, rx_conf2, tx_driver,
};
use crate::chip::{commands, Irq, Register, St25r3916};
use crate::config::HalConfig;
use crate::constants::LOG_TARGET;
use crate::event::{EventSignal, InternalEvent};
use crate::frontend::Frontend;
use crate::platform::traits::DelayNs;
use crate::platform::{BusLock, Platform};
use crate::tech::iso14443a;
use crate::tech::{
    descriptor, felica, Compensation, ListenerSession, ListenerTechnology, PollerSession,
    PollerTechnology, Session,
};
use crate::timer::NfcTimers;
use crate::types::{Atqa, Event, Idm, Mode, Pmm, ShortFrame, SystemCode, Technology, Uid};
use crate::{Error, Result};

/// Type-state markers
pub struct Uninitialized;
pub struct Ready;

pub(crate) struct HalState {
    pub frontend: Frontend,
    pub timers: NfcTimers,
    pub mode: Option<Mode>,
    pub tech: Option<Technology>,
    pub session: Option<Session>,
}

/// Handle on the NFC front end.
///
/// Created by [`crate::NfcHalBuilder`], brought up by
/// [`NfcHal::init`]. All hardware touching calls on `NfcHal<Ready>`
/// require the calling thread to hold the lock taken by
/// [`NfcHal::acquire`].
pub struct NfcHal<State = Ready> {
    state: Mutex<HalState>,
    lock: OwnerLock,
    bus_lock: Arc<dyn BusLock>,
    events: Arc<EventSignal>,
    config: HalConfig,
    _state: PhantomData<State>,
}

impl<S> NfcHal<S> {
    fn state(&self) -> MutexGuard<'_, HalState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn config(&self) -> &HalConfig {
        &self.config
    }

    fn into_state<T>(self) -> NfcHal<T> {
        NfcHal {
            state: self.state,
            lock: self.lock,
            bus_lock: self.bus_lock,
            events: self.events,
            config: self.config,
            _state: PhantomData,
        }
    }

    /// Take exclusive access: the bus first, then the controller lock.
    /// Both waits together are bounded by the configured timeout.
    pub fn acquire(&self) -> Result<()> {
        let timeout = Duration::from_millis(self.config.acquire_timeout_ms as u64);
        let deadline = Instant::now() + timeout;
        if !self.bus_lock.try_lock(timeout) {
            debug!(target: LOG_TARGET, "bus stayed busy for {:?}", timeout);
            return Err(Error::Busy);
        }
        let left = deadline.saturating_duration_since(Instant::now());
        if !self.lock.try_acquire(left) {
            self.bus_lock.unlock();
            debug!(target: LOG_TARGET, "acquire timed out after {:?}", timeout);
            return Err(Error::Busy);
        }
        Ok(())
    }

    /// Give up exclusive access. The caller must be the holder.
    pub fn release(&self) {
        if !contract(self.lock.release(), "release by a thread that does not hold the lock") {
            return;
        }
        self.bus_lock.unlock();
    }

    fn ensure_owner(&self, op: &str) {
        contract(
            self.lock.is_held_by_current(),
            &format!("{} called without holding the lock", op),
        );
    }

    fn low_power_start(&self, st: &mut HalState) -> Result<()> {
        let fe = &mut st.frontend;
        fe.chip.direct_cmd(commands::STOP)?;
        fe.chip.clear_reg_bits(
            Register::OP_CONTROL,
            op_control::EN
                | op_control::RX_EN
                | op_control::WU
                | op_control::TX_EN
                | op_control::EN_FD_MASK,
        )?;
        fe.irq_isr_remove();
        st.timers.deinit();
        self.events.stop();
        debug!(target: LOG_TARGET, "low power mode on");
        Ok(())
    }

    fn turn_on_osc(&self, fe: &mut Frontend) -> Result<()> {
        self.events.start();
        if !fe
            .chip
            .check_reg(Register::OP_CONTROL, op_control::EN, op_control::EN)?
        {
            fe.chip.mask_irq(Irq::OSC)?;
            fe.chip.set_reg_bits(Register::OP_CONTROL, op_control::EN)?;
            fe.wait_for_specific_irq(Irq::OSC, self.config.osc_timeout_ms)?;
        }
        fe.chip.mask_irq(Irq::empty())?;
        if !fe
            .chip
            .check_reg(Register::AUX_DISPLAY, aux_display::OSC_OK, aux_display::OSC_OK)?
        {
            error!(target: LOG_TARGET, "oscillator did not stabilize");
            return Err(Error::Oscillator);
        }
        Ok(())
    }
}

impl NfcHal<Uninitialized> {
    pub(crate) fn new(platform: Platform, config: HalConfig) -> Self {
        let events = Arc::new(EventSignal::new());
        let frontend = Frontend {
            chip: St25r3916::new(platform.spi),
            irq_pin: platform.irq_pin,
            irq_line: platform.irq_line,
            clock: platform.clock,
            delay: platform.delay,
            signal: platform.signal,
            capture: platform.capture,
            events: events.clone(),
        };
        let timers = NfcTimers::new(platform.fwt_timer, platform.block_tx_timer, events.clone());
        Self {
            state: Mutex::new(HalState {
                frontend,
                timers,
                mode: None,
                tech: None,
                session: None,
            }),
            lock: OwnerLock::new(),
            bus_lock: platform.bus_lock,
            events,
            config,
            _state: PhantomData,
        }
    }

    /// Bring the chip up and leave it in low power mode.
    pub fn init(self) -> Result<NfcHal<Ready>> {
        self.acquire()?;
        let res = {
            let mut st = self.state();
            self.bring_up(&mut st)
        };
        self.release();
        match res {
            Ok(()) => {
                info!(target: LOG_TARGET, "front end ready");
                Ok(self.into_state())
            }
            Err(e) => {
                error!(target: LOG_TARGET, "bring-up failed: {}", e);
                Err(e)
            }
        }
    }

    fn bring_up(&self, st: &mut HalState) -> Result<()> {
        let cfg = &self.config;
        {
            let fe = &mut st.frontend;
            fe.chip.direct_cmd(commands::SET_DEFAULT)?;
            // Stronger MISO and IRQ drivers
            fe.chip.write_reg(Register::IO_CONF2, io_conf2::IO_DRV_LVL)?;
            if !fe.chip.check_identity()? {
                error!(target: LOG_TARGET, "unexpected chip identity");
                return Err(Error::Communication);
            }
            fe.chip.get_irq()?;
            fe.chip.mask_irq(Irq::empty())?;
            fe.irq_isr_install();
            fe.chip.change_test_reg_bits(
                registers::TEST_REG_OVERHEAT,
                registers::TEST_REG_OVERHEAT_DISABLE,
                registers::TEST_REG_OVERHEAT_DISABLE,
            )?;
        }
        st.timers.init();
        self.turn_on_osc(&mut st.frontend)?;

        let fe = &mut st.frontend;
        let mv = measure_vdd_mv(fe, cfg.vdd_measure_timeout_ms)?;
        let sup3v = if mv < cfg.io_3v_threshold_mv {
            io_conf2::SUP3V
        } else {
            0
        };
        info!(target: LOG_TARGET, "supply {} mV, {} V i/o", mv, if sup3v != 0 { 3 } else { 5 });
        let chip = &mut fe.chip;
        chip.change_reg_bits(Register::IO_CONF2, io_conf2::SUP3V, sup3v)?;

        // MCU clock output off
        chip.change_reg_bits(
            Register::IO_CONF1,
            io_conf1::OUT_CL_MASK | io_conf1::LF_CLK_OFF,
            0x07,
        )?;
        chip.change_reg_bits(Register::IO_CONF2, io_conf2::MISO_PD1 | io_conf2::MISO_PD2, 0)?;
        chip.change_reg_bits(Register::TX_DRIVER, tx_driver::D_RES_MASK, 0)?;
        chip.change_reg_bits(Register::RES_AM_MOD, res_am_mod::FA3_F, res_am_mod::FA3_F)?;

        use registers::field_threshold::{RFE_MASK, TRG_MASK};
        chip.change_reg_bits(
            Register::FIELD_THRESHOLD_ACTV,
            TRG_MASK | RFE_MASK,
            cfg.field_activation_threshold,
        )?;
        chip.change_reg_bits(
            Register::FIELD_THRESHOLD_DEACTV,
            TRG_MASK | RFE_MASK,
            cfg.field_deactivation_threshold,
        )?;

        // External and internal load modulation
        chip.set_reg_bits(Register::AUX_MOD, aux_mod::LM_EXT)?;
        chip.set_reg_bits(Register::AUX_MOD, aux_mod::LM_DRI)?;
        chip.modify_reg(
            Register::PASSIVE_TARGET,
            passive_target::FDEL_MASK,
            5 << passive_target::FDEL_SHIFT,
        )?;
        chip.modify_reg(
            Register::PT_MOD,
            pt_mod::PTM_RES_MASK | pt_mod::PT_RES_MASK,
            0x0f,
        )?;
        chip.modify_reg(
            Register::EMD_SUP_CONF,
            emd_sup_conf::RX_START_EMV,
            emd_sup_conf::RX_START_EMV,
        )?;
        chip.modify_reg(Register::ANT_TUNE_A, 0xff, cfg.antenna_tune.0)?;
        chip.modify_reg(Register::ANT_TUNE_B, 0xff, cfg.antenna_tune.1)?;
        chip.change_reg_bits(
            Register::OP_CONTROL,
            op_control::EN_FD_MASK,
            op_control::EN_FD_AUTO_EFD,
        )?;

        if cfg.regulator_calibration
            && chip.check_reg(Register::REGULATOR_CONTROL, regulator_control::REG_S, 0)?
        {
            info!(target: LOG_TARGET, "adjusting regulators");
            chip.set_reg_bits(Register::REGULATOR_CONTROL, regulator_control::REG_S)?;
            chip.clear_reg_bits(Register::REGULATOR_CONTROL, regulator_control::REG_S)?;
            chip.direct_cmd(commands::ADJUST_REGULATORS)?;
            fe.delay.delay_ms(6);
        }

        self.low_power_start(st)
    }
}

/// Supply voltage in mV from one A/D conversion, 23.438 mV per step.
pub fn vdd_from_adc(ad: u8) -> u16 {
    let ad = ad as u32;
    (ad * 23 + (ad * 438 + 500) / 1000) as u16
}

fn measure_vdd_mv(fe: &mut Frontend, timeout_ms: u32) -> Result<u16> {
    fe.chip.change_reg_bits(
        Register::REGULATOR_CONTROL,
        regulator_control::MPSV_MASK,
        regulator_control::MPSV_VDD,
    )?;
    fe.chip.mask_irq(Irq::DCT)?;
    fe.chip.direct_cmd(commands::MEASURE_VDD)?;
    let done = fe.wait_for_specific_irq(Irq::DCT, timeout_ms)?;
    fe.chip.mask_irq(Irq::empty())?;
    if !done {
        warn!(target: LOG_TARGET, "supply measurement did not complete");
        return Err(Error::CommunicationTimeout);
    }
    Ok(vdd_from_adc(fe.chip.read_reg(Register::AD_RESULT)?))
}

impl NfcHal<Ready> {
    /// Acquire and return a guard that releases on drop.
    pub fn guard(&self) -> Result<HalGuard<'_>> {
        self.acquire()?;
        Ok(HalGuard::new(self))
    }

    /// Re-read the chip identity.
    pub fn is_ready(&self) -> Result<()> {
        self.acquire()?;
        let res = self.state().frontend.chip.check_identity();
        self.release();
        match res? {
            true => Ok(()),
            false => Err(Error::Communication),
        }
    }

    /// Enter low power and give up the handle.
    pub fn deinit(self) -> Result<()> {
        self.acquire()?;
        let res = {
            let mut st = self.state();
            if let Some(mut session) = st.session.take() {
                let HalState { frontend, .. } = &mut *st;
                if let Err(e) = session.deinit(frontend) {
                    warn!(target: LOG_TARGET, "deinit of active technology failed: {}", e);
                }
            }
            self.low_power_start(&mut st)
        };
        self.release();
        info!(target: LOG_TARGET, "front end shut down");
        res
    }

    pub fn low_power_mode_start(&self) -> Result<()> {
        self.ensure_owner("low_power_mode_start");
        let mut st = self.state();
        self.low_power_start(&mut st)
    }

    pub fn low_power_mode_stop(&self) -> Result<()> {
        self.ensure_owner("low_power_mode_stop");
        let mut st = self.state();
        st.frontend.irq_isr_install();
        st.timers.init();
        self.turn_on_osc(&mut st.frontend)?;
        st.frontend.chip.change_reg_bits(
            Register::OP_CONTROL,
            op_control::EN_FD_MASK,
            op_control::EN_FD_AUTO_EFD,
        )?;
        debug!(target: LOG_TARGET, "low power mode off");
        Ok(())
    }

    /// Register the calling thread as the receiver of events.
    pub fn event_start(&self) {
        self.events.start();
    }

    pub fn event_stop(&self) {
        self.events.stop();
    }

    /// Make the pending or next `wait_event` return `ABORT_REQUEST`.
    /// Callable from any thread.
    pub fn abort(&self) {
        self.events.set(InternalEvent::ABORT);
    }

    /// Program the chip for `mode` with `tech`. A previous selection must
    /// have been cleared with [`NfcHal::reset_mode`].
    pub fn set_mode(&self, mode: Mode, tech: Technology) -> Result<()> {
        self.ensure_owner("set_mode");
        let mut st = self.state();
        if !contract(st.session.is_none(), "set_mode while a technology is still active") {
            return Ok(());
        }
        let Some(mut session) = Session::new(mode, tech) else {
            contract(false, &format!("{} has no {} role", tech, mode));
            return Ok(());
        };
        let HalState { frontend, .. } = &mut *st;
        if mode == Mode::Poller {
            frontend
                .chip
                .clear_reg_bits(Register::OP_CONTROL, op_control::WU)?;
            // Correlator on
            frontend.chip.clear_reg_bits(Register::AUX, aux::DIS_CORR)?;
        }
        session.init(frontend)?;
        st.mode = Some(mode);
        st.tech = Some(tech);
        st.session = Some(session);
        info!(target: LOG_TARGET, "{} {} selected", tech, mode);
        Ok(())
    }

    /// Stop any exchange, tear the technology down and restore the neutral
    /// register baseline.
    pub fn reset_mode(&self) -> Result<()> {
        self.ensure_owner("reset_mode");
        let mut st = self.state();
        st.frontend.chip.direct_cmd(commands::STOP)?;
        let session = st.session.take();
        st.mode = None;
        st.tech = None;
        if let Some(mut session) = session {
            session.deinit(&mut st.frontend)?;
        }
        let chip = &mut st.frontend.chip;
        chip.write_reg(Register::MODE, registers::mode::OM0)?;
        chip.write_reg(Register::STREAM_MODE, 0)?;
        chip.clear_reg_bits(Register::AUX, aux::NO_CRC_RX)?;
        chip.clear_reg_bits(
            Register::BIT_RATE,
            bit_rate::TXRATE_MASK | bit_rate::RXRATE_MASK,
        )?;
        chip.write_reg(Register::RX_CONF1, 0)?;
        chip.write_reg(
            Register::RX_CONF2,
            rx_conf2::SQM_DYN | rx_conf2::AGC_EN | rx_conf2::AGC_M,
        )?;
        chip.write_reg(
            Register::CORR_CONF1,
            corr_conf1::S7 | corr_conf1::S4 | corr_conf1::S1 | corr_conf1::S0,
        )?;
        chip.write_reg(Register::CORR_CONF2, 0)?;
        debug!(target: LOG_TARGET, "mode reset");
        Ok(())
    }

    pub fn mode(&self) -> Option<(Mode, Technology)> {
        let st = self.state();
        st.mode.zip(st.tech)
    }

    pub fn field_detect_start(&self) -> Result<()> {
        self.ensure_owner("field_detect_start");
        let mut st = self.state();
        let chip = &mut st.frontend.chip;
        chip.write_reg(
            Register::OP_CONTROL,
            op_control::EN | op_control::EN_FD_MASK,
        )?;
        chip.write_reg(Register::MODE, registers::mode::TARG | registers::mode::OM0)
    }

    pub fn field_detect_stop(&self) -> Result<()> {
        self.ensure_owner("field_detect_stop");
        self.state()
            .frontend
            .chip
            .clear_reg_bits(Register::OP_CONTROL, op_control::EN | op_control::EN_FD_MASK)?;
        Ok(())
    }

    pub fn field_is_present(&self) -> Result<bool> {
        self.ensure_owner("field_is_present");
        self.state().frontend.chip.check_reg(
            Register::AUX_DISPLAY,
            aux_display::EFD_O,
            aux_display::EFD_O,
        )
    }

    /// Switch the carrier on. No-op when the transmitter is already
    /// enabled so the guard time is not restarted.
    pub fn poller_field_on(&self) -> Result<()> {
        self.ensure_owner("poller_field_on");
        let mut st = self.state();
        let chip = &mut st.frontend.chip;
        if !chip.check_reg(Register::OP_CONTROL, op_control::TX_EN, op_control::TX_EN)? {
            chip.write_reg(Register::FIELD_ON_GT, 0)?;
            chip.set_reg_bits(Register::OP_CONTROL, op_control::RX_EN | op_control::TX_EN)?;
        }
        Ok(())
    }

    fn with_poller<T>(
        &self,
        op: &str,
        fallback: T,
        f: impl FnOnce(&mut PollerSession, &mut Frontend) -> T,
    ) -> T {
        self.ensure_owner(op);
        let mut st = self.state();
        let HalState {
            frontend, session, ..
        } = &mut *st;
        match session {
            Some(Session::Poller(p)) => f(p, frontend),
            _ => {
                contract(false, &format!("{} needs poller mode", op));
                fallback
            }
        }
    }

    fn with_listener<T>(
        &self,
        op: &str,
        fallback: T,
        f: impl FnOnce(&mut ListenerSession, &mut Frontend) -> T,
    ) -> T {
        self.ensure_owner(op);
        let mut st = self.state();
        let HalState {
            frontend, session, ..
        } = &mut *st;
        match session {
            Some(Session::Listener(l)) => f(l, frontend),
            _ => {
                contract(false, &format!("{} needs listener mode", op));
                fallback
            }
        }
    }

    pub fn poller_wait_event(&self, timeout_ms: u32) -> Event {
        self.with_poller("poller_wait_event", Event::TIMEOUT, |p, fe| {
            p.as_dyn().wait_event(fe, timeout_ms)
        })
    }

    /// Transmit `bits` bits of `data`.
    pub fn poller_tx(&self, data: &[u8], bits: usize) -> Result<()> {
        self.with_poller("poller_tx", Ok(()), |p, fe| p.as_dyn().tx(fe, data, bits))
    }

    /// Receive into `buf`, returning the bit count.
    pub fn poller_rx(&self, buf: &mut [u8]) -> Result<usize> {
        self.with_poller("poller_rx", Ok(0), |p, fe| p.as_dyn().rx(fe, buf))
    }

    pub fn listener_wait_event(&self, timeout_ms: u32) -> Event {
        self.with_listener("listener_wait_event", Event::TIMEOUT, |l, fe| {
            l.as_dyn().wait_event(fe, timeout_ms)
        })
    }

    pub fn listener_tx(&self, data: &[u8], bits: usize) -> Result<()> {
        self.with_listener("listener_tx", Ok(()), |l, fe| l.as_dyn().tx(fe, data, bits))
    }

    pub fn listener_rx(&self, buf: &mut [u8]) -> Result<usize> {
        self.with_listener("listener_rx", Ok(0), |l, fe| l.as_dyn().rx(fe, buf))
    }

    pub fn listener_sleep(&self) -> Result<()> {
        self.with_listener("listener_sleep", Ok(()), |l, fe| l.as_dyn().sleep(fe))
    }

    pub fn listener_idle(&self) -> Result<()> {
        self.with_listener("listener_idle", Ok(()), |l, fe| l.as_dyn().idle(fe))
    }

    pub fn listener_enable_rx(&self) -> Result<()> {
        self.ensure_owner("listener_enable_rx");
        self.state()
            .frontend
            .chip
            .direct_cmd(commands::UNMASK_RECEIVE_DATA)
    }

    /// Abort the ongoing transmit or receive.
    pub fn trx_reset(&self) -> Result<()> {
        self.ensure_owner("trx_reset");
        self.state().frontend.chip.direct_cmd(commands::STOP)
    }

    fn active_compensation(st: &HalState) -> Compensation {
        let comp = st
            .mode
            .zip(st.tech)
            .and_then(|(mode, tech)| descriptor(tech).compensation(mode));
        match comp {
            Some(c) => c,
            None => {
                contract(false, "timer started without a selected technology");
                Compensation { fdt: 0, fwt: 0 }
            }
        }
    }

    /// Start the frame wait timer for `fc` carrier cycles.
    pub fn timer_fwt_start(&self, fc: u32) {
        self.ensure_owner("timer_fwt_start");
        let mut st = self.state();
        let comp = match st.mode {
            Some(Mode::Poller) => Self::active_compensation(&st).fwt,
            _ => 0,
        };
        st.timers.fwt.start_fc(fc, comp);
    }

    pub fn timer_fwt_stop(&self) {
        self.ensure_owner("timer_fwt_stop");
        self.state().timers.fwt.stop();
    }

    /// Start the block transmit timer for `fc` carrier cycles.
    pub fn timer_block_tx_start(&self, fc: u32) {
        self.ensure_owner("timer_block_tx_start");
        let mut st = self.state();
        let comp = Self::active_compensation(&st).fdt;
        st.timers.block_tx.start_fc(fc, comp);
    }

    /// Start the block transmit timer for `us` microseconds, uncompensated.
    pub fn timer_block_tx_start_us(&self, us: u32) {
        self.ensure_owner("timer_block_tx_start_us");
        self.state().timers.block_tx.start_us(us);
    }

    pub fn timer_block_tx_stop(&self) {
        self.ensure_owner("timer_block_tx_stop");
        self.state().timers.block_tx.stop();
    }

    pub fn timer_block_tx_is_running(&self) -> bool {
        self.state().timers.block_tx.is_running()
    }

    /// Send REQA or WUPA.
    pub fn iso14443a_poller_trx_short_frame(&self, frame: ShortFrame) -> Result<()> {
        self.with_poller("iso14443a_poller_trx_short_frame", Ok(()), |p, fe| match p {
            PollerSession::Iso14443a(_) => iso14443a::poller_trx_short_frame(fe, frame),
            _ => wrong_tech("iso14443a_poller_trx_short_frame", Ok(())),
        })
    }

    /// Transmit an anticollision frame.
    pub fn iso14443a_tx_sdd_frame(&self, data: &[u8], bits: usize) -> Result<()> {
        self.with_poller("iso14443a_tx_sdd_frame", Ok(()), |p, fe| match p {
            PollerSession::Iso14443a(a) => a.tx(fe, data, bits),
            _ => wrong_tech("iso14443a_tx_sdd_frame", Ok(())),
        })
    }

    /// Receive an anticollision frame, possibly ending in a partial byte.
    pub fn iso14443a_rx_sdd_frame(&self, buf: &mut [u8]) -> Result<usize> {
        self.with_poller("iso14443a_rx_sdd_frame", Ok(0), |p, fe| match p {
            PollerSession::Iso14443a(a) => a.rx(fe, buf),
            _ => wrong_tech("iso14443a_rx_sdd_frame", Ok(0)),
        })
    }

    /// Transmit with hardware parity off. `data` carries its own parity.
    pub fn iso14443a_poller_tx_custom_parity(&self, data: &[u8], bits: usize) -> Result<()> {
        self.with_poller("iso14443a_poller_tx_custom_parity", Ok(()), |p, fe| match p {
            PollerSession::Iso14443a(_) => iso14443a::poller_tx_custom_parity(fe, data, bits),
            _ => wrong_tech("iso14443a_poller_tx_custom_parity", Ok(())),
        })
    }

    /// Load the data the chip answers anticollision with.
    pub fn iso14443a_listener_set_col_res_data(
        &self,
        uid: &Uid,
        atqa: &Atqa,
        sak: u8,
    ) -> Result<()> {
        if !contract(
            matches!(uid.len(), 4 | 7),
            "collision resolution needs a 4 or 7 byte uid",
        ) {
            return Ok(());
        }
        self.with_listener("iso14443a_listener_set_col_res_data", Ok(()), |l, fe| match l {
            ListenerSession::Iso14443a(_) => {
                iso14443a::listener_set_col_res_data(fe, uid, atqa, sak)
            }
            _ => wrong_tech("iso14443a_listener_set_col_res_data", Ok(())),
        })
    }

    /// Answer with explicit parity bits (packed MSB first, one per byte).
    pub fn iso14443a_listener_tx_custom_parity(
        &self,
        data: &[u8],
        parity: &[u8],
        bits: usize,
    ) -> Result<()> {
        self.with_listener("iso14443a_listener_tx_custom_parity", Ok(()), |l, fe| match l {
            ListenerSession::Iso14443a(a) => a.tx_custom_parity(fe, data, parity, bits),
            _ => wrong_tech("iso14443a_listener_tx_custom_parity", Ok(())),
        })
    }

    /// Send a bare response SOF.
    pub fn iso15693_listener_tx_sof(&self) -> Result<()> {
        self.with_listener("iso15693_listener_tx_sof", Ok(()), |l, fe| match l {
            ListenerSession::Iso15693(v) => v.tx_sof(fe),
            _ => wrong_tech("iso15693_listener_tx_sof", Ok(())),
        })
    }

    /// Load the SENSF_RES the chip sends on its own.
    pub fn felica_listener_set_sensf_res_data(
        &self,
        idm: &Idm,
        pmm: &Pmm,
        system_code: SystemCode,
    ) -> Result<()> {
        self.with_listener("felica_listener_set_sensf_res_data", Ok(()), |l, fe| match l {
            ListenerSession::Felica(_) => {
                felica::listener_set_sensf_res_data(fe, idm, pmm, system_code)
            }
            _ => wrong_tech("felica_listener_set_sensf_res_data", Ok(())),
        })
    }

    /// Snapshot of both register spaces, skipping the read-to-clear
    /// interrupt status registers.
    #[cfg(feature = "diagnostics")]
    pub fn dump_registers(&self) -> Result<Vec<(Register, u8)>> {
        use crate::chip::RegisterSpace;
        self.ensure_owner("dump_registers");
        let mut st = self.state();
        let chip = &mut st.frontend.chip;
        let irq_status = Register::IRQ_MAIN.addr()..=Register::IRQ_TARGET.addr();
        let mut out = Vec::with_capacity(128);
        for space in [RegisterSpace::A, RegisterSpace::B] {
            for addr in 0..0x40u8 {
                if space == RegisterSpace::A && irq_status.contains(&addr) {
                    continue;
                }
                let reg = Register::from_parts(space, addr);
                out.push((reg, chip.read_reg(reg)?));
            }
        }
        Ok(out)
    }
}

fn wrong_tech<T>(op: &str, fallback: T) -> T {
    contract(false, &format!("{} used with another technology", op));
    fallback
}

impl<S> std::fmt::Debug for NfcHal<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NfcHal")
            .field("locked", &self.lock.is_locked())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
