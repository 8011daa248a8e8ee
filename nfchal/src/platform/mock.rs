// nfchal/src/platform/mock.rs

//! Simulated platform for unit and integration tests.
//!
//! `MockChip` decodes the ST25R3916 SPI protocol against a register file, a
//! FIFO and a read-to-clear interrupt word, and records every register
//! write and direct command so tests can assert on bus traffic.

use std::collections::VecDeque;
use std::convert::Infallible;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Condvar, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use embedded_hal::{digital, spi};

use crate::chip::commands;
use crate::chip::registers::{self, Register, RegisterSpace};
use crate::chip::Irq;
use crate::platform::traits::*;
use crate::platform::{Platform, StdClock};

/// ST25R3916 v2 identity byte (type 5, revision 2).
pub const MOCK_IC_IDENTITY: u8 = 0x2A;

/// A register write observed on the bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegWrite {
    pub space: RegisterSpace,
    pub addr: u8,
    pub value: u8,
}

impl RegWrite {
    pub fn is(&self, reg: Register) -> bool {
        self.space == reg.space() && self.addr == reg.addr()
    }
}

#[derive(Debug, Clone)]
struct QueuedResponse {
    data: Vec<u8>,
    last_bits: u8,
}

/// State of the simulated chip.
pub struct ChipModel {
    regs_a: [u8; 64],
    regs_b: [u8; 64],
    regs_test: [u8; 64],
    pending: u32,
    rx_fifo: VecDeque<u8>,
    rx_last_bits: u8,
    responses: VecDeque<QueuedResponse>,
    irq_isr: Option<Isr>,
    external_field: bool,
    /// Every register write in bus order.
    pub writes: Vec<RegWrite>,
    /// Test register writes as (addr, value).
    pub test_writes: Vec<(u8, u8)>,
    /// Direct commands in bus order.
    pub commands: Vec<u8>,
    /// One entry per FIFO load transaction.
    pub fifo_loads: Vec<Vec<u8>>,
    pub pt_mem_a: Vec<u8>,
    pub pt_mem_f: Vec<u8>,
    pub pt_mem_tsn: Vec<u8>,
    /// A/D result produced by MEASURE_VDD.
    pub vdd_ad_result: u8,
    /// When false the oscillator never reports stable.
    pub oscillator_works: bool,
    /// When true every bus transfer fails.
    pub bus_fault: bool,
}

impl ChipModel {
    fn new() -> Self {
        let mut m = Self {
            regs_a: [0; 64],
            regs_b: [0; 64],
            regs_test: [0; 64],
            pending: 0,
            rx_fifo: VecDeque::new(),
            rx_last_bits: 0,
            responses: VecDeque::new(),
            irq_isr: None,
            external_field: false,
            writes: Vec::new(),
            test_writes: Vec::new(),
            commands: Vec::new(),
            fifo_loads: Vec::new(),
            pt_mem_a: Vec::new(),
            pt_mem_f: Vec::new(),
            pt_mem_tsn: Vec::new(),
            // 3352 mV, below the 3.6 V threshold
            vdd_ad_result: 143,
            oscillator_works: true,
            bus_fault: false,
        };
        m.reset_registers();
        m
    }

    fn reset_registers(&mut self) {
        self.regs_a = [0; 64];
        self.regs_b = [0; 64];
        self.regs_a[Register::IC_IDENTITY.addr() as usize] = MOCK_IC_IDENTITY;
        // Everything masked after reset
        for i in 0..4 {
            self.regs_a[(Register::IRQ_MASK_MAIN.addr() + i) as usize] = 0xFF;
        }
        self.pending = 0;
        self.rx_fifo.clear();
        self.rx_last_bits = 0;
    }

    fn bank(&mut self, space: Space) -> &mut [u8; 64] {
        match space {
            Space::A => &mut self.regs_a,
            Space::B => &mut self.regs_b,
            Space::Test => &mut self.regs_test,
        }
    }

    fn irq_mask(&self) -> u32 {
        let base = Register::IRQ_MASK_MAIN.addr() as usize;
        u32::from_le_bytes([
            self.regs_a[base],
            self.regs_a[base + 1],
            self.regs_a[base + 2],
            self.regs_a[base + 3],
        ])
    }

    pub fn irq_asserted(&self) -> bool {
        self.pending & !self.irq_mask() != 0
    }

    /// Raise causes; returns true when the line should fire the ISR.
    fn raise(&mut self, irq: Irq) -> bool {
        let was = self.irq_asserted();
        self.pending |= irq.bits();
        !was && self.irq_asserted() && self.irq_isr.is_some()
    }

    pub fn register(&self, reg: Register) -> u8 {
        match reg.space() {
            RegisterSpace::A => self.regs_a[reg.addr() as usize],
            RegisterSpace::B => self.regs_b[reg.addr() as usize],
        }
    }

    /// Preload a register without logging a write.
    pub fn set_register(&mut self, reg: Register, value: u8) {
        match reg.space() {
            RegisterSpace::A => self.regs_a[reg.addr() as usize] = value,
            RegisterSpace::B => self.regs_b[reg.addr() as usize] = value,
        }
    }

    pub fn test_register(&self, addr: u8) -> u8 {
        self.regs_test[addr as usize]
    }

    pub fn writes_to(&self, reg: Register) -> Vec<u8> {
        self.writes
            .iter()
            .filter(|w| w.is(reg))
            .map(|w| w.value)
            .collect()
    }

    pub fn clear_logs(&mut self) {
        self.writes.clear();
        self.test_writes.clear();
        self.commands.clear();
        self.fifo_loads.clear();
    }

    /// Put bytes into the receive FIFO as if a frame had arrived.
    pub fn load_rx_fifo(&mut self, data: &[u8], last_bits: u8) {
        self.rx_fifo.clear();
        self.rx_fifo.extend(data.iter().copied());
        self.rx_last_bits = last_bits;
    }

    fn write(&mut self, space: Space, addr: u8, value: u8) -> bool {
        let addr = addr & 0x3F;
        match space {
            Space::Test => self.test_writes.push((addr, value)),
            Space::A | Space::B => self.writes.push(RegWrite {
                space: if space == Space::A {
                    RegisterSpace::A
                } else {
                    RegisterSpace::B
                },
                addr,
                value,
            }),
        }
        let was_asserted = self.irq_asserted();
        let old = self.bank(space)[addr as usize];
        self.bank(space)[addr as usize] = value;

        if space != Space::A {
            return false;
        }
        let op = Register::OP_CONTROL.addr();
        let mask_lo = Register::IRQ_MASK_MAIN.addr();
        let mask_hi = Register::IRQ_MASK_TARGET.addr();
        if addr == op {
            let en = registers::op_control::EN;
            let display = Register::AUX_DISPLAY.addr() as usize;
            if old & en == 0 && value & en != 0 && self.oscillator_works {
                self.regs_a[display] |= registers::aux_display::OSC_OK;
                return self.raise(Irq::OSC);
            }
            if value & en == 0 {
                self.regs_a[display] &= !registers::aux_display::OSC_OK;
            }
        } else if (mask_lo..=mask_hi).contains(&addr) {
            // Unmasking a pending cause raises the line
            return !was_asserted && self.irq_asserted() && self.irq_isr.is_some();
        }
        false
    }

    fn read(&mut self, space: Space, addr: u8) -> u8 {
        let addr = addr & 0x3F;
        if space != Space::A {
            return self.bank(space)[addr as usize];
        }
        let irq_lo = Register::IRQ_MAIN.addr();
        let irq_hi = Register::IRQ_TARGET.addr();
        if (irq_lo..=irq_hi).contains(&addr) {
            let shift = 8 * (addr - irq_lo) as u32;
            let byte = (self.pending >> shift) as u8;
            self.pending &= !(0xFFu32 << shift);
            return byte;
        }
        let len = self.rx_fifo.len();
        if addr == Register::FIFO_STATUS1.addr() {
            return (len & 0xFF) as u8;
        }
        if addr == Register::FIFO_STATUS2.addr() {
            let high = (((len >> 8) & 0x3) as u8) << registers::fifo_status2::FIFO_B_SHIFT;
            let lb = (self.rx_last_bits & 0x7) << registers::fifo_status2::FIFO_LB_SHIFT;
            return high | lb;
        }
        if addr == Register::AUX_DISPLAY.addr() {
            let efd = if self.external_field {
                registers::aux_display::EFD_O
            } else {
                0
            };
            return self.regs_a[addr as usize] | efd;
        }
        self.regs_a[addr as usize]
    }

    fn command(&mut self, cmd: u8) -> bool {
        self.commands.push(cmd);
        match cmd {
            commands::SET_DEFAULT => {
                self.reset_registers();
                false
            }
            commands::STOP | commands::CLEAR_FIFO => {
                self.rx_fifo.clear();
                self.rx_last_bits = 0;
                false
            }
            commands::MEASURE_VDD => {
                self.regs_a[Register::AD_RESULT.addr() as usize] = self.vdd_ad_result;
                self.raise(Irq::DCT)
            }
            commands::ADJUST_REGULATORS => self.raise(Irq::DCT),
            commands::TRANSMIT_WITH_CRC
            | commands::TRANSMIT_WITHOUT_CRC
            | commands::TRANSMIT_REQA
            | commands::TRANSMIT_WUPA => {
                let mut irq = Irq::TXE;
                if let Some(resp) = self.responses.pop_front() {
                    self.load_rx_fifo(&resp.data, resp.last_bits);
                    irq |= Irq::RXS | Irq::RXE;
                }
                self.raise(irq)
            }
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Space {
    A,
    B,
    Test,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PtKind {
    A,
    F,
    Tsn,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SpiState {
    Idle,
    SpaceB,
    Test,
    WriteReg(Space, u8),
    ReadReg(Space, u8),
    FifoLoad,
    FifoRead,
    PtLoad(PtKind),
    PtRead(usize),
    Done,
}

/// Shared handle on the simulated chip.
#[derive(Clone)]
pub struct MockChip {
    inner: Arc<Mutex<ChipModel>>,
}

impl MockChip {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(ChipModel::new())),
        }
    }

    /// Lock the model for inspection or setup.
    pub fn model(&self) -> MutexGuard<'_, ChipModel> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Answer the next transmit command with `data` (whole bytes).
    pub fn queue_response(&self, data: &[u8]) {
        self.queue_response_bits(data, data.len() * 8);
    }

    /// Answer the next transmit command with `bits` of `data`.
    pub fn queue_response_bits(&self, data: &[u8], bits: usize) {
        let bytes = bits.div_ceil(8);
        self.model().responses.push_back(QueuedResponse {
            data: data[..bytes].to_vec(),
            last_bits: (bits % 8) as u8,
        });
    }

    /// Raise interrupt causes from outside a bus transaction (field events,
    /// wake-up, ...), firing the line ISR if it becomes asserted.
    pub fn raise_irq(&self, irq: Irq) {
        let isr = {
            let mut m = self.model();
            if m.raise(irq) { m.irq_isr.clone() } else { None }
        };
        if let Some(isr) = isr {
            isr();
        }
    }

    pub fn set_external_field(&self, present: bool) {
        self.model().external_field = present;
    }

    pub fn register(&self, reg: Register) -> u8 {
        self.model().register(reg)
    }

    pub fn commands(&self) -> Vec<u8> {
        self.model().commands.clone()
    }

    pub fn clear_logs(&self) {
        self.model().clear_logs();
    }

    pub fn isr_installed(&self) -> bool {
        self.model().irq_isr.is_some()
    }
}

impl Default for MockChip {
    fn default() -> Self {
        Self::new()
    }
}

/// SPI bus attached to a [`MockChip`].
pub struct MockSpi {
    chip: MockChip,
    state: SpiState,
    load: Vec<u8>,
}

impl MockSpi {
    pub fn new(chip: MockChip) -> Self {
        Self {
            chip,
            state: SpiState::Idle,
            load: Vec::new(),
        }
    }

    fn classify(&mut self, m: &mut ChipModel, byte: u8, space: Space) -> bool {
        let mut fire = false;
        self.state = match byte & commands::MODE_MASK {
            commands::WRITE_MODE => SpiState::WriteReg(space, byte & 0x3F),
            commands::READ_MODE => SpiState::ReadReg(space, byte & 0x3F),
            commands::CMD_MODE => {
                fire = m.command(byte);
                SpiState::Done
            }
            _ => match byte {
                commands::FIFO_LOAD => SpiState::FifoLoad,
                commands::FIFO_READ => SpiState::FifoRead,
                commands::PT_A_CONFIG_LOAD => SpiState::PtLoad(PtKind::A),
                commands::PT_F_CONFIG_LOAD => SpiState::PtLoad(PtKind::F),
                commands::PT_TSN_DATA_LOAD => SpiState::PtLoad(PtKind::Tsn),
                commands::PT_MEM_READ => SpiState::PtRead(0),
                _ => SpiState::Done,
            },
        };
        if let SpiState::PtLoad(kind) = self.state {
            match kind {
                PtKind::A => m.pt_mem_a.clear(),
                PtKind::F => m.pt_mem_f.clear(),
                PtKind::Tsn => m.pt_mem_tsn.clear(),
            }
        }
        fire
    }

    fn feed(&mut self, m: &mut ChipModel, byte: u8) -> bool {
        match self.state {
            SpiState::Idle => match byte {
                commands::SPACE_B_ACCESS => {
                    self.state = SpiState::SpaceB;
                    false
                }
                commands::TEST_ACCESS => {
                    self.state = SpiState::Test;
                    false
                }
                _ => self.classify(m, byte, Space::A),
            },
            SpiState::SpaceB => self.classify(m, byte, Space::B),
            SpiState::Test => self.classify(m, byte, Space::Test),
            SpiState::WriteReg(space, addr) => {
                self.state = SpiState::WriteReg(space, addr.wrapping_add(1));
                m.write(space, addr, byte)
            }
            SpiState::FifoLoad => {
                self.load.push(byte);
                false
            }
            SpiState::PtLoad(kind) => {
                match kind {
                    PtKind::A => m.pt_mem_a.push(byte),
                    PtKind::F => m.pt_mem_f.push(byte),
                    PtKind::Tsn => m.pt_mem_tsn.push(byte),
                }
                false
            }
            _ => false,
        }
    }
}

impl MockSpi {
    fn select(&mut self) {
        self.state = SpiState::Idle;
        self.load.clear();
    }

    fn deselect(&mut self) {
        if self.state == SpiState::FifoLoad {
            let data = std::mem::take(&mut self.load);
            self.chip.model().fifo_loads.push(data);
        }
        self.state = SpiState::Idle;
    }

    fn tx(&mut self, data: &[u8]) -> bool {
        let chip = self.chip.clone();
        let isr = {
            let mut m = chip.model();
            if m.bus_fault {
                return false;
            }
            let mut fire = false;
            for &b in data {
                fire |= self.feed(&mut m, b);
            }
            if fire { m.irq_isr.clone() } else { None }
        };
        if let Some(isr) = isr {
            isr();
        }
        true
    }

    fn rx(&mut self, buf: &mut [u8]) -> bool {
        let mut m = self.chip.model();
        if m.bus_fault {
            return false;
        }
        for slot in buf.iter_mut() {
            *slot = match self.state {
                SpiState::ReadReg(space, addr) => {
                    self.state = SpiState::ReadReg(space, addr.wrapping_add(1));
                    m.read(space, addr)
                }
                SpiState::FifoRead => m.rx_fifo.pop_front().unwrap_or(0),
                SpiState::PtRead(i) => {
                    self.state = SpiState::PtRead(i + 1);
                    let all: Vec<u8> = m
                        .pt_mem_a
                        .iter()
                        .chain(m.pt_mem_f.iter())
                        .chain(m.pt_mem_tsn.iter())
                        .copied()
                        .collect();
                    all.get(i).copied().unwrap_or(0)
                }
                _ => 0xFF,
            };
        }
        true
    }
}

impl spi::ErrorType for MockSpi {
    type Error = spi::ErrorKind;
}

impl SpiDevice for MockSpi {
    fn transaction(&mut self, operations: &mut [Operation<'_, u8>]) -> Result<(), spi::ErrorKind> {
        self.select();
        let mut ok = true;
        for op in operations.iter_mut() {
            ok = match op {
                Operation::Write(data) => self.tx(data),
                Operation::Read(buf) => self.rx(buf),
                Operation::Transfer(read, write) => self.tx(write) && self.rx(read),
                Operation::TransferInPlace(buf) => {
                    let out = buf.to_vec();
                    self.tx(&out) && self.rx(buf)
                }
                Operation::DelayNs(_) => true,
            };
            if !ok {
                break;
            }
        }
        self.deselect();
        if ok { Ok(()) } else { Err(spi::ErrorKind::Other) }
    }
}

/// Interrupt pin wired to a [`MockChip`].
pub struct MockIrqLine {
    chip: MockChip,
}

impl MockIrqLine {
    pub fn new(chip: MockChip) -> Self {
        Self { chip }
    }
}

impl digital::ErrorType for MockIrqLine {
    type Error = Infallible;
}

impl InputPin for MockIrqLine {
    fn is_high(&mut self) -> Result<bool, Infallible> {
        Ok(self.chip.model().irq_asserted())
    }

    fn is_low(&mut self) -> Result<bool, Infallible> {
        self.is_high().map(|high| !high)
    }
}

impl IrqLine for MockIrqLine {
    fn set_isr(&mut self, isr: Option<Isr>) {
        self.chip.model().irq_isr = isr;
    }
}

#[derive(Default)]
struct TimerModel {
    running: bool,
    isr: Option<Isr>,
    arms: Vec<(u16, u16)>,
    disarms: usize,
}

/// Countdown timer whose expiry is triggered by the test.
#[derive(Clone, Default)]
pub struct MockTimer {
    inner: Arc<Mutex<TimerModel>>,
    clock_hz: u32,
}

impl MockTimer {
    /// Timer clocked at `clock_hz`.
    pub fn new(clock_hz: u32) -> Self {
        Self {
            inner: Arc::new(Mutex::new(TimerModel::default())),
            clock_hz,
        }
    }

    fn model(&self) -> MutexGuard<'_, TimerModel> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Simulate the update interrupt of a running timer.
    pub fn fire(&self) {
        let isr = {
            let mut m = self.model();
            if !m.running {
                return;
            }
            m.running = false;
            m.isr.clone()
        };
        if let Some(isr) = isr {
            isr();
        }
    }

    /// (prescaler, auto_reload) of every arm call.
    pub fn arms(&self) -> Vec<(u16, u16)> {
        self.model().arms.clone()
    }

    pub fn disarm_count(&self) -> usize {
        self.model().disarms
    }

    pub fn isr_installed(&self) -> bool {
        self.model().isr.is_some()
    }
}

impl HwTimer for MockTimer {
    fn clock_hz(&self) -> u32 {
        self.clock_hz
    }

    fn set_isr(&mut self, isr: Option<Isr>) {
        self.model().isr = isr;
    }

    fn arm(&mut self, prescaler: u16, auto_reload: u16) {
        let mut m = self.model();
        m.arms.push((prescaler, auto_reload));
        m.running = true;
    }

    fn disarm(&mut self) {
        let mut m = self.model();
        m.running = false;
        m.disarms += 1;
    }

    fn is_running(&self) -> bool {
        self.model().running
    }
}

#[derive(Default)]
struct SignalModel {
    active: bool,
    sequences: Vec<(bool, Vec<u32>)>,
    begins: usize,
}

/// Records the sequences played on the transparent-mode data line.
#[derive(Clone, Default)]
pub struct MockSignal {
    inner: Arc<Mutex<SignalModel>>,
}

impl MockSignal {
    pub fn new() -> Self {
        Self::default()
    }

    fn model(&self) -> MutexGuard<'_, SignalModel> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// (start level, runs) for every `play` call.
    pub fn sequences(&self) -> Vec<(bool, Vec<u32>)> {
        self.model().sequences.clone()
    }

    pub fn is_active(&self) -> bool {
        self.model().active
    }

    pub fn begin_count(&self) -> usize {
        self.model().begins
    }
}

impl SignalOutput for MockSignal {
    fn begin(&mut self) {
        let mut m = self.model();
        m.active = true;
        m.begins += 1;
    }

    fn play(&mut self, start_level: bool, runs: &[u32]) {
        let mut m = self.model();
        debug_assert!(m.active, "signal played outside transparent mode");
        m.sequences.push((start_level, runs.to_vec()));
    }

    fn end(&mut self) {
        self.model().active = false;
    }
}

#[derive(Default)]
struct CaptureModel {
    isr: Option<Isr>,
    edges: VecDeque<u32>,
}

/// Edge capture fed by the test with reader pause timestamps.
#[derive(Clone, Default)]
pub struct MockCapture {
    inner: Arc<Mutex<CaptureModel>>,
}

impl MockCapture {
    pub fn new() -> Self {
        Self::default()
    }

    fn model(&self) -> MutexGuard<'_, CaptureModel> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Deliver a captured burst and signal the line going idle.
    pub fn push_burst(&self, timestamps: &[u32]) {
        let isr = {
            let mut m = self.model();
            m.edges.extend(timestamps.iter().copied());
            m.isr.clone()
        };
        if let Some(isr) = isr {
            isr();
        }
    }

    pub fn is_started(&self) -> bool {
        self.model().isr.is_some()
    }
}

impl EdgeCapture for MockCapture {
    fn start(&mut self, isr: Isr) {
        let mut m = self.model();
        m.edges.clear();
        m.isr = Some(isr);
    }

    fn stop(&mut self) {
        self.model().isr = None;
    }

    fn drain(&mut self, out: &mut [u32]) -> usize {
        let mut m = self.model();
        let n = out.len().min(m.edges.len());
        for slot in out.iter_mut().take(n) {
            *slot = m.edges.pop_front().unwrap_or(0);
        }
        n
    }
}

/// Exclusive bus lock that counts successful locks and unlocks.
#[derive(Default)]
pub struct MockBusLock {
    held: Mutex<bool>,
    freed: Condvar,
    locks: AtomicUsize,
    unlocks: AtomicUsize,
}

impl MockBusLock {
    pub fn locks(&self) -> usize {
        self.locks.load(Ordering::SeqCst)
    }

    pub fn unlocks(&self) -> usize {
        self.unlocks.load(Ordering::SeqCst)
    }

    pub fn is_held(&self) -> bool {
        *self.held.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl BusLock for MockBusLock {
    fn try_lock(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        let mut held = self.held.lock().unwrap_or_else(|e| e.into_inner());
        while *held {
            let left = deadline.saturating_duration_since(Instant::now());
            if left.is_zero() {
                return false;
            }
            held = self
                .freed
                .wait_timeout(held, left)
                .unwrap_or_else(|e| e.into_inner())
                .0;
        }
        *held = true;
        self.locks.fetch_add(1, Ordering::SeqCst);
        true
    }

    fn unlock(&self) {
        let mut held = self.held.lock().unwrap_or_else(|e| e.into_inner());
        *held = false;
        self.unlocks.fetch_add(1, Ordering::SeqCst);
        self.freed.notify_one();
    }
}

/// Timer input clock used by the mock platform (64 MHz core clock).
pub const MOCK_TIMER_CLOCK_HZ: u32 = 64_000_000;

/// Test-side handles onto a simulated platform.
#[derive(Clone)]
pub struct MockHandles {
    pub chip: MockChip,
    pub fwt_timer: MockTimer,
    pub block_tx_timer: MockTimer,
    pub signal: MockSignal,
    pub capture: MockCapture,
    pub bus_lock: Arc<MockBusLock>,
}

/// Build a complete simulated platform plus the handles to drive it.
pub fn mock_platform() -> (Platform, MockHandles) {
    let chip = MockChip::new();
    let fwt_timer = MockTimer::new(MOCK_TIMER_CLOCK_HZ);
    let block_tx_timer = MockTimer::new(MOCK_TIMER_CLOCK_HZ);
    let signal = MockSignal::new();
    let capture = MockCapture::new();
    let bus_lock = Arc::new(MockBusLock::default());

    let platform = Platform {
        spi: frontend_spi(MockSpi::new(chip.clone())),
        bus_lock: bus_lock.clone(),
        irq_pin: irq_pin(MockIrqLine::new(chip.clone())),
        irq_line: Box::new(MockIrqLine::new(chip.clone())),
        fwt_timer: Box::new(fwt_timer.clone()),
        block_tx_timer: Box::new(block_tx_timer.clone()),
        clock: Box::new(StdClock::new()),
        delay: Box::new(StdClock::new()),
        signal: Box::new(signal.clone()),
        capture: Box::new(capture.clone()),
    };
    let handles = MockHandles {
        chip,
        fwt_timer,
        block_tx_timer,
        signal,
        capture,
        bus_lock,
    };
    (platform, handles)
}
