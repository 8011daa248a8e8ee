use nfchal::chip::registers::{io_conf2, mode, op_control};
use nfchal::chip::{commands, FifoReadError, Irq, Register, St25r3916};
use nfchal::platform::frontend_spi;
use nfchal::platform::mock::{MockChip, MockSpi, MOCK_IC_IDENTITY};
use nfchal::Error;

fn driver() -> (St25r3916, MockChip) {
    let chip = MockChip::new();
    (St25r3916::new(frontend_spi(MockSpi::new(chip.clone()))), chip)
}

#[test]
fn identity_after_reset() {
    let (mut drv, _chip) = driver();
    drv.direct_cmd(commands::SET_DEFAULT).unwrap();
    assert_eq!(drv.read_reg(Register::IC_IDENTITY).unwrap(), MOCK_IC_IDENTITY);
    assert!(drv.check_identity().unwrap());
}

#[test]
fn modify_skips_redundant_writes() {
    let (mut drv, chip) = driver();
    assert!(drv.set_reg_bits(Register::IO_CONF2, io_conf2::SUP3V).unwrap());
    assert!(!drv.set_reg_bits(Register::IO_CONF2, io_conf2::SUP3V).unwrap());
    assert!(drv
        .change_reg_bits(Register::MODE, mode::OM_MASK, mode::OM_FELICA)
        .unwrap());
    assert_eq!(chip.model().writes_to(Register::IO_CONF2), vec![io_conf2::SUP3V]);
    assert!(drv
        .check_reg(Register::MODE, mode::OM_MASK, mode::OM_FELICA)
        .unwrap());
}

#[test]
fn space_b_registers_are_separate() {
    let (mut drv, chip) = driver();
    drv.write_reg(Register::CORR_CONF1, 0x13).unwrap();
    drv.write_reg(Register::RX_CONF1, 0x08).unwrap();
    assert_eq!(chip.register(Register::CORR_CONF1), 0x13);
    assert_eq!(drv.read_reg(Register::CORR_CONF1).unwrap(), 0x13);
    assert_eq!(drv.read_reg(Register::RX_CONF1).unwrap(), 0x08);
}

#[test]
fn interrupt_status_is_read_to_clear() {
    let (mut drv, chip) = driver();
    drv.mask_irq(Irq::TXE | Irq::RXE).unwrap();
    chip.raise_irq(Irq::TXE | Irq::RXE | Irq::WU_F);
    assert!(chip.model().irq_asserted());
    assert_eq!(drv.get_irq().unwrap(), Irq::TXE | Irq::RXE | Irq::WU_F);
    assert_eq!(drv.get_irq().unwrap(), Irq::empty());
    assert!(!chip.model().irq_asserted());
}

#[test]
fn fifo_reports_exact_bits() {
    let (mut drv, chip) = driver();
    let mut buf = [0u8; 4];
    assert_eq!(drv.read_fifo(&mut buf), Err(FifoReadError::Empty));

    chip.model().load_rx_fifo(&[0x93, 0x02], 4);
    assert_eq!(drv.read_fifo(&mut buf), Ok(12));
    assert_eq!(&buf[..2], &[0x93, 0x02]);

    chip.model().load_rx_fifo(&[0u8; 9], 0);
    assert_eq!(
        drv.read_fifo(&mut buf),
        Err(FifoReadError::Overflow { available: 9 })
    );
}

#[test]
fn fifo_write_sets_bit_count() {
    let (mut drv, chip) = driver();
    drv.write_fifo(&[0x26], 7).unwrap();
    let m = chip.model();
    assert_eq!(m.writes_to(Register::NUM_TX_BYTES2), vec![7]);
    assert_eq!(m.fifo_loads, vec![vec![0x26]]);
}

#[test]
fn oscillator_start_raises_osc() {
    let (mut drv, chip) = driver();
    drv.mask_irq(Irq::OSC).unwrap();
    drv.set_reg_bits(Register::OP_CONTROL, op_control::EN).unwrap();
    assert!(chip.model().irq_asserted());
    assert!(drv.get_irq().unwrap().contains(Irq::OSC));
}

#[test]
fn passive_target_memory() {
    let (mut drv, chip) = driver();
    drv.write_pta_mem(&[1, 2, 3, 4]).unwrap();
    drv.write_ptf_mem(&[9; 19]).unwrap();
    let m = chip.model();
    assert_eq!(m.pt_mem_a, vec![1, 2, 3, 4]);
    assert_eq!(m.pt_mem_f.len(), 19);
}

#[test]
fn bus_fault_surfaces_as_communication() {
    let (mut drv, chip) = driver();
    chip.model().bus_fault = true;
    assert_eq!(drv.read_reg(Register::MODE), Err(Error::Communication));
    assert_eq!(drv.direct_cmd(commands::STOP), Err(Error::Communication));
    let mut buf = [0u8; 4];
    assert_eq!(drv.read_fifo(&mut buf), Err(FifoReadError::Bus));
}

/// Board SPI device with its own error type that always times out.
struct TimeoutSpi;

#[derive(Debug)]
struct BusTimeout;

impl embedded_hal::spi::Error for BusTimeout {
    fn kind(&self) -> embedded_hal::spi::ErrorKind {
        embedded_hal::spi::ErrorKind::Other
    }
}

impl embedded_hal::spi::ErrorType for TimeoutSpi {
    type Error = BusTimeout;
}

impl embedded_hal::spi::SpiDevice for TimeoutSpi {
    fn transaction(
        &mut self,
        _operations: &mut [embedded_hal::spi::Operation<'_, u8>],
    ) -> Result<(), BusTimeout> {
        Err(BusTimeout)
    }
}

#[test]
fn board_spi_error_surfaces_as_communication() {
    let mut drv = St25r3916::new(frontend_spi(TimeoutSpi));
    assert_eq!(drv.write_reg(Register::MODE, 0x08), Err(Error::Communication));
    // A failing read aborts the read-modify-write
    assert_eq!(drv.set_reg_bits(Register::MODE, 0x01), Err(Error::Communication));
    assert_eq!(drv.check_identity(), Err(Error::Communication));
}

#[test]
fn one_transaction_per_access() {
    let (mut drv, chip) = driver();
    drv.write_burst_regs(Register::MODE, &[0x08, 0x00]).unwrap();
    drv.read_reg(Register::MODE).unwrap();
    // Chip select dropped between accesses: the next header starts fresh
    drv.direct_cmd(commands::STOP).unwrap();
    assert_eq!(chip.commands().last(), Some(&commands::STOP));
    assert_eq!(chip.model().writes_to(Register::MODE), vec![0x08]);
}

#[test]
fn test_register_access() {
    let (mut drv, chip) = driver();
    assert!(drv.change_test_reg_bits(0x04, 0x10, 0x10).unwrap());
    assert_eq!(chip.model().test_register(0x04), 0x10);
    assert_eq!(drv.read_test_reg(0x04).unwrap(), 0x10);
}
