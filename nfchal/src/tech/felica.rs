// nfchal/src/tech/felica.rs
//! FeliCa (NFC-F) at 212 kbps.

use super::{ListenerTechnology, PollerTechnology};
use crate::chip::registers::{
    aux_mod, bit_rate, corr_conf1, mode, op_control, passive_target, rx_conf1, tx_driver,
};
use crate::chip::{commands, Irq, Register};
use crate::frontend::Frontend;
use crate::types::{Idm, Pmm, SystemCode};
use crate::Result;

const BIT_RATE_MASK: u8 = bit_rate::TXRATE_MASK | bit_rate::RXRATE_MASK;
const BIT_RATE_212: u8 = bit_rate::TXRATE_212 | bit_rate::RXRATE_212;

pub(crate) struct FelicaPoller;

impl PollerTechnology for FelicaPoller {
    fn init(&mut self, fe: &mut Frontend) -> Result<()> {
        let chip = &mut fe.chip;
        chip.change_reg_bits(
            Register::MODE,
            mode::OM_MASK | mode::TR_AM,
            mode::OM_FELICA | mode::TR_AM_AM,
        )?;
        chip.change_reg_bits(
            Register::TX_DRIVER,
            tx_driver::AM_MOD_MASK,
            tx_driver::AM_MOD_12PERCENT,
        )?;
        chip.clear_reg_bits(Register::AUX_MOD, aux_mod::DIS_REG_AM | aux_mod::RES_AM)?;
        chip.change_reg_bits(Register::BIT_RATE, BIT_RATE_MASK, BIT_RATE_212)?;
        chip.write_reg(Register::RX_CONF1, rx_conf1::LP0 | rx_conf1::HZ_12_80KHZ)?;
        chip.write_reg(
            Register::CORR_CONF1,
            corr_conf1::S6 | corr_conf1::S4 | corr_conf1::S3,
        )?;
        Ok(())
    }
}

pub(crate) struct FelicaListener;

impl ListenerTechnology for FelicaListener {
    fn init(&mut self, fe: &mut Frontend) -> Result<()> {
        let chip = &mut fe.chip;
        chip.write_reg(
            Register::OP_CONTROL,
            op_control::EN | op_control::RX_EN | op_control::EN_FD_AUTO_EFD,
        )?;
        chip.write_reg(Register::MODE, mode::TARG | mode::OM_TARG_NFCF)?;
        chip.change_reg_bits(Register::BIT_RATE, BIT_RATE_MASK, BIT_RATE_212)?;
        // NFC-A anticollision and AP2P off: only SENSF_REQ wakes us
        chip.write_reg(
            Register::PASSIVE_TARGET,
            (5 << passive_target::FDEL_SHIFT)
                | passive_target::D_106_AC_A
                | passive_target::D_AC_AP2P,
        )?;
        chip.direct_cmd(commands::STOP)?;
        chip.get_irq()?;
        chip.mask_irq(
            Irq::WU_F
                | Irq::EON
                | Irq::EOF
                | Irq::RXS
                | Irq::RXE
                | Irq::TXE
                | Irq::CRC
                | Irq::ERR1
                | Irq::ERR2,
        )?;
        chip.direct_cmd(commands::GOTO_SENSE)
    }

    fn tx(&mut self, fe: &mut Frontend, data: &[u8], bits: usize) -> Result<()> {
        fe.chip.direct_cmd(commands::CLEAR_FIFO)?;
        fe.chip.write_fifo(data, bits)?;
        fe.chip.direct_cmd(commands::TRANSMIT_WITH_CRC)
    }

    fn sleep(&mut self, _fe: &mut Frontend) -> Result<()> {
        Ok(())
    }

    fn idle(&mut self, fe: &mut Frontend) -> Result<()> {
        fe.chip.direct_cmd(commands::GOTO_SENSE)
    }
}

/// Passive target memory image answering SENSF_REQ on our behalf.
pub fn sensf_res_memory(idm: &Idm, pmm: &Pmm, system_code: SystemCode) -> [u8; commands::PTM_F_LEN] {
    let mut mem = [0u8; commands::PTM_F_LEN];
    mem[..2].copy_from_slice(&system_code.to_be_bytes());
    // SENSF_RES response code
    mem[2] = 0x01;
    mem[3..11].copy_from_slice(idm.as_bytes());
    mem[11..19].copy_from_slice(pmm.as_bytes());
    mem
}

pub(crate) fn listener_set_sensf_res_data(
    fe: &mut Frontend,
    idm: &Idm,
    pmm: &Pmm,
    system_code: SystemCode,
) -> Result<()> {
    fe.chip.write_ptf_mem(&sensf_res_memory(idm, pmm, system_code))
}
