// nfchal/src/tech/iso14443b.rs
//! NFC-B poller, 10% ASK at 106 kbps. There is no listener role.

use super::PollerTechnology;
use crate::chip::registers::{
    aux_mod, corr_conf1, iso14443b_1, iso14443b_2, mode, rx_conf1, rx_conf2, tx_driver,
};
use crate::chip::{Register, St25r3916};
use crate::frontend::Frontend;
use crate::Result;

fn common_init(chip: &mut St25r3916) -> Result<()> {
    chip.write_reg(Register::RX_CONF1, rx_conf1::H200)?;
    chip.write_reg(
        Register::RX_CONF2,
        rx_conf2::AGC6_3
            | rx_conf2::AGC_ALG
            | rx_conf2::AGC_M
            | rx_conf2::AGC_EN
            | rx_conf2::PULZ_61
            | rx_conf2::SQM_DYN,
    )?;
    chip.write_reg(Register::RX_CONF3, 0x00)?;
    chip.write_reg(Register::RX_CONF4, 0x00)?;
    chip.write_reg(
        Register::CORR_CONF1,
        corr_conf1::S0 | corr_conf1::S1 | corr_conf1::S3 | corr_conf1::S4,
    )?;
    chip.write_reg(Register::CORR_CONF2, 0x00)
}

pub(crate) struct Iso14443bPoller;

impl PollerTechnology for Iso14443bPoller {
    fn init(&mut self, fe: &mut Frontend) -> Result<()> {
        let chip = &mut fe.chip;
        chip.change_reg_bits(
            Register::MODE,
            mode::OM_MASK | mode::TR_AM,
            mode::OM_ISO14443B | mode::TR_AM_AM,
        )?;
        chip.change_reg_bits(
            Register::TX_DRIVER,
            tx_driver::AM_MOD_MASK,
            tx_driver::AM_MOD_12PERCENT,
        )?;
        chip.clear_reg_bits(Register::AUX_MOD, aux_mod::DIS_REG_AM | aux_mod::RES_AM)?;
        // SOF 10 etu low / 2 etu high, EOF 10 etu, no extra guard time
        chip.change_reg_bits(
            Register::ISO14443B_1,
            iso14443b_1::EGT_MASK | iso14443b_1::SOF_MASK | iso14443b_1::EOF,
            iso14443b_1::SOF_0_10ETU | iso14443b_1::SOF_1_2ETU | iso14443b_1::EOF_10ETU,
        )?;
        chip.change_reg_bits(
            Register::ISO14443B_2,
            iso14443b_2::TR1_MASK | iso14443b_2::NO_SOF | iso14443b_2::NO_EOF,
            iso14443b_2::TR1_80FS80FS,
        )?;
        common_init(chip)
    }
}
