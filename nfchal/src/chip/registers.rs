// nfchal/src/chip/registers.rs
//! ST25R3916 register map and the bit fields this crate touches.

/// Register address space. Space B is reached through a 0xFB prefix byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegisterSpace {
    A,
    B,
}

impl RegisterSpace {
    pub const fn prefix(&self) -> &'static [u8] {
        match self {
            RegisterSpace::A => &[],
            RegisterSpace::B => &[super::commands::SPACE_B_ACCESS],
        }
    }
}

/// Register address within one of the two spaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Register {
    addr: u8,
    space: RegisterSpace,
}

impl Register {
    const fn a(addr: u8) -> Self {
        Self {
            addr,
            space: RegisterSpace::A,
        }
    }

    const fn b(addr: u8) -> Self {
        Self {
            addr,
            space: RegisterSpace::B,
        }
    }

    /// Any address in either space, for bulk access.
    pub const fn from_parts(space: RegisterSpace, addr: u8) -> Self {
        Self { addr, space }
    }

    pub const fn addr(&self) -> u8 {
        self.addr
    }

    pub const fn space(&self) -> RegisterSpace {
        self.space
    }

    /// Register `n` places after this one in the same space.
    pub const fn offset(&self, n: u8) -> Self {
        Self {
            addr: self.addr + n,
            space: self.space,
        }
    }

    // IO configuration
    pub const IO_CONF1: Self = Self::a(0x00);
    pub const IO_CONF2: Self = Self::a(0x01);
    // Operation control and mode definition
    pub const OP_CONTROL: Self = Self::a(0x02);
    pub const MODE: Self = Self::a(0x03);
    pub const BIT_RATE: Self = Self::a(0x04);
    // Protocol configuration
    pub const ISO14443A_NFC: Self = Self::a(0x05);
    pub const EMD_SUP_CONF: Self = Self::b(0x05);
    pub const ISO14443B_1: Self = Self::a(0x06);
    pub const ISO14443B_2: Self = Self::a(0x07);
    pub const PASSIVE_TARGET: Self = Self::a(0x08);
    pub const STREAM_MODE: Self = Self::a(0x09);
    pub const AUX: Self = Self::a(0x0A);
    // Receiver configuration
    pub const RX_CONF1: Self = Self::a(0x0B);
    pub const RX_CONF2: Self = Self::a(0x0C);
    pub const RX_CONF3: Self = Self::a(0x0D);
    pub const RX_CONF4: Self = Self::a(0x0E);
    pub const CORR_CONF1: Self = Self::b(0x0C);
    pub const CORR_CONF2: Self = Self::b(0x0D);
    // Timers
    pub const MASK_RX_TIMER: Self = Self::a(0x0F);
    pub const TIMER_EMV_CONTROL: Self = Self::a(0x12);
    pub const FIELD_ON_GT: Self = Self::b(0x15);
    // Interrupts
    pub const IRQ_MASK_MAIN: Self = Self::a(0x16);
    pub const IRQ_MASK_TIMER_NFC: Self = Self::a(0x17);
    pub const IRQ_MASK_ERROR_WUP: Self = Self::a(0x18);
    pub const IRQ_MASK_TARGET: Self = Self::a(0x19);
    pub const IRQ_MAIN: Self = Self::a(0x1A);
    pub const IRQ_TIMER_NFC: Self = Self::a(0x1B);
    pub const IRQ_ERROR_WUP: Self = Self::a(0x1C);
    pub const IRQ_TARGET: Self = Self::a(0x1D);
    // FIFO
    pub const FIFO_STATUS1: Self = Self::a(0x1E);
    pub const FIFO_STATUS2: Self = Self::a(0x1F);
    pub const COLLISION_STATUS: Self = Self::a(0x20);
    pub const PASSIVE_TARGET_STATUS: Self = Self::a(0x21);
    pub const NUM_TX_BYTES1: Self = Self::a(0x22);
    pub const NUM_TX_BYTES2: Self = Self::a(0x23);
    // Measurement, antenna and driver
    pub const AD_RESULT: Self = Self::a(0x25);
    pub const ANT_TUNE_A: Self = Self::a(0x26);
    pub const ANT_TUNE_B: Self = Self::a(0x27);
    pub const TX_DRIVER: Self = Self::a(0x28);
    pub const AUX_MOD: Self = Self::b(0x28);
    pub const PT_MOD: Self = Self::a(0x29);
    pub const RES_AM_MOD: Self = Self::b(0x2A);
    pub const FIELD_THRESHOLD_ACTV: Self = Self::a(0x2A);
    pub const FIELD_THRESHOLD_DEACTV: Self = Self::a(0x2B);
    pub const REGULATOR_CONTROL: Self = Self::a(0x2C);
    pub const AUX_DISPLAY: Self = Self::a(0x31);
    pub const OVERSHOOT_CONF1: Self = Self::b(0x30);
    pub const OVERSHOOT_CONF2: Self = Self::b(0x31);
    pub const UNDERSHOOT_CONF1: Self = Self::b(0x32);
    pub const UNDERSHOOT_CONF2: Self = Self::b(0x33);
    pub const IC_IDENTITY: Self = Self::a(0x3F);
}

/// Test register controlling the internal overheat protection.
pub const TEST_REG_OVERHEAT: u8 = 0x04;
pub const TEST_REG_OVERHEAT_DISABLE: u8 = 0x10;

pub mod io_conf1 {
    pub const OUT_CL_MASK: u8 = 0x3 << 1;
    pub const OUT_CL_DISABLED: u8 = 0x3 << 1;
    pub const LF_CLK_OFF: u8 = 1 << 0;
}

pub mod io_conf2 {
    pub const SUP3V: u8 = 1 << 7;
    pub const MISO_PD2: u8 = 1 << 4;
    pub const MISO_PD1: u8 = 1 << 3;
    pub const IO_DRV_LVL: u8 = 1 << 2;
}

pub mod op_control {
    pub const EN: u8 = 1 << 7;
    pub const RX_EN: u8 = 1 << 6;
    pub const TX_EN: u8 = 1 << 3;
    pub const WU: u8 = 1 << 2;
    pub const EN_FD_MASK: u8 = 0x3;
    pub const EN_FD_AUTO_EFD: u8 = 0x3;
}

pub mod mode {
    pub const TARG: u8 = 1 << 7;
    pub const OM_MASK: u8 = 0xF << 3;
    pub const OM0: u8 = 1 << 3;
    pub const OM_ISO14443A: u8 = 0x1 << 3;
    pub const OM_ISO14443B: u8 = 0x2 << 3;
    pub const OM_FELICA: u8 = 0x3 << 3;
    pub const OM_SUBCARRIER_STREAM: u8 = 0xE << 3;
    pub const OM_TARG_NFCA: u8 = 0x1 << 3;
    pub const OM_TARG_NFCF: u8 = 0x4 << 3;
    pub const TR_AM: u8 = 1 << 2;
    pub const TR_AM_OOK: u8 = 0;
    pub const TR_AM_AM: u8 = 1 << 2;
}

pub mod bit_rate {
    pub const TXRATE_MASK: u8 = 0x3 << 4;
    pub const TXRATE_212: u8 = 0x1 << 4;
    pub const RXRATE_MASK: u8 = 0x3;
    pub const RXRATE_212: u8 = 0x1;
}

pub mod iso14443a_nfc {
    pub const NO_TX_PAR: u8 = 1 << 7;
    pub const NO_RX_PAR: u8 = 1 << 6;
    pub const ANTCL: u8 = 1 << 0;
}

pub mod iso14443b_1 {
    pub const EGT_MASK: u8 = 0x7 << 5;
    pub const SOF_MASK: u8 = 0x3 << 3;
    pub const SOF_0_10ETU: u8 = 0;
    pub const SOF_1_2ETU: u8 = 0;
    pub const EOF: u8 = 1 << 2;
    pub const EOF_10ETU: u8 = 0;
}

pub mod iso14443b_2 {
    pub const TR1_MASK: u8 = 0x3 << 6;
    pub const TR1_80FS80FS: u8 = 0;
    pub const NO_SOF: u8 = 1 << 5;
    pub const NO_EOF: u8 = 1 << 4;
}

pub mod passive_target {
    pub const FDEL_MASK: u8 = 0xF << 4;
    pub const FDEL_SHIFT: u8 = 4;
    pub const D_AC_AP2P: u8 = 1 << 3;
    pub const D_212_424_1R: u8 = 1 << 2;
    pub const D_106_AC_A: u8 = 1 << 0;
}

pub mod stream_mode {
    pub const SCF_SC424: u8 = 0x1 << 5;
    pub const SCP_8PULSES: u8 = 0x3 << 3;
    pub const STX_106: u8 = 0;
}

pub mod aux {
    pub const NO_CRC_RX: u8 = 1 << 7;
    pub const NFC_ID_MASK: u8 = 0x3 << 4;
    pub const NFC_ID_4BYTES: u8 = 0;
    pub const NFC_ID_7BYTES: u8 = 0x1 << 4;
    pub const DIS_CORR: u8 = 1 << 2;
}

pub mod rx_conf1 {
    pub const LP_MASK: u8 = 0x7 << 4;
    pub const LP0: u8 = 1 << 4;
    pub const Z600K: u8 = 1 << 3;
    pub const H200: u8 = 1 << 2;
    pub const H80: u8 = 1 << 1;
    pub const Z12K: u8 = 1 << 0;
    pub const HZ_12_80KHZ: u8 = 0x3;
}

pub mod rx_conf2 {
    pub const SQM_DYN: u8 = 1 << 5;
    pub const PULZ_61: u8 = 1 << 4;
    pub const AGC_EN: u8 = 1 << 3;
    pub const AGC_M: u8 = 1 << 2;
    pub const AGC_ALG: u8 = 1 << 1;
    pub const AGC6_3: u8 = 1 << 0;
}

pub mod corr_conf1 {
    pub const S7: u8 = 1 << 7;
    pub const S6: u8 = 1 << 6;
    pub const S4: u8 = 1 << 4;
    pub const S3: u8 = 1 << 3;
    pub const S1: u8 = 1 << 1;
    pub const S0: u8 = 1 << 0;
}

pub mod corr_conf2 {
    pub const S9: u8 = 1 << 1;
    pub const S8: u8 = 1 << 0;
}

pub mod timer_emv_control {
    pub const NRT_EMV: u8 = 1 << 1;
}

pub mod emd_sup_conf {
    pub const RX_START_EMV: u8 = 1 << 6;
}

pub mod fifo_status2 {
    pub const FIFO_B_MASK: u8 = 0x3 << 6;
    pub const FIFO_B_SHIFT: u8 = 6;
    pub const FIFO_LB_MASK: u8 = 0x7 << 1;
    pub const FIFO_LB_SHIFT: u8 = 1;
    pub const NP_LB: u8 = 1 << 0;
}

pub mod tx_driver {
    pub const AM_MOD_MASK: u8 = 0xF << 4;
    pub const AM_MOD_12PERCENT: u8 = 0x7 << 4;
    pub const D_RES_MASK: u8 = 0xF;
}

pub mod aux_mod {
    pub const DIS_REG_AM: u8 = 1 << 7;
    pub const LM_EXT: u8 = 1 << 5;
    pub const LM_DRI: u8 = 1 << 4;
    pub const RES_AM: u8 = 1 << 3;
}

pub mod pt_mod {
    pub const PTM_RES_MASK: u8 = 0xF << 4;
    pub const PT_RES_MASK: u8 = 0xF;
}

pub mod res_am_mod {
    pub const FA3_F: u8 = 1 << 7;
}

pub mod field_threshold {
    pub const TRG_MASK: u8 = 0x7 << 4;
    pub const TRG_75MV: u8 = 0;
    pub const TRG_105MV: u8 = 0x1 << 4;
    pub const RFE_MASK: u8 = 0xF;
    pub const RFE_75MV: u8 = 0;
    pub const RFE_105MV: u8 = 0x1;
}

pub mod regulator_control {
    pub const REG_S: u8 = 1 << 7;
    pub const MPSV_MASK: u8 = 0x7;
    pub const MPSV_VDD: u8 = 0;
}

pub mod aux_display {
    pub const EFD_O: u8 = 1 << 6;
    pub const OSC_OK: u8 = 1 << 4;
}

pub mod ic_identity {
    pub const IC_TYPE_MASK: u8 = 0x1F << 3;
    pub const IC_TYPE_ST25R3916: u8 = 5 << 3;
}
