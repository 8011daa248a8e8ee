// nfchal/src/chip/irq.rs

bitflags::bitflags! {
    /// ST25R3916 interrupt causes as one little-endian word over the four
    /// status registers (main, timer/NFC, error/wake-up, target).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Irq: u32 {
        // Main
        const RX_REST = 1 << 1;
        const COL = 1 << 2;
        const TXE = 1 << 3;
        const RXE = 1 << 4;
        const RXS = 1 << 5;
        const FWL = 1 << 6;
        const OSC = 1 << 7;
        // Timer and NFC
        const NFCT = 1 << 8;
        const CAT = 1 << 9;
        const CAC = 1 << 10;
        const EOF = 1 << 11;
        const EON = 1 << 12;
        const GPE = 1 << 13;
        const NRE = 1 << 14;
        const DCT = 1 << 15;
        // Error and wake-up
        const WCAP = 1 << 16;
        const WPH = 1 << 17;
        const WAM = 1 << 18;
        const WT = 1 << 19;
        const ERR1 = 1 << 20;
        const ERR2 = 1 << 21;
        const PAR = 1 << 22;
        const CRC = 1 << 23;
        // Target
        const WU_A = 1 << 24;
        const WU_A_X = 1 << 25;
        const WU_F = 1 << 27;
        const RXE_PTA = 1 << 28;
        const APON = 1 << 29;
        const SL_WL = 1 << 30;
        const PPON2 = 1 << 31;
    }
}

impl Irq {
    /// Causes enabled around a poller transmit.
    pub const POLLER_TRX: Irq = Irq::FWL
        .union(Irq::TXE)
        .union(Irq::RXS)
        .union(Irq::RXE)
        .union(Irq::PAR)
        .union(Irq::CRC)
        .union(Irq::ERR1)
        .union(Irq::ERR2)
        .union(Irq::NRE);

    /// Causes enabled while the passive target logic listens.
    pub const LISTENER: Irq = Irq::FWL
        .union(Irq::TXE)
        .union(Irq::RXS)
        .union(Irq::RXE)
        .union(Irq::PAR)
        .union(Irq::CRC)
        .union(Irq::ERR1)
        .union(Irq::ERR2)
        .union(Irq::EON)
        .union(Irq::EOF)
        .union(Irq::WU_A_X)
        .union(Irq::WU_A);
}
