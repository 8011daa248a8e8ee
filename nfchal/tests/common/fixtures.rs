// fixtures.rs — commonly used identities and frames

use nfchal::types::{Atqa, Idm, Pmm, SystemCode, Uid};
use nfchal::utils::parse_hex;

pub fn sample_uid4() -> Uid {
    Uid::try_from(&[0x04u8, 0xa1, 0xb2, 0xc3][..]).unwrap()
}

pub fn sample_uid7() -> Uid {
    Uid::try_from(&parse_hex("04 11 22 33 44 55 66").unwrap()[..]).unwrap()
}

pub fn sample_atqa() -> Atqa {
    Atqa::from_bytes([0x44, 0x00])
}

pub fn sample_idm() -> Idm {
    Idm::from_bytes([0x01, 0x2e, 0x3c, 0x4d, 0x5e, 0x6f, 0x70, 0x81])
}

pub fn sample_pmm() -> Pmm {
    Pmm::from_bytes([0x03, 0x32, 0x42, 0x4f, 0x0b, 0xff, 0x8c, 0x93])
}

pub fn sample_system_code() -> SystemCode {
    SystemCode::new(0x88b4)
}

/// ISO15693 inventory request, one slot, no mask.
pub fn inventory_request() -> Vec<u8> {
    parse_hex("26 01 00").unwrap()
}

/// ISO15693 inventory response with CRC.
pub fn inventory_response() -> Vec<u8> {
    parse_hex("00 00 e0 04 01 50 a1 b2 c3 d4 e0 e8 f1").unwrap()
}
