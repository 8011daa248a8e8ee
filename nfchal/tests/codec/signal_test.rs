use nfchal::signal::{Iso14443aSignal, Iso15693DataRate, Iso15693Signal};
use proptest::prelude::*;

/// ISO14443A: SOF bit, data bits with one parity bit per full byte, EOF.
fn iso14443a_fc(bits: usize) -> u64 {
    (1 + bits + bits / 8) as u64 * 128 + 128
}

proptest! {
    #[test]
    fn iso14443a_duration_matches_bit_count(
        data in proptest::collection::vec(any::<u8>(), 1..16),
        parity in any::<u16>(),
    ) {
        let bits = data.len() * 8;
        let mut s = Iso14443aSignal::new();
        let runs = s.build(&data, &parity.to_be_bytes(), bits);
        prop_assert_eq!(runs.duration(), iso14443a_fc(bits));
        prop_assert!(runs.as_slice().iter().all(|&r| r > 0));
    }

    #[test]
    fn iso15693_duration_is_fixed_per_bit(data in proptest::collection::vec(any::<u8>(), 0..16)) {
        let mut s = Iso15693Signal::new();
        let frame = s.build(Iso15693DataRate::High, &data).duration();
        let empty = s.build(Iso15693DataRate::High, &[]).duration();
        prop_assert_eq!(frame - empty, data.len() as u64 * 8 * 512);
    }
}

#[test]
fn runs_alternate_levels() {
    let mut s = Iso15693Signal::new();
    let runs = s.build(Iso15693DataRate::Low, &[0xa5]);
    // Merging equal levels leaves no zero length or repeated runs
    assert!(runs.as_slice().iter().all(|&r| r > 0));
    assert!(!runs.start_level());
}

#[test]
fn short_frame_without_parity() {
    let mut s = Iso14443aSignal::new();
    let runs = s.build(&[0x0a], &[], 4);
    assert_eq!(runs.duration(), iso14443a_fc(4));
    assert!(runs.start_level());
}
