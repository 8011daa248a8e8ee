use nfchal::codec::iso15693::{decode_frame, encode_frame, encode_response, encoded_len, response_len};
use nfchal::Error;
use proptest::prelude::*;

fn card_to_reader(data: &[u8]) -> Vec<u8> {
    let bits = data.len() * 8;
    let mut stream = vec![0u8; response_len(bits)];
    let n = encode_response(data, bits, &mut stream);
    stream.truncate(n);
    stream
}

proptest! {
    #[test]
    fn response_survives_the_stream(data in proptest::collection::vec(any::<u8>(), 1..32)) {
        let stream = card_to_reader(&data);
        let mut out = [0u8; 64];
        let bits = decode_frame(&stream, stream.len() * 8, &mut out).unwrap();
        prop_assert_eq!(bits, data.len() * 8);
        prop_assert_eq!(&out[..data.len()], &data[..]);
    }

    #[test]
    fn request_has_one_pulse_per_symbol(data in proptest::collection::vec(any::<u8>(), 0..16)) {
        let bits = data.len() * 8;
        let mut out = vec![0u8; encoded_len(bits)];
        let n = encode_frame(&data, bits, &mut out);
        prop_assert_eq!(n, bits / 2 + 2);
        prop_assert_eq!(out[0], 0x21);
        prop_assert_eq!(out[n - 1], 0x04);
        for b in &out[1..n - 1] {
            prop_assert_eq!(b.count_ones(), 1);
        }
    }
}

#[test]
fn inventory_request_encoding() {
    let mut out = [0u8; 16];
    let n = encode_frame(&[0x26, 0x01, 0x00], 24, &mut out);
    assert_eq!(
        hex::encode(&out[..n]),
        "2120082002080202020202020204"
    );
}

#[test]
fn decode_into_short_buffer_overflows() {
    let stream = card_to_reader(&[0u8; 8]);
    let mut out = [0u8; 4];
    assert_eq!(
        decode_frame(&stream, stream.len() * 8, &mut out),
        Err(Error::BufferOverflow)
    );
}

#[test]
fn truncated_stream_is_rejected() {
    let stream = card_to_reader(&[0xa5, 0x5a]);
    let mut out = [0u8; 8];
    assert!(decode_frame(&stream[..2], 16, &mut out).is_err());
}
