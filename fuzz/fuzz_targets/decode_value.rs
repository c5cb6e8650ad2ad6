#![no_main]

use libfuzzer_sys::fuzz_target;

use jetjson::{DecodeLimits, Decoder, Encoder, StringMode};

fn fuzz_limits(input_len: usize) -> DecodeLimits {
    DecodeLimits {
        max_input_bytes: input_len.min(1 << 20),
        max_depth: 64,
    }
}

fuzz_target!(|data: &[u8]| {
    let Ok(mut dec) = Decoder::with_limits(data, StringMode::Borrow, fuzz_limits(data.len())) else {
        return;
    };
    let Ok(value) = dec.decode_value() else {
        return;
    };
    assert!(dec.position() <= data.len());

    // Whatever decoded must encode (floats are always finite) and decode back identically.
    let mut enc = Encoder::new();
    enc.encode_value(&value).expect("encode decoded value");
    let mut again = Decoder::new(enc.bytes(), StringMode::Copy);
    let reparsed = again.decode_value().expect("re-decode encoded value");
    again.finish().expect("no trailing bytes");
    assert_eq!(value, reparsed);
});
