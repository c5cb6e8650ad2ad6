#![no_main]

use libfuzzer_sys::fuzz_target;

use jetjson::{Decoder, StringMode};

fuzz_target!(|data: &[u8]| {
    let mut dec = Decoder::new(data, StringMode::Copy);
    if let Ok(raw) = dec.read_value() {
        assert!(dec.position() <= data.len());
        assert!(!raw.is_empty());
        let mut inner = Decoder::new(raw.as_bytes(), StringMode::Copy);
        inner.skip_value().expect("captured value skips again");
        assert!(inner.is_eof());
    }
});
