#![allow(clippy::unwrap_used)]

use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;

use jetjson::{from_slice, Decoder, Encoder, StringMode, Value};

fn sample_object() -> Vec<u8> {
    let mut enc = Encoder::new();
    enc.begin_object().unwrap();
    for i in 0..64_i64 {
        enc.encode_key_i64(&format!("k{i:03}"), i * 1_000_003).unwrap();
    }
    enc.encode_key_str("name", "jet \"json\" bench").unwrap();
    enc.encode_key_f64("ratio", 0.618_033_988_749_895).unwrap();
    enc.end_object().unwrap();
    enc.into_vec()
}

fn bench_decode(c: &mut Criterion) {
    let noisy = b"  \n\r\n\t\n    ,\t\r\n 1";
    c.bench_function("expect_after_noise", |b| {
        b.iter(|| {
            let mut dec = Decoder::new(black_box(noisy), StringMode::Copy);
            dec.expect(b'1').unwrap();
        })
    });

    c.bench_function("decode_i64", |b| {
        b.iter(|| {
            let mut dec = Decoder::new(black_box(b"-9223372036854775808"), StringMode::Copy);
            black_box(dec.decode_i64().unwrap());
        })
    });

    let doc = sample_object();
    c.bench_function("decode_object_typed", |b| {
        b.iter(|| {
            let mut dec = Decoder::new(black_box(&doc), StringMode::Borrow);
            assert!(dec.is_object_open());
            while !dec.is_object_close() {
                let key = dec.next_key().unwrap();
                match key.as_ref() {
                    "name" => {
                        black_box(dec.decode_str().unwrap());
                    }
                    "ratio" => {
                        black_box(dec.decode_f64().unwrap());
                    }
                    _ => {
                        black_box(dec.decode_i64().unwrap());
                    }
                }
            }
        })
    });

    c.bench_function("skip_value_object", |b| {
        b.iter(|| {
            let mut dec = Decoder::new(black_box(&doc), StringMode::Copy);
            dec.skip_value().unwrap();
        })
    });

    c.bench_function("decode_value_object", |b| {
        b.iter(|| {
            let v: Value = from_slice(black_box(&doc)).unwrap();
            black_box(v);
        })
    });

    let value: Value = from_slice(&doc).unwrap();
    c.bench_function("encode_value_object", |b| {
        b.iter(|| {
            let mut enc = Encoder::with_capacity(doc.len());
            enc.encode_value(black_box(&value)).unwrap();
            black_box(enc.into_vec());
        })
    });
}

criterion_group!(benches, bench_decode);
criterion_main!(benches);
