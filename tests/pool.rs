#![cfg(feature = "std")]

use std::thread;

use jetjson::pool::{Pool, MAX_POOLED_CAPACITY};
use jetjson::{
    acquire_decoder, acquire_encoder, encode_to_vec, from_slice, DecodeLimits, DecodeOptions,
    ErrorCode, StringMode,
};

#[test]
fn encoder_buffer_is_reused_and_cleared() {
    let pool = Pool::new();
    {
        let mut enc = pool.encoder();
        enc.encode_i32(5).unwrap();
        assert_eq!(enc.bytes(), b"5");
    }
    let stats = pool.stats();
    assert_eq!(stats.misses, 1);
    assert_eq!(stats.returns, 1);
    assert_eq!(stats.idle_encoders, 1);

    let enc = pool.encoder();
    assert!(enc.is_empty());
    assert!(enc.capacity() > 0);
    enc.release();

    let stats = pool.stats();
    assert_eq!(stats.hits, 1);
    assert_eq!(stats.returns, 2);
    assert!((stats.hit_rate() - 0.5).abs() < f64::EPSILON);
}

#[test]
fn finished_bytes_survive_reuse() {
    let pool = Pool::new();
    let mut enc = pool.encoder();
    enc.encode_str("first").unwrap();
    let first = enc.finish();

    let mut enc = pool.encoder();
    enc.encode_str("second").unwrap();
    assert_eq!(enc.bytes(), br#""second""#);
    drop(enc);

    assert_eq!(first, br#""first""#);
    assert_eq!(pool.stats().hits, 1);
}

#[test]
fn decoder_scratch_is_reused() {
    let pool = Pool::new();
    {
        let mut dec = pool.decoder(br#""a\nb""#, StringMode::Copy);
        assert_eq!(dec.decode_string().unwrap(), "a\nb");
    }
    assert_eq!(pool.stats().idle_decoders, 1);

    let mut dec = pool.decoder(b"[1,2]", StringMode::Borrow);
    assert_eq!(dec.mode(), StringMode::Borrow);
    assert_eq!(dec.position(), 0);
    assert!(dec.is_array_open());
    dec.release();
    let stats = pool.stats();
    assert_eq!(stats.hits, 1);
    assert_eq!(stats.idle_decoders, 1);
}

#[test]
fn decoder_scratch_cycles_without_drops() {
    let pool = Pool::with_capacity(1);
    for _ in 0..3 {
        let mut dec = pool.decoder(br#""x\ty""#, StringMode::Borrow);
        assert_eq!(dec.decode_str().unwrap(), "x\ty");
    }
    let stats = pool.stats();
    assert_eq!(stats.misses, 1);
    assert_eq!(stats.hits, 2);
    assert_eq!(stats.returns, 3);
    assert_eq!(stats.drops, 0);
    assert_eq!(stats.idle_decoders, 1);
}

#[test]
fn decoder_with_checks_limits() {
    let pool = Pool::new();
    let options = DecodeOptions {
        limits: DecodeLimits::for_bytes(2),
        ..DecodeOptions::default()
    };
    let err = pool.decoder_with(b"[1,2]", options).err().unwrap();
    assert_eq!(err.code, ErrorCode::MessageLenLimitExceeded);
    assert_eq!(pool.stats().misses, 0);
}

#[test]
fn oversized_buffers_are_dropped() {
    let pool = Pool::new();
    let mut enc = pool.encoder();
    enc.write_raw(&vec![b' '; MAX_POOLED_CAPACITY + 1]).unwrap();
    drop(enc);
    let stats = pool.stats();
    assert_eq!(stats.drops, 1);
    assert_eq!(stats.idle_encoders, 0);
}

#[test]
fn full_pool_drops_extra_instances() {
    let pool = Pool::with_capacity(1);
    let a = pool.encoder();
    let b = pool.encoder();
    drop(a);
    drop(b);
    let stats = pool.stats();
    assert_eq!(stats.returns, 1);
    assert_eq!(stats.drops, 1);
    assert_eq!(stats.idle_encoders, 1);
}

#[test]
fn global_pool_helpers() {
    let mut enc = acquire_encoder();
    enc.begin_array().unwrap();
    enc.write_comma().unwrap();
    enc.encode_u8(1).unwrap();
    enc.end_array().unwrap();
    let bytes = enc.finish();

    let mut dec = acquire_decoder(&bytes, StringMode::Copy);
    assert!(dec.is_array_open());
    assert_eq!(dec.decode_u8().unwrap(), 1);
    assert!(dec.is_array_close());
    dec.finish().unwrap();
}

#[test]
fn concurrent_sessions_stay_isolated() {
    let handles: Vec<_> = (0..8_u32)
        .map(|t| {
            thread::spawn(move || {
                for i in 0..200_u32 {
                    let v = vec![t, i, t ^ i];
                    let bytes = encode_to_vec(&v).unwrap();
                    let back: Vec<u32> = from_slice(&bytes).unwrap();
                    assert_eq!(back, v);
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }
}
