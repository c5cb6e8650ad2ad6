//! Lock-free reuse of encoder buffers and decoder scratch space.
//!
//! A [`Decoder`] borrows its input, so the pool keeps the owned part of a decode session (the
//! scratch buffer used for unescaping) and rebinds it to each new input. Encoders are pooled as
//! their output buffer.

use core::mem;
use core::ops::{Deref, DerefMut};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::OnceLock;

use crossbeam::queue::ArrayQueue;

use crate::{DecodeLimits, DecodeOptions, Decoder, Encoder, ErrorCode, JsonError, StringMode};

/// Initial capacity of a freshly allocated encoder buffer.
pub const DEFAULT_ENCODER_CAPACITY: usize = 4096;

/// Buffers that grew beyond this capacity are dropped instead of pooled.
pub const MAX_POOLED_CAPACITY: usize = 1024 * 1024;

/// Maximum idle instances kept per kind.
const MAX_POOL_SIZE: usize = 256;

static GLOBAL_POOL: OnceLock<Pool> = OnceLock::new();

/// The process-wide pool used by the top-level helpers.
pub fn pool() -> &'static Pool {
    GLOBAL_POOL.get_or_init(Pool::new)
}

/// Acquire an encoder from the global pool.
#[must_use]
pub fn acquire_encoder() -> PooledEncoder<'static> {
    pool().encoder()
}

/// Acquire a decoder over `bytes` from the global pool, with default limits.
#[must_use]
pub fn acquire_decoder(bytes: &[u8], mode: StringMode) -> PooledDecoder<'static, '_> {
    pool().decoder(bytes, mode)
}

/// Free lists of encoder buffers and decoder scratch buffers.
pub struct Pool {
    encoders: ArrayQueue<Vec<u8>>,
    decoders: ArrayQueue<Vec<u8>>,
    hits: AtomicUsize,
    misses: AtomicUsize,
    returns: AtomicUsize,
    drops: AtomicUsize,
}

impl Pool {
    /// A pool keeping up to 256 idle instances of each kind.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(MAX_POOL_SIZE)
    }

    /// A pool keeping up to `capacity` idle instances of each kind.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            encoders: ArrayQueue::new(capacity),
            decoders: ArrayQueue::new(capacity),
            hits: AtomicUsize::new(0),
            misses: AtomicUsize::new(0),
            returns: AtomicUsize::new(0),
            drops: AtomicUsize::new(0),
        }
    }

    fn take(&self, queue: &ArrayQueue<Vec<u8>>, fresh: usize) -> Vec<u8> {
        if let Some(buf) = queue.pop() {
            self.hits.fetch_add(1, Ordering::Relaxed);
            buf
        } else {
            self.misses.fetch_add(1, Ordering::Relaxed);
            log::trace!("pool miss, allocating {fresh} bytes");
            Vec::with_capacity(fresh)
        }
    }

    fn put(&self, queue: &ArrayQueue<Vec<u8>>, mut buf: Vec<u8>) {
        if buf.capacity() > MAX_POOLED_CAPACITY {
            self.drops.fetch_add(1, Ordering::Relaxed);
            log::trace!("pool dropping oversized buffer ({} bytes)", buf.capacity());
            return;
        }
        buf.clear();
        if queue.push(buf).is_ok() {
            self.returns.fetch_add(1, Ordering::Relaxed);
            log::trace!("pool return");
        } else {
            self.drops.fetch_add(1, Ordering::Relaxed);
            log::trace!("pool full, dropping buffer");
        }
    }

    /// Take an encoder with an empty buffer.
    #[must_use]
    pub fn encoder(&self) -> PooledEncoder<'_> {
        let buf = self.take(&self.encoders, DEFAULT_ENCODER_CAPACITY);
        PooledEncoder {
            enc: Encoder::from_vec(buf),
            pool: self,
        }
    }

    /// Take a decoder over `bytes` with default limits.
    #[must_use]
    pub fn decoder<'de>(&self, bytes: &'de [u8], mode: StringMode) -> PooledDecoder<'_, 'de> {
        let scratch = self.take(&self.decoders, 0);
        // Default limits admit any input length.
        let dec = Decoder::from_parts(bytes, mode, DecodeLimits::default(), scratch);
        PooledDecoder { dec, pool: self }
    }

    /// Take a decoder over `bytes` with explicit options.
    ///
    /// # Errors
    ///
    /// Returns `MessageLenLimitExceeded` if `bytes` exceeds the input limit.
    pub fn decoder_with<'de>(
        &self,
        bytes: &'de [u8],
        options: DecodeOptions,
    ) -> Result<PooledDecoder<'_, 'de>, JsonError> {
        if bytes.len() > options.limits.max_input_bytes {
            return Err(JsonError::new(ErrorCode::MessageLenLimitExceeded, 0));
        }
        let scratch = self.take(&self.decoders, 0);
        let dec = Decoder::from_parts(bytes, options.mode, options.limits, scratch);
        Ok(PooledDecoder { dec, pool: self })
    }

    /// Snapshot of the pool counters.
    #[must_use]
    pub fn stats(&self) -> PoolStats {
        PoolStats {
            idle_encoders: self.encoders.len(),
            idle_decoders: self.decoders.len(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            returns: self.returns.load(Ordering::Relaxed),
            drops: self.drops.load(Ordering::Relaxed),
        }
    }
}

impl Default for Pool {
    fn default() -> Self {
        Self::new()
    }
}

/// Pool counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolStats {
    /// Idle encoder buffers.
    pub idle_encoders: usize,
    /// Idle decoder scratch buffers.
    pub idle_decoders: usize,
    /// Acquisitions served from the pool.
    pub hits: usize,
    /// Acquisitions that allocated.
    pub misses: usize,
    /// Instances returned to the pool.
    pub returns: usize,
    /// Instances dropped because the pool was full or the buffer oversized.
    pub drops: usize,
}

impl PoolStats {
    /// Fraction of acquisitions served from the pool.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// An encoder on loan from a [`Pool`]; its buffer goes back on drop.
///
/// [`Encoder::bytes`] (through `Deref`) borrows the output, so the encoder cannot be released while the
/// bytes are in use. [`PooledEncoder::finish`] copies them out first.
pub struct PooledEncoder<'p> {
    enc: Encoder,
    pool: &'p Pool,
}

impl PooledEncoder<'_> {
    /// Copy the output into a fresh vector, then release the encoder.
    #[must_use]
    pub fn finish(self) -> Vec<u8> {
        self.enc.bytes().to_vec()
    }

    /// Return the encoder to its pool.
    pub fn release(self) {
        drop(self);
    }
}

impl Deref for PooledEncoder<'_> {
    type Target = Encoder;

    fn deref(&self) -> &Encoder {
        &self.enc
    }
}

impl DerefMut for PooledEncoder<'_> {
    fn deref_mut(&mut self) -> &mut Encoder {
        &mut self.enc
    }
}

impl Drop for PooledEncoder<'_> {
    fn drop(&mut self) {
        let enc = mem::take(&mut self.enc);
        self.pool.put(&self.pool.encoders, enc.into_vec());
    }
}

/// A decoder on loan from a [`Pool`]; its scratch buffer goes back on drop.
pub struct PooledDecoder<'p, 'de> {
    dec: Decoder<'de>,
    pool: &'p Pool,
}

impl PooledDecoder<'_, '_> {
    /// Return the decoder's scratch buffer to its pool.
    pub fn release(self) {
        drop(self);
    }
}

impl<'de> Deref for PooledDecoder<'_, 'de> {
    type Target = Decoder<'de>;

    fn deref(&self) -> &Decoder<'de> {
        &self.dec
    }
}

impl<'de> DerefMut for PooledDecoder<'_, 'de> {
    fn deref_mut(&mut self) -> &mut Decoder<'de> {
        &mut self.dec
    }
}

impl Drop for PooledDecoder<'_, '_> {
    fn drop(&mut self) {
        let dec = mem::replace(&mut self.dec, Decoder::new(&[], StringMode::Copy));
        self.pool.put(&self.pool.decoders, dec.into_scratch());
    }
}
