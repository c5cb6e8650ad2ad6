use alloc::vec::Vec;

use crate::alloc_util::try_reserve;
use crate::escape::{ESCAPE, HEX};
use crate::value::{Number, RawValue, Value};
use crate::{ErrorCode, JsonError};

trait Sink {
    fn write(&mut self, bytes: &[u8]) -> Result<(), JsonError>;

    fn write_u8(&mut self, byte: u8) -> Result<(), JsonError> {
        self.write(&[byte])
    }

    fn position(&self) -> usize;
}

struct VecSink {
    buf: Vec<u8>,
}

impl VecSink {
    const fn new() -> Self {
        Self { buf: Vec::new() }
    }

    fn with_capacity(capacity: usize) -> Self {
        let mut buf = Vec::new();
        let _ = buf.try_reserve(capacity);
        Self { buf }
    }

    #[inline]
    fn reserve(&mut self, additional: usize) -> Result<(), JsonError> {
        let available = self.buf.capacity().saturating_sub(self.buf.len());
        if additional <= available {
            return Ok(());
        }
        let offset = self.buf.len();
        try_reserve(&mut self.buf, additional, offset)
    }
}

impl Sink for VecSink {
    fn write(&mut self, bytes: &[u8]) -> Result<(), JsonError> {
        self.reserve(bytes.len())?;
        self.buf.extend_from_slice(bytes);
        Ok(())
    }

    fn write_u8(&mut self, byte: u8) -> Result<(), JsonError> {
        if self.buf.len() == self.buf.capacity() {
            self.reserve(1)?;
        }
        self.buf.push(byte);
        Ok(())
    }

    fn position(&self) -> usize {
        self.buf.len()
    }
}

fn err_at<S: Sink>(sink: &S, code: ErrorCode) -> JsonError {
    JsonError::new(code, sink.position())
}

/// Write `s` as a quoted JSON string, escaping quotes, backslashes and control bytes.
fn encode_text<S: Sink>(sink: &mut S, s: &[u8]) -> Result<(), JsonError> {
    sink.write_u8(b'"')?;
    let mut start = 0;
    for (i, &b) in s.iter().enumerate() {
        let esc = ESCAPE[usize::from(b)];
        if esc == 0 {
            continue;
        }
        if start < i {
            sink.write(&s[start..i])?;
        }
        if esc == b'u' {
            sink.write(&[
                b'\\',
                b'u',
                b'0',
                b'0',
                HEX[usize::from(b >> 4)],
                HEX[usize::from(b & 0xf)],
            ])?;
        } else {
            sink.write(&[b'\\', esc])?;
        }
        start = i + 1;
    }
    if start < s.len() {
        sink.write(&s[start..])?;
    }
    sink.write_u8(b'"')
}

macro_rules! int_encoders {
    ($($(#[$doc:meta])* $encode:ident, $encode_key:ident => $ty:ty;)*) => {
        $(
            $(#[$doc])*
            ///
            /// # Errors
            ///
            /// Returns an error if the output buffer cannot grow.
            #[inline]
            pub fn $encode(&mut self, v: $ty) -> Result<(), JsonError> {
                self.sink.write(itoa::Buffer::new().format(v).as_bytes())
            }

            /// Write `"key":value`, preceded by a comma when needed.
            ///
            /// # Errors
            ///
            /// Returns an error if the output buffer cannot grow.
            #[inline]
            pub fn $encode_key(&mut self, key: &str, v: $ty) -> Result<(), JsonError> {
                self.write_key(key)?;
                self.$encode(v)
            }
        )*
    };
}

/// Streaming JSON writer producing compact output in a growable buffer.
///
/// Separators are the caller's job for array elements ([`Encoder::write_comma`]); object members
/// written through [`Encoder::write_key`] or any `encode_key_*` call get their comma automatically.
/// No trailing comma is ever produced.
pub struct Encoder {
    sink: VecSink,
}

impl Encoder {
    /// Create a new encoder.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            sink: VecSink::new(),
        }
    }

    /// Create an encoder with pre-allocated capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            sink: VecSink::with_capacity(capacity),
        }
    }

    pub(crate) const fn from_vec(buf: Vec<u8>) -> Self {
        Self {
            sink: VecSink { buf },
        }
    }

    /// Return the number of bytes written so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sink.buf.len()
    }

    /// Returns `true` if no bytes have been written.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sink.buf.is_empty()
    }

    /// Capacity of the output buffer.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.sink.buf.capacity()
    }

    /// Borrow the bytes emitted so far.
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.sink.buf
    }

    /// Consume and return the encoded bytes.
    #[must_use]
    pub fn into_vec(self) -> Vec<u8> {
        self.sink.buf
    }

    /// Discard the output, keeping the allocation.
    pub fn clear(&mut self) {
        self.sink.buf.clear();
    }

    /// Append one byte verbatim.
    ///
    /// # Errors
    ///
    /// Returns an error if the output buffer cannot grow.
    #[inline]
    pub fn write_byte(&mut self, b: u8) -> Result<(), JsonError> {
        self.sink.write_u8(b)
    }

    /// Append pre-encoded JSON verbatim.
    ///
    /// # Errors
    ///
    /// Returns an error if the output buffer cannot grow.
    #[inline]
    pub fn write_raw(&mut self, bytes: &[u8]) -> Result<(), JsonError> {
        self.sink.write(bytes)
    }

    /// Write `,` if the enclosing container already has a member.
    ///
    /// Nothing is written at the start of output, directly after `{` or `[`, or after a key's `:`.
    ///
    /// # Errors
    ///
    /// Returns an error if the output buffer cannot grow.
    #[inline]
    pub fn write_comma(&mut self) -> Result<(), JsonError> {
        match self.sink.buf.last() {
            None | Some(b'{' | b'[' | b':' | b',') => Ok(()),
            Some(_) => self.sink.write_u8(b','),
        }
    }

    /// Write `null`.
    ///
    /// # Errors
    ///
    /// Returns an error if the output buffer cannot grow.
    #[inline]
    pub fn write_null(&mut self) -> Result<(), JsonError> {
        self.sink.write(b"null")
    }

    /// Write `"name":`, preceded by a comma when needed. The name is escaped.
    ///
    /// # Errors
    ///
    /// Returns an error if the output buffer cannot grow.
    #[inline]
    pub fn write_key(&mut self, name: &str) -> Result<(), JsonError> {
        self.write_comma()?;
        encode_text(&mut self.sink, name.as_bytes())?;
        self.sink.write_u8(b':')
    }

    /// Write `{`.
    ///
    /// # Errors
    ///
    /// Returns an error if the output buffer cannot grow.
    #[inline]
    pub fn begin_object(&mut self) -> Result<(), JsonError> {
        self.sink.write_u8(b'{')
    }

    /// Write `}`.
    ///
    /// # Errors
    ///
    /// Returns an error if the output buffer cannot grow.
    #[inline]
    pub fn end_object(&mut self) -> Result<(), JsonError> {
        self.sink.write_u8(b'}')
    }

    /// Write `[`.
    ///
    /// # Errors
    ///
    /// Returns an error if the output buffer cannot grow.
    #[inline]
    pub fn begin_array(&mut self) -> Result<(), JsonError> {
        self.sink.write_u8(b'[')
    }

    /// Write `]`.
    ///
    /// # Errors
    ///
    /// Returns an error if the output buffer cannot grow.
    #[inline]
    pub fn end_array(&mut self) -> Result<(), JsonError> {
        self.sink.write_u8(b']')
    }

    int_encoders! {
        /// Write an `i8`.
        encode_i8, encode_key_i8 => i8;
        /// Write an `i16`.
        encode_i16, encode_key_i16 => i16;
        /// Write an `i32`.
        encode_i32, encode_key_i32 => i32;
        /// Write an `i64`.
        encode_i64, encode_key_i64 => i64;
        /// Write an `isize`.
        encode_isize, encode_key_isize => isize;
        /// Write a `u8`.
        encode_u8, encode_key_u8 => u8;
        /// Write a `u16`.
        encode_u16, encode_key_u16 => u16;
        /// Write a `u32`.
        encode_u32, encode_key_u32 => u32;
        /// Write a `u64`.
        encode_u64, encode_key_u64 => u64;
        /// Write a `usize`.
        encode_usize, encode_key_usize => usize;
    }

    /// Write an `f64` in shortest round-trip form.
    ///
    /// # Errors
    ///
    /// Returns `NonFiniteFloat` for NaN or infinities.
    pub fn encode_f64(&mut self, v: f64) -> Result<(), JsonError> {
        if !v.is_finite() {
            return Err(err_at(&self.sink, ErrorCode::NonFiniteFloat));
        }
        self.sink.write(ryu::Buffer::new().format_finite(v).as_bytes())
    }

    /// Write an `f32` in shortest round-trip form.
    ///
    /// # Errors
    ///
    /// Returns `NonFiniteFloat` for NaN or infinities.
    pub fn encode_f32(&mut self, v: f32) -> Result<(), JsonError> {
        if !v.is_finite() {
            return Err(err_at(&self.sink, ErrorCode::NonFiniteFloat));
        }
        self.sink.write(ryu::Buffer::new().format_finite(v).as_bytes())
    }

    /// Write `true` or `false`.
    ///
    /// # Errors
    ///
    /// Returns an error if the output buffer cannot grow.
    pub fn encode_bool(&mut self, v: bool) -> Result<(), JsonError> {
        self.sink.write(if v { b"true" } else { b"false" })
    }

    /// Write a quoted, escaped string.
    ///
    /// # Errors
    ///
    /// Returns an error if the output buffer cannot grow.
    pub fn encode_str(&mut self, s: &str) -> Result<(), JsonError> {
        encode_text(&mut self.sink, s.as_bytes())
    }

    /// Write `b` between quotes without escaping or base64.
    ///
    /// The bytes must already be valid escaped string content.
    ///
    /// # Errors
    ///
    /// Returns an error if the output buffer cannot grow.
    pub fn encode_bytes(&mut self, b: &[u8]) -> Result<(), JsonError> {
        let len = b
            .len()
            .checked_add(2)
            .ok_or_else(|| err_at(&self.sink, ErrorCode::LengthOverflow))?;
        self.sink.reserve(len)?;
        self.sink.write_u8(b'"')?;
        self.sink.write(b)?;
        self.sink.write_u8(b'"')
    }

    /// Splice a captured raw value.
    ///
    /// # Errors
    ///
    /// Returns an error if the output buffer cannot grow.
    pub fn encode_raw_value(&mut self, v: RawValue<'_>) -> Result<(), JsonError> {
        self.sink.write(v.as_bytes())
    }

    /// Write a number of runtime-determined kind.
    ///
    /// # Errors
    ///
    /// Returns `NonFiniteFloat` for NaN or infinities.
    pub fn encode_number(&mut self, n: Number) -> Result<(), JsonError> {
        match n {
            Number::PosInt(v) => self.encode_u64(v),
            Number::NegInt(v) => self.encode_i64(v),
            Number::Float(v) => self.encode_f64(v),
        }
    }

    /// Write a value whose shape is only known at runtime.
    ///
    /// # Errors
    ///
    /// Returns `NonFiniteFloat` if a nested float is NaN or infinite.
    pub fn encode_value(&mut self, v: &Value) -> Result<(), JsonError> {
        match v {
            Value::Null => self.write_null(),
            Value::Bool(b) => self.encode_bool(*b),
            Value::Number(n) => self.encode_number(*n),
            Value::String(s) => self.encode_str(s),
            Value::Array(items) => {
                self.begin_array()?;
                for item in items {
                    self.write_comma()?;
                    self.encode_value(item)?;
                }
                self.end_array()
            }
            Value::Object(map) => {
                self.begin_object()?;
                for (k, item) in map.iter() {
                    self.write_key(k)?;
                    self.encode_value(item)?;
                }
                self.end_object()
            }
        }
    }

    /// Write `"key":"value"`, preceded by a comma when needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the output buffer cannot grow.
    pub fn encode_key_str(&mut self, key: &str, v: &str) -> Result<(), JsonError> {
        self.write_key(key)?;
        self.encode_str(v)
    }

    /// Write `"key":"bytes"` with raw passthrough content.
    ///
    /// # Errors
    ///
    /// Returns an error if the output buffer cannot grow.
    pub fn encode_key_bytes(&mut self, key: &str, v: &[u8]) -> Result<(), JsonError> {
        self.write_key(key)?;
        self.encode_bytes(v)
    }

    /// Write `"key":true|false`.
    ///
    /// # Errors
    ///
    /// Returns an error if the output buffer cannot grow.
    pub fn encode_key_bool(&mut self, key: &str, v: bool) -> Result<(), JsonError> {
        self.write_key(key)?;
        self.encode_bool(v)
    }

    /// Write `"key":<f32>`.
    ///
    /// # Errors
    ///
    /// Returns `NonFiniteFloat` for NaN or infinities.
    pub fn encode_key_f32(&mut self, key: &str, v: f32) -> Result<(), JsonError> {
        self.write_key(key)?;
        self.encode_f32(v)
    }

    /// Write `"key":<f64>`.
    ///
    /// # Errors
    ///
    /// Returns `NonFiniteFloat` for NaN or infinities.
    pub fn encode_key_f64(&mut self, key: &str, v: f64) -> Result<(), JsonError> {
        self.write_key(key)?;
        self.encode_f64(v)
    }

    /// Write `"key":<value>` for a runtime-shaped value.
    ///
    /// # Errors
    ///
    /// Returns `NonFiniteFloat` if a nested float is NaN or infinite.
    pub fn encode_key_value(&mut self, key: &str, v: &Value) -> Result<(), JsonError> {
        self.write_key(key)?;
        self.encode_value(v)
    }
}

impl Default for Encoder {
    fn default() -> Self {
        Self::new()
    }
}
