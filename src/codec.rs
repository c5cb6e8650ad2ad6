use alloc::borrow::Cow;
use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;
#[cfg(feature = "std")]
use std::collections::HashMap;
#[cfg(feature = "std")]
use std::hash::BuildHasher;

use crate::alloc_util::try_reserve;
use crate::encode::Encoder;
use crate::value::{RawValue, Value};
use crate::{Decoder, DecodeOptions, JsonError};

/// Decode a value from a streaming decoder.
pub trait JsonDecode<'de>: Sized {
    /// Decode `Self` from a streaming decoder.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON value does not match the expected type.
    fn decode(decoder: &mut Decoder<'de>) -> Result<Self, JsonError>;
}

/// Encode a value into JSON bytes using the streaming encoder.
pub trait JsonEncode {
    /// Encode `self` into the provided encoder.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding fails.
    fn encode(&self, enc: &mut Encoder) -> Result<(), JsonError>;
}

/// Decode a single top-level value, rejecting trailing significant bytes.
///
/// # Errors
///
/// Returns an error if the input exceeds the configured limits, is malformed, does not match
/// `T`, or has significant bytes after the value.
pub fn decode<'de, T: JsonDecode<'de>>(
    bytes: &'de [u8],
    options: DecodeOptions,
) -> Result<T, JsonError> {
    log::trace!("decode: {} bytes, {:?}", bytes.len(), options.mode);
    let res = decode_session(bytes, options);
    if let Err(err) = &res {
        log::debug!("decode failed: {err}");
    }
    res
}

#[cfg(feature = "std")]
fn decode_session<'de, T: JsonDecode<'de>>(
    bytes: &'de [u8],
    options: DecodeOptions,
) -> Result<T, JsonError> {
    let mut decoder = crate::pool::pool().decoder_with(bytes, options)?;
    let value = T::decode(&mut decoder)?;
    decoder.finish()?;
    Ok(value)
}

#[cfg(not(feature = "std"))]
fn decode_session<'de, T: JsonDecode<'de>>(
    bytes: &'de [u8],
    options: DecodeOptions,
) -> Result<T, JsonError> {
    let mut decoder = Decoder::with_limits(bytes, options.mode, options.limits)?;
    let value = T::decode(&mut decoder)?;
    decoder.finish()?;
    Ok(value)
}

/// Decode with default options (copied strings, default limits).
///
/// # Errors
///
/// Same as [`decode`].
pub fn from_slice<'de, T: JsonDecode<'de>>(bytes: &'de [u8]) -> Result<T, JsonError> {
    decode(bytes, DecodeOptions::default())
}

/// Encode a value into a fresh byte vector.
///
/// # Errors
///
/// Returns an error if encoding fails.
pub fn encode_to_vec<T: JsonEncode + ?Sized>(value: &T) -> Result<Vec<u8>, JsonError> {
    log::trace!("encode_to_vec");
    #[cfg(feature = "std")]
    {
        let mut enc = crate::pool::acquire_encoder();
        value.encode(&mut enc)?;
        Ok(enc.finish())
    }
    #[cfg(not(feature = "std"))]
    {
        let mut enc = Encoder::new();
        value.encode(&mut enc)?;
        Ok(enc.into_vec())
    }
}

macro_rules! scalar_codec {
    ($($ty:ty => $decode:ident, $encode:ident;)*) => {
        $(
            impl<'de> JsonDecode<'de> for $ty {
                #[inline]
                fn decode(decoder: &mut Decoder<'de>) -> Result<Self, JsonError> {
                    decoder.$decode()
                }
            }

            impl JsonEncode for $ty {
                #[inline]
                fn encode(&self, enc: &mut Encoder) -> Result<(), JsonError> {
                    enc.$encode(*self)
                }
            }
        )*
    };
}

scalar_codec! {
    i8 => decode_i8, encode_i8;
    i16 => decode_i16, encode_i16;
    i32 => decode_i32, encode_i32;
    i64 => decode_i64, encode_i64;
    isize => decode_isize, encode_isize;
    u8 => decode_u8, encode_u8;
    u16 => decode_u16, encode_u16;
    u32 => decode_u32, encode_u32;
    u64 => decode_u64, encode_u64;
    usize => decode_usize, encode_usize;
    f32 => decode_f32, encode_f32;
    f64 => decode_f64, encode_f64;
    bool => decode_bool, encode_bool;
}

impl JsonDecode<'_> for String {
    fn decode(decoder: &mut Decoder<'_>) -> Result<Self, JsonError> {
        decoder.decode_string()
    }
}

impl JsonEncode for String {
    fn encode(&self, enc: &mut Encoder) -> Result<(), JsonError> {
        enc.encode_str(self)
    }
}

impl JsonEncode for str {
    fn encode(&self, enc: &mut Encoder) -> Result<(), JsonError> {
        enc.encode_str(self)
    }
}

impl<'de> JsonDecode<'de> for Cow<'de, str> {
    fn decode(decoder: &mut Decoder<'de>) -> Result<Self, JsonError> {
        decoder.decode_str()
    }
}

impl JsonEncode for Cow<'_, str> {
    fn encode(&self, enc: &mut Encoder) -> Result<(), JsonError> {
        enc.encode_str(self)
    }
}

impl<T: JsonEncode + ?Sized> JsonEncode for &T {
    fn encode(&self, enc: &mut Encoder) -> Result<(), JsonError> {
        (**self).encode(enc)
    }
}

impl<'de> JsonDecode<'de> for Value {
    fn decode(decoder: &mut Decoder<'de>) -> Result<Self, JsonError> {
        decoder.decode_value()
    }
}

impl JsonEncode for Value {
    fn encode(&self, enc: &mut Encoder) -> Result<(), JsonError> {
        enc.encode_value(self)
    }
}

impl<'de> JsonDecode<'de> for RawValue<'de> {
    fn decode(decoder: &mut Decoder<'de>) -> Result<Self, JsonError> {
        decoder.read_value()
    }
}

impl JsonEncode for RawValue<'_> {
    fn encode(&self, enc: &mut Encoder) -> Result<(), JsonError> {
        enc.encode_raw_value(*self)
    }
}

impl<'de, T: JsonDecode<'de>> JsonDecode<'de> for Option<T> {
    fn decode(decoder: &mut Decoder<'de>) -> Result<Self, JsonError> {
        if decoder.is_null() {
            Ok(None)
        } else {
            T::decode(decoder).map(Some)
        }
    }
}

impl<T: JsonEncode> JsonEncode for Option<T> {
    fn encode(&self, enc: &mut Encoder) -> Result<(), JsonError> {
        match self {
            Some(v) => v.encode(enc),
            None => enc.write_null(),
        }
    }
}

impl<'de, T: JsonDecode<'de>> JsonDecode<'de> for Vec<T> {
    fn decode(decoder: &mut Decoder<'de>) -> Result<Self, JsonError> {
        let mut out = Self::new();
        if decoder.is_null() {
            return Ok(out);
        }
        decoder.expect(b'[')?;
        while !decoder.is_array_close() {
            if decoder.is_eof() {
                return Err(JsonError::eof(decoder.data()));
            }
            let item = T::decode(decoder)?;
            try_reserve(&mut out, 1, decoder.position())?;
            out.push(item);
        }
        Ok(out)
    }
}

impl<T: JsonEncode> JsonEncode for Vec<T> {
    fn encode(&self, enc: &mut Encoder) -> Result<(), JsonError> {
        encode_seq(self, enc)
    }
}

impl<T: JsonEncode> JsonEncode for [T] {
    fn encode(&self, enc: &mut Encoder) -> Result<(), JsonError> {
        encode_seq(self, enc)
    }
}

fn encode_seq<T: JsonEncode>(items: &[T], enc: &mut Encoder) -> Result<(), JsonError> {
    if items.is_empty() {
        return enc.write_null();
    }
    enc.begin_array()?;
    for item in items {
        enc.write_comma()?;
        item.encode(enc)?;
    }
    enc.end_array()
}

/// Drive `insert` for every member of an object; `null` yields no members.
fn decode_members<'de, V: JsonDecode<'de>>(
    decoder: &mut Decoder<'de>,
    mut insert: impl FnMut(String, V),
) -> Result<(), JsonError> {
    if decoder.is_null() {
        return Ok(());
    }
    decoder.expect(b'{')?;
    while !decoder.is_object_close() {
        if decoder.is_eof() {
            return Err(JsonError::eof(decoder.data()));
        }
        let key = decoder.next_key()?.into_owned();
        let value = V::decode(decoder)?;
        insert(key, value);
    }
    Ok(())
}

fn encode_members<'a, V: JsonEncode + 'a>(
    len: usize,
    members: impl Iterator<Item = (&'a String, &'a V)>,
    enc: &mut Encoder,
) -> Result<(), JsonError> {
    if len == 0 {
        return enc.write_null();
    }
    enc.begin_object()?;
    for (k, v) in members {
        enc.write_key(k)?;
        v.encode(enc)?;
    }
    enc.end_object()
}

impl<'de, V: JsonDecode<'de>> JsonDecode<'de> for BTreeMap<String, V> {
    fn decode(decoder: &mut Decoder<'de>) -> Result<Self, JsonError> {
        let mut out = Self::new();
        decode_members(decoder, |k, v| {
            out.insert(k, v);
        })?;
        Ok(out)
    }
}

impl<V: JsonEncode> JsonEncode for BTreeMap<String, V> {
    fn encode(&self, enc: &mut Encoder) -> Result<(), JsonError> {
        encode_members(self.len(), self.iter(), enc)
    }
}

#[cfg(feature = "std")]
impl<'de, V: JsonDecode<'de>, S: BuildHasher + Default> JsonDecode<'de> for HashMap<String, V, S> {
    fn decode(decoder: &mut Decoder<'de>) -> Result<Self, JsonError> {
        let mut out = Self::default();
        decode_members(decoder, |k, v| {
            out.insert(k, v);
        })?;
        Ok(out)
    }
}

#[cfg(feature = "std")]
impl<V: JsonEncode, S: BuildHasher> JsonEncode for HashMap<String, V, S> {
    fn encode(&self, enc: &mut Encoder) -> Result<(), JsonError> {
        encode_members(self.len(), self.iter(), enc)
    }
}
