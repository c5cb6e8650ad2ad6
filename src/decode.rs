use alloc::borrow::Cow;
use alloc::string::String;
use alloc::vec::Vec;

use crate::alloc_util::try_string_from_str;
use crate::classify::{
    is_digit, is_float_byte, is_structural_stop, is_whitespace, is_whitespace_or_separator,
};
use crate::escape::{find_string_end, unescape_into};
use crate::number;
use crate::{utf8, DecodeLimits, ErrorCode, JsonError, StringMode};

/// Cursor-based JSON decoder over a borrowed input buffer.
///
/// The decoder never builds a token stream or tree: callers drive it through typed decode, skip
/// and structural probe calls that match the JSON shape they expect. The cursor only moves forward
/// and always points at the next unconsumed byte.
///
/// Scalar decoders treat `null` as the zero value of the requested type.
pub struct Decoder<'de> {
    pub(crate) data: &'de [u8],
    pub(crate) cursor: usize,
    mode: StringMode,
    pub(crate) limits: DecodeLimits,
    scratch: Vec<u8>,
}

macro_rules! signed_decoders {
    ($($(#[$doc:meta])* $decode:ident, $skip:ident => $ty:ty;)*) => {
        $(
            $(#[$doc])*
            ///
            /// # Errors
            ///
            /// Returns a parse error at the first offending byte, or `NumberOverflow` if the
            /// literal does not fit.
            #[inline]
            pub fn $decode(&mut self) -> Result<$ty, JsonError> {
                let begin = self.cursor;
                let v = self.decode_signed(<$ty>::MAX.unsigned_abs().into())?;
                <$ty>::try_from(v).map_err(|_| JsonError::overflow(begin))
            }

            /// Decode and discard a value of the same type, with identical validation.
            ///
            /// # Errors
            ///
            /// Same as the matching decode call.
            #[inline]
            pub fn $skip(&mut self) -> Result<(), JsonError> {
                self.$decode().map(|_| ())
            }
        )*
    };
}

macro_rules! unsigned_decoders {
    ($($(#[$doc:meta])* $decode:ident, $skip:ident => $ty:ty;)*) => {
        $(
            $(#[$doc])*
            ///
            /// A leading `-` is not consumed; the scan reports it as an unexpected byte.
            ///
            /// # Errors
            ///
            /// Returns a parse error at the first offending byte, or `NumberOverflow` if the
            /// literal does not fit.
            #[inline]
            pub fn $decode(&mut self) -> Result<$ty, JsonError> {
                let begin = self.cursor;
                let v = self.decode_unsigned(<$ty>::MAX.into())?;
                <$ty>::try_from(v).map_err(|_| JsonError::overflow(begin))
            }

            /// Decode and discard a value of the same type, with identical validation.
            ///
            /// # Errors
            ///
            /// Same as the matching decode call.
            #[inline]
            pub fn $skip(&mut self) -> Result<(), JsonError> {
                self.$decode().map(|_| ())
            }
        )*
    };
}

impl<'de> Decoder<'de> {
    /// Construct a decoder with default limits.
    #[must_use]
    pub fn new(bytes: &'de [u8], mode: StringMode) -> Self {
        Self {
            data: bytes,
            cursor: 0,
            mode,
            limits: DecodeLimits::default(),
            scratch: Vec::new(),
        }
    }

    /// Construct a decoder with explicit limits.
    ///
    /// # Errors
    ///
    /// Returns `MessageLenLimitExceeded` if `bytes` exceeds the input limit.
    pub fn with_limits(
        bytes: &'de [u8],
        mode: StringMode,
        limits: DecodeLimits,
    ) -> Result<Self, JsonError> {
        if bytes.len() > limits.max_input_bytes {
            return Err(JsonError::new(ErrorCode::MessageLenLimitExceeded, 0));
        }
        Ok(Self::from_parts(bytes, mode, limits, Vec::new()))
    }

    /// Assemble a decoder whose input length the caller has already checked.
    pub(crate) fn from_parts(
        bytes: &'de [u8],
        mode: StringMode,
        limits: DecodeLimits,
        mut scratch: Vec<u8>,
    ) -> Self {
        scratch.clear();
        Self {
            data: bytes,
            cursor: 0,
            mode,
            limits,
            scratch,
        }
    }

    pub(crate) fn into_scratch(self) -> Vec<u8> {
        self.scratch
    }

    /// Rebind the decoder to a new input, rewinding the cursor.
    ///
    /// # Errors
    ///
    /// Returns `MessageLenLimitExceeded` if `bytes` exceeds the input limit.
    pub fn reset(&mut self, bytes: &'de [u8]) -> Result<(), JsonError> {
        if bytes.len() > self.limits.max_input_bytes {
            return Err(JsonError::new(ErrorCode::MessageLenLimitExceeded, 0));
        }
        self.data = bytes;
        self.cursor = 0;
        self.scratch.clear();
        Ok(())
    }

    /// The input buffer.
    #[inline]
    #[must_use]
    pub const fn data(&self) -> &'de [u8] {
        self.data
    }

    /// Current byte offset.
    #[inline]
    #[must_use]
    pub const fn position(&self) -> usize {
        self.cursor
    }

    /// The byte at the cursor, or `None` at end of input.
    #[inline]
    #[must_use]
    pub fn current_byte(&self) -> Option<u8> {
        self.data.get(self.cursor).copied()
    }

    /// Unconsumed input.
    #[inline]
    #[must_use]
    pub fn remaining(&self) -> &'de [u8] {
        &self.data[self.cursor..]
    }

    /// Returns `true` once every byte has been consumed.
    #[inline]
    #[must_use]
    pub const fn is_eof(&self) -> bool {
        self.cursor >= self.data.len()
    }

    /// The string ownership mode of this session.
    #[inline]
    #[must_use]
    pub const fn mode(&self) -> StringMode {
        self.mode
    }

    /// An error for the byte at the cursor (end-of-input if exhausted).
    #[inline]
    #[must_use]
    pub fn error_here(&self) -> JsonError {
        JsonError::unexpected(self.data, self.cursor)
    }

    #[inline]
    fn skip_insignificant(&mut self) {
        while self.cursor < self.data.len() && is_whitespace_or_separator(self.data[self.cursor]) {
            self.cursor += 1;
        }
    }

    /// Return the next significant byte without consuming it.
    ///
    /// Insignificant bytes (whitespace and `,`) before it are consumed.
    #[inline]
    pub fn next_char(&mut self) -> Option<u8> {
        self.skip_insignificant();
        self.current_byte()
    }

    /// Require `byte` as the next significant byte and consume it.
    ///
    /// # Errors
    ///
    /// Returns a parse error at the offending byte.
    #[inline]
    pub fn expect(&mut self, byte: u8) -> Result<(), JsonError> {
        if self.next_char() == Some(byte) {
            self.cursor += 1;
            Ok(())
        } else {
            Err(self.error_here())
        }
    }

    /// After the top-level value, require that only insignificant bytes remain.
    ///
    /// # Errors
    ///
    /// Returns `TrailingBytes` at the first remaining significant byte.
    pub fn finish(&mut self) -> Result<(), JsonError> {
        self.skip_insignificant();
        if self.is_eof() {
            Ok(())
        } else {
            Err(JsonError::at(
                ErrorCode::TrailingBytes,
                self.data,
                self.cursor,
            ))
        }
    }

    #[inline]
    fn probe(&mut self, byte: u8) -> bool {
        if self.next_char() == Some(byte) {
            self.cursor += 1;
            true
        } else {
            false
        }
    }

    /// Consume `[` if it is the next significant byte.
    #[inline]
    pub fn is_array_open(&mut self) -> bool {
        self.probe(b'[')
    }

    /// Consume `]` if it is the next significant byte.
    #[inline]
    pub fn is_array_close(&mut self) -> bool {
        self.probe(b']')
    }

    /// Consume `{` if it is the next significant byte.
    #[inline]
    pub fn is_object_open(&mut self) -> bool {
        self.probe(b'{')
    }

    /// Consume `}` if it is the next significant byte.
    #[inline]
    pub fn is_object_close(&mut self) -> bool {
        self.probe(b'}')
    }

    /// Consume a `null` literal if the next significant bytes spell it.
    #[inline]
    pub fn is_null(&mut self) -> bool {
        if self.next_char() == Some(b'n') && self.data[self.cursor..].starts_with(b"null") {
            self.cursor += 4;
            true
        } else {
            false
        }
    }

    /// Consume a `null` literal.
    ///
    /// # Errors
    ///
    /// Returns a parse error at the first byte that does not match.
    pub fn assert_null(&mut self) -> Result<(), JsonError> {
        self.skip_insignificant();
        self.literal(b"null")
    }

    pub(crate) fn literal(&mut self, lit: &[u8]) -> Result<(), JsonError> {
        for (i, &want) in lit.iter().enumerate() {
            let at = self.cursor + i;
            match self.data.get(at) {
                Some(&b) if b == want => {}
                Some(_) => return Err(JsonError::at(ErrorCode::UnexpectedByte, self.data, at)),
                None => return Err(JsonError::eof(self.data)),
            }
        }
        self.cursor += lit.len();
        Ok(())
    }

    /// Consume an object key and the following `:`, returning the unescaped key.
    ///
    /// # Errors
    ///
    /// Returns a parse error if the opening `"` or the `:` is missing.
    pub fn next_key(&mut self) -> Result<Cow<'de, str>, JsonError> {
        if self.next_char() != Some(b'"') {
            return Err(self.error_here());
        }
        let key = self.string_content()?;
        while self.cursor < self.data.len() && is_whitespace(self.data[self.cursor]) {
            self.cursor += 1;
        }
        if self.current_byte() != Some(b':') {
            return Err(self.error_here());
        }
        self.cursor += 1;
        Ok(key)
    }

    // Integers

    /// Scan an integer token from the cursor, stopping at `. ] } ,` or end of input.
    ///
    /// Whitespace after the digits is consumed; a digit after that whitespace, or any other
    /// byte, is reported at its own offset. Returns the digit span start and end.
    fn scan_integer(&mut self) -> Result<(usize, usize), JsonError> {
        let begin = self.cursor;
        let mut end = begin;
        while self.cursor < self.data.len() {
            let b = self.data[self.cursor];
            if is_structural_stop(b) {
                break;
            } else if is_whitespace(b) {
                self.cursor += 1;
                continue;
            } else if !is_digit(b) || end != self.cursor {
                return Err(JsonError::at(
                    ErrorCode::UnexpectedByte,
                    self.data,
                    self.cursor,
                ));
            }
            self.cursor += 1;
            end = self.cursor;
        }
        if begin == end {
            return Err(self.empty_number(begin));
        }
        Ok((begin, end))
    }

    fn empty_number(&self, begin: usize) -> JsonError {
        if begin >= self.data.len() {
            JsonError::eof(self.data)
        } else {
            JsonError::at(ErrorCode::InvalidNumber, self.data, begin)
        }
    }

    fn decode_signed(&mut self, max: u64) -> Result<i64, JsonError> {
        let mut negative = false;
        match self.next_char() {
            Some(b'n') => return self.assert_null().map(|()| 0),
            Some(b'-') => {
                negative = true;
                self.cursor += 1;
            }
            _ => {}
        }
        let (begin, end) = self.scan_integer()?;
        number::parse_signed(&self.data[begin..end], begin, max, negative)
    }

    fn decode_unsigned(&mut self, max: u64) -> Result<u64, JsonError> {
        if self.is_null() {
            return Ok(0);
        }
        let (begin, end) = self.scan_integer()?;
        number::parse_unsigned(&self.data[begin..end], begin, max)
    }

    signed_decoders! {
        /// Decode an `i8`.
        decode_i8, skip_i8 => i8;
        /// Decode an `i16`.
        decode_i16, skip_i16 => i16;
        /// Decode an `i32`.
        decode_i32, skip_i32 => i32;
        /// Decode an `i64`.
        decode_i64, skip_i64 => i64;
    }

    unsigned_decoders! {
        /// Decode a `u8`.
        decode_u8, skip_u8 => u8;
        /// Decode a `u16`.
        decode_u16, skip_u16 => u16;
        /// Decode a `u32`.
        decode_u32, skip_u32 => u32;
        /// Decode a `u64`.
        decode_u64, skip_u64 => u64;
    }

    /// Decode a platform-width signed integer through the 64-bit path.
    ///
    /// # Errors
    ///
    /// As [`Self::decode_i64`], plus `NumberOverflow` if the value does not fit `isize`.
    pub fn decode_isize(&mut self) -> Result<isize, JsonError> {
        self.next_char();
        let begin = self.cursor;
        let v = self.decode_i64()?;
        isize::try_from(v).map_err(|_| JsonError::overflow(begin))
    }

    /// Decode a platform-width unsigned integer through the 64-bit path.
    ///
    /// # Errors
    ///
    /// As [`Self::decode_u64`], plus `NumberOverflow` if the value does not fit `usize`.
    pub fn decode_usize(&mut self) -> Result<usize, JsonError> {
        self.next_char();
        let begin = self.cursor;
        let v = self.decode_u64()?;
        usize::try_from(v).map_err(|_| JsonError::overflow(begin))
    }

    /// Decode and discard an `isize`.
    ///
    /// # Errors
    ///
    /// Same as [`Self::decode_isize`].
    pub fn skip_isize(&mut self) -> Result<(), JsonError> {
        self.decode_isize().map(|_| ())
    }

    /// Decode and discard a `usize`.
    ///
    /// # Errors
    ///
    /// Same as [`Self::decode_usize`].
    pub fn skip_usize(&mut self) -> Result<(), JsonError> {
        self.decode_usize().map(|_| ())
    }

    // Floats and booleans

    /// Scan a float token: `[0-9.eE+-]*` ending at `] } ,`, whitespace or end of input.
    fn scan_float(&mut self) -> Result<(usize, usize), JsonError> {
        let begin = self.cursor;
        while self.cursor < self.data.len() {
            let b = self.data[self.cursor];
            if matches!(b, b']' | b'}' | b',') || is_whitespace(b) {
                break;
            } else if !is_float_byte(b) {
                return Err(JsonError::at(
                    ErrorCode::UnexpectedByte,
                    self.data,
                    self.cursor,
                ));
            }
            self.cursor += 1;
        }
        if begin == self.cursor {
            return Err(self.empty_number(begin));
        }
        Ok((begin, self.cursor))
    }

    fn float_prefix(&mut self) -> Option<bool> {
        match self.next_char() {
            Some(b'n') => None,
            Some(b'-') => {
                self.cursor += 1;
                Some(true)
            }
            _ => Some(false),
        }
    }

    /// Decode an `f64`.
    ///
    /// # Errors
    ///
    /// Returns a parse error at the first byte breaking the number grammar, or `NumberOverflow`
    /// if the value is not finite.
    pub fn decode_f64(&mut self) -> Result<f64, JsonError> {
        let Some(negative) = self.float_prefix() else {
            return self.assert_null().map(|()| 0.0);
        };
        let (begin, end) = self.scan_float()?;
        number::parse_f64(&self.data[begin..end], begin, negative)
    }

    /// Decode an `f32`.
    ///
    /// # Errors
    ///
    /// Returns a parse error at the first byte breaking the number grammar, or `NumberOverflow`
    /// if the value is not finite as `f32`.
    pub fn decode_f32(&mut self) -> Result<f32, JsonError> {
        let Some(negative) = self.float_prefix() else {
            return self.assert_null().map(|()| 0.0);
        };
        let (begin, end) = self.scan_float()?;
        number::parse_f32(&self.data[begin..end], begin, negative)
    }

    /// Decode a boolean.
    ///
    /// # Errors
    ///
    /// Returns a parse error at the first byte that does not match `true`, `false` or `null`.
    pub fn decode_bool(&mut self) -> Result<bool, JsonError> {
        match self.next_char() {
            Some(b'n') => self.literal(b"null").map(|()| false),
            Some(b't') => self.literal(b"true").map(|()| true),
            Some(b'f') => self.literal(b"false").map(|()| false),
            _ => Err(self.error_here()),
        }
    }

    // Strings

    /// Consume a string whose opening quote is at the cursor and return its content.
    fn string_content(&mut self) -> Result<Cow<'de, str>, JsonError> {
        let start = self.cursor + 1;
        let (end, escaped) = find_string_end(self.data, start)?;
        self.cursor = end + 1;
        if !escaped {
            let s = utf8::validate(&self.data[start..end], start)?;
            return Ok(match self.mode {
                StringMode::Borrow => Cow::Borrowed(s),
                StringMode::Copy => Cow::Owned(try_string_from_str(s, start)?),
            });
        }
        // Escapes are ASCII, so the raw span locates bad UTF-8 in input coordinates.
        utf8::validate(&self.data[start..end], start)?;
        self.scratch.clear();
        unescape_into(self.data, start, end, &mut self.scratch)?;
        let s = utf8::validate(&self.scratch, start)?;
        Ok(Cow::Owned(try_string_from_str(s, start)?))
    }

    /// Decode a string, honouring the session's [`StringMode`].
    ///
    /// In [`StringMode::Borrow`] a string without escapes borrows the input. `null` yields an
    /// empty string.
    ///
    /// # Errors
    ///
    /// Returns a parse error if the next value is not a string, is unterminated, or contains an
    /// invalid escape or invalid UTF-8.
    pub fn decode_str(&mut self) -> Result<Cow<'de, str>, JsonError> {
        match self.next_char() {
            Some(b'"') => self.string_content(),
            Some(b'n') => self.literal(b"null").map(|()| Cow::Borrowed("")),
            _ => Err(self.error_here()),
        }
    }

    /// Decode a string into owned memory regardless of mode.
    ///
    /// # Errors
    ///
    /// Same as [`Self::decode_str`].
    pub fn decode_string(&mut self) -> Result<String, JsonError> {
        self.decode_str().map(Cow::into_owned)
    }

    /// Return the raw bytes of the next string, quotes and escapes included.
    ///
    /// `null` yields an empty slice.
    ///
    /// # Errors
    ///
    /// Returns a parse error if the next value is not a string or is unterminated.
    pub fn read_string(&mut self) -> Result<&'de [u8], JsonError> {
        match self.next_char() {
            Some(b'"') => {
                let start = self.cursor;
                let (end, _) = find_string_end(self.data, start + 1)?;
                self.cursor = end + 1;
                Ok(&self.data[start..=end])
            }
            Some(b'n') => self.literal(b"null").map(|()| &[][..]),
            _ => Err(self.error_here()),
        }
    }
}
