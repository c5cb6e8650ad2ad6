use alloc::borrow::Cow;
use alloc::string::String;
use alloc::vec::Vec;

use crate::classify::is_whitespace;
use crate::{number, Decoder, ErrorCode, JsonError};

/// A JSON number as decoded, keeping integer precision where the literal allows it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    /// Non-negative integer.
    PosInt(u64),
    /// Negative integer.
    NegInt(i64),
    /// Fractional or exponent form, or an integer beyond the 64-bit range.
    Float(f64),
}

impl Number {
    /// The value as `i64` if it is an integer in range.
    #[must_use]
    pub fn as_i64(self) -> Option<i64> {
        match self {
            Self::PosInt(v) => i64::try_from(v).ok(),
            Self::NegInt(v) => Some(v),
            Self::Float(_) => None,
        }
    }

    /// The value as `u64` if it is a non-negative integer.
    #[must_use]
    pub const fn as_u64(self) -> Option<u64> {
        match self {
            Self::PosInt(v) => Some(v),
            _ => None,
        }
    }

    /// The value as `f64`, possibly losing integer precision.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub const fn as_f64(self) -> f64 {
        match self {
            Self::PosInt(v) => v as f64,
            Self::NegInt(v) => v as f64,
            Self::Float(v) => v,
        }
    }
}

/// Object members in document order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Map(pub Vec<(String, Value)>);

impl Map {
    /// An empty map.
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Number of members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if there are no members.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The value of the first member named `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Append a member.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        self.0.push((key.into(), value));
    }

    /// Iterate members in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// A JSON value whose shape is only known at runtime.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// `null`.
    #[default]
    Null,
    /// `true` / `false`.
    Bool(bool),
    /// Any number.
    Number(Number),
    /// A string.
    String(String),
    /// An array.
    Array(Vec<Value>),
    /// An object.
    Object(Map),
}

impl Value {
    /// Returns `true` for `null`.
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Borrow the string content, if this is a string.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Member lookup on objects.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Self> {
        match self {
            Self::Object(m) => m.get(key),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        u64::try_from(v).map_or(Self::Number(Number::NegInt(v)), |u| {
            Self::Number(Number::PosInt(u))
        })
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Self::Number(Number::PosInt(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Number(Number::Float(v))
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::String(v.into())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Self::Array(v)
    }
}

impl From<Map> for Value {
    fn from(v: Map) -> Self {
        Self::Object(v)
    }
}

/// The exact bytes of one JSON value, borrowed from the input.
///
/// Produced by [`Decoder::read_value`] for handing a sub-document to another decoder, and spliced
/// back verbatim by the encoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawValue<'de> {
    bytes: &'de [u8],
}

impl<'de> RawValue<'de> {
    #[inline]
    pub(crate) const fn new(bytes: &'de [u8]) -> Self {
        Self { bytes }
    }

    /// The raw bytes.
    #[inline]
    #[must_use]
    pub const fn as_bytes(self) -> &'de [u8] {
        self.bytes
    }

    /// Length in bytes.
    #[inline]
    #[must_use]
    pub const fn len(self) -> usize {
        self.bytes.len()
    }

    /// Returns `true` iff no bytes were captured.
    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.bytes.is_empty()
    }
}

impl<'de> Decoder<'de> {
    /// Decode the next value of unknown shape into a [`Value`].
    ///
    /// # Errors
    ///
    /// Returns a parse error for malformed input, or `DepthLimitExceeded` if nesting exceeds the
    /// configured limit.
    pub fn decode_value(&mut self) -> Result<Value, JsonError> {
        self.decode_value_at(0)
    }

    fn decode_value_at(&mut self, depth: usize) -> Result<Value, JsonError> {
        match self.next_char() {
            Some(b'n') => self.literal(b"null").map(|()| Value::Null),
            Some(b't') => self.literal(b"true").map(|()| Value::Bool(true)),
            Some(b'f') => self.literal(b"false").map(|()| Value::Bool(false)),
            Some(b'"') => self.decode_str().map(|s| Value::String(Cow::into_owned(s))),
            Some(b'-' | b'0'..=b'9') => self.decode_number().map(Value::Number),
            Some(b'[') => {
                self.enter(depth)?;
                self.cursor += 1;
                let mut items = Vec::new();
                while !self.is_array_close() {
                    if self.is_eof() {
                        return Err(JsonError::eof(self.data));
                    }
                    items.push(self.decode_value_at(depth + 1)?);
                }
                Ok(Value::Array(items))
            }
            Some(b'{') => {
                self.enter(depth)?;
                self.cursor += 1;
                let mut map = Map::new();
                while !self.is_object_close() {
                    if self.is_eof() {
                        return Err(JsonError::eof(self.data));
                    }
                    let key = self.next_key()?.into_owned();
                    let value = self.decode_value_at(depth + 1)?;
                    map.0.push((key, value));
                }
                Ok(Value::Object(map))
            }
            _ => Err(self.error_here()),
        }
    }

    fn enter(&self, depth: usize) -> Result<(), JsonError> {
        if depth >= self.limits.max_depth {
            return Err(JsonError::at(
                ErrorCode::DepthLimitExceeded,
                self.data,
                self.cursor,
            ));
        }
        Ok(())
    }

    /// Decode a number of unknown kind, preferring exact integers.
    ///
    /// # Errors
    ///
    /// Returns a parse error at the first byte breaking the number grammar.
    pub fn decode_number(&mut self) -> Result<Number, JsonError> {
        self.next_char();
        let start = self.cursor;
        let negative = self.current_byte() == Some(b'-');
        let begin = start + usize::from(negative);
        let mut end = begin;
        let mut integral = true;
        while let Some(&b) = self.data.get(end) {
            match b {
                b'0'..=b'9' => {}
                b'.' | b'e' | b'E' | b'+' | b'-' => integral = false,
                _ => break,
            }
            end += 1;
        }
        let span = &self.data[begin..end];
        if span.is_empty() {
            return Err(JsonError::unexpected(self.data, begin));
        }
        if let Some(&b) = self.data.get(end) {
            if !matches!(b, b']' | b'}' | b',' | b':') && !is_whitespace(b) {
                return Err(JsonError::at(ErrorCode::UnexpectedByte, self.data, end));
            }
        }
        self.cursor = end;
        if integral {
            let res = if negative {
                number::parse_signed(span, begin, i64::MAX.unsigned_abs(), true)
                    .map(|v| if v == 0 { Number::PosInt(0) } else { Number::NegInt(v) })
            } else {
                number::parse_unsigned(span, begin, u64::MAX).map(Number::PosInt)
            };
            match res {
                Ok(n) => return Ok(n),
                Err(e) if e.is_overflow() => {}
                Err(e) => return Err(e),
            }
        }
        number::parse_f64(span, begin, negative).map(Number::Float)
    }
}
