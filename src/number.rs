//! Conversion of validated digit spans into fixed-width numbers.
//!
//! Callers strip the sign and locate the span; `begin` is the span's offset in the original input
//! and is used for error positions.

use crate::classify::is_digit;
use crate::{ErrorCode, JsonError};

/// Accumulate `span` as a decimal magnitude no larger than `max`.
///
/// The bound is checked after every digit, so accumulation never wraps.
///
/// # Errors
///
/// - `InvalidNumber` at `begin` if the span is empty.
/// - `UnexpectedByte` at the first non-digit.
/// - `NumberOverflow` at `begin` if the magnitude exceeds `max`.
#[inline]
pub fn parse_magnitude(span: &[u8], begin: usize, max: u64) -> Result<u64, JsonError> {
    if span.is_empty() {
        return Err(JsonError::new(ErrorCode::InvalidNumber, begin));
    }
    let mut acc: u64 = 0;
    for (i, &b) in span.iter().enumerate() {
        if !is_digit(b) {
            return Err(JsonError::at(ErrorCode::UnexpectedByte, span, i).offset_by(begin));
        }
        acc = acc
            .checked_mul(10)
            .and_then(|v| v.checked_add(u64::from(b - b'0')))
            .filter(|v| *v <= max)
            .ok_or_else(|| JsonError::overflow(begin))?;
    }
    Ok(acc)
}

/// Convert a digit span into an unsigned value bounded by `max`.
///
/// # Errors
///
/// See [`parse_magnitude`].
#[inline]
pub fn parse_unsigned(span: &[u8], begin: usize, max: u64) -> Result<u64, JsonError> {
    parse_magnitude(span, begin, max)
}

/// Convert a digit span into a signed value bounded by `max`, then apply the sign.
///
/// A negative literal may reach `max + 1`, the magnitude of the type's minimum. Negation is
/// applied unconditionally when `negative` is set, including for zero.
///
/// # Errors
///
/// See [`parse_magnitude`].
#[inline]
pub fn parse_signed(span: &[u8], begin: usize, max: u64, negative: bool) -> Result<i64, JsonError> {
    let limit = if negative { max + 1 } else { max };
    let mag = parse_magnitude(span, begin, limit)?;
    // `limit` never exceeds 2^63, so the cast only reaches i64::MIN for the i64 minimum itself,
    // where wrapping negation is the identity.
    #[allow(clippy::cast_possible_wrap)]
    let v = mag as i64;
    Ok(if negative { v.wrapping_neg() } else { v })
}

/// Validate a float literal (`int [frac] [exp]`, sign already stripped) and return its length.
///
/// # Errors
///
/// `InvalidNumber` at `begin` for an empty span, `UnexpectedByte` at the first byte that breaks the
/// grammar, or `InvalidNumber` just past the span when a fraction or exponent has no digits.
pub fn validate_float(span: &[u8], begin: usize) -> Result<(), JsonError> {
    if span.is_empty() {
        return Err(JsonError::new(ErrorCode::InvalidNumber, begin));
    }
    let mut i = digits(span, 0);
    if i == 0 {
        return Err(bad_byte(span, begin, 0));
    }
    if span.get(i) == Some(&b'.') {
        let end = digits(span, i + 1);
        if end == i + 1 {
            return Err(bad_byte(span, begin, end));
        }
        i = end;
    }
    if matches!(span.get(i), Some(b'e' | b'E')) {
        i += 1;
        if matches!(span.get(i), Some(b'+' | b'-')) {
            i += 1;
        }
        let end = digits(span, i);
        if end == i {
            return Err(bad_byte(span, begin, end));
        }
        i = end;
    }
    if i != span.len() {
        return Err(bad_byte(span, begin, i));
    }
    Ok(())
}

/// Convert a float span (sign already stripped) into an `f64`.
///
/// # Errors
///
/// Grammar errors as [`validate_float`]; `NumberOverflow` if the value is not finite.
pub fn parse_f64(span: &[u8], begin: usize, negative: bool) -> Result<f64, JsonError> {
    validate_float(span, begin)?;
    let v: f64 = ascii(span, begin)?
        .parse()
        .map_err(|_| JsonError::new(ErrorCode::InvalidNumber, begin))?;
    if !v.is_finite() {
        return Err(JsonError::overflow(begin));
    }
    Ok(if negative { -v } else { v })
}

/// Convert a float span (sign already stripped) into an `f32`, rounding once from the decimal text.
///
/// # Errors
///
/// Grammar errors as [`validate_float`]; `NumberOverflow` if the value is not finite as `f32`.
pub fn parse_f32(span: &[u8], begin: usize, negative: bool) -> Result<f32, JsonError> {
    validate_float(span, begin)?;
    let v: f32 = ascii(span, begin)?
        .parse()
        .map_err(|_| JsonError::new(ErrorCode::InvalidNumber, begin))?;
    if !v.is_finite() {
        return Err(JsonError::overflow(begin));
    }
    Ok(if negative { -v } else { v })
}

#[inline]
fn digits(span: &[u8], from: usize) -> usize {
    let mut i = from;
    while i < span.len() && is_digit(span[i]) {
        i += 1;
    }
    i
}

fn bad_byte(span: &[u8], begin: usize, i: usize) -> JsonError {
    if i >= span.len() {
        JsonError::new(ErrorCode::InvalidNumber, begin + span.len())
    } else {
        JsonError::at(ErrorCode::UnexpectedByte, span, i).offset_by(begin)
    }
}

fn ascii(span: &[u8], begin: usize) -> Result<&str, JsonError> {
    core::str::from_utf8(span).map_err(|_| JsonError::new(ErrorCode::InvalidNumber, begin))
}

impl JsonError {
    /// Shift a span-relative offset into input coordinates.
    #[inline]
    pub(crate) const fn offset_by(mut self, base: usize) -> Self {
        self.offset += base;
        self
    }
}
