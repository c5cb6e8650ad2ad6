//! Byte predicates used by every scan loop.

/// Insignificant bytes: JSON whitespace plus `,`.
///
/// Treating the comma as noise lets callers probe for the next value without first consuming the
/// separator. This is deliberately more lenient than strict JSON.
#[inline(always)]
#[must_use]
pub const fn is_whitespace_or_separator(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r' | b',')
}

/// JSON whitespace only.
#[inline(always)]
#[must_use]
pub const fn is_whitespace(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r')
}

/// ASCII decimal digit.
#[inline(always)]
#[must_use]
pub const fn is_digit(b: u8) -> bool {
    b.wrapping_sub(b'0') < 10
}

/// Bytes that end a bare integer token: `.`, `]`, `}` and `,`.
#[inline(always)]
#[must_use]
pub const fn is_structural_stop(b: u8) -> bool {
    matches!(b, b'.' | b']' | b'}' | b',')
}

/// Bytes that may appear in a float literal after the optional sign.
#[inline(always)]
pub(crate) const fn is_float_byte(b: u8) -> bool {
    is_digit(b) || matches!(b, b'.' | b'e' | b'E' | b'+' | b'-')
}
