use alloc::vec::Vec;

use crate::alloc_util::try_reserve;
use crate::{ErrorCode, JsonError};

/// Escape class per byte: `0` means "write verbatim", `b'u'` means `\u00XX`, anything else is the
/// character following the backslash.
pub(crate) const ESCAPE: [u8; 256] = {
    let mut table = [0u8; 256];
    let mut i = 0;
    while i < 0x20 {
        table[i] = b'u';
        i += 1;
    }
    table[0x08] = b'b';
    table[0x09] = b't';
    table[0x0a] = b'n';
    table[0x0c] = b'f';
    table[0x0d] = b'r';
    table[b'"' as usize] = b'"';
    table[b'\\' as usize] = b'\\';
    table
};

pub(crate) const HEX: &[u8; 16] = b"0123456789abcdef";

/// Locate the closing quote of a string whose content starts at `start`.
///
/// Returns `(end, escaped)`: `end` indexes the closing `"` and `escaped` reports whether any
/// backslash was seen. A quote preceded by an odd run of backslashes does not terminate.
#[inline]
pub fn find_string_end(data: &[u8], start: usize) -> Result<(usize, bool), JsonError> {
    let mut i = start;
    let mut escaped = false;
    while i < data.len() {
        match data[i] {
            b'"' => return Ok((i, escaped)),
            b'\\' => {
                escaped = true;
                i += 2;
            }
            _ => i += 1,
        }
    }
    Err(JsonError::eof(data))
}

/// Decode the escaped string content `data[start..end]` into `out`.
///
/// Offsets in errors are input offsets.
pub fn unescape_into(
    data: &[u8],
    start: usize,
    end: usize,
    out: &mut Vec<u8>,
) -> Result<(), JsonError> {
    try_reserve(out, end - start, start)?;
    let mut i = start;
    while i < end {
        let run = i;
        while i < end && data[i] != b'\\' {
            i += 1;
        }
        out.extend_from_slice(&data[run..i]);
        if i == end {
            break;
        }
        // data[i] is a backslash; find_string_end guarantees a following byte before `end`.
        let esc = i + 1;
        let b = *data
            .get(esc)
            .filter(|_| esc < end)
            .ok_or_else(|| JsonError::at(ErrorCode::InvalidEscape, data, i))?;
        i = esc + 1;
        let decoded = match b {
            b'"' => b'"',
            b'\\' => b'\\',
            b'/' => b'/',
            b'b' => 0x08,
            b'f' => 0x0c,
            b'n' => b'\n',
            b'r' => b'\r',
            b't' => b'\t',
            b'u' => {
                let (c, next) = decode_unicode_escape(data, i, end)?;
                i = next;
                let mut buf = [0u8; 4];
                out.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
                continue;
            }
            _ => return Err(JsonError::at(ErrorCode::InvalidEscape, data, esc)),
        };
        out.push(decoded);
    }
    Ok(())
}

/// Decode the hex digits of a `\u` escape starting at `at`, combining surrogate pairs.
fn decode_unicode_escape(data: &[u8], at: usize, end: usize) -> Result<(char, usize), JsonError> {
    let hi = read_hex4(data, at, end)?;
    let mut next = at + 4;
    let code = if (0xd800..0xdc00).contains(&hi) {
        if data.get(next) != Some(&b'\\') || data.get(next + 1) != Some(&b'u') || next + 2 > end {
            return Err(JsonError::at(ErrorCode::InvalidEscape, data, next));
        }
        let lo = read_hex4(data, next + 2, end)?;
        if !(0xdc00..0xe000).contains(&lo) {
            return Err(JsonError::at(ErrorCode::InvalidEscape, data, next + 2));
        }
        next += 6;
        0x10000 + ((hi - 0xd800) << 10) + (lo - 0xdc00)
    } else {
        hi
    };
    let c = char::from_u32(code).ok_or_else(|| JsonError::at(ErrorCode::InvalidEscape, data, at))?;
    Ok((c, next))
}

fn read_hex4(data: &[u8], at: usize, end: usize) -> Result<u32, JsonError> {
    if at + 4 > end {
        return Err(JsonError::at(ErrorCode::InvalidEscape, data, at.min(end)));
    }
    let mut v = 0u32;
    for (k, &b) in data[at..at + 4].iter().enumerate() {
        let d = match b {
            b'0'..=b'9' => b - b'0',
            b'a'..=b'f' => b - b'a' + 10,
            b'A'..=b'F' => b - b'A' + 10,
            _ => return Err(JsonError::at(ErrorCode::InvalidEscape, data, at + k)),
        };
        v = (v << 4) | u32::from(d);
    }
    Ok(v)
}
