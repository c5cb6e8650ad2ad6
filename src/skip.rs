use alloc::vec::Vec;

use crate::alloc_util::try_reserve;
use crate::classify::{is_float_byte, is_whitespace};
use crate::escape::find_string_end;
use crate::value::RawValue;
use crate::{Decoder, ErrorCode, JsonError};

const INLINE_DEPTH: usize = 64;

/// Open-bracket stack: inline for shallow documents, spilling to the heap past `N`.
struct SmallStack<const N: usize> {
    inline: [u8; N],
    len: usize,
    overflow: Vec<u8>,
}

impl<const N: usize> SmallStack<N> {
    const fn new() -> Self {
        Self {
            inline: [0; N],
            len: 0,
            overflow: Vec::new(),
        }
    }

    fn depth(&self) -> usize {
        self.len + self.overflow.len()
    }

    fn push(&mut self, value: u8, off: usize) -> Result<(), JsonError> {
        if self.len < N {
            self.inline[self.len] = value;
            self.len += 1;
            return Ok(());
        }
        try_reserve(&mut self.overflow, 1, off)?;
        self.overflow.push(value);
        Ok(())
    }

    fn pop(&mut self) -> Option<u8> {
        if let Some(v) = self.overflow.pop() {
            return Some(v);
        }
        if self.len == 0 {
            None
        } else {
            self.len -= 1;
            Some(self.inline[self.len])
        }
    }
}

impl<'de> Decoder<'de> {
    /// Advance past the string whose opening quote is the next significant byte.
    ///
    /// Nothing is allocated or unescaped.
    ///
    /// # Errors
    ///
    /// Returns a parse error if the next value is not a string, or end-of-input if it is
    /// unterminated.
    pub fn skip_string(&mut self) -> Result<(), JsonError> {
        if self.next_char() != Some(b'"') {
            return Err(self.error_here());
        }
        let (end, _) = find_string_end(self.data, self.cursor + 1)?;
        self.cursor = end + 1;
        Ok(())
    }

    /// Advance past one value of any shape.
    ///
    /// Containers are balanced by bracket type; brackets inside string literals are ignored.
    /// Nested literals and numbers are checked like top-level ones, but the placement of `:` and
    /// `,` is not validated.
    ///
    /// # Errors
    ///
    /// Returns a parse error for mismatched brackets or unexpected bytes, end-of-input for an
    /// unterminated value, or `DepthLimitExceeded` past the configured depth.
    pub fn skip_value(&mut self) -> Result<(), JsonError> {
        match self.next_char() {
            Some(b'"') => self.skip_string(),
            Some(b'{' | b'[') => self.skip_container(),
            Some(b'n') => self.literal(b"null"),
            Some(b't') => self.literal(b"true"),
            Some(b'f') => self.literal(b"false"),
            Some(b'-' | b'0'..=b'9') => self.skip_number(),
            _ => Err(self.error_here()),
        }
    }

    fn skip_number(&mut self) -> Result<(), JsonError> {
        let begin = self.cursor;
        if self.current_byte() == Some(b'-') {
            self.cursor += 1;
        }
        while let Some(b) = self.current_byte() {
            if matches!(b, b']' | b'}' | b',' | b':') || is_whitespace(b) {
                break;
            }
            if !is_float_byte(b) {
                return Err(self.error_here());
            }
            self.cursor += 1;
        }
        let negative = self.data.get(begin) == Some(&b'-');
        let span_start = begin + usize::from(negative);
        crate::number::validate_float(&self.data[span_start..self.cursor], span_start)
            .map_err(|e| self.with_byte(e))
    }

    fn skip_container(&mut self) -> Result<(), JsonError> {
        let mut stack = SmallStack::<INLINE_DEPTH>::new();
        let data = self.data;
        let mut pos = self.cursor;
        while pos < data.len() {
            let b = data[pos];
            match b {
                b'"' => {
                    let (end, _) = find_string_end(data, pos + 1)?;
                    pos = end + 1;
                    continue;
                }
                b'{' | b'[' => {
                    if stack.depth() >= self.limits.max_depth {
                        return Err(JsonError::at(ErrorCode::DepthLimitExceeded, data, pos));
                    }
                    stack.push(if b == b'{' { b'}' } else { b']' }, pos)?;
                }
                b'}' | b']' => {
                    if stack.pop() != Some(b) {
                        return Err(JsonError::at(ErrorCode::UnexpectedByte, data, pos));
                    }
                    if stack.depth() == 0 {
                        self.cursor = pos + 1;
                        return Ok(());
                    }
                }
                b'n' | b't' | b'f' | b'-' | b'0'..=b'9' => {
                    self.cursor = pos;
                    match b {
                        b'n' => self.literal(b"null")?,
                        b't' => self.literal(b"true")?,
                        b'f' => self.literal(b"false")?,
                        _ => self.skip_number()?,
                    }
                    pos = self.cursor;
                    continue;
                }
                b':' | b',' => {}
                _ if is_whitespace(b) => {}
                _ => return Err(JsonError::at(ErrorCode::UnexpectedByte, data, pos)),
            }
            pos += 1;
        }
        Err(JsonError::eof(data))
    }

    fn with_byte(&self, mut e: JsonError) -> JsonError {
        if e.byte.is_none() {
            e.byte = self.data.get(e.offset).copied();
        }
        e
    }

    /// Capture the exact bytes of the next value without decoding it.
    ///
    /// Leading insignificant bytes are not part of the capture.
    ///
    /// # Errors
    ///
    /// Same as [`Self::skip_value`].
    pub fn read_value(&mut self) -> Result<RawValue<'de>, JsonError> {
        self.next_char();
        let start = self.cursor;
        self.skip_value()?;
        Ok(RawValue::new(&self.data[start..self.cursor]))
    }
}
