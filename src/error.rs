use core::fmt;

/// The high-level class of an error.
///
/// - **Parse** errors: an unexpected byte, malformed literal, bad escape or end of input.
/// - **Overflow** errors: a numeric literal that does not fit the requested type.
/// - **Limit** errors: configured decode limits were exceeded.
/// - **Encode** errors: values that cannot be written as JSON, or buffer growth failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed input.
    Parse,
    /// Numeric literal out of range for the target type.
    Overflow,
    /// Decode limit exceeded.
    Limit,
    /// Encoding failure.
    Encode,
}

/// A structured error code identifying why input was rejected.
///
/// This enum is string-free so it stays usable in `no_std` builds and cheap to return from hot loops.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorCode {
    /// A byte that is not valid at this position.
    UnexpectedByte,
    /// Input ended while a value was still open.
    UnexpectedEof,
    /// A numeric span is empty or syntactically malformed.
    InvalidNumber,
    /// A numeric literal exceeds the range of the target type.
    NumberOverflow,
    /// Unknown or truncated escape sequence inside a string.
    InvalidEscape,
    /// String content is not valid UTF-8.
    InvalidUtf8,
    /// Significant bytes remain after the top-level value.
    TrailingBytes,

    /// Nesting depth limit exceeded.
    DepthLimitExceeded,
    /// Input is longer than the configured maximum.
    MessageLenLimitExceeded,

    /// NaN and infinities have no JSON representation.
    NonFiniteFloat,
    /// Arithmetic overflow while computing a length.
    LengthOverflow,
    /// Memory allocation failed while growing a buffer.
    AllocationFailed,
}

impl ErrorCode {
    /// Classify this code.
    #[must_use]
    pub const fn kind(self) -> ErrorKind {
        match self {
            Self::NumberOverflow => ErrorKind::Overflow,
            Self::DepthLimitExceeded | Self::MessageLenLimitExceeded => ErrorKind::Limit,
            Self::NonFiniteFloat | Self::LengthOverflow | Self::AllocationFailed => {
                ErrorKind::Encode
            }
            _ => ErrorKind::Parse,
        }
    }

    const fn message(self) -> &'static str {
        match self {
            Self::UnexpectedByte => "unexpected byte",
            Self::UnexpectedEof => "unexpected end of input",
            Self::InvalidNumber => "invalid number",
            Self::NumberOverflow => "number out of range for target type",
            Self::InvalidEscape => "invalid escape sequence",
            Self::InvalidUtf8 => "string must be valid UTF-8",
            Self::TrailingBytes => "trailing bytes after top-level value",
            Self::DepthLimitExceeded => "nesting depth limit exceeded",
            Self::MessageLenLimitExceeded => "input length exceeds decode limits",
            Self::NonFiniteFloat => "non-finite float cannot be encoded",
            Self::LengthOverflow => "length overflow",
            Self::AllocationFailed => "allocation failed",
        }
    }
}

/// A positioned JSON error: a stable code, the offending byte (if any) and its byte offset.
///
/// Offsets always index the original input buffer handed to the decoder. For encode errors the
/// offset is the output length at the point of failure and `byte` is `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JsonError {
    /// The error code.
    pub code: ErrorCode,
    /// The offending byte, absent when input is exhausted or for encode errors.
    pub byte: Option<u8>,
    /// Byte offset where the error was detected.
    pub offset: usize,
}

impl JsonError {
    /// Construct an error at `offset` without an offending byte.
    #[inline]
    #[must_use]
    pub const fn new(code: ErrorCode, offset: usize) -> Self {
        Self {
            code,
            byte: None,
            offset,
        }
    }

    /// Construct an error at `offset`, capturing the byte found there in `data`.
    #[inline]
    #[must_use]
    pub fn at(code: ErrorCode, data: &[u8], offset: usize) -> Self {
        Self {
            code,
            byte: data.get(offset).copied(),
            offset,
        }
    }

    /// An unexpected byte at `offset`; degrades to end-of-input when `offset` is past the data.
    #[inline]
    #[must_use]
    pub fn unexpected(data: &[u8], offset: usize) -> Self {
        if offset >= data.len() {
            return Self::eof(data);
        }
        Self::at(ErrorCode::UnexpectedByte, data, offset)
    }

    /// Input ended early. The error references the last valid offset and its byte.
    #[inline]
    #[must_use]
    pub fn eof(data: &[u8]) -> Self {
        let offset = data.len().saturating_sub(1);
        Self::at(ErrorCode::UnexpectedEof, data, offset)
    }

    /// Construct an overflow error for a literal starting at `offset`.
    #[inline]
    #[must_use]
    pub const fn overflow(offset: usize) -> Self {
        Self::new(ErrorCode::NumberOverflow, offset)
    }

    /// The error class.
    #[inline]
    #[must_use]
    pub const fn kind(self) -> ErrorKind {
        self.code.kind()
    }

    /// Returns true iff this error reports a numeric overflow.
    #[inline]
    #[must_use]
    pub const fn is_overflow(self) -> bool {
        matches!(self.code, ErrorCode::NumberOverflow)
    }

    /// Returns true iff the input ended early.
    #[inline]
    #[must_use]
    pub const fn is_eof(self) -> bool {
        matches!(self.code, ErrorCode::UnexpectedEof)
    }
}

impl fmt::Display for JsonError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = self.code.message();
        match self.kind() {
            ErrorKind::Encode => write!(f, "json encode failed at {}: {msg}", self.offset),
            ErrorKind::Overflow => write!(f, "json number overflow at {}: {msg}", self.offset),
            ErrorKind::Parse | ErrorKind::Limit => match self.byte {
                Some(b) if b.is_ascii_graphic() || b == b' ' => write!(
                    f,
                    "json parse error at offset {} (byte '{}'): {msg}",
                    self.offset,
                    char::from(b)
                ),
                Some(b) => write!(
                    f,
                    "json parse error at offset {} (byte 0x{b:02x}): {msg}",
                    self.offset
                ),
                None => write!(f, "json parse error at offset {}: {msg}", self.offset),
            },
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for JsonError {}
