/// Default maximum nesting depth limit.
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// How decoded strings relate to the input buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StringMode {
    /// Every decoded string is copied into owned memory.
    #[default]
    Copy,
    /// Strings without escapes borrow the input buffer (zero-copy).
    ///
    /// The borrow carries the input's lifetime, so the buffer cannot be dropped or mutated while a
    /// decoded string is live.
    Borrow,
}

/// Decode-time resource limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeLimits {
    /// Maximum total input length in bytes.
    pub max_input_bytes: usize,
    /// Maximum nesting depth of arrays and objects.
    pub max_depth: usize,
}

impl DecodeLimits {
    /// Limits that admit an input of `max_message_bytes` with the default depth.
    #[must_use]
    pub const fn for_bytes(max_message_bytes: usize) -> Self {
        Self {
            max_input_bytes: max_message_bytes,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl Default for DecodeLimits {
    fn default() -> Self {
        Self::for_bytes(usize::MAX)
    }
}

/// Per-session decode configuration used by the top-level helpers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DecodeOptions {
    /// String ownership mode.
    pub mode: StringMode,
    /// Resource limits.
    pub limits: DecodeLimits,
}

impl DecodeOptions {
    /// Default limits with zero-copy strings.
    #[must_use]
    pub fn zero_copy() -> Self {
        Self {
            mode: StringMode::Borrow,
            limits: DecodeLimits::default(),
        }
    }
}
