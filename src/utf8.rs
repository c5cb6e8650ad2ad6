#[cfg(feature = "simdutf8")]
use simdutf8::compat as simd_utf8;

use crate::{ErrorCode, JsonError};

/// Validates UTF-8 bytes and returns a borrowed `&str` on success.
///
/// `offset` is the position of `bytes` in the input; the reported error points at the first
/// invalid byte.
#[inline]
pub fn validate(bytes: &[u8], offset: usize) -> Result<&str, JsonError> {
    #[cfg(feature = "simdutf8")]
    let res = simd_utf8::from_utf8(bytes).map_err(|e| e.valid_up_to());

    #[cfg(not(feature = "simdutf8"))]
    let res = core::str::from_utf8(bytes).map_err(|e| e.valid_up_to());

    res.map_err(|at| JsonError::at(ErrorCode::InvalidUtf8, bytes, at).offset_by(offset))
}
