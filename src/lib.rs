//! # jetjson
//!
//! Streaming, cursor-based JSON decoding and encoding for hand-written or generated codecs.
//!
//! ## Design principles
//!
//! - **No token stream, no tree.**
//!   A [`Decoder`] holds the input and a forward-only cursor. Callers drive it with calls that
//!   mirror the shape they expect: structural probes ([`Decoder::is_object_open`],
//!   [`Decoder::next_key`], ...), typed scalar decoders that parse digits straight into the target
//!   width, and skips for unknown fields.
//! - **`null` is the zero value.**
//!   Scalar decoders accept `null` and return `0`, `false` or an empty string.
//! - **Separators are noise when reading.**
//!   Whitespace and `,` are skipped before every significant byte, so callers never consume commas.
//! - **Encoding is append-only.**
//!   An [`Encoder`] appends compact JSON to a growable buffer; numbers are formatted with `itoa`
//!   and `ryu`, strings are escaped with a lookup table.
//!
//! ## Strings and borrowing
//!
//! [`StringMode::Copy`] (the default) copies every decoded string. [`StringMode::Borrow`] returns
//! strings without escapes as `Cow::Borrowed` slices of the input, so the input must outlive them.
//!
//! ## Errors
//!
//! Every failure is a [`JsonError`] carrying an [`ErrorCode`], the offending byte and its offset in
//! the input. Numeric overflow is distinguished from malformed input via [`JsonError::kind`].
//!
//! ## Feature flags
//!
//! - `std` *(default)*: implements `std::error::Error` for [`JsonError`] and enables the
//!   instance pool (`pool` module).
//! - `serde`: `Serialize` / `Deserialize` for [`Value`].
//! - `simdutf8`: SIMD-accelerated UTF-8 validation of decoded strings.
//!
//! ## `no_std`
//!
//! Without `std` the crate needs only `alloc`.

#![cfg_attr(not(feature = "std"), no_std)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]

extern crate alloc;

mod alloc_util;
mod classify;
mod codec;
mod decode;
mod encode;
mod error;
mod escape;
mod limits;
pub mod number;
#[cfg(feature = "std")]
#[cfg_attr(docsrs, doc(cfg(feature = "std")))]
pub mod pool;
#[cfg(feature = "serde")]
mod serde_impl;
mod skip;
mod utf8;
mod value;

pub use classify::{is_digit, is_structural_stop, is_whitespace, is_whitespace_or_separator};
pub use codec::{decode, encode_to_vec, from_slice, JsonDecode, JsonEncode};
pub use decode::Decoder;
pub use encode::Encoder;
pub use error::{ErrorCode, ErrorKind, JsonError};
pub use limits::{DecodeLimits, DecodeOptions, StringMode, DEFAULT_MAX_DEPTH};
#[cfg(feature = "std")]
pub use pool::{acquire_decoder, acquire_encoder, PoolStats, PooledDecoder, PooledEncoder};
pub use value::{Map, Number, RawValue, Value};
