//! Error types for PCM decoding.

use thiserror::Error;

/// Errors raised when decoding inbound audio payloads.
#[derive(Error, Debug)]
pub enum FormatError {
    /// PCM16 buffers must contain whole 2-byte samples.
    #[error("odd PCM16 byte length: {0}")]
    OddLength(usize),

    /// Wire text was not valid base64.
    #[error("base64 decode error: {0}")]
    Base64(#[from] base64::DecodeError),
}
