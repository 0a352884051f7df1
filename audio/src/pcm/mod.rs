//! PCM (Pulse Code Modulation) audio format handling.
//!
//! # Key items
//!
//! - [`Format`]: audio format descriptor (sample rate, channels)
//! - [`float_to_pcm16`] / [`pcm16_to_float`]: f32 <-> PCM16-LE conversion
//! - [`to_base64`] / [`from_base64`]: binary <-> wire-text transcoding
//! - [`FormatError`]: decode failures for malformed payloads

mod convert;
mod error;
mod format;

pub use convert::{float_to_pcm16, from_base64, pcm16_to_float, to_base64};
pub use error::FormatError;
pub use format::Format;
