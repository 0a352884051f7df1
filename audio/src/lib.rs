//! Audio sample-format utilities.
//!
//! This crate provides the PCM handling used by the GridWatch live voice
//! session:
//!
//! - `pcm`: format descriptors and conversions between f32 samples,
//!   16-bit little-endian PCM, and base64 wire text
//!
//! # Example
//!
//! ```rust
//! use gridwatch_audio::pcm::{self, Format};
//!
//! // Microphone capture format
//! let format = Format::MONO_16K;
//! assert_eq!(format.sample_rate, 16000);
//!
//! // Encode a captured frame for the wire
//! let samples = vec![0.0f32; 4096];
//! let bytes = pcm::float_to_pcm16(&samples);
//! let text = pcm::to_base64(&bytes);
//!
//! // Decode a synthesized segment
//! let bytes = pcm::from_base64(&text).unwrap();
//! let samples = pcm::pcm16_to_float(&bytes).unwrap();
//! ```

pub mod pcm;

pub use pcm::{Format, FormatError};
