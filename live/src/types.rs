//! Core data types for the duplex voice session.

use gridwatch_audio::pcm::{self, Format};

use crate::error::Result;

/// Microphone capture rate in Hz.
pub const CAPTURE_RATE: u32 = 16_000;

/// Synthesized speech playback rate in Hz.
pub const PLAYBACK_RATE: u32 = 24_000;

/// Samples per captured frame (~256ms at 16kHz).
pub const FRAME_SAMPLES: usize = 4096;

/// Capture format: 16kHz mono PCM16.
pub const CAPTURE_FORMAT: Format = Format::MONO_16K;

/// Playback format: 24kHz mono PCM16.
pub const PLAYBACK_FORMAT: Format = Format::MONO_24K;

/// One fixed-length batch of captured microphone samples.
///
/// Frames are transient: the capture pump hands each one to the uplink and
/// never retains it.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioFrame {
    /// Raw f32 samples at [`CAPTURE_RATE`], nominal range [-1, 1].
    pub samples: Vec<f32>,
}

impl AudioFrame {
    /// Creates a frame from raw samples.
    pub fn new(samples: Vec<f32>) -> Self {
        Self { samples }
    }

    /// Creates a silent frame of the standard length.
    pub fn silence() -> Self {
        Self { samples: vec![0.0; FRAME_SAMPLES] }
    }

    /// Frame duration in seconds at the capture rate.
    pub fn duration(&self) -> f64 {
        self.samples.len() as f64 / CAPTURE_RATE as f64
    }
}

/// One uplink unit: PCM16 from a single frame, base64 encoded and tagged
/// with its MIME type. Owned by the transport once handed off.
#[derive(Debug, Clone, PartialEq)]
pub struct WireChunk {
    /// MIME tag, e.g. `audio/pcm;rate=16000`.
    pub mime_type: String,
    /// Base64 PCM16-LE payload.
    pub data: String,
}

impl WireChunk {
    /// Encodes one captured frame into a wire chunk.
    pub fn from_frame(frame: &AudioFrame) -> Self {
        let bytes = pcm::float_to_pcm16(&frame.samples);
        Self {
            mime_type: CAPTURE_FORMAT.mime_type(),
            data: pcm::to_base64(&bytes),
        }
    }
}

/// One inbound unit of synthesized speech, decoded and ready to schedule.
///
/// Length and sample rate are fixed at creation.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackSegment {
    samples: Vec<f32>,
}

impl PlaybackSegment {
    /// Decodes a base64 PCM16 payload into a playback segment.
    pub fn decode(payload: &str) -> Result<Self> {
        let bytes = pcm::from_base64(payload)?;
        let samples = pcm::pcm16_to_float(&bytes)?;
        Ok(Self { samples })
    }

    /// The decoded samples at [`PLAYBACK_RATE`].
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    /// Consumes the segment and returns its samples.
    pub fn into_samples(self) -> Vec<f32> {
        self.samples
    }

    /// Segment duration in seconds at the playback rate.
    pub fn duration(&self) -> f64 {
        self.samples.len() as f64 / PLAYBACK_RATE as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_duration() {
        let frame = AudioFrame::silence();
        assert_eq!(frame.samples.len(), FRAME_SAMPLES);
        assert!((frame.duration() - 0.256).abs() < 1e-9);
    }

    #[test]
    fn test_wire_chunk_from_frame() {
        let chunk = WireChunk::from_frame(&AudioFrame::silence());
        assert_eq!(chunk.mime_type, "audio/pcm;rate=16000");
        let bytes = pcm::from_base64(&chunk.data).unwrap();
        assert_eq!(bytes.len(), FRAME_SAMPLES * 2);
        assert!(bytes.iter().all(|&b| b == 0));
    }

    #[test]
    fn test_segment_decode() {
        // 24000 samples of silence = 1 second
        let payload = pcm::to_base64(&vec![0u8; 48000]);
        let segment = PlaybackSegment::decode(&payload).unwrap();
        assert_eq!(segment.samples().len(), 24000);
        assert!((segment.duration() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_segment_decode_odd_length() {
        let payload = pcm::to_base64(&[0u8; 3]);
        assert!(PlaybackSegment::decode(&payload).is_err());
    }
}
