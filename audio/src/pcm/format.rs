//! PCM audio format descriptor.

use std::time::Duration;

/// Describes a raw PCM audio format.
/// Samples are always 16-bit signed little-endian on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Format {
    /// Sample rate in Hz (e.g., 16000, 24000).
    pub sample_rate: u32,
    /// True for stereo (2 channels), false for mono (1 channel).
    pub stereo: bool,
}

impl Format {
    /// Creates a new mono format with the given sample rate.
    pub const fn mono(sample_rate: u32) -> Self {
        Self { sample_rate, stereo: false }
    }

    /// Creates a new stereo format with the given sample rate.
    pub const fn stereo(sample_rate: u32) -> Self {
        Self { sample_rate, stereo: true }
    }

    /// Returns the number of channels (1 for mono, 2 for stereo).
    pub fn channels(&self) -> u32 {
        if self.stereo { 2 } else { 1 }
    }

    /// Returns the number of bytes per sample frame.
    /// For 16-bit audio: 2 bytes for mono, 4 bytes for stereo.
    pub fn sample_bytes(&self) -> usize {
        if self.stereo { 4 } else { 2 }
    }

    /// Returns the number of bytes covering the given duration.
    pub fn bytes_in_duration(&self, duration: Duration) -> u64 {
        let frames = duration.as_secs_f64() * self.sample_rate as f64;
        frames as u64 * self.sample_bytes() as u64
    }

    /// Returns the playback duration of a buffer of the given byte length.
    pub fn duration_of(&self, bytes: u64) -> Duration {
        let frames = bytes / self.sample_bytes() as u64;
        Duration::from_secs_f64(frames as f64 / self.sample_rate as f64)
    }

    /// Returns the number of sample frames in a buffer of the given byte length.
    pub fn samples_in(&self, bytes: u64) -> u64 {
        bytes / self.sample_bytes() as u64
    }

    /// MIME type used on the wire for this format.
    pub fn mime_type(&self) -> String {
        format!("audio/pcm;rate={}", self.sample_rate)
    }
}

// Common format presets
impl Format {
    /// 16kHz mono (microphone capture)
    pub const MONO_16K: Format = Format::mono(16000);
    /// 24kHz mono (synthesized speech)
    pub const MONO_24K: Format = Format::mono(24000);
    /// 48kHz mono
    pub const MONO_48K: Format = Format::mono(48000);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_properties() {
        let format = Format::MONO_16K;
        assert_eq!(format.sample_rate, 16000);
        assert_eq!(format.channels(), 1);
        assert_eq!(format.sample_bytes(), 2);

        let stereo = Format::stereo(48000);
        assert_eq!(stereo.channels(), 2);
        assert_eq!(stereo.sample_bytes(), 4);
    }

    #[test]
    fn test_bytes_in_duration() {
        let format = Format::MONO_16K;
        // 1 second at 16kHz mono 16-bit = 16000 samples * 2 bytes
        assert_eq!(format.bytes_in_duration(Duration::from_secs(1)), 32000);
        // 100ms = 1600 samples * 2 bytes
        assert_eq!(format.bytes_in_duration(Duration::from_millis(100)), 3200);
    }

    #[test]
    fn test_duration_of() {
        let format = Format::MONO_24K;
        // 48000 bytes = 24000 samples = 1 second
        assert_eq!(format.duration_of(48000), Duration::from_secs(1));
    }

    #[test]
    fn test_samples_in() {
        let format = Format::MONO_16K;
        assert_eq!(format.samples_in(8192), 4096);
    }

    #[test]
    fn test_mime_type() {
        assert_eq!(Format::MONO_16K.mime_type(), "audio/pcm;rate=16000");
        assert_eq!(Format::MONO_24K.mime_type(), "audio/pcm;rate=24000");
    }
}
