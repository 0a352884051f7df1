//! Sample and wire-text conversions.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use super::FormatError;

/// Converts f32 samples (nominal range [-1, 1]) to 16-bit little-endian PCM.
///
/// Each sample is scaled by 32768 and truncated toward zero. Out-of-range
/// samples are not clamped; they wrap modulo 2^16, matching the capture
/// pipeline this crate interoperates with. Feed it normalized audio.
pub fn float_to_pcm16(samples: &[f32]) -> Vec<u8> {
    let mut data = Vec::with_capacity(samples.len() * 2);
    for &s in samples {
        // f32 -> i32 first so +1.0 wraps to i16::MIN instead of saturating
        let v = (s * 32768.0) as i32 as i16;
        data.extend_from_slice(&v.to_le_bytes());
    }
    data
}

/// Converts 16-bit little-endian PCM bytes to f32 samples in [-1, 1).
///
/// Fails with [`FormatError::OddLength`] if the buffer does not contain a
/// whole number of 2-byte samples.
pub fn pcm16_to_float(bytes: &[u8]) -> Result<Vec<f32>, FormatError> {
    if bytes.len() % 2 != 0 {
        return Err(FormatError::OddLength(bytes.len()));
    }
    Ok(bytes
        .chunks_exact(2)
        .map(|b| i16::from_le_bytes([b[0], b[1]]) as f32 / 32768.0)
        .collect())
}

/// Encodes bytes as base64 wire text (STANDARD alphabet, padded).
pub fn to_base64(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// Decodes base64 wire text back to bytes.
pub fn from_base64(text: &str) -> Result<Vec<u8>, FormatError> {
    Ok(STANDARD.decode(text)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_float_to_pcm16_basic() {
        let bytes = float_to_pcm16(&[0.0, 0.5, -0.5]);
        assert_eq!(bytes.len(), 6);
        assert_eq!(i16::from_le_bytes([bytes[0], bytes[1]]), 0);
        assert_eq!(i16::from_le_bytes([bytes[2], bytes[3]]), 16384);
        assert_eq!(i16::from_le_bytes([bytes[4], bytes[5]]), -16384);
    }

    #[test]
    fn test_float_to_pcm16_full_scale_wraps() {
        // +1.0 scales to 32768 which does not fit i16; it wraps to -32768
        // rather than saturating. -1.0 lands exactly on i16::MIN.
        let bytes = float_to_pcm16(&[1.0, -1.0]);
        assert_eq!(i16::from_le_bytes([bytes[0], bytes[1]]), i16::MIN);
        assert_eq!(i16::from_le_bytes([bytes[2], bytes[3]]), i16::MIN);
    }

    #[test]
    fn test_pcm16_to_float() {
        let mut bytes = Vec::new();
        for v in [0i16, 16384, -16384, i16::MIN] {
            bytes.extend_from_slice(&v.to_le_bytes());
        }
        let samples = pcm16_to_float(&bytes).unwrap();
        assert_eq!(samples, vec![0.0, 0.5, -0.5, -1.0]);
    }

    #[test]
    fn test_pcm16_to_float_odd_length() {
        let err = pcm16_to_float(&[0u8, 1, 2]).unwrap_err();
        assert!(matches!(err, FormatError::OddLength(3)));
    }

    #[test]
    fn test_pcm16_round_trip() {
        // Silence, full scale, alternating extremes: decode then re-encode
        // must reproduce the original bytes exactly.
        let cases: Vec<Vec<i16>> = vec![
            vec![0; 64],
            vec![i16::MAX; 16],
            vec![i16::MIN; 16],
            (0..32)
                .map(|i| if i % 2 == 0 { i16::MAX } else { i16::MIN })
                .collect(),
            vec![1, -1, 2, -2, 1000, -1000],
        ];
        for samples in cases {
            let mut bytes = Vec::new();
            for v in &samples {
                bytes.extend_from_slice(&v.to_le_bytes());
            }
            let floats = pcm16_to_float(&bytes).unwrap();
            assert_eq!(float_to_pcm16(&floats), bytes);
        }
    }

    #[test]
    fn test_base64_round_trip() {
        // Every length 0..=255, plus all-zero and all-0xFF buffers.
        for len in 0..=255usize {
            let buf: Vec<u8> = (0..len).map(|i| (i * 7 % 256) as u8).collect();
            assert_eq!(from_base64(&to_base64(&buf)).unwrap(), buf);
        }
        let zeros = vec![0u8; 255];
        assert_eq!(from_base64(&to_base64(&zeros)).unwrap(), zeros);
        let ones = vec![0xFFu8; 255];
        assert_eq!(from_base64(&to_base64(&ones)).unwrap(), ones);
    }

    #[test]
    fn test_from_base64_rejects_garbage() {
        assert!(matches!(
            from_base64("not base64!!!").unwrap_err(),
            FormatError::Base64(_)
        ));
    }
}
