//! In-memory WAV encoding for exports.

use crate::Result;
use hound::{SampleFormat, WavSpec, WavWriter};
use std::io::Cursor;

/// Encode planar stereo samples as a 16-bit PCM WAV file in memory.
///
/// The output carries the standard 44-byte RIFF header followed by
/// interleaved little-endian samples. Values outside [-1, 1] are clamped
/// before quantization. If the channels have different lengths the
/// shorter one wins.
///
/// # Example
///
/// ```rust
/// use adagio_io::encode_wav;
///
/// let silence = vec![0.0f32; 44100];
/// let bytes = encode_wav(&silence, &silence, 44100).unwrap();
/// assert_eq!(&bytes[0..4], b"RIFF");
/// ```
pub fn encode_wav(left: &[f32], right: &[f32], sample_rate: u32) -> Result<Vec<u8>> {
    let spec = WavSpec {
        channels: 2,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };

    let mut cursor = Cursor::new(Vec::new());
    let mut writer = WavWriter::new(&mut cursor, spec)?;

    for (l, r) in left.iter().zip(right.iter()) {
        writer.write_sample(pcm16(*l))?;
        writer.write_sample(pcm16(*r))?;
    }
    writer.finalize()?;

    Ok(cursor.into_inner())
}

#[inline]
fn pcm16(sample: f32) -> i16 {
    (sample.clamp(-1.0, 1.0) * 32767.0) as i16
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    fn u32_le(bytes: &[u8], at: usize) -> u32 {
        u32::from_le_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]])
    }

    fn u16_le(bytes: &[u8], at: usize) -> u16 {
        u16::from_le_bytes([bytes[at], bytes[at + 1]])
    }

    #[test]
    fn test_header_layout() {
        let samples = vec![0.25f32; 100];
        let bytes = encode_wav(&samples, &samples, 44100).unwrap();

        assert_eq!(&bytes[0..4], b"RIFF");
        assert_eq!(&bytes[8..12], b"WAVE");
        assert_eq!(&bytes[12..16], b"fmt ");
        assert_eq!(u32_le(&bytes, 16), 16, "fmt chunk size");
        assert_eq!(u16_le(&bytes, 20), 1, "PCM format tag");
        assert_eq!(u16_le(&bytes, 22), 2, "channels");
        assert_eq!(u32_le(&bytes, 24), 44100, "sample rate");
        assert_eq!(u32_le(&bytes, 28), 176_400, "byte rate");
        assert_eq!(u16_le(&bytes, 32), 4, "block align");
        assert_eq!(u16_le(&bytes, 34), 16, "bits per sample");
        assert_eq!(&bytes[36..40], b"data");
        assert_eq!(u32_le(&bytes, 40), 100 * 4, "data chunk size");
        assert_eq!(bytes.len(), 44 + 100 * 4);
    }

    #[test]
    fn test_out_of_range_samples_clamped() {
        let hot = vec![2.0f32, -2.0];
        let bytes = encode_wav(&hot, &hot, 44100).unwrap();

        let first = i16::from_le_bytes([bytes[44], bytes[45]]);
        let third = i16::from_le_bytes([bytes[52], bytes[53]]);
        assert_eq!(first, 32767);
        assert_eq!(third, -32767);
    }

    #[test]
    fn test_shorter_channel_wins() {
        let left = vec![0.0f32; 50];
        let right = vec![0.0f32; 80];
        let bytes = encode_wav(&left, &right, 48000).unwrap();
        assert_eq!(u32_le(&bytes, 40), 50 * 4);
    }

    #[test]
    fn test_readable_by_hound() {
        let left: Vec<f32> = (0..500).map(|i| (i as f32 / 500.0).sin() * 0.8).collect();
        let right: Vec<f32> = (0..500).map(|i| (i as f32 / 500.0).cos() * 0.8).collect();
        let bytes = encode_wav(&left, &right, 48000).unwrap();

        let file = NamedTempFile::new().unwrap();
        std::fs::write(file.path(), &bytes).unwrap();

        let mut reader = hound::WavReader::open(file.path()).unwrap();
        let spec = reader.spec();
        assert_eq!(spec.channels, 2);
        assert_eq!(spec.sample_rate, 48000);
        assert_eq!(spec.bits_per_sample, 16);

        let decoded: Vec<i16> = reader.samples::<i16>().map(|s| s.unwrap()).collect();
        assert_eq!(decoded.len(), 1000);
        assert_eq!(decoded[0], pcm16(left[0]));
        assert_eq!(decoded[1], pcm16(right[0]));
    }
}
