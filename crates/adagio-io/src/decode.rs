//! Compressed-audio decoding via Symphonia.
//!
//! Every supported container and codec funnels into the same shape: a
//! [`DecodedAsset`] holding planar stereo f32 at the file's native
//! sample rate. Mono files are duplicated to both channels; files with
//! more than two channels keep the first two.

use crate::{Error, Result};
use std::io::Cursor;
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{CODEC_TYPE_NULL, DecoderOptions};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

/// A fully decoded audio file, stored as planar stereo.
///
/// The sample data is immutable after decoding; playback and export both
/// read from the same asset, typically behind an `Arc`.
#[derive(Debug, Clone)]
pub struct DecodedAsset {
    left: Vec<f32>,
    right: Vec<f32>,
    sample_rate: u32,
}

impl DecodedAsset {
    /// Build an asset from planar channel data.
    ///
    /// # Panics
    ///
    /// Panics if the channels have different lengths.
    pub fn new(left: Vec<f32>, right: Vec<f32>, sample_rate: u32) -> Self {
        assert_eq!(left.len(), right.len(), "channel length mismatch");
        Self {
            left,
            right,
            sample_rate,
        }
    }

    /// Number of sample frames (samples per channel).
    pub fn frames(&self) -> usize {
        self.left.len()
    }

    /// True if the asset holds no audio.
    pub fn is_empty(&self) -> bool {
        self.left.is_empty()
    }

    /// Native sample rate in Hz.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Duration in seconds at the native sample rate.
    pub fn duration_seconds(&self) -> f64 {
        self.left.len() as f64 / f64::from(self.sample_rate)
    }

    /// Left channel samples.
    pub fn left(&self) -> &[f32] {
        &self.left
    }

    /// Right channel samples.
    pub fn right(&self) -> &[f32] {
        &self.right
    }
}

/// Decode an in-memory audio file into a [`DecodedAsset`].
///
/// The format is detected by content sniffing, so no file name or
/// extension is needed. Corrupt packets inside an otherwise readable
/// stream are skipped rather than failing the whole file.
///
/// # Errors
///
/// Returns [`Error::Decode`] when the bytes are not recognized as audio,
/// the codec is unsupported, or the stream is too damaged to read.
pub fn decode_bytes(data: Vec<u8>) -> Result<DecodedAsset> {
    let source = MediaSourceStream::new(Box::new(Cursor::new(data)), Default::default());

    let probed = symphonia::default::get_probe()
        .format(
            &Hint::new(),
            source,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| Error::Decode(format!("unrecognized format: {e}")))?;

    let mut format = probed.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or_else(|| Error::Decode("no audio track found".to_string()))?;

    let track_id = track.id;
    let sample_rate = track
        .codec_params
        .sample_rate
        .ok_or_else(|| Error::Decode("unknown sample rate".to_string()))?;

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(|e| Error::Decode(format!("unsupported codec: {e}")))?;

    let mut left = Vec::new();
    let mut right = Vec::new();
    let mut sample_buf: Option<SampleBuffer<f32>> = None;

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(ref e))
                if e.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                break;
            }
            Err(e) => return Err(Error::Decode(format!("packet read failed: {e}"))),
        };

        if packet.track_id() != track_id {
            continue;
        }

        match decoder.decode(&packet) {
            Ok(decoded) => {
                let spec = *decoded.spec();
                if sample_buf.is_none() {
                    sample_buf = Some(SampleBuffer::new(decoded.capacity() as u64, spec));
                }
                if let Some(buf) = &mut sample_buf {
                    buf.copy_interleaved_ref(decoded);
                    deinterleave(buf.samples(), spec.channels.count(), &mut left, &mut right);
                }
            }
            // A single bad packet should not lose the rest of the file
            Err(SymphoniaError::DecodeError(_)) => continue,
            Err(e) => return Err(Error::Decode(format!("decode failed: {e}"))),
        }
    }

    tracing::info!(sample_rate, frames = left.len(), "decoded audio asset");

    Ok(DecodedAsset::new(left, right, sample_rate))
}

/// Split interleaved samples into the stereo pair, duplicating mono and
/// dropping channels past the second.
fn deinterleave(samples: &[f32], channels: usize, left: &mut Vec<f32>, right: &mut Vec<f32>) {
    match channels {
        0 => {}
        1 => {
            left.extend_from_slice(samples);
            right.extend_from_slice(samples);
        }
        _ => {
            for frame in samples.chunks_exact(channels) {
                left.push(frame[0]);
                right.push(frame[1]);
            }
        }
    }
}
