//! Audio I/O layer for the Adagio engine.
//!
//! This crate provides:
//!
//! - **Decoding**: [`decode_bytes`] turns compressed audio (WAV, MP3, FLAC)
//!   into a planar-stereo [`DecodedAsset`]
//! - **WAV export**: [`encode_wav`] serializes processed audio to an
//!   in-memory 16-bit PCM WAV file
//! - **Device output**: [`AudioOutput`] streams a render callback to the
//!   system's default output device
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use adagio_io::{decode_bytes, encode_wav};
//!
//! let asset = decode_bytes(std::fs::read("song.mp3")?)?;
//! let bytes = encode_wav(asset.left(), asset.right(), asset.sample_rate())?;
//! std::fs::write("copy.wav", bytes)?;
//! ```

mod decode;
mod output;
mod wav;

pub use decode::{DecodedAsset, decode_bytes};
pub use output::{AudioOutput, default_device_name};
pub use wav::encode_wav;

/// Error types for audio I/O operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// WAV encoding error.
    #[error("WAV file error: {0}")]
    Wav(#[from] hound::Error),

    /// The input bytes could not be decoded as audio.
    #[error("decode error: {0}")]
    Decode(String),

    /// Audio stream setup or runtime error.
    #[error("audio stream error: {0}")]
    Stream(String),

    /// No audio output device available on the system.
    #[error("no audio output device available")]
    NoDevice,

    /// Standard I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result type for audio I/O operations.
pub type Result<T> = std::result::Result<T, Error>;
