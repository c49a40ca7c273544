//! Default-device audio output via cpal.
//!
//! [`AudioOutput`] owns a single running output stream on the system's
//! default device. The render callback runs on the audio thread and must
//! not block; the engine feeds it from a shared session slot.

use crate::{Error, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};

/// A running stereo output stream on the default audio device.
///
/// The stream starts playing as soon as [`open`](Self::open) returns and
/// keeps running until [`close`](Self::close) is called or the value is
/// dropped. The device's native sample rate is used; callers read it back
/// with [`sample_rate`](Self::sample_rate) to build their processing at
/// the right rate.
pub struct AudioOutput {
    stream: Option<cpal::Stream>,
    sample_rate: u32,
    channels: u16,
}

impl AudioOutput {
    /// Open the default output device and start streaming.
    ///
    /// `render` is called on the audio thread with an interleaved stereo
    /// buffer to fill.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoDevice`] when the system has no output device,
    /// or [`Error::Stream`] when the stream cannot be configured or
    /// started.
    pub fn open<F>(mut render: F) -> Result<Self>
    where
        F: FnMut(&mut [f32]) + Send + 'static,
    {
        let host = cpal::default_host();
        let device = host.default_output_device().ok_or(Error::NoDevice)?;
        let default_config = device
            .default_output_config()
            .map_err(|e| Error::Stream(e.to_string()))?;
        let sample_rate = default_config.sample_rate().0;

        let config = cpal::StreamConfig {
            channels: 2,
            sample_rate: cpal::SampleRate(sample_rate),
            buffer_size: cpal::BufferSize::Default,
        };

        let stream = device
            .build_output_stream(
                &config,
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    render(data);
                },
                move |err| {
                    tracing::error!(%err, "output stream error");
                },
                None,
            )
            .map_err(|e| Error::Stream(e.to_string()))?;

        stream.play().map_err(|e| Error::Stream(e.to_string()))?;
        tracing::info!(sample_rate, channels = 2u16, "output stream started");

        Ok(Self {
            stream: Some(stream),
            sample_rate,
            channels: 2,
        })
    }

    /// Sample rate of the running stream in Hz.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Number of interleaved channels in the render buffer.
    pub fn channels(&self) -> u16 {
        self.channels
    }

    /// Stop the stream and release the device. Safe to call repeatedly.
    pub fn close(&mut self) {
        if let Some(stream) = self.stream.take() {
            drop(stream);
            tracing::info!("output stream closed");
        }
    }
}

impl Drop for AudioOutput {
    fn drop(&mut self) {
        self.close();
    }
}

/// Name of the default output device, if one exists.
pub fn default_device_name() -> Option<String> {
    cpal::default_host()
        .default_output_device()
        .and_then(|d| d.name().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_name_query_does_not_panic() {
        // Headless machines have no device; either outcome is fine
        let _ = default_device_name();
    }
}
