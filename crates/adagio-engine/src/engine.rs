//! The engine facade: one loaded song, its parameters, and its transport.
//!
//! An [`Engine`] owns everything for a single song: the decoded asset,
//! the parameter store with undo history, the transport clock, the
//! analysis tap, and (lazily, on first play) the audio device. All
//! methods run on the control thread; the audio callback only ever sees
//! the session slot.
//!
//! Transport methods called in the wrong state are no-ops rather than
//! errors. Fallible operations leave prior state intact on failure, so
//! a failed load keeps the previous song and a failed device open can
//! simply be retried.

use crate::analysis::{AnalysisTap, FFT_SIZE, FREQUENCY_BINS};
use crate::clock::{TransportClock, TransportState};
use crate::error::{EngineError, Result};
use crate::events::{EngineEvent, EventQueue};
use crate::graph::SignalChain;
use crate::history::EditHistory;
use crate::params::{EchoSettings, ParameterSet, ParameterUpdate};
use crate::preset::Preset;
use crate::render::{self, ExportFormat};
use crate::session::{ActiveSession, SessionSlot};
use crate::source::AssetSource;
use adagio_io::{decode_bytes, AudioOutput, DecodedAsset};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

/// Audio processing engine for one song at a time.
pub struct Engine {
    params: ParameterSet,
    echo: EchoSettings,
    asset: Option<Arc<DecodedAsset>>,
    clock: TransportClock,
    history: EditHistory,
    events: EventQueue,
    tap: Arc<AnalysisTap>,
    slot: SessionSlot,
    output: Option<AudioOutput>,
    /// End-of-song flag of the current session, if one is installed.
    finished: Option<Arc<AtomicBool>>,
}

impl Engine {
    /// An idle engine with default parameters and no audio device open.
    pub fn new() -> Self {
        let params = ParameterSet::default();
        Self {
            params,
            echo: EchoSettings::default(),
            asset: None,
            clock: TransportClock::new(),
            history: EditHistory::new(params),
            events: EventQueue::new(),
            tap: Arc::new(AnalysisTap::new()),
            slot: Arc::new(Mutex::new(None)),
            output: None,
            finished: None,
        }
    }

    /// Decode `bytes` and adopt the result as the current song.
    ///
    /// Stops playback of the previous song only after decoding succeeds;
    /// on error the engine keeps playing whatever it had. Returns the new
    /// song's duration in seconds.
    pub fn load_audio_file(&mut self, bytes: Vec<u8>) -> Result<f64> {
        let asset = decode_bytes(bytes).map_err(|e| EngineError::DecodeFailure(e.to_string()))?;

        if matches!(
            self.clock.state(),
            TransportState::Playing | TransportState::Paused
        ) {
            self.clock.stop();
            self.clear_session();
        }

        let duration = asset.duration_seconds();
        self.asset = Some(Arc::new(asset));
        self.clock.load(duration);
        self.clock.set_rate(f64::from(self.params.speed));
        self.events.push(EngineEvent::SongLoaded);
        tracing::info!(duration_seconds = duration, "song loaded");
        Ok(duration)
    }

    /// Current parameter values.
    pub fn parameters(&self) -> ParameterSet {
        self.params
    }

    /// Current echo settings.
    pub fn echo(&self) -> EchoSettings {
        self.echo
    }

    /// Merge `update` into the current parameters.
    ///
    /// Unset fields keep their values; set fields are clamped into range.
    /// A merge that changes nothing records no history entry. Returns the
    /// resulting parameter set.
    pub fn set_parameters(&mut self, update: ParameterUpdate) -> ParameterSet {
        let merged = self.params.merge(&update);
        if merged != self.params {
            self.adopt_params(merged, true);
        }
        self.params
    }

    /// Apply every value of a preset, as one history entry.
    pub fn apply_preset(&mut self, preset: &Preset) -> ParameterSet {
        self.set_parameters(ParameterUpdate::from(preset.params))
    }

    /// Reset all parameters to their defaults, as one history entry.
    pub fn reset_parameters(&mut self) -> ParameterSet {
        self.set_parameters(ParameterUpdate::from(ParameterSet::default()))
    }

    /// Step back to the previous parameter set, if any.
    pub fn undo(&mut self) -> Option<ParameterSet> {
        let params = self.history.undo()?;
        self.adopt_params(params, false);
        Some(params)
    }

    /// Step forward to the next parameter set, if any.
    pub fn redo(&mut self) -> Option<ParameterSet> {
        let params = self.history.redo()?;
        self.adopt_params(params, false);
        Some(params)
    }

    /// True if [`Engine::undo`] would change anything.
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    /// True if [`Engine::redo`] would change anything.
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Update echo settings, live if a session is playing.
    pub fn set_echo(&mut self, delay_seconds: f32, feedback: f32, level: f32) {
        self.echo = EchoSettings {
            delay_seconds,
            feedback,
            level,
        };
        if let Ok(mut slot) = self.slot.lock() {
            if let Some(session) = slot.as_mut() {
                session.set_echo(&self.echo);
            }
        }
    }

    /// Start or resume playback.
    ///
    /// No-op when nothing is loaded or already playing. Opens the audio
    /// device on first use; a device failure leaves the transport
    /// untouched so the call can be retried.
    pub fn play(&mut self) -> Result<()> {
        self.start_playback(None)
    }

    /// Pause, keeping the position. No-op unless playing.
    pub fn pause(&mut self) {
        self.poll_end();
        if self.clock.is_playing() {
            self.clock.pause();
            self.clear_session();
        }
    }

    /// Stop and rewind to the beginning. No-op unless playing or paused.
    pub fn stop(&mut self) {
        self.poll_end();
        if matches!(
            self.clock.state(),
            TransportState::Playing | TransportState::Paused
        ) {
            self.clock.stop();
            self.clear_session();
        }
    }

    /// Jump to a position in seconds, clamped to the song bounds.
    /// No-op when nothing is loaded.
    pub fn seek_to(&mut self, seconds: f64) {
        self.poll_end();
        if self.clock.state() == TransportState::Idle {
            return;
        }
        self.clock.seek_to(seconds);
        if self.clock.is_playing() {
            let position = self.clock.elapsed();
            self.install_session(position, None);
        }
    }

    /// Current playback position in seconds.
    pub fn current_time(&mut self) -> f64 {
        self.poll_end();
        self.clock.elapsed()
    }

    /// Duration of the loaded song in seconds; zero when idle.
    pub fn duration(&self) -> f64 {
        self.clock.duration()
    }

    /// Current transport state.
    pub fn state(&mut self) -> TransportState {
        self.poll_end();
        self.clock.state()
    }

    /// Spectrum bytes for visualization; all zeros when idle.
    pub fn frequency_data(&self) -> [u8; FREQUENCY_BINS] {
        self.tap.frequency_snapshot()
    }

    /// Waveform bytes for visualization; all 128s when idle.
    pub fn waveform_data(&self) -> [u8; FFT_SIZE] {
        self.tap.waveform_snapshot()
    }

    /// Render the loaded song through the current parameters and encode
    /// it into `format`.
    ///
    /// The `quality` hint is accepted for API compatibility but has no
    /// effect on WAV output.
    pub fn export_audio(&mut self, format: ExportFormat, quality: Option<u32>) -> Result<Vec<u8>> {
        self.export_audio_with_progress(format, quality, |_| {})
    }

    /// [`Engine::export_audio`] with a progress callback in `[0, 1]`.
    pub fn export_audio_with_progress(
        &mut self,
        format: ExportFormat,
        quality: Option<u32>,
        progress: impl FnMut(f32),
    ) -> Result<Vec<u8>> {
        let asset = self.asset.as_ref().ok_or(EngineError::NoAssetLoaded)?;
        if let Some(quality) = quality {
            tracing::debug!(quality, "quality hint ignored for lossless output");
        }

        let rendered =
            render::render_with_progress(Arc::clone(asset), &self.params, &self.echo, progress);
        let bytes = render::encode(&rendered, format)?;
        self.events.push(EngineEvent::ExportCompleted);
        tracing::info!(
            format = %format,
            frames = rendered.frames(),
            bytes = bytes.len(),
            "export completed"
        );
        Ok(bytes)
    }

    /// Drain queued engine events in the order they occurred.
    pub fn take_events(&mut self) -> Vec<EngineEvent> {
        self.poll_end();
        self.events.drain()
    }

    /// Tear everything down: session, audio device, song.
    ///
    /// Safe to call more than once. The engine is reusable afterwards;
    /// the next play reopens the device.
    pub fn destroy(&mut self) {
        self.clear_session();
        if let Some(mut output) = self.output.take() {
            output.close();
        }
        self.asset = None;
        self.clock = TransportClock::new();
        tracing::debug!("engine torn down");
    }

    /// Start playback with the output fading up from silence, for
    /// crossfade handovers.
    pub(crate) fn play_with_fade(&mut self, seconds: f32) -> Result<()> {
        self.start_playback(Some(seconds))
    }

    /// Ramp the live session's output toward `target` over `seconds`.
    pub(crate) fn begin_fade(&mut self, target: f32, seconds: f32) {
        if let Ok(mut slot) = self.slot.lock() {
            if let Some(session) = slot.as_mut() {
                session.begin_fade(target, seconds);
            }
        }
    }

    fn start_playback(&mut self, fade_in: Option<f32>) -> Result<()> {
        self.poll_end();
        if self.asset.is_none() || self.clock.is_playing() {
            return Ok(());
        }
        self.ensure_output()?;
        let offset = self.clock.elapsed();
        self.install_session(offset, fade_in);
        self.clock.play();
        tracing::debug!(offset_seconds = offset, "playback started");
        Ok(())
    }

    /// Adopt `merged` as the current parameters and push it into the
    /// live session: a speed or pitch change rebuilds the source at the
    /// current position, anything else glides in place.
    fn adopt_params(&mut self, merged: ParameterSet, record: bool) {
        let rate_changed = merged.speed != self.params.speed
            || merged.pitch_semitones != self.params.pitch_semitones;
        self.params = merged;
        if record {
            self.history.push(merged);
        }

        self.clock.set_rate(f64::from(merged.speed));
        if self.clock.is_playing() {
            if rate_changed {
                let position = self.clock.elapsed();
                self.install_session(position, None);
            } else if let Ok(mut slot) = self.slot.lock() {
                if let Some(session) = slot.as_mut() {
                    session.apply_params(&merged);
                }
            }
        }
    }

    /// Open the audio device if it is not open yet.
    fn ensure_output(&mut self) -> Result<()> {
        if self.output.is_some() {
            return Ok(());
        }
        let slot = Arc::clone(&self.slot);
        let output = AudioOutput::open(move |data: &mut [f32]| {
            // Contention with the control thread renders one silent
            // buffer instead of blocking the audio callback.
            if let Ok(mut session) = slot.try_lock() {
                if let Some(session) = session.as_mut() {
                    session.render_into(data);
                    return;
                }
            }
            data.fill(0.0);
        })
        .map_err(|e| EngineError::DeviceUnavailable(e.to_string()))?;
        self.output = Some(output);
        Ok(())
    }

    /// Build a fresh session at `offset_seconds` and swap it into the
    /// slot. No-op unless an asset and an open output exist.
    fn install_session(&mut self, offset_seconds: f64, fade_in: Option<f32>) {
        let Some(asset) = self.asset.as_ref() else {
            return;
        };
        let Some(output) = self.output.as_ref() else {
            return;
        };

        let sample_rate = output.sample_rate();
        let source = AssetSource::new(
            Arc::clone(asset),
            sample_rate,
            self.params.speed,
            self.params.pitch_semitones,
            offset_seconds,
        );
        let mut chain = SignalChain::build(&self.params, &self.echo, sample_rate as f32);
        if let Some(seconds) = fade_in {
            chain.fade_in_from_silence(seconds);
        }

        let session = ActiveSession::new(source, chain, Arc::clone(&self.tap));
        self.finished = Some(session.finished_flag());
        if let Ok(mut slot) = self.slot.lock() {
            *slot = Some(session);
        }
    }

    /// Drop the session and return the tap to its idle patterns.
    fn clear_session(&mut self) {
        if let Ok(mut slot) = self.slot.lock() {
            *slot = None;
        }
        self.finished = None;
        self.tap.clear();
    }

    /// Fold a naturally finished song back into the loaded state and
    /// queue the end event. Runs at most once per session.
    fn poll_end(&mut self) {
        let ended = self
            .finished
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Acquire));
        if ended {
            self.clear_session();
            self.clock.finish();
            self.events.push(EngineEvent::SongEnded);
            tracing::info!("playback finished");
        }
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Engine {
    fn drop(&mut self) {
        self.destroy();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preset::factory_preset;

    fn wav_bytes(frames: usize) -> Vec<u8> {
        let samples: Vec<f32> = (0..frames)
            .map(|i| (i as f32 * 0.01).sin() * 0.5)
            .collect();
        adagio_io::encode_wav(&samples, &samples, 44_100).unwrap()
    }

    #[test]
    fn test_load_reports_duration_and_event() {
        let mut engine = Engine::new();
        let duration = engine.load_audio_file(wav_bytes(22_050)).unwrap();
        assert!((duration - 0.5).abs() < 1e-6);
        assert_eq!(engine.state(), TransportState::Loaded);
        assert_eq!(engine.take_events(), vec![EngineEvent::SongLoaded]);
    }

    #[test]
    fn test_failed_load_keeps_previous_song() {
        let mut engine = Engine::new();
        engine.load_audio_file(wav_bytes(44_100)).unwrap();

        let err = engine.load_audio_file(vec![1, 2, 3, 4]).unwrap_err();
        assert!(matches!(err, EngineError::DecodeFailure(_)));
        assert_eq!(engine.state(), TransportState::Loaded);
        assert!((engine.duration() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_set_parameters_merges_and_clamps() {
        let mut engine = Engine::new();
        let update = ParameterUpdate {
            speed: Some(99.0),
            bass_gain: Some(-3.0),
            ..ParameterUpdate::default()
        };
        let result = engine.set_parameters(update);

        assert_eq!(result.speed, 16.0);
        assert_eq!(result.bass_gain, -3.0);
        assert_eq!(result.volume, 100.0, "unset fields keep their values");
    }

    #[test]
    fn test_undo_redo_walk_history() {
        let mut engine = Engine::new();
        for i in 1..=4 {
            engine.set_parameters(ParameterUpdate {
                speed: Some(1.0 + i as f32 * 0.1),
                ..ParameterUpdate::default()
            });
        }
        assert!((engine.parameters().speed - 1.4).abs() < 1e-6);

        for _ in 0..4 {
            assert!(engine.undo().is_some());
        }
        assert_eq!(engine.parameters().speed, 1.0);
        assert!(!engine.can_undo());

        assert!(engine.redo().is_some());
        assert!((engine.parameters().speed - 1.1).abs() < 1e-6);
    }

    #[test]
    fn test_no_op_update_records_no_history() {
        let mut engine = Engine::new();
        engine.set_parameters(ParameterUpdate::default());
        engine.set_parameters(ParameterUpdate {
            speed: Some(1.0),
            ..ParameterUpdate::default()
        });
        assert!(!engine.can_undo());
    }

    #[test]
    fn test_apply_preset_and_reset() {
        let mut engine = Engine::new();
        let nightcore = factory_preset("nightcore").unwrap();
        let applied = engine.apply_preset(&nightcore);
        assert!((applied.speed - 1.3).abs() < 1e-6);
        assert_eq!(applied.pitch_semitones, 4.0);

        let reset = engine.reset_parameters();
        assert_eq!(reset, ParameterSet::default());

        let undone = engine.undo().unwrap();
        assert!((undone.speed - 1.3).abs() < 1e-6);
    }

    #[test]
    fn test_transport_no_ops_without_audio() {
        let mut engine = Engine::new();
        assert!(engine.play().is_ok());
        engine.pause();
        engine.stop();
        engine.seek_to(10.0);
        assert_eq!(engine.state(), TransportState::Idle);
        assert_eq!(engine.current_time(), 0.0);
    }

    #[test]
    fn test_play_only_transitions_on_success() {
        let mut engine = Engine::new();
        engine.load_audio_file(wav_bytes(44_100)).unwrap();

        // Whether a device exists depends on the host; either way the
        // transport must end up in a consistent state.
        match engine.play() {
            Ok(()) => {
                assert_eq!(engine.state(), TransportState::Playing);
                engine.stop();
                assert_eq!(engine.state(), TransportState::Loaded);
            }
            Err(EngineError::DeviceUnavailable(_)) => {
                assert_eq!(engine.state(), TransportState::Loaded);
            }
            Err(other) => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_seek_clamps_to_duration() {
        let mut engine = Engine::new();
        engine.load_audio_file(wav_bytes(44_100)).unwrap();
        engine.seek_to(500.0);
        assert!((engine.current_time() - 1.0).abs() < 1e-6);
        engine.seek_to(-3.0);
        assert_eq!(engine.current_time(), 0.0);
    }

    #[test]
    fn test_natural_end_fires_song_ended_once() {
        let mut engine = Engine::new();
        engine.load_audio_file(wav_bytes(1_000)).unwrap();
        engine.take_events();

        // Stand in for the device path: install a session directly and
        // drain it the way the audio callback would.
        let asset = Arc::clone(engine.asset.as_ref().unwrap());
        let source = AssetSource::new(asset, 44_100, 1.0, 0.0, 0.0);
        let chain = SignalChain::build(&engine.params, &engine.echo, 44_100.0);
        let session = ActiveSession::new(source, chain, Arc::clone(&engine.tap));
        engine.finished = Some(session.finished_flag());
        *engine.slot.lock().unwrap() = Some(session);
        engine.clock.play();

        let mut buffer = vec![0.0f32; 512];
        for _ in 0..8 {
            if let Some(session) = engine.slot.lock().unwrap().as_mut() {
                session.render_into(&mut buffer);
            }
        }

        assert_eq!(engine.take_events(), vec![EngineEvent::SongEnded]);
        assert_eq!(engine.state(), TransportState::Loaded);
        assert_eq!(engine.current_time(), 0.0);
        assert!(engine.take_events().is_empty(), "the end event fires once");
    }

    #[test]
    fn test_export_roundtrip() {
        let mut engine = Engine::new();
        engine.load_audio_file(wav_bytes(4_410)).unwrap();
        engine.take_events();

        let bytes = engine.export_audio(ExportFormat::Wav, None).unwrap();
        assert_eq!(&bytes[0..4], b"RIFF");
        assert_eq!(bytes.len(), 44 + 4_410 * 4);
        assert_eq!(engine.take_events(), vec![EngineEvent::ExportCompleted]);
    }

    #[test]
    fn test_export_without_song_fails() {
        let mut engine = Engine::new();
        let err = engine.export_audio(ExportFormat::Wav, None).unwrap_err();
        assert!(matches!(err, EngineError::NoAssetLoaded));
    }

    #[test]
    fn test_export_honors_speed() {
        let mut engine = Engine::new();
        engine.load_audio_file(wav_bytes(44_100)).unwrap();
        engine.set_parameters(ParameterUpdate {
            speed: Some(2.0),
            ..ParameterUpdate::default()
        });

        let bytes = engine.export_audio(ExportFormat::Wav, None).unwrap();
        assert_eq!(bytes.len(), 44 + 22_050 * 4);
    }

    #[test]
    fn test_visualization_is_idle_before_playback() {
        let mut engine = Engine::new();
        engine.load_audio_file(wav_bytes(4_410)).unwrap();
        assert!(engine.frequency_data().iter().all(|&b| b == 0));
        assert!(engine.waveform_data().iter().all(|&b| b == 128));
    }

    #[test]
    fn test_destroy_is_idempotent_and_reusable() {
        let mut engine = Engine::new();
        engine.load_audio_file(wav_bytes(4_410)).unwrap();
        engine.destroy();
        engine.destroy();
        assert_eq!(engine.state(), TransportState::Idle);

        engine.load_audio_file(wav_bytes(4_410)).unwrap();
        assert_eq!(engine.state(), TransportState::Loaded);
    }
}
