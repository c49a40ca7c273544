//! Transport state machine and playback position tracking.
//!
//! The clock is a pure bookkeeping structure: it never touches audio.
//! Every mutation has an `_at` form taking an explicit [`Instant`] so
//! tests can drive it without sleeping; the plain forms use `Instant::now()`.
//!
//! Position advances at `rate` times wall time. Rate follows the speed
//! parameter only; pitch shift changes how fast the renderer consumes the
//! asset but not how the position is reported.

use std::time::Instant;

/// Where the transport currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportState {
    /// No audio loaded.
    Idle,
    /// Audio loaded, not playing.
    Loaded,
    /// Actively playing.
    Playing,
    /// Paused mid-song; position is retained.
    Paused,
}

/// Tracks playback position against wall-clock time.
#[derive(Debug, Clone)]
pub struct TransportClock {
    state: TransportState,
    /// Anchor for the currently running stretch of playback.
    started_at: Option<Instant>,
    /// Position accumulated before the current anchor, in seconds.
    carried_offset: f64,
    rate: f64,
    duration: f64,
}

impl TransportClock {
    /// A clock with nothing loaded.
    pub fn new() -> Self {
        Self {
            state: TransportState::Idle,
            started_at: None,
            carried_offset: 0.0,
            rate: 1.0,
            duration: 0.0,
        }
    }

    /// Adopt a new song of the given duration, resetting the position.
    pub fn load(&mut self, duration_seconds: f64) {
        self.state = TransportState::Loaded;
        self.started_at = None;
        self.carried_offset = 0.0;
        self.duration = duration_seconds.max(0.0);
    }

    /// Start or resume playback. No-op unless loaded or paused.
    pub fn play(&mut self) {
        self.play_at(Instant::now());
    }

    /// [`TransportClock::play`] with an explicit clock reading.
    pub fn play_at(&mut self, now: Instant) {
        match self.state {
            TransportState::Loaded | TransportState::Paused => {
                self.started_at = Some(now);
                self.state = TransportState::Playing;
            }
            TransportState::Idle | TransportState::Playing => {}
        }
    }

    /// Pause, retaining the current position. No-op unless playing.
    pub fn pause(&mut self) {
        self.pause_at(Instant::now());
    }

    /// [`TransportClock::pause`] with an explicit clock reading.
    pub fn pause_at(&mut self, now: Instant) {
        if self.state == TransportState::Playing {
            self.carried_offset = self.elapsed_at(now);
            self.started_at = None;
            self.state = TransportState::Paused;
        }
    }

    /// Stop and rewind to zero. No-op unless playing or paused.
    pub fn stop(&mut self) {
        if matches!(self.state, TransportState::Playing | TransportState::Paused) {
            self.state = TransportState::Loaded;
            self.started_at = None;
            self.carried_offset = 0.0;
        }
    }

    /// Mark the song as naturally finished: back to loaded, position zero.
    pub fn finish(&mut self) {
        self.stop();
    }

    /// Jump to a position, clamped to `[0, duration]`. No-op when idle.
    pub fn seek_to(&mut self, seconds: f64) {
        self.seek_to_at(seconds, Instant::now());
    }

    /// [`TransportClock::seek_to`] with an explicit clock reading.
    pub fn seek_to_at(&mut self, seconds: f64, now: Instant) {
        if self.state == TransportState::Idle {
            return;
        }
        self.carried_offset = seconds.clamp(0.0, self.duration);
        if self.state == TransportState::Playing {
            self.started_at = Some(now);
        }
    }

    /// Change the playback rate, folding in time already elapsed so the
    /// position stays continuous across the change.
    pub fn set_rate(&mut self, rate: f64) {
        self.set_rate_at(rate, Instant::now());
    }

    /// [`TransportClock::set_rate`] with an explicit clock reading.
    pub fn set_rate_at(&mut self, rate: f64, now: Instant) {
        if self.state == TransportState::Playing {
            self.carried_offset = self.elapsed_at(now);
            self.started_at = Some(now);
        }
        self.rate = rate.max(0.0);
    }

    /// Current playback position in seconds, capped at the duration.
    pub fn elapsed(&self) -> f64 {
        self.elapsed_at(Instant::now())
    }

    /// [`TransportClock::elapsed`] with an explicit clock reading.
    pub fn elapsed_at(&self, now: Instant) -> f64 {
        let position = match (self.state, self.started_at) {
            (TransportState::Playing, Some(anchor)) => {
                // duration_since saturates to zero if now precedes the anchor.
                let wall = now.duration_since(anchor).as_secs_f64();
                self.carried_offset + wall * self.rate
            }
            _ => self.carried_offset,
        };
        position.min(self.duration)
    }

    /// Current transport state.
    pub fn state(&self) -> TransportState {
        self.state
    }

    /// Duration of the loaded song in seconds; zero when idle.
    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// True while the transport is in [`TransportState::Playing`].
    pub fn is_playing(&self) -> bool {
        self.state == TransportState::Playing
    }
}

impl Default for TransportClock {
    fn default() -> Self {
        Self::new()
    }
}
