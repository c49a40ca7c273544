//! Crossfade between two songs using a pair of engines.
//!
//! The deck owns the playing engine and, once prepared, the next one.
//! Starting a crossfade fades the current engine's output down while the
//! next engine starts from silence and fades up; both follow the linear
//! law in [`crossfade_gains`], so the summed gain stays at one for
//! equal-loudness material. When the fade window has passed, a poll
//! retires the old engine and promotes the new one.

use crate::engine::Engine;
use crate::error::Result;
use crate::params::{ParameterSet, ParameterUpdate};
use std::time::Instant;

/// Crossfade length used when the caller does not pick one.
pub const DEFAULT_CROSSFADE_SECONDS: f64 = 3.0;

/// Linear crossfade gains at `elapsed` seconds into a fade of
/// `duration` seconds: `(outgoing, incoming)`.
///
/// The pair always sums to one. A non-positive duration snaps straight
/// to the incoming song.
pub fn crossfade_gains(elapsed: f64, duration: f64) -> (f32, f32) {
    let x = if duration <= 0.0 {
        1.0
    } else {
        (elapsed / duration).clamp(0.0, 1.0)
    };
    ((1.0 - x) as f32, x as f32)
}

struct FadeState {
    started_at: Instant,
    duration: f64,
}

/// Two-engine deck for gapless song transitions.
pub struct CrossfadeDeck {
    current: Engine,
    next: Option<Engine>,
    fade: Option<FadeState>,
}

impl CrossfadeDeck {
    /// A deck fronting `engine`.
    pub fn new(engine: Engine) -> Self {
        Self {
            current: engine,
            next: None,
            fade: None,
        }
    }

    /// The engine currently fronting the deck.
    pub fn current(&self) -> &Engine {
        &self.current
    }

    /// Mutable access to the fronting engine.
    pub fn current_mut(&mut self) -> &mut Engine {
        &mut self.current
    }

    /// Decode the next song into a fresh engine carrying `params`.
    ///
    /// Replaces any previously prepared song. Returns the new song's
    /// duration in seconds.
    pub fn prepare(&mut self, bytes: Vec<u8>, params: &ParameterSet) -> Result<f64> {
        let mut engine = Engine::new();
        let duration = engine.load_audio_file(bytes)?;
        engine.set_parameters(ParameterUpdate::from(*params));
        self.next = Some(engine);
        Ok(duration)
    }

    /// True once a next song is prepared and not yet promoted.
    pub fn has_next(&self) -> bool {
        self.next.is_some()
    }

    /// True while a crossfade is in flight.
    pub fn is_fading(&self) -> bool {
        self.fade.is_some()
    }

    /// Begin the crossfade over `duration` seconds.
    ///
    /// No-op when no song is prepared or a fade is already running. On a
    /// device failure the prepared song is kept so the call can be
    /// retried.
    pub fn start(&mut self, duration: f64) -> Result<()> {
        self.start_at(duration, Instant::now())
    }

    /// [`CrossfadeDeck::start`] with an explicit clock reading.
    pub fn start_at(&mut self, duration: f64, now: Instant) -> Result<()> {
        if self.fade.is_some() {
            return Ok(());
        }
        let Some(next) = self.next.as_mut() else {
            return Ok(());
        };

        next.play_with_fade(duration as f32)?;
        self.current.begin_fade(0.0, duration as f32);
        self.fade = Some(FadeState {
            started_at: now,
            duration,
        });
        Ok(())
    }

    /// Retire the outgoing engine once the fade window has passed.
    ///
    /// Returns true when the handover happened on this call.
    pub fn poll(&mut self) -> bool {
        self.poll_at(Instant::now())
    }

    /// [`CrossfadeDeck::poll`] with an explicit clock reading.
    pub fn poll_at(&mut self, now: Instant) -> bool {
        let Some(fade) = &self.fade else {
            return false;
        };
        if now.duration_since(fade.started_at).as_secs_f64() < fade.duration {
            return false;
        }

        self.current.destroy();
        if let Some(next) = self.next.take() {
            self.current = next;
        }
        self.fade = None;
        true
    }
}
