//! A live playback session: source, chain, and analysis plumbing.
//!
//! The session is the unit the audio callback works on. It lives inside
//! a shared slot; the callback takes the slot with `try_lock` and renders
//! silence when the control thread is mid-swap. A session exists only
//! while the transport is playing.

use crate::analysis::AnalysisTap;
use crate::graph::SignalChain;
use crate::params::{EchoSettings, ParameterSet};
use crate::source::AssetSource;
use adagio_core::math::mono_sum;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

/// Shared handle the audio callback pulls sessions from.
pub(crate) type SessionSlot = Arc<Mutex<Option<ActiveSession>>>;

/// Everything needed to render one playing song.
pub(crate) struct ActiveSession {
    source: AssetSource,
    chain: SignalChain,
    tap: Arc<AnalysisTap>,
    finished: Arc<AtomicBool>,
    /// Mono scratch reused across callbacks to keep the audio thread
    /// allocation-free after warmup.
    scratch: Vec<f32>,
}

impl ActiveSession {
    pub(crate) fn new(source: AssetSource, chain: SignalChain, tap: Arc<AnalysisTap>) -> Self {
        Self {
            source,
            chain,
            tap,
            finished: Arc::new(AtomicBool::new(false)),
            scratch: Vec::new(),
        }
    }

    /// Flag the control thread polls to detect natural song end.
    pub(crate) fn finished_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.finished)
    }

    /// Fill an interleaved stereo buffer.
    ///
    /// After the source runs out the chain keeps processing silence, so
    /// reverb and echo tails ring out until the session is torn down.
    pub(crate) fn render_into(&mut self, data: &mut [f32]) {
        self.scratch.clear();
        self.scratch.reserve(data.len() / 2);

        let mut frames = data.chunks_exact_mut(2);
        for frame in frames.by_ref() {
            let (l, r) = self.source.next_frame();
            let (l, r) = self.chain.process(l, r);
            frame[0] = l;
            frame[1] = r;
            self.scratch.push(mono_sum(l, r));
        }
        for sample in frames.into_remainder() {
            *sample = 0.0;
        }

        self.tap.push_block(&self.scratch);
        if self.source.is_finished() {
            self.finished.store(true, Ordering::Release);
        }
    }

    pub(crate) fn apply_params(&mut self, params: &ParameterSet) {
        self.chain.apply(params);
    }

    pub(crate) fn set_echo(&mut self, echo: &EchoSettings) {
        self.chain.set_echo(echo);
    }

    pub(crate) fn begin_fade(&mut self, target: f32, seconds: f32) {
        self.chain.begin_fade(target, seconds);
    }
}
