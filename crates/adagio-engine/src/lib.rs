//! Audio processing engine: one song, a fixed effect chain, and a
//! transport.
//!
//! This crate ties the DSP stages from `adagio-effects` and the I/O layer
//! from `adagio-io` into a complete player:
//!
//! - **Engine**: [`Engine`] loads a song, applies the parameter set live,
//!   and plays through the default output device
//! - **Parameters**: [`ParameterSet`] / [`ParameterUpdate`] with clamped
//!   merging and undo history
//! - **Presets**: [`factory_presets`] plus TOML load/save for user banks
//! - **Offline export**: [`render`] and [`Engine::export_audio`] for
//!   faster-than-real-time WAV rendering
//! - **Visualization**: byte-scaled spectrum and waveform snapshots
//! - **Crossfades**: [`CrossfadeDeck`] for gapless transitions between
//!   two songs
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use adagio_engine::{Engine, ExportFormat, ParameterUpdate, factory_preset};
//!
//! let mut engine = Engine::new();
//! engine.load_audio_file(std::fs::read("song.mp3")?)?;
//!
//! let preset = factory_preset("classic-slowed").unwrap();
//! engine.apply_preset(&preset);
//! engine.set_parameters(ParameterUpdate {
//!     reverb_amount: Some(40.0),
//!     ..ParameterUpdate::default()
//! });
//!
//! let wav = engine.export_audio(ExportFormat::Wav, None)?;
//! std::fs::write("song-slowed.wav", wav)?;
//! ```

pub mod analysis;
pub mod clock;
pub mod crossfade;
mod engine;
mod error;
mod events;
pub mod history;
pub mod params;
pub mod preset;
pub mod render;

mod graph;
mod session;
mod source;

pub use analysis::{AnalysisTap, FFT_SIZE, FREQUENCY_BINS};
pub use clock::{TransportClock, TransportState};
pub use crossfade::{CrossfadeDeck, DEFAULT_CROSSFADE_SECONDS, crossfade_gains};
pub use engine::Engine;
pub use error::{EngineError, Result};
pub use events::EngineEvent;
pub use history::EditHistory;
pub use params::{EchoSettings, FIELDS, ParamDescriptor, ParameterSet, ParameterUpdate};
pub use preset::{
    Preset, PresetError, factory_preset, factory_presets, load_preset, save_preset,
};
pub use render::{
    ExportFormat, RenderedAudio, encode, render, render_with_progress,
};
