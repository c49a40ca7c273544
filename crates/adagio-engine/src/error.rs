//! Engine error taxonomy.

/// Errors surfaced by engine operations.
///
/// Numeric input never errors: out-of-range values are clamped on entry.
/// Transport calls in a state where they make no sense are ignored rather
/// than rejected.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The supplied bytes could not be decoded as audio. The engine keeps
    /// its prior asset and state.
    #[error("failed to decode audio: {0}")]
    DecodeFailure(String),

    /// Export was requested in a format the engine does not produce.
    #[error("unsupported export format: {0}")]
    UnsupportedExportFormat(String),

    /// No audio output device could be acquired. Surfaced from `play()`
    /// and retried on the next attempt.
    #[error("audio output device unavailable: {0}")]
    DeviceUnavailable(String),

    /// An operation that needs a loaded asset ran before any successful
    /// load.
    #[error("no audio loaded")]
    NoAssetLoaded,

    /// Rendering succeeded but the container could not be written.
    #[error("export failed: {0}")]
    ExportFailure(String),
}

/// Convenience result type for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;
