//! CLI command implementations.

pub mod common;
pub mod export;
pub mod info;
pub mod play;
pub mod presets;
