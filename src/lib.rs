//! voxbridge - Voice-to-voice translation pipeline
//!
//! Capture → recognition → translation → synthesis with per-stage fallback
//! engines, bounded retries, and cancellation.

#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
#![warn(clippy::let_underscore_must_use)]

pub mod audio;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod defaults;
pub mod error;
pub mod languages;
pub mod pipeline;
pub mod recognize;
pub mod synth;
pub mod translate;

// Core traits (one per stage)
pub use recognize::engine::RecognitionEngine;
pub use synth::engine::SynthesisEngine;
pub use translate::provider::TranslationProvider;

// Pipeline
pub use pipeline::cancel::CancelToken;
pub use pipeline::orchestrator::{Orchestrator, RunConfig};
pub use pipeline::run::{PipelineRun, RunEvent, RunFailure, RunStatus, Stage};

// Adapters
pub use recognize::RecognitionAdapter;
pub use synth::SynthesisAdapter;
pub use translate::TranslationAdapter;

// Error handling
pub use error::{Result, VoxbridgeError};

// Config
pub use config::Config;

// Audio
pub use audio::AudioClip;

/// Build version string from the crate version.
pub fn version_string() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_string_matches_cargo_version() {
        assert_eq!(version_string(), env!("CARGO_PKG_VERSION"));
    }
}
