//! Audio clip handling: the captured-samples type and WAV encode/decode.

pub mod clip;
pub mod wav;

pub use clip::AudioClip;
