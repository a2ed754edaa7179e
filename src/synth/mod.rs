//! Speech synthesis: engine trait, concrete engines, and the fallback
//! adapter with per-engine voice capability checks.

pub mod adapter;
pub mod engine;
pub mod espeak;
pub mod network;

pub use adapter::SynthesisAdapter;
pub use engine::{AudioFormat, MockSynthesisEngine, SynthesisEngine, SynthesisResult};
