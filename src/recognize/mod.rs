//! Speech recognition: engine trait, concrete engines, and the fallback
//! adapter that tries engines in preference order.

pub mod adapter;
pub mod cloud;
pub mod engine;
pub mod whisper;

pub use adapter::RecognitionAdapter;
pub use engine::{MockRecognitionEngine, RecognitionEngine, RecognitionResult};
