//! Recognition adapter: fixed-priority fallback over multiple engines.
//!
//! Engines are tried in the order given (network first, local model
//! second). An engine that is unavailable, fails, times out, or returns
//! empty text passes the clip to the next one; the last error surfaces
//! when every engine has been exhausted.

use crate::audio::AudioClip;
use crate::error::{Result, VoxbridgeError};
use crate::recognize::engine::{RecognitionEngine, RecognitionResult};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Adapter that recognizes speech via an ordered engine list.
pub struct RecognitionAdapter {
    engines: Vec<Arc<dyn RecognitionEngine>>,
    energy_threshold: f32,
    stage_timeout: Duration,
}

impl RecognitionAdapter {
    /// Create an adapter from engines in preference order.
    ///
    /// # Panics
    /// Panics if `engines` is empty.
    pub fn new(engines: Vec<Arc<dyn RecognitionEngine>>) -> Self {
        assert!(!engines.is_empty(), "need at least one recognition engine");
        Self {
            engines,
            energy_threshold: crate::defaults::ENERGY_THRESHOLD,
            stage_timeout: crate::defaults::STAGE_TIMEOUT,
        }
    }

    /// Set the minimum RMS energy for a clip to count as speech.
    pub fn with_energy_threshold(mut self, threshold: f32) -> Self {
        self.energy_threshold = threshold;
        self
    }

    /// Set the per-engine-call timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.stage_timeout = timeout;
        self
    }

    /// Recognize speech in the clip.
    ///
    /// # Errors
    /// `NoSpeechDetected` when the clip's energy is below the threshold;
    /// `Recognition` when every engine fails.
    pub async fn recognize(&self, clip: &AudioClip, language: &str) -> Result<RecognitionResult> {
        if clip.rms_energy() < self.energy_threshold {
            return Err(VoxbridgeError::NoSpeechDetected);
        }

        let mut last_err: Option<VoxbridgeError> = None;

        for engine in &self.engines {
            if !engine.is_available() {
                info!(engine = engine.name(), "recognition engine unavailable, skipping");
                continue;
            }

            let attempt = tokio::time::timeout(self.stage_timeout, engine.recognize(clip, language));
            match attempt.await {
                Ok(Ok(text)) if !text.trim().is_empty() => {
                    info!(engine = engine.name(), "recognition succeeded");
                    return Ok(RecognitionResult {
                        text: text.trim().to_string(),
                        language: language.to_string(),
                        engine: engine.name().to_string(),
                        confidence: 1.0,
                    });
                }
                Ok(Ok(_)) => {
                    warn!(engine = engine.name(), "engine returned empty text");
                    last_err = Some(VoxbridgeError::Recognition {
                        message: format!("engine {} returned empty text", engine.name()),
                    });
                }
                Ok(Err(e)) => {
                    warn!(engine = engine.name(), error = %e, "recognition engine failed");
                    last_err = Some(e);
                }
                Err(_) => {
                    warn!(engine = engine.name(), "recognition engine timed out");
                    last_err = Some(VoxbridgeError::StageTimeout {
                        timeout_secs: self.stage_timeout.as_secs(),
                    });
                }
            }
        }

        Err(VoxbridgeError::Recognition {
            message: match last_err {
                Some(e) => format!("all engines failed, last error: {e}"),
                None => "no recognition engine available".to_string(),
            },
        })
    }
}
