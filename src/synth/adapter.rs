//! Synthesis adapter: fixed-priority fallback over multiple engines.
//!
//! Mirrors the recognition adapter's policy: engines are tried in order
//! (network natural-voice first, local offline second), each attempt is
//! bounded by the stage timeout, and the last error surfaces when every
//! engine has been exhausted. An engine without a voice for the target
//! language is skipped entirely.

use crate::error::{Result, VoxbridgeError};
use crate::synth::engine::{SynthesisEngine, SynthesisResult};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Adapter that synthesizes speech via an ordered engine list.
pub struct SynthesisAdapter {
    engines: Vec<Arc<dyn SynthesisEngine>>,
    stage_timeout: Duration,
}

impl SynthesisAdapter {
    /// Create an adapter from engines in preference order.
    ///
    /// # Panics
    /// Panics if `engines` is empty.
    pub fn new(engines: Vec<Arc<dyn SynthesisEngine>>) -> Self {
        assert!(!engines.is_empty(), "need at least one synthesis engine");
        Self {
            engines,
            stage_timeout: crate::defaults::STAGE_TIMEOUT,
        }
    }

    /// Set the per-engine-call timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.stage_timeout = timeout;
        self
    }

    /// Synthesize text into playable audio.
    ///
    /// # Errors
    /// `NoVoiceForLanguage` when no engine has a voice for the language;
    /// `Synthesis` when every capable engine fails.
    pub async fn synthesize(&self, text: &str, language: &str) -> Result<SynthesisResult> {
        if text.trim().is_empty() {
            return Err(VoxbridgeError::Synthesis {
                message: "empty text".to_string(),
            });
        }

        if !self.engines.iter().any(|e| e.supports_language(language)) {
            return Err(VoxbridgeError::NoVoiceForLanguage {
                language: language.to_string(),
            });
        }

        let mut last_err: Option<VoxbridgeError> = None;

        for engine in &self.engines {
            if !engine.supports_language(language) {
                info!(
                    engine = engine.name(),
                    language, "engine has no voice for language, skipping"
                );
                continue;
            }

            let attempt = tokio::time::timeout(self.stage_timeout, engine.synthesize(text, language));
            match attempt.await {
                Ok(Ok(result)) if !result.audio.is_empty() => {
                    info!(engine = engine.name(), "synthesis succeeded");
                    return Ok(result);
                }
                Ok(Ok(_)) => {
                    warn!(engine = engine.name(), "engine returned empty audio");
                    last_err = Some(VoxbridgeError::Synthesis {
                        message: format!("engine {} returned empty audio", engine.name()),
                    });
                }
                Ok(Err(e)) => {
                    warn!(engine = engine.name(), error = %e, "synthesis engine failed");
                    last_err = Some(e);
                }
                Err(_) => {
                    warn!(engine = engine.name(), "synthesis engine timed out");
                    last_err = Some(VoxbridgeError::StageTimeout {
                        timeout_secs: self.stage_timeout.as_secs(),
                    });
                }
            }
        }

        Err(VoxbridgeError::Synthesis {
            message: match last_err {
                Some(e) => format!("all engines failed, last error: {e}"),
                None => "no synthesis engine available".to_string(),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synth::engine::{AudioFormat, MockSynthesisEngine};
    use std::sync::atomic::Ordering;

    #[tokio::test]
    async fn test_primary_engine_wins() {
        let primary =
            MockSynthesisEngine::new("primary").with_audio(vec![1, 2, 3], AudioFormat::Mp3);
        let secondary = MockSynthesisEngine::new("secondary");
        let secondary_calls = secondary.calls_handle();

        let adapter = SynthesisAdapter::new(vec![Arc::new(primary), Arc::new(secondary)]);
        let result = adapter.synthesize("hello", "en").await.unwrap();

        assert_eq!(result.audio, vec![1, 2, 3]);
        assert_eq!(result.engine, "primary");
        assert_eq!(secondary_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_falls_back_on_primary_failure() {
        let primary = MockSynthesisEngine::new("primary").with_failure();
        let secondary =
            MockSynthesisEngine::new("secondary").with_audio(vec![9, 9], AudioFormat::Wav);

        let adapter = SynthesisAdapter::new(vec![Arc::new(primary), Arc::new(secondary)]);
        let result = adapter.synthesize("hello", "en").await.unwrap();

        assert_eq!(result.engine, "secondary");
        assert_eq!(result.format, AudioFormat::Wav);
    }

    #[tokio::test]
    async fn test_skips_engine_without_voice() {
        let no_voice = MockSynthesisEngine::new("narrow").with_languages(&["en"]);
        let no_voice_calls = no_voice.calls_handle();
        let wide = MockSynthesisEngine::new("wide");

        let adapter = SynthesisAdapter::new(vec![Arc::new(no_voice), Arc::new(wide)]);
        let result = adapter.synthesize("こんにちは", "ja").await.unwrap();

        assert_eq!(result.engine, "wide");
        assert_eq!(no_voice_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_no_voice_anywhere() {
        let a = MockSynthesisEngine::new("a").with_languages(&["en"]);
        let b = MockSynthesisEngine::new("b").with_languages(&["es", "fr"]);

        let adapter = SynthesisAdapter::new(vec![Arc::new(a), Arc::new(b)]);
        let result = adapter.synthesize("नमस्ते", "hi").await;

        match result {
            Err(VoxbridgeError::NoVoiceForLanguage { language }) => assert_eq!(language, "hi"),
            other => panic!("Expected NoVoiceForLanguage, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_all_engines_fail() {
        let a = MockSynthesisEngine::new("a").with_failure();
        let b = MockSynthesisEngine::new("b").with_failure();

        let adapter = SynthesisAdapter::new(vec![Arc::new(a), Arc::new(b)]);
        let result = adapter.synthesize("hello", "en").await;

        match result {
            Err(VoxbridgeError::Synthesis { message }) => {
                assert!(message.contains("all engines failed"), "{message}");
            }
            other => panic!("Expected Synthesis error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_empty_text_rejected() {
        let adapter = SynthesisAdapter::new(vec![Arc::new(MockSynthesisEngine::new("a"))]);
        let result = adapter.synthesize("  ", "en").await;
        assert!(matches!(result, Err(VoxbridgeError::Synthesis { .. })));
    }

    #[tokio::test]
    async fn test_empty_audio_falls_through() {
        let empty = MockSynthesisEngine::new("empty").with_audio(vec![], AudioFormat::Mp3);
        let good = MockSynthesisEngine::new("good").with_audio(vec![7], AudioFormat::Mp3);

        let adapter = SynthesisAdapter::new(vec![Arc::new(empty), Arc::new(good)]);
        let result = adapter.synthesize("hello", "en").await.unwrap();
        assert_eq!(result.engine, "good");
    }

    #[tokio::test]
    async fn test_timeout_triggers_fallback() {
        let slow = MockSynthesisEngine::new("slow").with_delay(Duration::from_millis(200));
        let fast = MockSynthesisEngine::new("fast").with_audio(vec![5], AudioFormat::Mp3);

        let adapter = SynthesisAdapter::new(vec![Arc::new(slow), Arc::new(fast)])
            .with_timeout(Duration::from_millis(50));
        let result = adapter.synthesize("hello", "en").await.unwrap();

        assert_eq!(result.engine, "fast");
    }

    #[test]
    #[should_panic(expected = "need at least one synthesis engine")]
    fn test_empty_engine_list_panics() {
        SynthesisAdapter::new(vec![]);
    }
}
