//! Trait for speech recognition engines.

use crate::audio::AudioClip;
use crate::error::{Result, VoxbridgeError};
use async_trait::async_trait;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

/// Result of a successful recognition.
#[derive(Debug, Clone, PartialEq)]
pub struct RecognitionResult {
    /// Recognized text (UTF-8).
    pub text: String,
    /// Source language code the clip was recognized in.
    pub language: String,
    /// Name of the engine that produced the text.
    pub engine: String,
    /// Engine-reported confidence, 0.0–1.0.
    pub confidence: f32,
}

/// Trait for speech-to-text engines.
///
/// Each implementation (cloud API, local Whisper, mock) independently
/// satisfies the same capability; the adapter tries them in a fixed
/// preference order.
#[async_trait]
pub trait RecognitionEngine: Send + Sync {
    /// Recognize speech in the clip, returning the transcribed text.
    ///
    /// # Arguments
    /// * `clip` - Mono 16kHz PCM audio
    /// * `language` - ISO 639-1 code of the spoken language
    async fn recognize(&self, clip: &AudioClip, language: &str) -> Result<String>;

    /// Engine name, used for the engine-used tag and logging.
    fn name(&self) -> &str;

    /// Whether the engine can currently serve requests.
    ///
    /// Unavailable engines (missing model, no credentials) are skipped by
    /// the adapter without counting as a failure.
    fn is_available(&self) -> bool;
}

/// Mock recognition engine for testing.
#[derive(Debug, Clone)]
pub struct MockRecognitionEngine {
    name: String,
    response: String,
    should_fail: bool,
    available: bool,
    delay: Option<Duration>,
    calls: Arc<AtomicU32>,
}

impl MockRecognitionEngine {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            response: "mock recognition".to_string(),
            should_fail: false,
            available: true,
            delay: None,
            calls: Arc::new(AtomicU32::new(0)),
        }
    }

    /// Configure the mock to return a specific transcription.
    pub fn with_response(mut self, response: &str) -> Self {
        self.response = response.to_string();
        self
    }

    /// Configure the mock to fail on recognize.
    pub fn with_failure(mut self) -> Self {
        self.should_fail = true;
        self
    }

    /// Configure the mock to report itself unavailable.
    pub fn with_unavailable(mut self) -> Self {
        self.available = false;
        self
    }

    /// Configure the mock to sleep before responding (for timeout tests).
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Number of times recognize was invoked.
    pub fn call_count(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    /// Shared handle to the call counter, usable after the mock is moved
    /// into an adapter.
    pub fn calls_handle(&self) -> Arc<AtomicU32> {
        self.calls.clone()
    }
}

#[async_trait]
impl RecognitionEngine for MockRecognitionEngine {
    async fn recognize(&self, _clip: &AudioClip, _language: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.should_fail {
            Err(VoxbridgeError::Recognition {
                message: format!("mock engine {} failure", self.name),
            })
        } else {
            Ok(self.response.clone())
        }
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn is_available(&self) -> bool {
        self.available
    }
}
