//! Trait for speech synthesis engines.

use crate::error::{Result, VoxbridgeError};
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

/// Audio container format of a synthesis result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioFormat {
    /// Compressed audio from the network engine.
    Mp3,
    /// Raw PCM in a WAV container from the local engine.
    Wav,
}

impl AudioFormat {
    /// Conventional file extension for the format.
    pub fn extension(&self) -> &'static str {
        match self {
            AudioFormat::Mp3 => "mp3",
            AudioFormat::Wav => "wav",
        }
    }
}

/// Result of a successful synthesis.
#[derive(Debug, Clone, PartialEq)]
pub struct SynthesisResult {
    /// Generated audio bytes.
    pub audio: Vec<u8>,
    /// Container format of `audio`.
    pub format: AudioFormat,
    /// Name of the engine that produced the audio.
    pub engine: String,
}

/// Trait for text-to-speech engines.
///
/// Each implementation (network natural-voice, local offline, mock)
/// independently satisfies the same capability; the adapter tries them in a
/// fixed preference order.
#[async_trait]
pub trait SynthesisEngine: Send + Sync {
    /// Synthesize text into audio.
    async fn synthesize(&self, text: &str, language: &str) -> Result<SynthesisResult>;

    /// Whether the engine has a voice for the language.
    ///
    /// The local engine's voice set is narrower than the network engine's;
    /// engines without a voice are skipped rather than tried.
    fn supports_language(&self, language: &str) -> bool;

    /// Engine name, used for the engine-used tag and logging.
    fn name(&self) -> &str;
}

/// Mock synthesis engine for testing.
#[derive(Debug, Clone)]
pub struct MockSynthesisEngine {
    name: String,
    audio: Vec<u8>,
    format: AudioFormat,
    should_fail: bool,
    languages: Option<HashSet<String>>,
    delay: Option<Duration>,
    calls: Arc<AtomicU32>,
}

impl MockSynthesisEngine {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            audio: vec![0xFF, 0xFB, 0x90, 0x00],
            format: AudioFormat::Mp3,
            should_fail: false,
            languages: None,
            delay: None,
            calls: Arc::new(AtomicU32::new(0)),
        }
    }

    /// Configure the mock to return specific audio bytes.
    pub fn with_audio(mut self, audio: Vec<u8>, format: AudioFormat) -> Self {
        self.audio = audio;
        self.format = format;
        self
    }

    /// Configure the mock to fail on synthesize.
    pub fn with_failure(mut self) -> Self {
        self.should_fail = true;
        self
    }

    /// Restrict the mock's voice set to the given languages.
    pub fn with_languages(mut self, languages: &[&str]) -> Self {
        self.languages = Some(languages.iter().map(|l| l.to_string()).collect());
        self
    }

    /// Configure the mock to sleep before responding (for timeout tests).
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Number of times synthesize was invoked.
    pub fn call_count(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    /// Shared handle to the call counter.
    pub fn calls_handle(&self) -> Arc<AtomicU32> {
        self.calls.clone()
    }
}

#[async_trait]
impl SynthesisEngine for MockSynthesisEngine {
    async fn synthesize(&self, _text: &str, _language: &str) -> Result<SynthesisResult> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.should_fail {
            Err(VoxbridgeError::Synthesis {
                message: format!("mock engine {} failure", self.name),
            })
        } else {
            Ok(SynthesisResult {
                audio: self.audio.clone(),
                format: self.format,
                engine: self.name.clone(),
            })
        }
    }

    fn supports_language(&self, language: &str) -> bool {
        match &self.languages {
            Some(set) => set.contains(language),
            None => true,
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}
