//! Network-backed natural-voice synthesis engine.
//!
//! Talks to the Google Translate TTS endpoint (the same one gTTS uses):
//! a GET with the text and language code, answered by MP3 bytes. Primary
//! engine; failures fall back to the local engine.

use crate::error::{Result, VoxbridgeError};
use crate::languages;
use crate::synth::engine::{AudioFormat, SynthesisEngine, SynthesisResult};
use async_trait::async_trait;
use tracing::debug;

const DEFAULT_ENDPOINT: &str = "https://translate.google.com/translate_tts";

/// Configuration for the network synthesis engine.
#[derive(Debug, Clone)]
pub struct NetworkSynthesizerConfig {
    pub endpoint: String,
    /// Slow speaking rate, matching the provider's "slow" flag.
    pub slow: bool,
}

impl Default for NetworkSynthesizerConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            slow: false,
        }
    }
}

/// Synthesis engine backed by the network TTS endpoint.
pub struct NetworkSynthesizer {
    config: NetworkSynthesizerConfig,
    client: reqwest::Client,
}

impl NetworkSynthesizer {
    pub fn new(config: NetworkSynthesizerConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl SynthesisEngine for NetworkSynthesizer {
    async fn synthesize(&self, text: &str, language: &str) -> Result<SynthesisResult> {
        debug!(language, chars = text.len(), "requesting network synthesis");

        let speed = if self.config.slow { "0.3" } else { "1" };
        let response = self
            .client
            .get(&self.config.endpoint)
            .query(&[
                ("ie", "UTF-8"),
                ("client", "tw-ob"),
                ("tl", language),
                ("ttsspeed", speed),
                ("q", text),
            ])
            .send()
            .await
            .map_err(|e| VoxbridgeError::ProviderUnavailable {
                message: format!("TTS request failed: {e}"),
            })?;

        let status = response.status();
        if status.is_server_error() || status.as_u16() == 429 {
            return Err(VoxbridgeError::ProviderUnavailable {
                message: format!("TTS provider returned status {status}"),
            });
        }
        if !status.is_success() {
            return Err(VoxbridgeError::Synthesis {
                message: format!("TTS provider returned status {status}"),
            });
        }

        let audio = response
            .bytes()
            .await
            .map_err(|e| VoxbridgeError::ProviderUnavailable {
                message: format!("failed to read TTS response: {e}"),
            })?
            .to_vec();

        if audio.is_empty() {
            return Err(VoxbridgeError::Synthesis {
                message: "TTS provider returned no audio".to_string(),
            });
        }

        Ok(SynthesisResult {
            audio,
            format: AudioFormat::Mp3,
            engine: self.name().to_string(),
        })
    }

    fn supports_language(&self, language: &str) -> bool {
        // The network engine carries a voice for every supported language.
        languages::is_supported(language)
    }

    fn name(&self) -> &str {
        "gtts"
    }
}
