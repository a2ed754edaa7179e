//! Local offline synthesis engine.
//!
//! Shells out to `espeak-ng --stdout`, which writes a WAV stream for the
//! requested voice. The voice set is narrower than the network engine's;
//! only languages with a known espeak voice are offered.

use crate::error::{Result, VoxbridgeError};
use crate::synth::engine::{AudioFormat, SynthesisEngine, SynthesisResult};
use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

/// Languages with an espeak-ng voice, as (language code, voice name).
///
/// Deliberately narrower than the network engine: the offline voices for
/// the remaining registry languages are low quality enough to be worse
/// than failing over.
const VOICES: &[(&str, &str)] = &[
    ("es", "es"),
    ("en", "en"),
    ("fr", "fr"),
    ("de", "de"),
    ("it", "it"),
    ("pt", "pt"),
    ("ru", "ru"),
];

/// Configuration for the local synthesis engine.
#[derive(Debug, Clone)]
pub struct EspeakSynthesizerConfig {
    /// Binary to invoke.
    pub program: String,
    /// Words per minute.
    pub speed: u32,
    /// Amplitude, 0–200.
    pub amplitude: u32,
}

impl Default for EspeakSynthesizerConfig {
    fn default() -> Self {
        Self {
            program: "espeak-ng".to_string(),
            speed: 150,
            amplitude: 180,
        }
    }
}

/// Offline synthesis engine backed by the espeak-ng subprocess.
pub struct EspeakSynthesizer {
    config: EspeakSynthesizerConfig,
}

impl EspeakSynthesizer {
    pub fn new(config: EspeakSynthesizerConfig) -> Self {
        Self { config }
    }

    fn voice_for(language: &str) -> Option<&'static str> {
        VOICES
            .iter()
            .find(|(code, _)| *code == language)
            .map(|(_, voice)| *voice)
    }
}

#[async_trait]
impl SynthesisEngine for EspeakSynthesizer {
    async fn synthesize(&self, text: &str, language: &str) -> Result<SynthesisResult> {
        let voice = Self::voice_for(language).ok_or_else(|| VoxbridgeError::NoVoiceForLanguage {
            language: language.to_string(),
        })?;

        debug!(voice, chars = text.len(), "running local synthesis");

        let output = Command::new(&self.config.program)
            .arg("--stdout")
            .args(["-v", voice])
            .args(["-s", &self.config.speed.to_string()])
            .args(["-a", &self.config.amplitude.to_string()])
            .arg(text)
            .output()
            .await
            .map_err(|e| VoxbridgeError::Synthesis {
                message: format!("failed to run {}: {e}", self.config.program),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(VoxbridgeError::Synthesis {
                message: format!(
                    "{} exited with {}: {}",
                    self.config.program,
                    output.status,
                    stderr.trim()
                ),
            });
        }

        if output.stdout.is_empty() {
            return Err(VoxbridgeError::Synthesis {
                message: format!("{} produced no audio", self.config.program),
            });
        }

        Ok(SynthesisResult {
            audio: output.stdout,
            format: AudioFormat::Wav,
            engine: self.name().to_string(),
        })
    }

    fn supports_language(&self, language: &str) -> bool {
        Self::voice_for(language).is_some()
    }

    fn name(&self) -> &str {
        "espeak"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_voice_set_is_narrower_than_registry() {
        assert!(VOICES.len() < crate::languages::SUPPORTED_LANGUAGES.len());
    }

    #[test]
    fn test_voice_lookup() {
        assert_eq!(EspeakSynthesizer::voice_for("es"), Some("es"));
        assert_eq!(EspeakSynthesizer::voice_for("en"), Some("en"));
        assert_eq!(EspeakSynthesizer::voice_for("hi"), None);
        assert_eq!(EspeakSynthesizer::voice_for("zh-cn"), None);
    }

    #[test]
    fn test_supports_language_matches_voice_table() {
        let engine = EspeakSynthesizer::new(EspeakSynthesizerConfig::default());
        assert!(engine.supports_language("fr"));
        assert!(!engine.supports_language("ja"));
    }

    #[test]
    fn test_default_config() {
        let config = EspeakSynthesizerConfig::default();
        assert_eq!(config.program, "espeak-ng");
        assert_eq!(config.speed, 150);
        assert_eq!(config.amplitude, 180);
    }

    #[tokio::test]
    async fn test_unsupported_language_fails_before_subprocess() {
        // "hi" has no voice, so this errors without needing espeak installed.
        let engine = EspeakSynthesizer::new(EspeakSynthesizerConfig::default());
        let result = engine.synthesize("नमस्ते", "hi").await;
        assert!(matches!(
            result,
            Err(VoxbridgeError::NoVoiceForLanguage { .. })
        ));
    }

    #[tokio::test]
    async fn test_missing_binary_reports_synthesis_error() {
        let config = EspeakSynthesizerConfig {
            program: "espeak-ng-definitely-not-installed".to_string(),
            ..Default::default()
        };
        let engine = EspeakSynthesizer::new(config);
        let result = engine.synthesize("hola", "es").await;
        assert!(matches!(result, Err(VoxbridgeError::Synthesis { .. })));
    }
}
