//! Local Whisper-based recognition engine.
//!
//! Offline fallback for when the network speech API is unreachable. Wraps
//! whisper-rs around a preloaded ggml model artifact (named by size
//! variant, e.g. "tiny").
//!
//! # Feature Gate
//!
//! Real inference requires the `whisper` feature and cmake:
//!
//! ```bash
//! cargo build --features whisper
//! ```
//!
//! Without the feature, the engine reports itself unavailable so the
//! adapter skips it.

use crate::audio::AudioClip;
use crate::error::{Result, VoxbridgeError};
use crate::recognize::engine::RecognitionEngine;
use async_trait::async_trait;
use std::path::PathBuf;

#[cfg(feature = "whisper")]
use std::sync::{Arc, Mutex, Once};
#[cfg(feature = "whisper")]
use whisper_rs::{
    FullParams, SamplingStrategy, WhisperContext, WhisperContextParameters, install_logging_hooks,
};

#[cfg(feature = "whisper")]
static LOGGING_HOOKS_INSTALLED: Once = Once::new();

/// Configuration for the local Whisper engine.
#[derive(Debug, Clone)]
pub struct WhisperConfig {
    /// Path to the ggml model file.
    pub model_path: PathBuf,
    /// Number of threads for inference (None = auto-detect).
    pub threads: Option<usize>,
}

impl Default for WhisperConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from(format!("models/ggml-{}.bin", crate::defaults::DEFAULT_MODEL)),
            threads: None,
        }
    }
}

/// Local recognition engine backed by whisper-rs.
///
/// The WhisperContext is shared behind a Mutex; inference runs under
/// `spawn_blocking` so it does not stall the async runtime.
#[cfg(feature = "whisper")]
pub struct WhisperRecognizer {
    context: Arc<Mutex<WhisperContext>>,
    config: WhisperConfig,
    model_name: String,
}

/// Local recognition engine placeholder (without the whisper feature).
///
/// Always reports itself unavailable; the adapter skips it.
#[cfg(not(feature = "whisper"))]
#[derive(Debug)]
pub struct WhisperRecognizer {
    #[allow(dead_code)]
    config: WhisperConfig,
    model_name: String,
}

#[cfg(feature = "whisper")]
impl WhisperRecognizer {
    /// Load the model and create the engine.
    ///
    /// # Errors
    /// `RecognitionModelNotFound` if the model file is missing,
    /// `RecognitionInferenceFailed` if whisper-rs cannot load it.
    pub fn new(config: WhisperConfig) -> Result<Self> {
        LOGGING_HOOKS_INSTALLED.call_once(|| {
            install_logging_hooks();
        });

        if !config.model_path.exists() {
            return Err(VoxbridgeError::RecognitionModelNotFound {
                path: config.model_path.to_string_lossy().to_string(),
            });
        }

        let model_name = model_name_from_path(&config.model_path);

        let context_params = WhisperContextParameters::default();
        let context = WhisperContext::new_with_params(
            config.model_path.to_str().ok_or_else(|| {
                VoxbridgeError::RecognitionInferenceFailed {
                    message: "Invalid UTF-8 in model path".to_string(),
                }
            })?,
            context_params,
        )
        .map_err(|e| VoxbridgeError::RecognitionInferenceFailed {
            message: format!("Failed to load Whisper model: {}", e),
        })?;

        Ok(Self {
            context: Arc::new(Mutex::new(context)),
            config,
            model_name,
        })
    }

    fn transcribe_blocking(
        context: &Arc<Mutex<WhisperContext>>,
        samples: &[f32],
        language: &str,
        threads: Option<usize>,
    ) -> Result<String> {
        let context =
            context
                .lock()
                .map_err(|e| VoxbridgeError::RecognitionInferenceFailed {
                    message: format!("Failed to acquire context lock: {}", e),
                })?;

        let mut state =
            context
                .create_state()
                .map_err(|e| VoxbridgeError::RecognitionInferenceFailed {
                    message: format!("Failed to create Whisper state: {}", e),
                })?;

        let mut params = FullParams::new(SamplingStrategy::Greedy { best_of: 1 });
        params.set_language(Some(language));
        if let Some(threads) = threads {
            params.set_n_threads(threads as i32);
        }
        params.set_print_special(false);
        params.set_print_progress(false);
        params.set_print_realtime(false);
        params.set_print_timestamps(false);

        state
            .full(params, samples)
            .map_err(|e| VoxbridgeError::RecognitionInferenceFailed {
                message: format!("Whisper inference failed: {}", e),
            })?;

        let mut transcription = String::new();
        for segment in state.as_iter() {
            transcription.push_str(&segment.to_string());
        }

        Ok(transcription.trim().to_string())
    }
}

#[cfg(not(feature = "whisper"))]
impl WhisperRecognizer {
    /// Create the placeholder engine.
    ///
    /// Succeeds so wiring code compiles either way; `is_available` returns
    /// false and `recognize` errors.
    pub fn new(config: WhisperConfig) -> Result<Self> {
        let model_name = model_name_from_path(&config.model_path);
        Ok(Self { config, model_name })
    }
}

impl WhisperRecognizer {
    /// Model size variant name, e.g. "tiny" from `models/ggml-tiny.bin`.
    pub fn model_name(&self) -> &str {
        &self.model_name
    }
}

/// Extract the size-variant name from a ggml model path.
fn model_name_from_path(path: &std::path::Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .map(|s| s.strip_prefix("ggml-").unwrap_or(s))
        .unwrap_or("unknown")
        .to_string()
}

#[cfg(feature = "whisper")]
#[async_trait]
impl RecognitionEngine for WhisperRecognizer {
    async fn recognize(&self, clip: &AudioClip, language: &str) -> Result<String> {
        // Whisper expects f32 samples normalized to [-1.0, 1.0].
        let samples: Vec<f32> = clip
            .samples()
            .iter()
            .map(|&sample| sample as f32 / 32768.0)
            .collect();

        let context = self.context.clone();
        let language = language.to_string();
        let threads = self.config.threads;

        tokio::task::spawn_blocking(move || {
            Self::transcribe_blocking(&context, &samples, &language, threads)
        })
        .await
        .map_err(|e| VoxbridgeError::RecognitionInferenceFailed {
            message: format!("Whisper task panicked: {}", e),
        })?
    }

    fn name(&self) -> &str {
        "whisper-local"
    }

    fn is_available(&self) -> bool {
        true
    }
}

#[cfg(not(feature = "whisper"))]
#[async_trait]
impl RecognitionEngine for WhisperRecognizer {
    async fn recognize(&self, _clip: &AudioClip, _language: &str) -> Result<String> {
        Err(VoxbridgeError::RecognitionInferenceFailed {
            message: concat!(
                "Whisper feature not enabled; this build has no offline recognition.\n",
                "To fix: cargo build --features whisper (requires cmake)"
            )
            .to_string(),
        })
    }

    fn name(&self) -> &str {
        "whisper-local"
    }

    fn is_available(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default_uses_tiny_model() {
        let config = WhisperConfig::default();
        assert_eq!(config.model_path, PathBuf::from("models/ggml-tiny.bin"));
        assert!(config.threads.is_none());
    }

    #[test]
    fn test_model_name_from_ggml_path() {
        assert_eq!(
            model_name_from_path(std::path::Path::new("models/ggml-tiny.bin")),
            "tiny"
        );
        assert_eq!(
            model_name_from_path(std::path::Path::new("/opt/ggml-base.bin")),
            "base"
        );
    }

    #[test]
    fn test_model_name_without_prefix() {
        assert_eq!(
            model_name_from_path(std::path::Path::new("custom.bin")),
            "custom"
        );
    }

    #[cfg(not(feature = "whisper"))]
    #[tokio::test]
    async fn test_stub_is_unavailable_and_errors() {
        let engine = WhisperRecognizer::new(WhisperConfig::default()).unwrap();
        assert!(!engine.is_available());
        assert_eq!(engine.name(), "whisper-local");

        let clip = AudioClip::from_samples(vec![0i16; 16000]);
        let result = engine.recognize(&clip, "es").await;
        assert!(matches!(
            result,
            Err(VoxbridgeError::RecognitionInferenceFailed { .. })
        ));
    }

    #[cfg(feature = "whisper")]
    #[test]
    fn test_missing_model_file_errors() {
        let config = WhisperConfig {
            model_path: PathBuf::from("/nonexistent/ggml-tiny.bin"),
            threads: None,
        };
        let result = WhisperRecognizer::new(config);
        assert!(matches!(
            result,
            Err(VoxbridgeError::RecognitionModelNotFound { .. })
        ));
    }
}
