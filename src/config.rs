use crate::defaults;
use crate::error::{Result, VoxbridgeError};
use crate::languages;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
#[cfg(feature = "cli")]
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    pub audio: AudioConfig,
    pub recognition: RecognitionConfig,
    pub translation: TranslationConfig,
    pub synthesis: SynthesisConfig,
    pub languages: LanguagesConfig,
    pub pipeline: PipelineConfig,
}

/// Audio clip configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AudioConfig {
    pub sample_rate: u32,
    pub min_clip_secs: f32,
    pub max_clip_secs: f32,
}

/// Speech recognition configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RecognitionConfig {
    /// Local model size name (tiny, base, small, ...).
    pub model: String,
    /// Cloud recognition endpoint; empty uses the built-in default.
    pub endpoint: Option<String>,
    pub api_key: Option<String>,
    pub energy_threshold: f32,
}

/// Translation configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TranslationConfig {
    pub endpoint: Option<String>,
    pub max_attempts: u32,
    pub retry_delay_ms: u64,
    pub cache_enabled: bool,
    pub cache_size: usize,
}

/// Speech synthesis configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SynthesisConfig {
    pub endpoint: Option<String>,
    /// Slow speaking rate for the network engine.
    pub slow: bool,
    /// Program name for the local engine.
    pub espeak_program: String,
}

/// Default language pair
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LanguagesConfig {
    pub default_source: String,
    pub default_target: String,
}

/// Pipeline-level knobs
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PipelineConfig {
    pub stage_timeout_secs: u64,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            sample_rate: defaults::SAMPLE_RATE,
            min_clip_secs: defaults::MIN_CLIP_SECS,
            max_clip_secs: defaults::MAX_CLIP_SECS,
        }
    }
}

impl Default for RecognitionConfig {
    fn default() -> Self {
        Self {
            model: defaults::DEFAULT_MODEL.to_string(),
            endpoint: None,
            api_key: None,
            energy_threshold: defaults::ENERGY_THRESHOLD,
        }
    }
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            max_attempts: defaults::MAX_TRANSLATION_ATTEMPTS,
            retry_delay_ms: defaults::RETRY_DELAY.as_millis() as u64,
            cache_enabled: true,
            cache_size: defaults::TRANSLATION_CACHE_SIZE,
        }
    }
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            slow: false,
            espeak_program: "espeak-ng".to_string(),
        }
    }
}

impl Default for LanguagesConfig {
    fn default() -> Self {
        Self {
            default_source: defaults::DEFAULT_SOURCE_LANG.to_string(),
            default_target: defaults::DEFAULT_TARGET_LANG.to_string(),
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            stage_timeout_secs: defaults::STAGE_TIMEOUT.as_secs(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Returns an error if the file contains invalid TOML.
    /// Missing fields will use default values.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a file or return defaults if file doesn't exist
    ///
    /// Only falls back to defaults when the file is missing; invalid TOML
    /// or invalid values still error.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        match Self::load(path) {
            Ok(config) => Ok(config),
            Err(VoxbridgeError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                Ok(Self::default())
            }
            Err(e) => Err(e),
        }
    }

    /// Apply environment variable overrides
    ///
    /// Supported environment variables:
    /// - VOXBRIDGE_SOURCE_LANG → languages.default_source
    /// - VOXBRIDGE_TARGET_LANG → languages.default_target
    /// - VOXBRIDGE_MODEL → recognition.model
    /// - VOXBRIDGE_API_KEY → recognition.api_key
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(source) = std::env::var("VOXBRIDGE_SOURCE_LANG")
            && !source.is_empty()
        {
            self.languages.default_source = source;
        }

        if let Ok(target) = std::env::var("VOXBRIDGE_TARGET_LANG")
            && !target.is_empty()
        {
            self.languages.default_target = target;
        }

        if let Ok(model) = std::env::var("VOXBRIDGE_MODEL")
            && !model.is_empty()
        {
            self.recognition.model = model;
        }

        if let Ok(key) = std::env::var("VOXBRIDGE_API_KEY")
            && !key.is_empty()
        {
            self.recognition.api_key = Some(key);
        }

        self
    }

    /// Reject values the pipeline cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.audio.min_clip_secs <= 0.0 || self.audio.max_clip_secs <= self.audio.min_clip_secs {
            return Err(VoxbridgeError::ConfigInvalidValue {
                key: "audio.min_clip_secs/max_clip_secs".to_string(),
                message: format!(
                    "bounds must satisfy 0 < min < max, got {} and {}",
                    self.audio.min_clip_secs, self.audio.max_clip_secs
                ),
            });
        }
        if self.translation.max_attempts == 0 {
            return Err(VoxbridgeError::ConfigInvalidValue {
                key: "translation.max_attempts".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        if self.pipeline.stage_timeout_secs == 0 {
            return Err(VoxbridgeError::ConfigInvalidValue {
                key: "pipeline.stage_timeout_secs".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        for (key, code) in [
            ("languages.default_source", &self.languages.default_source),
            ("languages.default_target", &self.languages.default_target),
        ] {
            if !languages::is_supported(&languages::normalize(code)) {
                return Err(VoxbridgeError::ConfigInvalidValue {
                    key: key.to_string(),
                    message: format!("unsupported language {code:?}"),
                });
            }
        }
        Ok(())
    }

    /// Get the default configuration file path
    ///
    /// Returns ~/.config/voxbridge/config.toml on Linux
    #[cfg(feature = "cli")]
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .expect("Could not determine config directory")
            .join("voxbridge")
            .join("config.toml")
    }
}
