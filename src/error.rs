//! Error types for voxbridge.

use crate::pipeline::run::Stage;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum VoxbridgeError {
    // Capture errors
    #[error("Clip duration {actual:.1}s outside allowed range {min:.1}s–{max:.1}s")]
    ClipDurationOutOfBounds { actual: f32, min: f32, max: f32 },

    #[error("Audio clip is empty")]
    EmptyClip,

    #[error("Audio capture failed: {message}")]
    AudioCapture { message: String },

    // Language validation
    #[error("Unsupported language code: {code}")]
    UnsupportedLanguage { code: String },

    // Recognition errors
    #[error("No speech detected in clip (energy below threshold)")]
    NoSpeechDetected,

    #[error("Recognition failed: {message}")]
    Recognition { message: String },

    #[error("Recognition model not found at {path}")]
    RecognitionModelNotFound { path: String },

    #[error("Recognition inference failed: {message}")]
    RecognitionInferenceFailed { message: String },

    // Translation errors
    #[error("Translation failed: {message}")]
    Translation { message: String },

    #[error("Unsupported language pair: {source} -> {target}")]
    UnsupportedLanguagePair { r#source: String, target: String },

    // Synthesis errors
    #[error("Synthesis failed: {message}")]
    Synthesis { message: String },

    #[error("No voice available for language: {language}")]
    NoVoiceForLanguage { language: String },

    // Provider / engine transport errors (recoverable by retry or fallback)
    #[error("Provider unavailable: {message}")]
    ProviderUnavailable { message: String },

    #[error("Engine call exceeded {timeout_secs}s timeout")]
    StageTimeout { timeout_secs: u64 },

    // Run lifecycle
    #[error("Run cancelled")]
    Cancelled,

    // Configuration errors
    #[error("Invalid configuration value for {key}: {message}")]
    ConfigInvalidValue { key: String, message: String },

    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    // General I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Generic error for cases not covered above
    #[error("{0}")]
    Other(String),
}

impl VoxbridgeError {
    /// True for failures worth retrying against the same provider.
    ///
    /// Transient failures are transport-level: the provider could not be
    /// reached or asked us to back off. Everything else (unsupported pair,
    /// no speech, bad input) will fail the same way on a second attempt.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            VoxbridgeError::ProviderUnavailable { .. } | VoxbridgeError::StageTimeout { .. }
        )
    }

    /// The pipeline stage this error belongs to, when it maps to one.
    pub fn stage(&self) -> Option<Stage> {
        match self {
            VoxbridgeError::ClipDurationOutOfBounds { .. }
            | VoxbridgeError::EmptyClip
            | VoxbridgeError::AudioCapture { .. }
            | VoxbridgeError::UnsupportedLanguage { .. } => Some(Stage::Capture),
            VoxbridgeError::NoSpeechDetected
            | VoxbridgeError::Recognition { .. }
            | VoxbridgeError::RecognitionModelNotFound { .. }
            | VoxbridgeError::RecognitionInferenceFailed { .. } => Some(Stage::Recognition),
            VoxbridgeError::Translation { .. }
            | VoxbridgeError::UnsupportedLanguagePair { .. } => Some(Stage::Translation),
            VoxbridgeError::Synthesis { .. } | VoxbridgeError::NoVoiceForLanguage { .. } => {
                Some(Stage::Synthesis)
            }
            _ => None,
        }
    }
}

// Type alias for convenience
pub type Result<T> = std::result::Result<T, VoxbridgeError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_clip_duration_display() {
        let error = VoxbridgeError::ClipDurationOutOfBounds {
            actual: 20.0,
            min: 3.0,
            max: 15.0,
        };
        assert_eq!(
            error.to_string(),
            "Clip duration 20.0s outside allowed range 3.0s–15.0s"
        );
    }

    #[test]
    fn test_unsupported_language_display() {
        let error = VoxbridgeError::UnsupportedLanguage {
            code: "xx".to_string(),
        };
        assert_eq!(error.to_string(), "Unsupported language code: xx");
    }

    #[test]
    fn test_recognition_display() {
        let error = VoxbridgeError::Recognition {
            message: "all engines failed".to_string(),
        };
        assert_eq!(error.to_string(), "Recognition failed: all engines failed");
    }

    #[test]
    fn test_unsupported_pair_display() {
        let error = VoxbridgeError::UnsupportedLanguagePair {
            source: "es".to_string(),
            target: "xx".to_string(),
        };
        assert_eq!(error.to_string(), "Unsupported language pair: es -> xx");
    }

    #[test]
    fn test_no_voice_display() {
        let error = VoxbridgeError::NoVoiceForLanguage {
            language: "hi".to_string(),
        };
        assert_eq!(error.to_string(), "No voice available for language: hi");
    }

    #[test]
    fn test_cancelled_display() {
        assert_eq!(VoxbridgeError::Cancelled.to_string(), "Run cancelled");
    }

    #[test]
    fn test_transient_classification() {
        assert!(
            VoxbridgeError::ProviderUnavailable {
                message: "connection refused".to_string()
            }
            .is_transient()
        );
        assert!(VoxbridgeError::StageTimeout { timeout_secs: 10 }.is_transient());

        assert!(
            !VoxbridgeError::UnsupportedLanguagePair {
                source: "es".to_string(),
                target: "xx".to_string()
            }
            .is_transient()
        );
        assert!(!VoxbridgeError::NoSpeechDetected.is_transient());
        assert!(!VoxbridgeError::Cancelled.is_transient());
    }

    #[test]
    fn test_stage_tagging() {
        assert_eq!(VoxbridgeError::EmptyClip.stage(), Some(Stage::Capture));
        assert_eq!(
            VoxbridgeError::NoSpeechDetected.stage(),
            Some(Stage::Recognition)
        );
        assert_eq!(
            VoxbridgeError::Translation {
                message: "x".to_string()
            }
            .stage(),
            Some(Stage::Translation)
        );
        assert_eq!(
            VoxbridgeError::NoVoiceForLanguage {
                language: "hi".to_string()
            }
            .stage(),
            Some(Stage::Synthesis)
        );
        assert_eq!(VoxbridgeError::Cancelled.stage(), None);
    }

    #[test]
    fn test_from_io_error() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let error: VoxbridgeError = io_error.into();
        assert!(error.to_string().contains("file not found"));
    }

    #[test]
    fn test_from_toml_error() {
        let toml_str = "invalid = toml = syntax";
        let toml_error = toml::from_str::<toml::Value>(toml_str).unwrap_err();
        let error: VoxbridgeError = toml_error.into();
        assert!(error.to_string().contains("Configuration error"));
    }

    #[test]
    fn test_error_is_send_and_sync() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}

        assert_send::<VoxbridgeError>();
        assert_sync::<VoxbridgeError>();
    }
}
