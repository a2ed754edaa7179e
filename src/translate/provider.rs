//! Trait for text translation providers.

use crate::error::{Result, VoxbridgeError};
use async_trait::async_trait;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

/// Result of a successful translation.
#[derive(Debug, Clone, PartialEq)]
pub struct TranslationResult {
    /// Translated text (UTF-8).
    pub text: String,
    /// Target language code.
    pub language: String,
    /// Whether the cache served this result without a provider call.
    pub cached: bool,
}

/// Trait for translation providers.
///
/// Determinism (same input → same output) is assumed from the provider but
/// not guaranteed; the cache and the idempotence tests rely on it only for
/// in-process repeats.
#[async_trait]
pub trait TranslationProvider: Send + Sync {
    /// Translate text between two supported languages.
    async fn translate(&self, text: &str, source: &str, target: &str) -> Result<String>;

    /// Provider name for logging.
    fn name(&self) -> &str;
}

/// Failure mode for the mock provider.
#[derive(Debug, Clone, Copy, PartialEq)]
enum MockFailure {
    None,
    Transient,
    Permanent,
}

/// Mock translation provider for testing.
#[derive(Debug, Clone)]
pub struct MockTranslationProvider {
    response: String,
    failure: MockFailure,
    /// Fail transiently this many times before succeeding.
    failures_before_success: u32,
    calls: Arc<AtomicU32>,
}

impl MockTranslationProvider {
    pub fn new() -> Self {
        Self {
            response: "mock translation".to_string(),
            failure: MockFailure::None,
            failures_before_success: 0,
            calls: Arc::new(AtomicU32::new(0)),
        }
    }

    /// Configure the mock to return a specific translation.
    pub fn with_response(mut self, response: &str) -> Self {
        self.response = response.to_string();
        self
    }

    /// Configure the mock to always fail with a transient error.
    pub fn with_transient_failure(mut self) -> Self {
        self.failure = MockFailure::Transient;
        self
    }

    /// Configure the mock to always fail with a permanent error.
    pub fn with_permanent_failure(mut self) -> Self {
        self.failure = MockFailure::Permanent;
        self
    }

    /// Fail transiently for the first `count` calls, then succeed.
    pub fn with_failures_before_success(mut self, count: u32) -> Self {
        self.failures_before_success = count;
        self
    }

    /// Number of times translate was invoked.
    pub fn call_count(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    /// Shared handle to the call counter.
    pub fn calls_handle(&self) -> Arc<AtomicU32> {
        self.calls.clone()
    }
}

impl Default for MockTranslationProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TranslationProvider for MockTranslationProvider {
    async fn translate(&self, _text: &str, source: &str, target: &str) -> Result<String> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);

        if call < self.failures_before_success {
            return Err(VoxbridgeError::ProviderUnavailable {
                message: format!("mock transient failure {}", call + 1),
            });
        }

        match self.failure {
            MockFailure::None => Ok(self.response.clone()),
            MockFailure::Transient => Err(VoxbridgeError::ProviderUnavailable {
                message: "mock transient failure".to_string(),
            }),
            MockFailure::Permanent => Err(VoxbridgeError::UnsupportedLanguagePair {
                source: source.to_string(),
                target: target.to_string(),
            }),
        }
    }

    fn name(&self) -> &str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_returns_response() {
        let provider = MockTranslationProvider::new().with_response("Hello, how are you?");
        let result = provider.translate("Hola", "es", "en").await.unwrap();
        assert_eq!(result, "Hello, how are you?");
    }

    #[tokio::test]
    async fn test_mock_transient_failure() {
        let provider = MockTranslationProvider::new().with_transient_failure();
        let result = provider.translate("Hola", "es", "en").await;
        assert!(result.as_ref().unwrap_err().is_transient());
    }

    #[tokio::test]
    async fn test_mock_permanent_failure() {
        let provider = MockTranslationProvider::new().with_permanent_failure();
        let result = provider.translate("Hola", "es", "xx").await;
        assert!(!result.as_ref().unwrap_err().is_transient());
    }

    #[tokio::test]
    async fn test_failures_before_success() {
        let provider = MockTranslationProvider::new()
            .with_response("done")
            .with_failures_before_success(2);

        assert!(provider.translate("a", "es", "en").await.is_err());
        assert!(provider.translate("a", "es", "en").await.is_err());
        assert_eq!(provider.translate("a", "es", "en").await.unwrap(), "done");
        assert_eq!(provider.call_count(), 3);
    }
}
