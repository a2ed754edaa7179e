//! Translation adapter: bounded retry over a single provider, with the
//! optional shared cache and identity pass-through.

use crate::error::{Result, VoxbridgeError};
use crate::languages;
use crate::translate::cache::TranslationCache;
use crate::translate::provider::{TranslationProvider, TranslationResult};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Adapter that translates text with retry and caching.
pub struct TranslationAdapter {
    provider: Arc<dyn TranslationProvider>,
    cache: Option<Arc<TranslationCache>>,
    max_attempts: u32,
    retry_delay: Duration,
    stage_timeout: Duration,
}

impl TranslationAdapter {
    pub fn new(provider: Arc<dyn TranslationProvider>) -> Self {
        Self {
            provider,
            cache: None,
            max_attempts: crate::defaults::MAX_TRANSLATION_ATTEMPTS,
            retry_delay: crate::defaults::RETRY_DELAY,
            stage_timeout: crate::defaults::STAGE_TIMEOUT,
        }
    }

    /// Attach a shared translation cache.
    pub fn with_cache(mut self, cache: Arc<TranslationCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Set the total number of attempts (first try included).
    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    /// Set the delay between retry attempts.
    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    /// Set the per-attempt timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.stage_timeout = timeout;
        self
    }

    /// Translate text from `source` to `target`.
    ///
    /// Identity pairs pass through unchanged without a provider call.
    /// Transient provider failures are retried up to the attempt bound;
    /// permanent failures (unsupported pair) surface immediately.
    pub async fn translate(
        &self,
        text: &str,
        source: &str,
        target: &str,
    ) -> Result<TranslationResult> {
        if text.trim().is_empty() {
            return Err(VoxbridgeError::Translation {
                message: "empty text".to_string(),
            });
        }
        if !languages::is_supported(source) || !languages::is_supported(target) {
            return Err(VoxbridgeError::UnsupportedLanguagePair {
                source: source.to_string(),
                target: target.to_string(),
            });
        }

        // Identity pass-through: same language in and out.
        if source == target {
            return Ok(TranslationResult {
                text: text.to_string(),
                language: target.to_string(),
                cached: false,
            });
        }

        if let Some(ref cache) = self.cache
            && let Some(hit) = cache.get(text, source, target)
        {
            info!(source, target, "translation cache hit");
            return Ok(TranslationResult {
                text: hit,
                language: target.to_string(),
                cached: true,
            });
        }

        let mut last_err = VoxbridgeError::Translation {
            message: "no attempts made".to_string(),
        };

        for attempt in 1..=self.max_attempts {
            let call = tokio::time::timeout(
                self.stage_timeout,
                self.provider.translate(text, source, target),
            );

            let outcome = match call.await {
                Ok(result) => result,
                Err(_) => Err(VoxbridgeError::StageTimeout {
                    timeout_secs: self.stage_timeout.as_secs(),
                }),
            };

            match outcome {
                Ok(translated) => {
                    let translated = translated.trim().to_string();
                    if translated.is_empty() {
                        return Err(VoxbridgeError::Translation {
                            message: "provider returned empty text".to_string(),
                        });
                    }
                    if let Some(ref cache) = self.cache {
                        cache.insert(text, source, target, &translated);
                    }
                    return Ok(TranslationResult {
                        text: translated,
                        language: target.to_string(),
                        cached: false,
                    });
                }
                Err(e) if e.is_transient() => {
                    warn!(
                        provider = self.provider.name(),
                        attempt,
                        max = self.max_attempts,
                        error = %e,
                        "transient translation failure"
                    );
                    last_err = e;
                    if attempt < self.max_attempts {
                        tokio::time::sleep(self.retry_delay).await;
                    }
                }
                Err(e) => return Err(e),
            }
        }

        Err(VoxbridgeError::Translation {
            message: format!(
                "exhausted {} attempts, last error: {}",
                self.max_attempts, last_err
            ),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::translate::provider::MockTranslationProvider;
    use std::sync::atomic::Ordering;

    fn adapter_with(provider: MockTranslationProvider) -> TranslationAdapter {
        TranslationAdapter::new(Arc::new(provider)).with_retry_delay(Duration::from_millis(1))
    }

    #[tokio::test]
    async fn test_successful_translation() {
        let provider = MockTranslationProvider::new().with_response("Hello, how are you?");
        let adapter = adapter_with(provider);

        let result = adapter
            .translate("Hola, ¿cómo estás?", "es", "en")
            .await
            .unwrap();
        assert_eq!(result.text, "Hello, how are you?");
        assert_eq!(result.language, "en");
        assert!(!result.cached);
    }

    #[tokio::test]
    async fn test_identity_pass_through() {
        let provider = MockTranslationProvider::new().with_response("should not be used");
        let calls = provider.calls_handle();
        let adapter = adapter_with(provider);

        let result = adapter.translate("Hola", "es", "es").await.unwrap();
        assert_eq!(result.text, "Hola");
        assert_eq!(result.language, "es");
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_empty_text_rejected() {
        let adapter = adapter_with(MockTranslationProvider::new());
        let result = adapter.translate("   ", "es", "en").await;
        assert!(matches!(result, Err(VoxbridgeError::Translation { .. })));
    }

    #[tokio::test]
    async fn test_unsupported_pair_rejected_without_provider_call() {
        let provider = MockTranslationProvider::new();
        let calls = provider.calls_handle();
        let adapter = adapter_with(provider);

        let result = adapter.translate("Hola", "es", "xx").await;
        assert!(matches!(
            result,
            Err(VoxbridgeError::UnsupportedLanguagePair { .. })
        ));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_retries_transient_then_succeeds() {
        let provider = MockTranslationProvider::new()
            .with_response("Hello")
            .with_failures_before_success(2);
        let calls = provider.calls_handle();
        let adapter = adapter_with(provider);

        let result = adapter.translate("Hola", "es", "en").await.unwrap();
        assert_eq!(result.text, "Hello");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_retry_bound_is_respected() {
        let provider = MockTranslationProvider::new().with_transient_failure();
        let calls = provider.calls_handle();
        let adapter = adapter_with(provider).with_max_attempts(3);

        let result = adapter.translate("Hola", "es", "en").await;

        match result {
            Err(VoxbridgeError::Translation { message }) => {
                assert!(message.contains("exhausted 3 attempts"), "{message}");
            }
            other => panic!("Expected Translation error, got {:?}", other),
        }
        // Exactly 3 attempts, never a 4th.
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_permanent_failure_is_not_retried() {
        let provider = MockTranslationProvider::new().with_permanent_failure();
        let calls = provider.calls_handle();
        let adapter = adapter_with(provider);

        let result = adapter.translate("Hola", "es", "en").await;
        assert!(matches!(
            result,
            Err(VoxbridgeError::UnsupportedLanguagePair { .. })
        ));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_cache_hit_skips_provider() {
        let provider = MockTranslationProvider::new().with_response("Hello");
        let calls = provider.calls_handle();
        let cache = Arc::new(TranslationCache::new(10));
        let adapter = adapter_with(provider).with_cache(cache.clone());

        let first = adapter.translate("Hola", "es", "en").await.unwrap();
        assert!(!first.cached);
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        let second = adapter.translate("Hola", "es", "en").await.unwrap();
        assert!(second.cached);
        assert_eq!(second.text, first.text);
        // Second call never reached the provider.
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_timeout_counts_as_transient() {
        // Provider that never responds within the timeout.
        struct SlowProvider;

        #[async_trait::async_trait]
        impl TranslationProvider for SlowProvider {
            async fn translate(&self, _: &str, _: &str, _: &str) -> crate::error::Result<String> {
                tokio::time::sleep(Duration::from_millis(200)).await;
                Ok("too late".to_string())
            }

            fn name(&self) -> &str {
                "slow"
            }
        }

        let adapter = TranslationAdapter::new(Arc::new(SlowProvider))
            .with_timeout(Duration::from_millis(20))
            .with_retry_delay(Duration::from_millis(1))
            .with_max_attempts(2);

        let result = adapter.translate("Hola", "es", "en").await;
        match result {
            Err(VoxbridgeError::Translation { message }) => {
                assert!(message.contains("exhausted 2 attempts"), "{message}");
            }
            other => panic!("Expected Translation error, got {:?}", other),
        }
    }
}
