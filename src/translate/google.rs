//! HTTP translation provider.
//!
//! Talks to the free Google Translate web endpoint (the same one the
//! `googletrans` client uses): a GET with source/target codes and the text,
//! answered by a nested JSON array whose first element holds the translated
//! segments.

use crate::error::{Result, VoxbridgeError};
use crate::translate::provider::TranslationProvider;
use async_trait::async_trait;
use tracing::debug;

const DEFAULT_ENDPOINT: &str = "https://translate.googleapis.com/translate_a/single";

/// Configuration for the HTTP translation provider.
#[derive(Debug, Clone)]
pub struct GoogleTranslatorConfig {
    pub endpoint: String,
}

impl Default for GoogleTranslatorConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
        }
    }
}

/// Translation provider backed by the Google Translate web endpoint.
pub struct GoogleTranslator {
    config: GoogleTranslatorConfig,
    client: reqwest::Client,
}

impl GoogleTranslator {
    pub fn new(config: GoogleTranslatorConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl TranslationProvider for GoogleTranslator {
    async fn translate(&self, text: &str, source: &str, target: &str) -> Result<String> {
        debug!(source, target, chars = text.len(), "requesting translation");

        let response = self
            .client
            .get(&self.config.endpoint)
            .query(&[
                ("client", "gtx"),
                ("sl", source),
                ("tl", target),
                ("dt", "t"),
                ("q", text),
            ])
            .send()
            .await
            .map_err(|e| VoxbridgeError::ProviderUnavailable {
                message: format!("translation request failed: {e}"),
            })?;

        let status = response.status();
        if status.is_server_error() || status.as_u16() == 429 {
            // Rate limiting and provider outages are transient; retry.
            return Err(VoxbridgeError::ProviderUnavailable {
                message: format!("translation provider returned status {status}"),
            });
        }
        if status.as_u16() == 400 {
            // The endpoint rejects unknown language codes with 400.
            return Err(VoxbridgeError::UnsupportedLanguagePair {
                source: source.to_string(),
                target: target.to_string(),
            });
        }
        if !status.is_success() {
            return Err(VoxbridgeError::Translation {
                message: format!("translation provider returned status {status}"),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| VoxbridgeError::ProviderUnavailable {
                message: format!("failed to read translation response: {e}"),
            })?;

        parse_translation(&body)
    }

    fn name(&self) -> &str {
        "google-translate"
    }
}

/// Extract the translated text from the endpoint's nested-array response.
///
/// Shape: `[[["Hello","Hola",...],[" world"," mundo",...]], ...]` — element
/// 0 of each inner array is a translated segment; segments concatenate to
/// the full translation.
fn parse_translation(body: &str) -> Result<String> {
    let value: serde_json::Value =
        serde_json::from_str(body).map_err(|e| VoxbridgeError::Translation {
            message: format!("failed to parse translation response: {e}"),
        })?;

    let segments = value
        .get(0)
        .and_then(|v| v.as_array())
        .ok_or_else(|| VoxbridgeError::Translation {
            message: "unexpected translation response shape".to_string(),
        })?;

    let mut translated = String::new();
    for segment in segments {
        if let Some(text) = segment.get(0).and_then(|t| t.as_str()) {
            translated.push_str(text);
        }
    }

    let translated = translated.trim().to_string();
    if translated.is_empty() {
        return Err(VoxbridgeError::Translation {
            message: "translation provider returned no text".to_string(),
        });
    }

    Ok(translated)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_single_segment() {
        let body = r#"[[["Hello, how are you?","Hola, ¿cómo estás?",null,null,10]],null,"es"]"#;
        assert_eq!(parse_translation(body).unwrap(), "Hello, how are you?");
    }

    #[test]
    fn test_parse_concatenates_segments() {
        let body = r#"[[["Hello, ","Hola, "],["how are you?","¿cómo estás?"]],null,"es"]"#;
        assert_eq!(parse_translation(body).unwrap(), "Hello, how are you?");
    }

    #[test]
    fn test_parse_invalid_json_fails() {
        assert!(matches!(
            parse_translation("<html>error</html>"),
            Err(VoxbridgeError::Translation { .. })
        ));
    }

    #[test]
    fn test_parse_unexpected_shape_fails() {
        assert!(parse_translation(r#"{"error":"nope"}"#).is_err());
    }

    #[test]
    fn test_parse_empty_segments_fails() {
        assert!(parse_translation(r#"[[]]"#).is_err());
    }

    #[test]
    fn test_default_config() {
        let config = GoogleTranslatorConfig::default();
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
    }

    #[test]
    fn test_provider_name() {
        let provider = GoogleTranslator::new(GoogleTranslatorConfig::default());
        assert_eq!(provider.name(), "google-translate");
    }
}
