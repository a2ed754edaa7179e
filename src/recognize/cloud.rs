//! Network-backed speech recognition engine.
//!
//! Uploads the clip as raw L16 PCM to a speech API endpoint and parses the
//! JSON response. This is the primary engine; network failures fall back to
//! the local model.

use crate::audio::AudioClip;
use crate::error::{Result, VoxbridgeError};
use crate::recognize::engine::RecognitionEngine;
use async_trait::async_trait;
use tracing::debug;

const DEFAULT_ENDPOINT: &str = "https://www.google.com/speech-api/v2/recognize";

/// Configuration for the cloud recognizer.
#[derive(Debug, Clone)]
pub struct CloudRecognizerConfig {
    /// Speech API endpoint.
    pub endpoint: String,
    /// Optional API key appended as a query parameter.
    pub api_key: Option<String>,
}

impl Default for CloudRecognizerConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_key: None,
        }
    }
}

/// Speech recognition engine backed by a network speech API.
pub struct CloudRecognizer {
    config: CloudRecognizerConfig,
    client: reqwest::Client,
}

impl CloudRecognizer {
    pub fn new(config: CloudRecognizerConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl RecognitionEngine for CloudRecognizer {
    async fn recognize(&self, clip: &AudioClip, language: &str) -> Result<String> {
        // The endpoint expects headerless L16 PCM; the declared rate stands
        // in for the container metadata a WAV header would carry.
        let pcm = pcm_bytes(clip);
        debug!(
            engine = "cloud",
            bytes = pcm.len(),
            language,
            "uploading clip to speech API"
        );

        let mut request = self
            .client
            .post(&self.config.endpoint)
            .query(&[("lang", language)])
            .header(
                "Content-Type",
                format!("audio/l16; rate={}", clip.sample_rate()),
            )
            .body(pcm);
        if let Some(ref key) = self.config.api_key {
            request = request.query(&[("key", key.as_str())]);
        }

        let response = request
            .send()
            .await
            .map_err(|e| VoxbridgeError::ProviderUnavailable {
                message: format!("speech API request failed: {e}"),
            })?;

        let status = response.status();
        if status.is_server_error() || status.as_u16() == 429 {
            return Err(VoxbridgeError::ProviderUnavailable {
                message: format!("speech API returned status {status}"),
            });
        }
        if !status.is_success() {
            return Err(VoxbridgeError::Recognition {
                message: format!("speech API returned status {status}"),
            });
        }

        let text = response
            .text()
            .await
            .map_err(|e| VoxbridgeError::ProviderUnavailable {
                message: format!("failed to read speech API response: {e}"),
            })?;

        parse_transcript(&text)
    }

    fn name(&self) -> &str {
        "cloud"
    }

    fn is_available(&self) -> bool {
        // Reachability is only knowable by trying; a failed request triggers
        // the fallback engine.
        true
    }
}

/// Encode a clip as raw little-endian L16 PCM, no container header.
fn pcm_bytes(clip: &AudioClip) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(clip.samples().len() * 2);
    for &sample in clip.samples() {
        bytes.extend_from_slice(&sample.to_le_bytes());
    }
    bytes
}

/// Extract the best transcript from a speech API response body.
///
/// The API streams one JSON object per line; empty results precede the real
/// one. Expected shape:
/// `{"result":[{"alternative":[{"transcript":"...","confidence":0.9}]}]}`.
fn parse_transcript(body: &str) -> Result<String> {
    for line in body.lines() {
        let value: serde_json::Value = match serde_json::from_str(line) {
            Ok(v) => v,
            Err(_) => continue,
        };

        let transcript = value
            .get("result")
            .and_then(|r| r.get(0))
            .and_then(|r| r.get("alternative"))
            .and_then(|a| a.get(0))
            .and_then(|a| a.get("transcript"))
            .and_then(|t| t.as_str());

        if let Some(text) = transcript
            && !text.trim().is_empty()
        {
            return Ok(text.trim().to_string());
        }
    }

    Err(VoxbridgeError::Recognition {
        message: "speech API returned no transcript".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_transcript_single_result() {
        let body = r#"{"result":[{"alternative":[{"transcript":"Hola, ¿cómo estás?","confidence":0.93}]}],"result_index":0}"#;
        assert_eq!(parse_transcript(body).unwrap(), "Hola, ¿cómo estás?");
    }

    #[test]
    fn test_parse_transcript_skips_empty_first_line() {
        let body = "{\"result\":[]}\n{\"result\":[{\"alternative\":[{\"transcript\":\"hello\"}]}]}";
        assert_eq!(parse_transcript(body).unwrap(), "hello");
    }

    #[test]
    fn test_parse_transcript_trims_whitespace() {
        let body = r#"{"result":[{"alternative":[{"transcript":"  hello  "}]}]}"#;
        assert_eq!(parse_transcript(body).unwrap(), "hello");
    }

    #[test]
    fn test_parse_transcript_empty_body_fails() {
        let result = parse_transcript("");
        assert!(matches!(result, Err(VoxbridgeError::Recognition { .. })));
    }

    #[test]
    fn test_parse_transcript_garbage_fails() {
        assert!(parse_transcript("not json at all").is_err());
    }

    #[test]
    fn test_pcm_bytes_little_endian() {
        let clip = AudioClip::from_samples(vec![0x0102i16, -2]);
        // 0x0102 → [0x02, 0x01]; -2 → [0xFE, 0xFF]
        assert_eq!(pcm_bytes(&clip), vec![0x02, 0x01, 0xFE, 0xFF]);
    }

    #[test]
    fn test_pcm_bytes_has_no_container_header() {
        let clip = AudioClip::from_samples(vec![0i16; 100]);
        let bytes = pcm_bytes(&clip);
        // Raw L16: two bytes per sample, and no RIFF magic.
        assert_eq!(bytes.len(), 200);
        assert_ne!(&bytes[..4], b"RIFF");
    }

    #[test]
    fn test_default_config() {
        let config = CloudRecognizerConfig::default();
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert!(config.api_key.is_none());
    }

    #[test]
    fn test_engine_name_and_availability() {
        let engine = CloudRecognizer::new(CloudRecognizerConfig::default());
        assert_eq!(engine.name(), "cloud");
        assert!(engine.is_available());
    }
}
