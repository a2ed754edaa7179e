//! Default configuration constants for voxbridge.
//!
//! Shared constants used across configuration types to keep the pipeline,
//! adapters and CLI in agreement.

use std::time::Duration;

/// Default audio sample rate in Hz.
///
/// 16kHz is the standard for speech recognition and provides a good balance
/// between quality and computational efficiency for voice applications.
pub const SAMPLE_RATE: u32 = 16000;

/// Minimum accepted clip duration in seconds.
///
/// Clips shorter than this rarely contain a complete utterance and are
/// rejected before any recognition engine runs.
pub const MIN_CLIP_SECS: f32 = 3.0;

/// Maximum accepted clip duration in seconds.
pub const MAX_CLIP_SECS: f32 = 15.0;

/// Minimum RMS energy (0.0–1.0 scale) for a clip to count as speech.
///
/// Clips below this are silence/ambient noise — fail fast with a no-speech
/// error instead of sending them to a recognition engine.
pub const ENERGY_THRESHOLD: f32 = 0.009;

/// Default source language code.
pub const DEFAULT_SOURCE_LANG: &str = "es";

/// Default target language code.
pub const DEFAULT_TARGET_LANG: &str = "en";

/// Default local recognition model size variant.
///
/// "tiny" keeps the offline fallback fast; larger variants trade latency
/// for accuracy.
pub const DEFAULT_MODEL: &str = "tiny";

/// Maximum translation attempts before the run fails.
///
/// Transient provider failures (network errors, rate limiting) are retried
/// until this many attempts have been made in total.
pub const MAX_TRANSLATION_ATTEMPTS: u32 = 3;

/// Delay between translation retry attempts.
pub const RETRY_DELAY: Duration = Duration::from_secs(1);

/// Per-engine-call timeout for every pipeline stage.
///
/// Exceeding it counts as that engine's failure, which triggers the
/// adapter's fallback (recognition/synthesis) or retry (translation) policy.
pub const STAGE_TIMEOUT: Duration = Duration::from_secs(10);

/// Maximum number of entries kept in the translation cache.
pub const TRANSLATION_CACHE_SIZE: usize = 100;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clip_bounds_are_ordered() {
        assert!(MIN_CLIP_SECS < MAX_CLIP_SECS);
    }

    #[test]
    fn retry_policy_is_bounded() {
        assert!(MAX_TRANSLATION_ATTEMPTS >= 1);
        assert!(RETRY_DELAY < STAGE_TIMEOUT);
    }
}
