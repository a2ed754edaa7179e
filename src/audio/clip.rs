//! Captured audio clip.

use crate::defaults;
use crate::error::{Result, VoxbridgeError};
use std::time::Duration;

/// A captured audio clip: raw PCM samples plus sample rate.
///
/// Immutable once built; the caller owns it until it is handed to the
/// recognition stage.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioClip {
    samples: Vec<i16>,
    sample_rate: u32,
}

impl AudioClip {
    /// Create a clip from mono i16 PCM samples.
    pub fn new(samples: Vec<i16>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    /// Create a clip at the default 16kHz rate.
    pub fn from_samples(samples: Vec<i16>) -> Self {
        Self::new(samples, defaults::SAMPLE_RATE)
    }

    pub fn samples(&self) -> &[i16] {
        &self.samples
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Clip duration derived from sample count and rate.
    pub fn duration(&self) -> Duration {
        if self.sample_rate == 0 {
            return Duration::ZERO;
        }
        Duration::from_secs_f64(self.samples.len() as f64 / self.sample_rate as f64)
    }

    /// RMS energy on a 0.0–1.0 scale.
    ///
    /// Used for the no-speech check before recognition runs.
    pub fn rms_energy(&self) -> f32 {
        if self.samples.is_empty() {
            return 0.0;
        }
        let sum_sq: f64 = self
            .samples
            .iter()
            .map(|&s| {
                let normalized = s as f64 / i16::MAX as f64;
                normalized * normalized
            })
            .sum();
        (sum_sq / self.samples.len() as f64).sqrt() as f32
    }

    /// Validate the clip against the configured duration bounds.
    ///
    /// # Errors
    /// `EmptyClip` for a clip with no samples, `ClipDurationOutOfBounds`
    /// when the duration falls outside `[min_secs, max_secs]`.
    pub fn validate_duration(&self, min_secs: f32, max_secs: f32) -> Result<()> {
        if self.samples.is_empty() {
            return Err(VoxbridgeError::EmptyClip);
        }
        let secs = self.duration().as_secs_f32();
        if secs < min_secs || secs > max_secs {
            return Err(VoxbridgeError::ClipDurationOutOfBounds {
                actual: secs,
                min: min_secs,
                max: max_secs,
            });
        }
        Ok(())
    }
}
