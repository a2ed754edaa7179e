//! WAV decode/encode for audio clips.
//!
//! Clips arrive from the caller as WAV data (uploaded or piped); the cloud
//! recognition engine uploads clips WAV-encoded. Arbitrary sample rates and
//! channel counts are accepted and normalized to 16kHz mono.

use crate::audio::clip::AudioClip;
use crate::defaults::SAMPLE_RATE;
use crate::error::{Result, VoxbridgeError};
use std::io::{Cursor, Read};

/// Decode WAV data from any reader into a 16kHz mono clip.
///
/// Stereo input is downmixed by averaging channel pairs; other sample rates
/// are resampled with linear interpolation.
pub fn clip_from_reader(reader: impl Read) -> Result<AudioClip> {
    let mut wav_reader = hound::WavReader::new(reader).map_err(|e| VoxbridgeError::AudioCapture {
        message: format!("Failed to parse WAV data: {}", e),
    })?;

    let spec = wav_reader.spec();
    let source_rate = spec.sample_rate;
    let source_channels = spec.channels;

    let raw_samples: Vec<i16> = wav_reader
        .samples::<i16>()
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| VoxbridgeError::AudioCapture {
            message: format!("Failed to read WAV samples: {}", e),
        })?;

    let mono_samples = if source_channels == 2 {
        raw_samples
            .chunks_exact(2)
            .map(|chunk| {
                let left = chunk[0] as i32;
                let right = chunk[1] as i32;
                ((left + right) / 2) as i16
            })
            .collect()
    } else {
        raw_samples
    };

    let samples = if source_rate != SAMPLE_RATE {
        resample(&mono_samples, source_rate, SAMPLE_RATE)
    } else {
        mono_samples
    };

    Ok(AudioClip::new(samples, SAMPLE_RATE))
}

/// Decode a WAV file from disk into a clip.
pub fn clip_from_file(path: &std::path::Path) -> Result<AudioClip> {
    let data = std::fs::read(path)?;
    clip_from_reader(Cursor::new(data))
}

/// Encode a clip as a mono 16-bit WAV byte buffer.
pub fn clip_to_wav_bytes(clip: &AudioClip) -> Result<Vec<u8>> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: clip.sample_rate(),
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer =
            hound::WavWriter::new(&mut cursor, spec).map_err(|e| VoxbridgeError::AudioCapture {
                message: format!("Failed to create WAV writer: {}", e),
            })?;
        for &sample in clip.samples() {
            writer
                .write_sample(sample)
                .map_err(|e| VoxbridgeError::AudioCapture {
                    message: format!("Failed to write WAV sample: {}", e),
                })?;
        }
        writer
            .finalize()
            .map_err(|e| VoxbridgeError::AudioCapture {
                message: format!("Failed to finalize WAV data: {}", e),
            })?;
    }
    Ok(cursor.into_inner())
}

/// Simple linear interpolation resampling.
fn resample(samples: &[i16], from_rate: u32, to_rate: u32) -> Vec<i16> {
    if from_rate == to_rate || samples.is_empty() {
        return samples.to_vec();
    }

    let ratio = from_rate as f64 / to_rate as f64;
    let output_len = (samples.len() as f64 / ratio).ceil() as usize;

    (0..output_len)
        .map(|i| {
            let source_pos = i as f64 * ratio;
            let source_idx = source_pos.floor() as usize;
            let fraction = source_pos - source_idx as f64;

            if source_idx + 1 >= samples.len() {
                samples[samples.len() - 1]
            } else {
                let left = samples[source_idx] as f64;
                let right = samples[source_idx + 1] as f64;
                (left + (right - left) * fraction) as i16
            }
        })
        .collect()
}
