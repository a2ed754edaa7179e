//! Pipeline orchestrator: drives a clip through recognition, translation,
//! and synthesis, tracking status transitions and tagging failures with the
//! stage that produced them.

use crate::audio::AudioClip;
use crate::error::VoxbridgeError;
use crate::languages;
use crate::pipeline::cancel::CancelToken;
use crate::pipeline::run::{PipelineRun, RunEvent, RunFailure, RunStatus, Stage};
use crate::recognize::{RecognitionAdapter, RecognitionResult};
use crate::synth::SynthesisAdapter;
use crate::translate::{TranslationAdapter, TranslationResult};
use std::time::Instant;
use tracing::{info, warn};

/// Per-run settings for the orchestrator.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Shortest clip the pipeline accepts, in seconds.
    pub min_clip_secs: f32,
    /// Longest clip the pipeline accepts, in seconds.
    pub max_clip_secs: f32,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            min_clip_secs: crate::defaults::MIN_CLIP_SECS,
            max_clip_secs: crate::defaults::MAX_CLIP_SECS,
        }
    }
}

/// Orchestrates the full voice-to-voice pipeline.
///
/// Each stage runs to a result before the next starts; a failure in any
/// stage ends the run immediately with that stage recorded. Partial results
/// from completed stages are preserved on the failed run.
pub struct Orchestrator {
    recognition: RecognitionAdapter,
    translation: TranslationAdapter,
    synthesis: SynthesisAdapter,
    event_tx: Option<crossbeam_channel::Sender<RunEvent>>,
}

impl Orchestrator {
    pub fn new(
        recognition: RecognitionAdapter,
        translation: TranslationAdapter,
        synthesis: SynthesisAdapter,
    ) -> Self {
        Self {
            recognition,
            translation,
            synthesis,
            event_tx: None,
        }
    }

    /// Attach a channel for progress events.
    pub fn with_event_sender(mut self, tx: crossbeam_channel::Sender<RunEvent>) -> Self {
        self.event_tx = Some(tx);
        self
    }

    fn emit(&self, event: RunEvent) {
        if let Some(tx) = &self.event_tx {
            // A disconnected receiver should not fail the run.
            let _ = tx.send(event);
        }
    }

    fn enter(&self, status: RunStatus) {
        info!(status = %status, "pipeline status");
        self.emit(RunEvent::StatusChanged(status));
    }

    /// Run a clip through the pipeline.
    ///
    /// Always returns a terminal `PipelineRun`; errors are folded into the
    /// run record rather than propagated.
    pub async fn run(
        &self,
        clip: &AudioClip,
        source: &str,
        target: &str,
        config: &RunConfig,
        cancel: &CancelToken,
    ) -> PipelineRun {
        let started = Instant::now();
        self.enter(RunStatus::Idle);

        let mut tracker = RunTracker::default();

        // Pre-flight: language and clip validation count as capture failures.
        let source = languages::normalize(source);
        let target = languages::normalize(target);
        if !languages::is_supported(&source) {
            return self.fail(
                tracker,
                Stage::Capture,
                VoxbridgeError::UnsupportedLanguage { code: source },
                started,
            );
        }
        if !languages::is_supported(&target) {
            return self.fail(
                tracker,
                Stage::Capture,
                VoxbridgeError::UnsupportedLanguage { code: target },
                started,
            );
        }

        self.enter(RunStatus::Recording);
        if let Err(e) = clip.validate_duration(config.min_clip_secs, config.max_clip_secs) {
            return self.fail(tracker, Stage::Capture, e, started);
        }
        if cancel.is_cancelled() {
            return self.fail(
                tracker,
                Stage::Recognition,
                VoxbridgeError::Cancelled,
                started,
            );
        }

        self.enter(RunStatus::Recognizing);
        let recognition = match self.recognition.recognize(clip, &source).await {
            Ok(r) => r,
            Err(e) => return self.fail(tracker, Stage::Recognition, e, started),
        };
        self.emit(RunEvent::Recognized {
            text: recognition.text.clone(),
            engine: recognition.engine.clone(),
        });
        tracker.recognition = Some(recognition);
        if cancel.is_cancelled() {
            return self.fail(
                tracker,
                Stage::Translation,
                VoxbridgeError::Cancelled,
                started,
            );
        }

        self.enter(RunStatus::Translating);
        let text = tracker
            .recognition
            .as_ref()
            .map(|r| r.text.clone())
            .unwrap_or_default();
        let translation = match self.translation.translate(&text, &source, &target).await {
            Ok(t) => t,
            Err(e) => return self.fail(tracker, Stage::Translation, e, started),
        };
        self.emit(RunEvent::Translated {
            text: translation.text.clone(),
            cached: translation.cached,
        });
        tracker.translation = Some(translation);
        if cancel.is_cancelled() {
            return self.fail(
                tracker,
                Stage::Synthesis,
                VoxbridgeError::Cancelled,
                started,
            );
        }

        self.enter(RunStatus::Synthesizing);
        let text = tracker
            .translation
            .as_ref()
            .map(|t| t.text.clone())
            .unwrap_or_default();
        let synthesis = match self.synthesis.synthesize(&text, &target).await {
            Ok(s) => s,
            Err(e) => return self.fail(tracker, Stage::Synthesis, e, started),
        };
        self.emit(RunEvent::Synthesized {
            engine: synthesis.engine.clone(),
            bytes: synthesis.audio.len(),
        });

        self.enter(RunStatus::Done);
        let elapsed = started.elapsed();
        info!(elapsed_ms = elapsed.as_millis() as u64, "pipeline done");
        PipelineRun {
            status: RunStatus::Done,
            recognition: tracker.recognition,
            translation: tracker.translation,
            synthesis: Some(synthesis),
            failure: None,
            elapsed,
        }
    }

    fn fail(
        &self,
        tracker: RunTracker,
        stage: Stage,
        error: VoxbridgeError,
        started: Instant,
    ) -> PipelineRun {
        warn!(stage = %stage, error = %error, "pipeline failed");
        self.enter(RunStatus::Failed);
        PipelineRun {
            status: RunStatus::Failed,
            recognition: tracker.recognition,
            translation: tracker.translation,
            synthesis: None,
            failure: Some(RunFailure { stage, error }),
            elapsed: started.elapsed(),
        }
    }
}

/// Partial results accumulated while a run is in flight.
#[derive(Default)]
struct RunTracker {
    recognition: Option<RecognitionResult>,
    translation: Option<TranslationResult>,
}
