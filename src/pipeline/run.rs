//! Run state: stages, statuses, events, and the terminal run record.

use crate::error::VoxbridgeError;
use crate::recognize::RecognitionResult;
use crate::synth::SynthesisResult;
use crate::translate::TranslationResult;
use std::fmt;
use std::time::Duration;

/// Pipeline stage in which a failure occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Clip validation and pre-flight checks.
    Capture,
    /// Speech-to-text.
    Recognition,
    /// Text translation.
    Translation,
    /// Text-to-speech.
    Synthesis,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Stage::Capture => "capture",
            Stage::Recognition => "recognition",
            Stage::Translation => "translation",
            Stage::Synthesis => "synthesis",
        };
        write!(f, "{s}")
    }
}

/// Observable status of a pipeline run.
///
/// A run moves strictly forward through the working statuses and ends in
/// exactly one of `Done` or `Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Idle,
    Recording,
    Recognizing,
    Translating,
    Synthesizing,
    Done,
    Failed,
}

impl RunStatus {
    /// Whether the run has reached a terminal status.
    pub fn is_terminal(&self) -> bool {
        matches!(self, RunStatus::Done | RunStatus::Failed)
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RunStatus::Idle => "idle",
            RunStatus::Recording => "recording",
            RunStatus::Recognizing => "recognizing",
            RunStatus::Translating => "translating",
            RunStatus::Synthesizing => "synthesizing",
            RunStatus::Done => "done",
            RunStatus::Failed => "failed",
        };
        write!(f, "{s}")
    }
}

/// Failure record: the stage that failed and the error it produced.
#[derive(Debug)]
pub struct RunFailure {
    pub stage: Stage,
    pub error: VoxbridgeError,
}

/// Progress event emitted over the orchestrator's event channel.
#[derive(Debug, Clone)]
pub enum RunEvent {
    /// The run entered a new status.
    StatusChanged(RunStatus),
    /// Recognition produced text.
    Recognized { text: String, engine: String },
    /// Translation produced text.
    Translated { text: String, cached: bool },
    /// Synthesis produced audio.
    Synthesized { engine: String, bytes: usize },
}

/// Completed pipeline run, either fully successful or failed at a stage.
#[derive(Debug)]
pub struct PipelineRun {
    /// Terminal status, `Done` or `Failed`.
    pub status: RunStatus,
    /// Present for every run that got past recognition.
    pub recognition: Option<RecognitionResult>,
    /// Present for every run that got past translation.
    pub translation: Option<TranslationResult>,
    /// Present only when the run is `Done`.
    pub synthesis: Option<SynthesisResult>,
    /// Present only when the run is `Failed`.
    pub failure: Option<RunFailure>,
    /// Wall-clock time from run start to terminal status.
    pub elapsed: Duration,
}

impl PipelineRun {
    /// Whether the run completed every stage.
    pub fn is_done(&self) -> bool {
        self.status == RunStatus::Done
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_statuses() {
        assert!(RunStatus::Done.is_terminal());
        assert!(RunStatus::Failed.is_terminal());
        assert!(!RunStatus::Idle.is_terminal());
        assert!(!RunStatus::Translating.is_terminal());
    }

    #[test]
    fn test_stage_display() {
        assert_eq!(Stage::Recognition.to_string(), "recognition");
        assert_eq!(Stage::Synthesis.to_string(), "synthesis");
    }

    #[test]
    fn test_status_display() {
        assert_eq!(RunStatus::Recognizing.to_string(), "recognizing");
        assert_eq!(RunStatus::Done.to_string(), "done");
    }
}
