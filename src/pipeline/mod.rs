//! Pipeline orchestration: the per-run state machine and the orchestrator
//! that sequences recognition, translation and synthesis.

pub mod cancel;
pub mod orchestrator;
pub mod run;

pub use cancel::CancelToken;
pub use orchestrator::{Orchestrator, RunConfig};
pub use run::{PipelineRun, RunEvent, RunFailure, RunStatus, Stage};
