pub mod config;
mod orchestrator;
mod types;

pub use config::{DebugCapture, DeshakeJob, OutputTarget};
pub use orchestrator::{deshake_frames, resolve_frame_rate, run_job};
pub use types::{DeshakeSummary, NoOpReporter, PipelineStage, ProgressReporter};
