use crate::linestart::MergeStats;

/// Pipeline processing stage, used for progress reporting.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PipelineStage {
    Correcting,
    Finalizing,
}

impl std::fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Correcting => write!(f, "Correcting frames"),
            Self::Finalizing => write!(f, "Finalizing output"),
        }
    }
}

/// Progress reporting for the pipeline.
///
/// Implementors can use this to drive progress bars, logging, or any other
/// UI feedback. All methods have default no-op implementations.
pub trait ProgressReporter {
    /// A new pipeline stage has started. `total_items` is the number of
    /// work items in this stage (e.g., frame count), if known.
    fn begin_stage(&self, _stage: PipelineStage, _total_items: Option<usize>) {}

    /// One work item within the current stage has completed.
    fn advance(&self, _items_done: usize) {}

    /// The current stage is finished.
    fn finish_stage(&self) {}
}

/// No-op progress reporter.
pub struct NoOpReporter;
impl ProgressReporter for NoOpReporter {}

/// Totals over a whole run.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DeshakeSummary {
    pub frames_processed: usize,
    /// Frames passed through unchanged because no row had a usable border.
    pub unusable_frames: usize,
    pub merge: MergeStats,
    /// Largest shift magnitude applied to any row.
    pub max_abs_shift: i32,
    /// Frame rate the output was written with, if known.
    pub frame_rate: Option<f64>,
    /// Debug overlay images saved during the run.
    pub overlays_written: usize,
}
