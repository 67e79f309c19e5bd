use anyhow::Result;
use deshake_core::pipeline::{PipelineStage, ProgressReporter};
use indicatif::{ProgressBar, ProgressStyle};

/// Drives an indicatif bar from pipeline progress.
pub struct BarReporter {
    bar: ProgressBar,
}

impl BarReporter {
    /// A hidden reporter draws nothing, for runs that pipe frames to stdout.
    pub fn new(hidden: bool) -> Result<Self> {
        let bar = if hidden {
            ProgressBar::hidden()
        } else {
            ProgressBar::new(0)
        };
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{msg:20} [{bar:40}] {pos}/{len} ({per_sec}, eta {eta})")?
                .progress_chars("=> "),
        );
        Ok(Self { bar })
    }

    pub fn finish(&self) {
        self.bar.finish_with_message("Done");
    }
}

impl ProgressReporter for BarReporter {
    fn begin_stage(&self, stage: PipelineStage, total_items: Option<usize>) {
        self.bar.set_message(stage.to_string());
        if let Some(total) = total_items {
            self.bar.set_length(total as u64);
            self.bar.set_position(0);
        }
    }

    fn advance(&self, items_done: usize) {
        self.bar.set_position(items_done as u64);
    }
}
