use tracing::trace;

use crate::error::{DeshakeError, Result};
use crate::frame::Frame;
use crate::linestart::{
    fill_gaps, filter_segments, locate_line_starts, merge_line_starts, smooth_line_starts,
    EdgeStrip, GapFillOutcome, LineStartSeries, MergeStats, SegmentedSeries, Side,
};
use crate::params::ProcessingParameters;
use crate::shift::shift_row;

/// Scratch buffers reused from frame to frame.
///
/// Holding on to them only saves allocations; every frame is computed from its
/// own pixels alone.
#[derive(Debug, Default)]
pub struct CorrectionWorkspace {
    left_strip: EdgeStrip,
    right_strip: EdgeStrip,
    left_starts: LineStartSeries,
    right_starts: LineStartSeries,
}

/// Every intermediate line-start series of one frame, for inspection and
/// debug overlays.
#[derive(Clone, Debug, Default)]
pub struct CorrectionTrace {
    pub raw_left: LineStartSeries,
    pub raw_right: LineStartSeries,
    pub filtered_left: SegmentedSeries,
    pub filtered_right: SegmentedSeries,
    pub merged: LineStartSeries,
    pub gap_filled: LineStartSeries,
    /// `None` when the frame had no usable line starts.
    pub smoothed: Option<Vec<i32>>,
}

/// Outcome of correcting one frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrameReport {
    pub frame_index: usize,
    /// Rows with a line start after merging, before gap filling.
    pub rows_detected: usize,
    pub merge: MergeStats,
    /// Smallest and largest shift applied; `None` if the frame was passed
    /// through unchanged for lack of line-start data.
    pub shift_range: Option<(i32, i32)>,
}

impl FrameReport {
    pub fn is_usable(&self) -> bool {
        self.shift_range.is_some()
    }
}

/// Corrects horizontal shake frame by frame for a fixed frame geometry.
pub struct FrameCorrector {
    params: ProcessingParameters,
    width: usize,
    height: usize,
    workspace: CorrectionWorkspace,
}

impl FrameCorrector {
    /// Validate `params` against frames of `width` x `height` pixels.
    pub fn new(params: ProcessingParameters, width: usize, height: usize) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(DeshakeError::InvalidDimensions {
                width: width as u32,
                height: height as u32,
            });
        }
        params.validate()?;
        params.validate_for_width(width)?;
        Ok(Self {
            params,
            width,
            height,
            workspace: CorrectionWorkspace::default(),
        })
    }

    pub fn params(&self) -> &ProcessingParameters {
        &self.params
    }

    /// Correct one frame, returning a new frame of the same geometry.
    pub fn correct(&mut self, input: &Frame) -> Result<(Frame, FrameReport)> {
        self.run(input, None)
    }

    /// Like [`FrameCorrector::correct`], also returning every intermediate series.
    pub fn correct_traced(&mut self, input: &Frame) -> Result<(Frame, FrameReport, CorrectionTrace)> {
        let mut trace = CorrectionTrace::default();
        let (out, report) = self.run(input, Some(&mut trace))?;
        Ok((out, report, trace))
    }

    /// Estimate the final per-row line starts of `input`.
    ///
    /// Returns `None` for the line starts when no row of the frame had a
    /// usable border.
    pub fn estimate_line_starts(&mut self, input: &Frame) -> Result<(Option<Vec<i32>>, MergeStats)> {
        self.check_geometry(input)?;
        let (line_starts, stats, _) = self.estimate(input, None);
        Ok((line_starts, stats))
    }

    fn check_geometry(&self, input: &Frame) -> Result<()> {
        if input.width() != self.width || input.height() != self.height {
            return Err(DeshakeError::InvalidDimensions {
                width: input.width() as u32,
                height: input.height() as u32,
            });
        }
        Ok(())
    }

    fn estimate(
        &mut self,
        input: &Frame,
        mut trace: Option<&mut CorrectionTrace>,
    ) -> (Option<Vec<i32>>, MergeStats, usize) {
        let params = &self.params;
        let ws = &mut self.workspace;

        ws.left_strip.fill(input, Side::Left, params.col_range);
        ws.right_strip.fill(input, Side::Right, params.col_range);
        locate_line_starts(&ws.left_strip, Side::Left, params, &mut ws.left_starts);
        locate_line_starts(&ws.right_strip, Side::Right, params, &mut ws.right_starts);

        if let Some(t) = trace.as_deref_mut() {
            t.raw_left = ws.left_starts.clone();
            t.raw_right = ws.right_starts.clone();
        }

        let min_len = params.min_line_start_segment_length;
        let tolerance = params.segment_tolerance;
        let left = filter_segments(std::mem::take(&mut ws.left_starts), min_len, tolerance);
        let right = filter_segments(std::mem::take(&mut ws.right_starts), min_len, tolerance);

        let (mut merged, stats) = merge_line_starts(&left, &right);
        let rows_detected = merged.known_count();

        if let Some(t) = trace.as_deref_mut() {
            t.merged = merged.clone();
        }

        let outcome = fill_gaps(&mut merged);

        if let Some(t) = trace.as_deref_mut() {
            t.filtered_left = left;
            t.filtered_right = right;
            t.gap_filled = merged.clone();
        } else {
            // Reuse the allocations for the next frame.
            ws.left_starts = left.starts;
            ws.right_starts = right.starts;
        }

        let smoothed = match outcome {
            GapFillOutcome::Filled => merged
                .to_complete()
                .map(|filled| smooth_line_starts(&filled, params.line_start_smoothing_kernel_size)),
            GapFillOutcome::NoData => None,
        };

        if let Some(t) = trace {
            t.smoothed = smoothed.clone();
        }

        (smoothed, stats, rows_detected)
    }

    fn run(&mut self, input: &Frame, trace: Option<&mut CorrectionTrace>) -> Result<(Frame, FrameReport)> {
        self.check_geometry(input)?;

        let (line_starts, merge, rows_detected) = self.estimate(input, trace);
        let mut output = Frame::black(input.width(), input.height(), input.layout())?;
        output.metadata = input.metadata.clone();

        let shift_range = match line_starts {
            Some(line_starts) => {
                let target = self.params.target_line_start;
                let mut range: Option<(i32, i32)> = None;
                for (y, &line_start) in line_starts.iter().enumerate() {
                    let shift = target - line_start;
                    shift_row(input.row(y), output.row_mut(y), shift);
                    range = Some(match range {
                        Some((lo, hi)) => (lo.min(shift), hi.max(shift)),
                        None => (shift, shift),
                    });
                }
                range
            }
            None => {
                output.data_mut().copy_from_slice(input.data());
                None
            }
        };

        let report = FrameReport {
            frame_index: input.metadata.frame_index,
            rows_detected,
            merge,
            shift_range,
        };
        trace!(
            frame = report.frame_index,
            rows_detected,
            from_left = merge.from_left,
            from_right = merge.from_right,
            averaged = merge.averaged,
            shift_range = ?report.shift_range,
            "Frame corrected"
        );
        Ok((output, report))
    }
}

/// Correct a single frame with freshly allocated buffers.
pub fn correct_frame(input: &Frame, params: &ProcessingParameters) -> Result<Frame> {
    let mut corrector = FrameCorrector::new(params.clone(), input.width(), input.height())?;
    let (output, _) = corrector.correct(input)?;
    Ok(output)
}
