use std::io::BufWriter;

use tracing::{debug, info, warn};

use crate::consts::PROGRESS_LOG_INTERVAL;
use crate::correct::FrameCorrector;
use crate::error::{DeshakeError, Result};
use crate::frame::Frame;
use crate::io::overlay::save_trace_overlays;
use crate::io::raw::RawVideoWriter;
use crate::io::ser::SerReader;
use crate::io::ser_writer::SerWriter;
use crate::io::timestamps::{estimate_frame_rate, synthesize_timestamps};
use crate::io::FrameSink;
use crate::params::ProcessingParameters;

use super::config::{DebugCapture, DeshakeJob, OutputTarget};
use super::types::{DeshakeSummary, PipelineStage, ProgressReporter};

/// Pick the output frame rate: the requested one if given, otherwise the
/// rate implied by the source timestamps, if any.
pub fn resolve_frame_rate(requested: Option<f64>, reader: &SerReader) -> Result<Option<f64>> {
    match requested {
        Some(fps) if !(fps.is_finite() && fps > 0.0) => Err(DeshakeError::InvalidParameter {
            name: "frame_rate",
            reason: "must be a positive number".into(),
        }),
        Some(fps) => Ok(Some(fps)),
        None => Ok(reader.timestamps().and_then(|ts| estimate_frame_rate(&ts))),
    }
}

/// Trailer timestamps for the output file.
///
/// With a known frame rate they are evenly spaced from the first source
/// timestamp (or the header date); otherwise the source trailer is copied.
fn output_timestamps(reader: &SerReader, frame_rate: Option<f64>) -> Option<Vec<u64>> {
    let source = reader.timestamps();
    match frame_rate {
        Some(fps) => {
            let start = source
                .as_ref()
                .and_then(|ts| ts.first().copied())
                .unwrap_or(reader.header.date_time);
            Some(synthesize_timestamps(start, reader.frame_count(), fps))
        }
        None => source,
    }
}

/// Run a complete job: read the SER source, correct every frame, write the
/// configured output.
pub fn run_job(job: &DeshakeJob, reporter: &dyn ProgressReporter) -> Result<DeshakeSummary> {
    job.params.validate()?;
    if job.output == OutputTarget::Ser(job.input.clone()) {
        return Err(DeshakeError::InvalidParameter {
            name: "output",
            reason: "matches the input file".into(),
        });
    }

    let reader = SerReader::open(&job.input)?;
    let layout = reader.header.pixel_layout()?;
    let frame_rate = resolve_frame_rate(job.frame_rate, &reader)?;
    let width = reader.header.width as usize;
    let height = reader.header.height as usize;

    info!(
        input = %job.input.display(),
        output = %job.output,
        total_frames = reader.frame_count(),
        width,
        height,
        layout = %layout,
        frame_rate = ?frame_rate,
        "Deshaking video"
    );

    let mut sink: Box<dyn FrameSink> = match &job.output {
        OutputTarget::Ser(path) => {
            let writer = SerWriter::create(path, &reader.header)?;
            match output_timestamps(&reader, frame_rate) {
                Some(ts) => Box::new(writer.with_timestamps(ts)),
                None => {
                    warn!("Frame rate unknown and source has no timestamps; output has no timestamp trailer");
                    Box::new(writer)
                }
            }
        }
        OutputTarget::Stdout => Box::new(RawVideoWriter::new(BufWriter::new(
            std::io::stdout().lock(),
        ))),
    };

    let mut summary = deshake_frames(
        reader.frames(),
        Some(reader.frame_count()),
        width,
        height,
        &job.params,
        job.debug.as_ref(),
        sink.as_mut(),
        reporter,
    )?;
    summary.frame_rate = frame_rate;

    info!(
        frames = summary.frames_processed,
        unusable = summary.unusable_frames,
        max_abs_shift = summary.max_abs_shift,
        "Deshaking complete"
    );
    Ok(summary)
}

/// Correct a stream of frames in arrival order and write them to `sink`.
///
/// Frames without any usable line start are written unchanged and counted in
/// [`DeshakeSummary::unusable_frames`]. `sink` is finished before returning.
#[allow(clippy::too_many_arguments)]
pub fn deshake_frames<I>(
    frames: I,
    total: Option<usize>,
    width: usize,
    height: usize,
    params: &ProcessingParameters,
    debug_capture: Option<&DebugCapture>,
    sink: &mut dyn FrameSink,
    reporter: &dyn ProgressReporter,
) -> Result<DeshakeSummary>
where
    I: IntoIterator<Item = Result<Frame>>,
{
    let mut corrector = FrameCorrector::new(params.clone(), width, height)?;
    let mut summary = DeshakeSummary::default();

    reporter.begin_stage(PipelineStage::Correcting, total);
    for (index, frame) in frames.into_iter().enumerate() {
        let frame = frame?;

        let capture = debug_capture.filter(|d| d.frame_index == index);
        let (corrected, report) = match capture {
            Some(capture) => {
                let (corrected, report, trace) = corrector.correct_traced(&frame)?;
                let written = save_trace_overlays(&frame, &corrected, &trace, params, &capture.dir)?;
                summary.overlays_written += written.len();
                info!(
                    frame = index,
                    files = written.len(),
                    dir = %capture.dir.display(),
                    "Saved line-start overlays"
                );
                (corrected, report)
            }
            None => corrector.correct(&frame)?,
        };

        match report.shift_range {
            Some((lo, hi)) => {
                summary.max_abs_shift = summary.max_abs_shift.max(lo.abs()).max(hi.abs());
            }
            None => {
                summary.unusable_frames += 1;
                debug!(frame = index, "No usable line-start data, frame left uncorrected");
            }
        }
        summary.merge.accumulate(&report.merge);

        sink.write_frame(&corrected)?;
        summary.frames_processed += 1;
        reporter.advance(summary.frames_processed);

        if summary.frames_processed % PROGRESS_LOG_INTERVAL == 0 {
            debug!(frame = summary.frames_processed, total = ?total, "Progress");
        }
    }
    reporter.finish_stage();

    reporter.begin_stage(PipelineStage::Finalizing, None);
    sink.finish()?;
    reporter.finish_stage();

    if let Some(capture) = debug_capture {
        if capture.frame_index >= summary.frames_processed {
            warn!(
                frame = capture.frame_index,
                frames = summary.frames_processed,
                "Debug frame is past the end of the video; no overlays saved"
            );
        }
    }
    if summary.unusable_frames > 0 {
        warn!(
            count = summary.unusable_frames,
            "Frames without usable line-start data were left uncorrected"
        );
    }
    Ok(summary)
}
