#[allow(dead_code)]
mod common;

use std::cell::RefCell;

use approx::assert_relative_eq;
use tempfile::TempDir;

use deshake_core::error::DeshakeError;
use deshake_core::frame::Frame;
use deshake_core::io::raw::RawVideoWriter;
use deshake_core::io::ser::SerReader;
use deshake_core::io::timestamps::estimate_frame_rate;
use deshake_core::io::FrameSink;
use deshake_core::params::ProcessingParameters;
use deshake_core::pipeline::{
    deshake_frames, resolve_frame_rate, run_job, DebugCapture, DeshakeJob, NoOpReporter,
    OutputTarget, PipelineStage, ProgressReporter,
};

use common::{bordered_frame, borderless_frame, build_ser_with_frames, write_test_ser};

const W: usize = 48;
const H: usize = 32;

fn shaky_frames() -> Vec<Frame> {
    vec![
        bordered_frame(W, H, 11, 5),
        bordered_frame(W, H, 8, 8),
        bordered_frame(W, H, 6, 10),
        borderless_frame(W, H),
    ]
}

#[derive(Default)]
struct RecordingReporter {
    events: RefCell<Vec<String>>,
}

impl ProgressReporter for RecordingReporter {
    fn begin_stage(&self, stage: PipelineStage, total_items: Option<usize>) {
        self.events
            .borrow_mut()
            .push(format!("begin {stage} {total_items:?}"));
    }

    fn advance(&self, items_done: usize) {
        self.events.borrow_mut().push(format!("advance {items_done}"));
    }

    fn finish_stage(&self) {
        self.events.borrow_mut().push("finish".into());
    }
}

// ---------------------------------------------------------------------------
// run_job
// ---------------------------------------------------------------------------

#[test]
fn test_run_job_writes_corrected_ser() {
    let frames = shaky_frames();
    let input = write_test_ser(&build_ser_with_frames(&frames, None));
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("out.ser");

    let job = DeshakeJob {
        input: input.path().to_path_buf(),
        output: OutputTarget::Ser(output.clone()),
        frame_rate: Some(25.0),
        params: ProcessingParameters::default(),
        debug: None,
    };
    let summary = run_job(&job, &NoOpReporter).unwrap();

    assert_eq!(summary.frames_processed, 4);
    assert_eq!(summary.unusable_frames, 1);
    assert_eq!(summary.max_abs_shift, 3);
    assert_eq!(summary.frame_rate, Some(25.0));

    let reader = SerReader::open(&output).unwrap();
    assert_eq!(reader.frame_count(), 4);
    let centred = bordered_frame(W, H, 8, 8);
    for i in 0..3 {
        assert_eq!(reader.read_frame(i).unwrap().data(), centred.data(), "frame {i}");
    }
    assert_eq!(reader.read_frame(3).unwrap().data(), frames[3].data());

    let fps = estimate_frame_rate(&reader.timestamps().unwrap()).unwrap();
    assert_relative_eq!(fps, 25.0, epsilon = 1e-9);
}

#[test]
fn test_run_job_keeps_source_timestamps_without_rate() {
    let frames = shaky_frames();
    let ts = [7, 9, 30, 31];
    let input = write_test_ser(&build_ser_with_frames(&frames, Some(&ts)));
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("out.ser");

    // Deltas 2, 21, 1: median 2 ticks.
    let job = DeshakeJob {
        input: input.path().to_path_buf(),
        output: OutputTarget::Ser(output.clone()),
        frame_rate: None,
        params: ProcessingParameters::default(),
        debug: None,
    };
    let summary = run_job(&job, &NoOpReporter).unwrap();
    assert_eq!(summary.frame_rate, Some(5_000_000.0));

    let reader = SerReader::open(&output).unwrap();
    assert_eq!(reader.timestamps(), Some(vec![7, 9, 11, 13]));
}

#[test]
fn test_run_job_without_any_rate_writes_no_trailer() {
    let input = write_test_ser(&build_ser_with_frames(&shaky_frames(), None));
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("out.ser");

    let job = DeshakeJob {
        input: input.path().to_path_buf(),
        output: OutputTarget::Ser(output.clone()),
        frame_rate: None,
        params: ProcessingParameters::default(),
        debug: None,
    };
    let summary = run_job(&job, &NoOpReporter).unwrap();
    assert_eq!(summary.frame_rate, None);
    assert_eq!(SerReader::open(&output).unwrap().timestamps(), None);
}

#[test]
fn test_run_job_saves_debug_overlays() {
    let input = write_test_ser(&build_ser_with_frames(&shaky_frames(), None));
    let dir = TempDir::new().unwrap();
    let debug_dir = dir.path().join("debug");

    let job = DeshakeJob {
        input: input.path().to_path_buf(),
        output: OutputTarget::Ser(dir.path().join("out.ser")),
        frame_rate: Some(30.0),
        params: ProcessingParameters::default(),
        debug: Some(DebugCapture {
            frame_index: 2,
            dir: debug_dir.clone(),
        }),
    };
    let summary = run_job(&job, &NoOpReporter).unwrap();
    assert_eq!(summary.overlays_written, 6);

    for stage in ["1_raw", "2_filtered", "3_merged", "4_gap_filled", "5_smoothed", "6_out"] {
        let path = debug_dir.join(format!("frame000002_{stage}.png"));
        assert!(path.exists(), "missing {}", path.display());
    }
    let overlay = image::open(debug_dir.join("frame000002_6_out.png")).unwrap();
    assert_eq!(overlay.width(), W as u32);
    assert_eq!(overlay.height(), H as u32);
}

#[test]
fn test_debug_frame_past_end_saves_nothing() {
    let input = write_test_ser(&build_ser_with_frames(&shaky_frames(), None));
    let dir = TempDir::new().unwrap();
    let debug_dir = dir.path().join("debug");

    let job = DeshakeJob {
        input: input.path().to_path_buf(),
        output: OutputTarget::Ser(dir.path().join("out.ser")),
        frame_rate: Some(30.0),
        params: ProcessingParameters::default(),
        debug: Some(DebugCapture {
            frame_index: 4,
            dir: debug_dir.clone(),
        }),
    };
    let summary = run_job(&job, &NoOpReporter).unwrap();

    assert_eq!(summary.frames_processed, 4);
    assert_eq!(summary.overlays_written, 0);
    assert!(!debug_dir.exists());
}

#[test]
fn test_run_job_refuses_to_overwrite_input() {
    let input = write_test_ser(&build_ser_with_frames(&shaky_frames(), None));
    let job = DeshakeJob {
        input: input.path().to_path_buf(),
        output: OutputTarget::Ser(input.path().to_path_buf()),
        frame_rate: None,
        params: ProcessingParameters::default(),
        debug: None,
    };
    assert!(matches!(
        run_job(&job, &NoOpReporter),
        Err(DeshakeError::InvalidParameter { name: "output", .. })
    ));
}

#[test]
fn test_run_job_rejects_invalid_params() {
    let input = write_test_ser(&build_ser_with_frames(&shaky_frames(), None));
    let dir = TempDir::new().unwrap();
    let job = DeshakeJob {
        input: input.path().to_path_buf(),
        output: OutputTarget::Ser(dir.path().join("out.ser")),
        frame_rate: None,
        params: ProcessingParameters {
            pure_black_threshold: 0,
            ..Default::default()
        },
        debug: None,
    };
    assert!(run_job(&job, &NoOpReporter).is_err());
    assert!(!dir.path().join("out.ser").exists());
}

#[test]
fn test_resolve_frame_rate() {
    let frames = shaky_frames();
    let ts = [0, 400_000, 800_000, 1_200_000];
    let input = write_test_ser(&build_ser_with_frames(&frames, Some(&ts)));
    let reader = SerReader::open(input.path()).unwrap();

    assert_eq!(resolve_frame_rate(Some(29.97), &reader).unwrap(), Some(29.97));
    assert_eq!(resolve_frame_rate(None, &reader).unwrap(), Some(25.0));
    assert!(resolve_frame_rate(Some(0.0), &reader).is_err());
    assert!(resolve_frame_rate(Some(f64::NAN), &reader).is_err());
}

// ---------------------------------------------------------------------------
// deshake_frames
// ---------------------------------------------------------------------------

#[test]
fn test_raw_output_is_concatenated_frames() {
    let frames = shaky_frames();
    let mut sink = RawVideoWriter::new(Vec::new());

    let summary = deshake_frames(
        frames.iter().cloned().map(Ok),
        Some(frames.len()),
        W,
        H,
        &ProcessingParameters::default(),
        None,
        &mut sink,
        &NoOpReporter,
    )
    .unwrap();

    assert_eq!(summary.frames_processed, 4);
    assert_eq!(sink.frames_written(), 4);
    assert_eq!(sink.bytes_written(), (4 * W * H * 3) as u64);

    let bytes = sink.into_inner();
    let frame_len = W * H * 3;
    let centred = bordered_frame(W, H, 8, 8);
    assert_eq!(&bytes[..frame_len], centred.data());
    assert_eq!(&bytes[3 * frame_len..], frames[3].data());
}

#[test]
fn test_merge_stats_accumulate_over_frames() {
    let frames = vec![bordered_frame(W, H, 11, 5), bordered_frame(W, H, 12, 0)];
    let mut sink = RawVideoWriter::new(Vec::new());
    let summary = deshake_frames(
        frames.into_iter().map(Ok),
        None,
        W,
        H,
        &ProcessingParameters::default(),
        None,
        &mut sink,
        &NoOpReporter,
    )
    .unwrap();

    assert_eq!(summary.merge.averaged, H);
    assert_eq!(summary.merge.from_left, H);
    assert_eq!(summary.merge.missing, 0);
    assert_eq!(summary.max_abs_shift, 4);
}

#[test]
fn test_reader_error_stops_the_run() {
    let frames: Vec<deshake_core::error::Result<Frame>> = vec![
        Ok(bordered_frame(W, H, 8, 8)),
        Err(DeshakeError::FrameIndexOutOfRange { index: 1, total: 1 }),
    ];
    let mut sink = RawVideoWriter::new(Vec::new());
    let result = deshake_frames(
        frames,
        None,
        W,
        H,
        &ProcessingParameters::default(),
        None,
        &mut sink,
        &NoOpReporter,
    );
    assert!(result.is_err());
    assert_eq!(sink.frames_written(), 1);
}

#[test]
fn test_progress_events() {
    let frames = shaky_frames();
    let reporter = RecordingReporter::default();
    let mut sink = RawVideoWriter::new(Vec::new());
    deshake_frames(
        frames.into_iter().take(2).map(Ok),
        Some(2),
        W,
        H,
        &ProcessingParameters::default(),
        None,
        &mut sink,
        &reporter,
    )
    .unwrap();

    assert_eq!(
        reporter.events.into_inner(),
        vec![
            "begin Correcting frames Some(2)",
            "advance 1",
            "advance 2",
            "finish",
            "begin Finalizing output None",
            "finish",
        ]
    );
}
