#[allow(dead_code)]
mod common;

use deshake_core::correct::{correct_frame, FrameCorrector};
use deshake_core::error::DeshakeError;
use deshake_core::params::ProcessingParameters;

use common::{bordered_frame, bordered_frame_rows, borderless_frame};

const W: usize = 64;
const H: usize = 40;

/// Per-row parameters: no smoothing, so every row keeps its own shift.
fn unsmoothed() -> ProcessingParameters {
    ProcessingParameters {
        line_start_smoothing_kernel_size: 1,
        ..Default::default()
    }
}

// ---------------------------------------------------------------------------
// Geometry
// ---------------------------------------------------------------------------

#[test]
fn test_output_keeps_geometry_and_layout() {
    let input = bordered_frame(W, H, 11, 5);
    let output = correct_frame(&input, &ProcessingParameters::default()).unwrap();
    assert!(output.same_geometry(&input));
    assert_eq!(output.data().len(), input.data().len());
}

#[test]
fn test_frame_of_other_size_is_rejected() {
    let mut corrector = FrameCorrector::new(ProcessingParameters::default(), W, H).unwrap();
    let other = bordered_frame(W + 2, H, 11, 7);
    assert!(matches!(
        corrector.correct(&other),
        Err(DeshakeError::InvalidDimensions { .. })
    ));
}

#[test]
fn test_col_range_wider_than_frame_is_rejected() {
    let params = ProcessingParameters {
        col_range: 20,
        ..Default::default()
    };
    assert!(matches!(
        FrameCorrector::new(params, 16, 4),
        Err(DeshakeError::InvalidParameter { name: "col_range", .. })
    ));
}

#[test]
fn test_oversized_pure_black_width_rejected_before_correcting() {
    let params = ProcessingParameters {
        pure_black_width: 1_500_000_000,
        col_range: 16,
        ..Default::default()
    };
    assert!(matches!(
        FrameCorrector::new(params, W, H),
        Err(DeshakeError::InvalidParameter { name: "pure_black_width", .. })
    ));
}

// ---------------------------------------------------------------------------
// Constant displacement
// ---------------------------------------------------------------------------

#[test]
fn test_displaced_picture_moves_to_target() {
    // Picture displaced 3 columns right: 11 black columns left, 5 right.
    let input = bordered_frame(W, H, 11, 5);
    let mut corrector = FrameCorrector::new(ProcessingParameters::default(), W, H).unwrap();
    let (output, report) = corrector.correct(&input).unwrap();

    assert_eq!(output, bordered_frame(W, H, 8, 8));
    assert_eq!(report.shift_range, Some((-3, -3)));
    assert_eq!(report.rows_detected, H);
    assert_eq!(report.merge.averaged, H);
}

#[test]
fn test_shift_right_pads_left_edge() {
    // Picture displaced 2 columns left.
    let input = bordered_frame(W, H, 6, 10);
    let (output, report) = FrameCorrector::new(ProcessingParameters::default(), W, H)
        .unwrap()
        .correct(&input)
        .unwrap();
    assert_eq!(report.shift_range, Some((2, 2)));
    assert_eq!(output, bordered_frame(W, H, 8, 8));
}

#[test]
fn test_custom_target_line_start() {
    let params = ProcessingParameters {
        target_line_start: 12,
        ..Default::default()
    };
    let input = bordered_frame(W, H, 11, 5);
    let output = correct_frame(&input, &params).unwrap();
    assert_eq!(output, bordered_frame(W, H, 12, 4));
}

#[test]
fn test_left_border_only() {
    // Picture runs into the right edge: only the left side is usable.
    let input = bordered_frame(W, H, 12, 0);
    let mut corrector = FrameCorrector::new(ProcessingParameters::default(), W, H).unwrap();
    let (output, report) = corrector.correct(&input).unwrap();

    assert_eq!(report.merge.from_left, H);
    assert_eq!(report.merge.from_right, 0);
    assert_eq!(output, bordered_frame(W, H, 8, 4));
}

#[test]
fn test_right_border_only() {
    // Right border 2 means the picture sits 6 columns right of centre.
    let input = bordered_frame(W, H, 0, 2);
    let mut corrector = FrameCorrector::new(ProcessingParameters::default(), W, H).unwrap();
    let (line_starts, stats) = corrector.estimate_line_starts(&input).unwrap();

    assert_eq!(line_starts, Some(vec![14; H]));
    assert_eq!(stats.from_right, H);
}

#[test]
fn test_correction_is_idempotent() {
    let params = ProcessingParameters::default();
    let once = correct_frame(&bordered_frame(W, H, 13, 3), &params).unwrap();
    let twice = correct_frame(&once, &params).unwrap();
    assert_eq!(once, twice);
}

#[test]
fn test_centred_frame_is_unchanged() {
    let input = bordered_frame(W, H, 8, 8);
    let (output, report) = FrameCorrector::new(ProcessingParameters::default(), W, H)
        .unwrap()
        .correct(&input)
        .unwrap();
    assert_eq!(output, input);
    assert_eq!(report.shift_range, Some((0, 0)));
}

// ---------------------------------------------------------------------------
// Per-row shake
// ---------------------------------------------------------------------------

#[test]
fn test_rows_shifted_independently() {
    let mut rows = vec![(10, 6); 20];
    rows.extend(vec![(6, 10); 20]);
    let input = bordered_frame_rows(W, &rows);

    let mut corrector = FrameCorrector::new(unsmoothed(), W, H).unwrap();
    let (line_starts, _) = corrector.estimate_line_starts(&input).unwrap();
    let line_starts = line_starts.unwrap();
    assert!(line_starts[..19].iter().all(|&v| v == 10));
    assert!(line_starts[21..].iter().all(|&v| v == 6));

    // Rows next to the jump see both borders through the vertical kernel.
    let (output, _) = corrector.correct(&input).unwrap();
    let expected = bordered_frame(W, H, 8, 8);
    for y in (0..19).chain(21..H) {
        assert_eq!(output.row(y), expected.row(y), "row {y}");
    }
}

#[test]
fn test_short_glitch_is_discarded() {
    let h = 60;
    let mut rows = vec![(11, 5); h];
    for row in &mut rows[30..33] {
        *row = (14, 2);
    }
    let input = bordered_frame_rows(W, &rows);

    let mut corrector = FrameCorrector::new(unsmoothed(), W, h).unwrap();
    let (line_starts, _) = corrector.estimate_line_starts(&input).unwrap();
    assert_eq!(line_starts, Some(vec![11; h]));
}

#[test]
fn test_smoothing_spreads_a_step() {
    let mut rows = vec![(10, 6); 30];
    rows.extend(vec![(6, 10); 30]);
    let input = bordered_frame_rows(W, &rows);

    let params = ProcessingParameters {
        line_start_smoothing_kernel_size: 11,
        ..Default::default()
    };
    let mut corrector = FrameCorrector::new(params, W, 60).unwrap();
    let (line_starts, _) = corrector.estimate_line_starts(&input).unwrap();
    let line_starts = line_starts.unwrap();

    assert_eq!(line_starts[0], 10);
    assert_eq!(line_starts[59], 6);
    assert!(line_starts.windows(2).all(|w| w[1] <= w[0]));
    assert!(line_starts[25..35].iter().any(|&v| v != 10 && v != 6));
}

// ---------------------------------------------------------------------------
// Unusable frames
// ---------------------------------------------------------------------------

#[test]
fn test_frame_without_border_passes_through() {
    let input = borderless_frame(W, H);
    let mut corrector = FrameCorrector::new(ProcessingParameters::default(), W, H).unwrap();
    let (output, report) = corrector.correct(&input).unwrap();

    assert_eq!(output, input);
    assert!(!report.is_usable());
    assert_eq!(report.merge.missing, H);
    assert_eq!(corrector.estimate_line_starts(&input).unwrap().0, None);
}

#[test]
fn test_black_frame_passes_through() {
    let input = bordered_frame(W, H, W, 0);
    let (output, report) = FrameCorrector::new(ProcessingParameters::default(), W, H)
        .unwrap()
        .correct(&input)
        .unwrap();
    assert_eq!(output, input);
    assert_eq!(report.shift_range, None);
}

// ---------------------------------------------------------------------------
// Workspace reuse
// ---------------------------------------------------------------------------

#[test]
fn test_reused_corrector_matches_fresh_one() {
    let params = ProcessingParameters::default();
    let a = bordered_frame(W, H, 11, 5);
    let b = borderless_frame(W, H);
    let c = bordered_frame(W, H, 5, 11);

    let mut corrector = FrameCorrector::new(params.clone(), W, H).unwrap();
    for frame in [&a, &b, &c, &a] {
        let (reused, _) = corrector.correct(frame).unwrap();
        assert_eq!(reused, correct_frame(frame, &params).unwrap());
    }
}

#[test]
fn test_trace_records_every_stage() {
    let input = bordered_frame(W, H, 11, 5);
    let mut corrector = FrameCorrector::new(ProcessingParameters::default(), W, H).unwrap();
    let (traced, _, trace) = corrector.correct_traced(&input).unwrap();
    let (plain, _) = corrector.correct(&input).unwrap();

    assert_eq!(traced, plain);
    assert!(trace.raw_left.iter().all(|v| v == Some(11)));
    assert!(trace.raw_right.iter().all(|v| v == Some(11)));
    assert_eq!(trace.filtered_left.run_lengths, vec![H; H]);
    assert!(trace.merged.is_complete());
    assert_eq!(trace.gap_filled, trace.merged);
    assert_eq!(trace.smoothed, Some(vec![11; H]));
}
