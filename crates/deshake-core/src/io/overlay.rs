use std::path::{Path, PathBuf};

use image::{ImageFormat, Rgb, RgbImage};

use crate::correct::CorrectionTrace;
use crate::error::Result;
use crate::frame::{Frame, PixelLayout};
use crate::linestart::LineStartSeries;
use crate::params::ProcessingParameters;

/// Marker color for detected line starts.
pub const LINE_START_COLOR: Rgb<u8> = Rgb([0, 255, 255]);
/// Marker color for gap-filled and smoothed line starts.
pub const ESTIMATE_COLOR: Rgb<u8> = Rgb([255, 0, 255]);
/// Rows whose marker would fall left of the frame are painted this color.
pub const OUT_OF_FRAME_COLOR: Rgb<u8> = Rgb([255, 0, 0]);

/// Convert a frame to an RGB image.
pub fn frame_to_image(frame: &Frame) -> RgbImage {
    let mut img = RgbImage::new(frame.width() as u32, frame.height() as u32);
    for y in 0..frame.height() {
        for x in 0..frame.width() {
            let p = frame.pixel(x, y);
            let rgb = match frame.layout() {
                PixelLayout::Rgb => [p[0], p[1], p[2]],
                PixelLayout::Bgr => [p[2], p[1], p[0]],
            };
            img.put_pixel(x as u32, y as u32, Rgb(rgb));
        }
    }
    img
}

/// Mark each known line start of `series` with one pixel at column
/// `value + x_offset`.
///
/// Markers left of column 0 paint the whole row; markers right of the frame
/// are skipped.
pub fn draw_line_starts(img: &mut RgbImage, series: &LineStartSeries, color: Rgb<u8>, x_offset: i64) {
    let (w, h) = img.dimensions();
    for (y, value) in series.iter().enumerate().take(h as usize) {
        let Some(value) = value else {
            continue;
        };
        let x = value as i64 + x_offset;
        if x < 0 {
            for col in 0..w {
                img.put_pixel(col, y as u32, OUT_OF_FRAME_COLOR);
            }
        } else if x < w as i64 {
            img.put_pixel(x as u32, y as u32, color);
        }
    }
}

/// Render every stage of `trace` over `input` and save the images as PNGs
/// in `dir`. Returns the written paths in stage order.
pub fn save_trace_overlays(
    input: &Frame,
    corrected: &Frame,
    trace: &CorrectionTrace,
    params: &ProcessingParameters,
    dir: &Path,
) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)?;
    let right_offset = input.width() as i64 - 2 * params.pure_black_width as i64;
    let base = frame_to_image(input);
    let index = input.metadata.frame_index;
    let mut written = Vec::new();

    let mut save = |stage: &str, img: &RgbImage| -> Result<()> {
        let path = dir.join(format!("frame{index:06}_{stage}.png"));
        img.save_with_format(&path, ImageFormat::Png)?;
        written.push(path);
        Ok(())
    };

    let mut raw = base.clone();
    draw_line_starts(&mut raw, &trace.raw_left, LINE_START_COLOR, 0);
    draw_line_starts(&mut raw, &trace.raw_right, LINE_START_COLOR, right_offset);
    save("1_raw", &raw)?;

    let mut filtered = base.clone();
    draw_line_starts(&mut filtered, &trace.filtered_left.starts, LINE_START_COLOR, 0);
    draw_line_starts(&mut filtered, &trace.filtered_right.starts, LINE_START_COLOR, right_offset);
    save("2_filtered", &filtered)?;

    let mut merged = base.clone();
    draw_line_starts(&mut merged, &trace.merged, LINE_START_COLOR, 0);
    save("3_merged", &merged)?;

    let mut filled = base.clone();
    draw_line_starts(&mut filled, &trace.gap_filled, ESTIMATE_COLOR, 0);
    draw_line_starts(&mut filled, &trace.merged, LINE_START_COLOR, 0);
    save("4_gap_filled", &filled)?;

    if let Some(ref smoothed) = trace.smoothed {
        let mut img = base;
        draw_line_starts(&mut img, &LineStartSeries::from(smoothed.clone()), ESTIMATE_COLOR, 0);
        save("5_smoothed", &img)?;
    }

    save("6_out", &frame_to_image(corrected))?;
    Ok(written)
}
