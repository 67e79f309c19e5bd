use ndarray::Array2;

use crate::frame::Frame;
use crate::params::ProcessingParameters;

use super::LineStartSeries;

/// Which edge of the frame a detection strip was taken from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Left => write!(f, "left"),
            Self::Right => write!(f, "right"),
        }
    }
}

/// Grayscale strip along one frame edge together with its horizontal gradient.
///
/// Both arrays have shape `(height, col_range)`. Column 0 is the strip's
/// leftmost column for either side; the scan direction is applied by
/// [`locate_line_starts`].
#[derive(Clone, Debug)]
pub struct EdgeStrip {
    pub gray: Array2<u8>,
    pub gradient: Array2<f32>,
}

impl Default for EdgeStrip {
    fn default() -> Self {
        Self {
            gray: Array2::zeros((0, 0)),
            gradient: Array2::zeros((0, 0)),
        }
    }
}

impl EdgeStrip {
    /// Extract a fresh strip from `frame`.
    pub fn from_frame(frame: &Frame, side: Side, col_range: usize) -> Self {
        let mut strip = Self::default();
        strip.fill(frame, side, col_range);
        strip
    }

    /// Recompute the strip in place, reallocating only when the shape changes.
    pub fn fill(&mut self, frame: &Frame, side: Side, col_range: usize) {
        let h = frame.height();
        let cr = col_range.min(frame.width());
        if self.gray.dim() != (h, cr) {
            self.gray = Array2::zeros((h, cr));
            self.gradient = Array2::zeros((h, cr));
        }

        let first_col = match side {
            Side::Left => 0,
            Side::Right => frame.width() - cr,
        };
        for row in 0..h {
            for col in 0..cr {
                self.gray[[row, col]] = frame.luma(first_col + col, row);
            }
        }

        horizontal_gradient(&self.gray, &mut self.gradient);
    }

    pub fn height(&self) -> usize {
        self.gray.nrows()
    }

    pub fn width(&self) -> usize {
        self.gray.ncols()
    }
}

/// Sobel-weighted backward difference along each row.
///
/// `out[y, x] = |d(y-1, x) + 2 d(y, x) + d(y+1, x)|` with
/// `d(r, x) = gray[r, x] - gray[r, x-1]`. Rows are clamped at the top and
/// bottom; column `x-1` is clamped to 0, so column 0 is always zero. A step
/// between columns `x-1` and `x` therefore responds at `x` only, on the same
/// scale as a 3x3 Sobel kernel.
pub fn horizontal_gradient(gray: &Array2<u8>, out: &mut Array2<f32>) {
    let (h, w) = gray.dim();
    debug_assert_eq!(out.dim(), (h, w));
    if h == 0 || w == 0 {
        return;
    }

    let diff = |row: usize, col: usize| -> f32 {
        let prev = col.saturating_sub(1);
        gray[[row, col]] as f32 - gray[[row, prev]] as f32
    };

    for row in 0..h {
        let above = row.saturating_sub(1);
        let below = (row + 1).min(h - 1);
        for col in 0..w {
            let g = diff(above, col) + 2.0 * diff(row, col) + diff(below, col);
            out[[row, col]] = g.abs();
        }
    }
}

/// Detect the raw line start of every row of `strip`.
///
/// A row whose outermost pixel is brighter than the pure-black threshold has no
/// usable border and stays `None`. Otherwise the strip is scanned from the
/// frame edge inward and the first column whose gradient exceeds the edge
/// threshold is taken.
///
/// Right-side detections are mapped into the left-side convention: the first
/// black column `x` of a right border of width `b` sits at `col_range - b`, and
/// is reported as `x - (col_range - 2 * pure_black_width) = 2 * pure_black_width - b`.
/// A picture displaced by `d` columns then yields `pure_black_width + d` on
/// both sides.
pub fn locate_line_starts(
    strip: &EdgeStrip,
    side: Side,
    params: &ProcessingParameters,
    out: &mut LineStartSeries,
) {
    let h = strip.height();
    let cr = strip.width();
    out.reset(h);
    if cr == 0 {
        return;
    }

    let reference = cr as i32 - 2 * params.pure_black_width;
    let outer_col = match side {
        Side::Left => 0,
        Side::Right => cr - 1,
    };

    for row in 0..h {
        if strip.gray[[row, outer_col]] > params.pure_black_threshold {
            continue;
        }

        let crossing = match side {
            Side::Left => (0..cr).find(|&x| strip.gradient[[row, x]] > params.edge_threshold),
            Side::Right => (0..cr)
                .rev()
                .find(|&x| strip.gradient[[row, x]] > params.edge_threshold),
        };

        let value = crossing.map(|x| match side {
            Side::Left => x as i32,
            Side::Right => x as i32 - reference,
        });
        out.set(row, value);
    }
}
