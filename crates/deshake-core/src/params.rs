use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::consts::{
    DEFAULT_EDGE_THRESHOLD, DEFAULT_LINE_START_SMOOTHING_KERNEL_SIZE,
    DEFAULT_MIN_LINE_START_SEGMENT_LENGTH, DEFAULT_PURE_BLACK_THRESHOLD, DEFAULT_PURE_BLACK_WIDTH,
    DEFAULT_SEGMENT_TOLERANCE,
};
use crate::error::{DeshakeError, Result};

/// Resolved, validated configuration for one deshaking run.
///
/// Build it through [`ParameterOverrides::resolve`] or [`Default`]; a struct
/// literal is checked again by [`ProcessingParameters::validate`] before the
/// first frame is corrected.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProcessingParameters {
    /// Columns searched for the border crossing on each side of the frame.
    pub col_range: usize,
    /// Column every row's line start is moved to.
    pub target_line_start: i32,
    /// Expected width of the pure-black border in a clean capture.
    pub pure_black_width: i32,
    /// Highest intensity counted as pure black (1..=254).
    pub pure_black_threshold: u8,
    /// Line starts are only trusted inside consistent runs at least this long.
    pub min_line_start_segment_length: usize,
    /// Odd width of the box filter applied to the line starts.
    pub line_start_smoothing_kernel_size: usize,
    /// Gradient magnitude counted as a border crossing.
    pub edge_threshold: f32,
    /// Maximum (exclusive) deviation from a segment's first line start.
    pub segment_tolerance: i32,
}

impl Default for ProcessingParameters {
    fn default() -> Self {
        Self {
            col_range: 2 * DEFAULT_PURE_BLACK_WIDTH as usize,
            target_line_start: DEFAULT_PURE_BLACK_WIDTH,
            pure_black_width: DEFAULT_PURE_BLACK_WIDTH,
            pure_black_threshold: DEFAULT_PURE_BLACK_THRESHOLD,
            min_line_start_segment_length: DEFAULT_MIN_LINE_START_SEGMENT_LENGTH,
            line_start_smoothing_kernel_size: DEFAULT_LINE_START_SMOOTHING_KERNEL_SIZE,
            edge_threshold: DEFAULT_EDGE_THRESHOLD,
            segment_tolerance: DEFAULT_SEGMENT_TOLERANCE,
        }
    }
}

impl ProcessingParameters {
    pub fn validate(&self) -> Result<()> {
        if self.col_range == 0 {
            return Err(invalid("col_range", "must be greater than 0"));
        }
        if self.target_line_start < 0 {
            return Err(invalid("target_line_start", "must not be negative"));
        }
        if self.pure_black_width <= 0 {
            return Err(invalid("pure_black_width", "must be greater than 0"));
        }
        if !(1..=254).contains(&self.pure_black_threshold) {
            return Err(invalid("pure_black_threshold", "must be in the range 1-254"));
        }
        if self.min_line_start_segment_length == 0 {
            return Err(invalid("min_line_start_segment_length", "must be greater than 0"));
        }
        if self.line_start_smoothing_kernel_size % 2 == 0 {
            return Err(invalid(
                "line_start_smoothing_kernel_size",
                "must be an odd number",
            ));
        }
        if !(self.edge_threshold.is_finite() && self.edge_threshold > 0.0) {
            return Err(invalid("edge_threshold", "must be a positive number"));
        }
        if self.segment_tolerance < 1 {
            return Err(invalid("segment_tolerance", "must be at least 1"));
        }

        // Line starts and shifts are i32 and span up to col_range past
        // 2 * pure_black_width and target_line_start.
        let col_range = i32::try_from(self.col_range)
            .map_err(|_| invalid("col_range", "is too large"))? as i64;
        if col_range + 2 * self.pure_black_width as i64 > i32::MAX as i64 {
            return Err(invalid(
                "pure_black_width",
                "is too large for the column range",
            ));
        }
        if col_range + self.target_line_start as i64 > i32::MAX as i64 {
            return Err(invalid(
                "target_line_start",
                "is too large for the column range",
            ));
        }
        Ok(())
    }

    /// Check that the detection strips fit inside frames of the given width.
    pub fn validate_for_width(&self, width: usize) -> Result<()> {
        if self.col_range > width {
            return Err(invalid(
                "col_range",
                format!("{} exceeds the frame width {width}", self.col_range),
            ));
        }
        Ok(())
    }
}

/// Partially specified parameters, as read from a config file or the command line.
///
/// Integer fields are wide and signed so out-of-range input is reported as an
/// [`DeshakeError::InvalidParameter`] instead of a parse failure.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ParameterOverrides {
    pub col_range: Option<i64>,
    pub target_line_start: Option<i64>,
    pub pure_black_width: Option<i64>,
    pub pure_black_threshold: Option<i64>,
    pub min_line_start_segment_length: Option<i64>,
    pub line_start_smoothing_kernel_size: Option<i64>,
    pub edge_threshold: Option<f32>,
    pub segment_tolerance: Option<i64>,
}

impl ParameterOverrides {
    /// Layer `other` on top of `self`; fields set in `other` win.
    pub fn merged_with(&self, other: &ParameterOverrides) -> ParameterOverrides {
        ParameterOverrides {
            col_range: other.col_range.or(self.col_range),
            target_line_start: other.target_line_start.or(self.target_line_start),
            pure_black_width: other.pure_black_width.or(self.pure_black_width),
            pure_black_threshold: other.pure_black_threshold.or(self.pure_black_threshold),
            min_line_start_segment_length: other
                .min_line_start_segment_length
                .or(self.min_line_start_segment_length),
            line_start_smoothing_kernel_size: other
                .line_start_smoothing_kernel_size
                .or(self.line_start_smoothing_kernel_size),
            edge_threshold: other.edge_threshold.or(self.edge_threshold),
            segment_tolerance: other.segment_tolerance.or(self.segment_tolerance),
        }
    }

    /// Fill unset fields with defaults and validate the result.
    ///
    /// `col_range` defaults to twice the pure-black width and
    /// `target_line_start` to the pure-black width. An even smoothing kernel
    /// size is made odd by adding one.
    pub fn resolve(&self) -> Result<ProcessingParameters> {
        let pure_black_width = match self.pure_black_width {
            Some(w) if w <= 0 => return Err(invalid("pure_black_width", "must be greater than 0")),
            Some(w) => to_i32("pure_black_width", w)?,
            None => DEFAULT_PURE_BLACK_WIDTH,
        };

        let col_range = match self.col_range {
            Some(c) if c <= 0 => return Err(invalid("col_range", "must be greater than 0")),
            Some(c) => to_usize("col_range", c)?,
            None => 2 * pure_black_width as usize,
        };

        let target_line_start = match self.target_line_start {
            Some(t) if t < 0 => return Err(invalid("target_line_start", "must not be negative")),
            Some(t) => to_i32("target_line_start", t)?,
            None => pure_black_width,
        };

        let pure_black_threshold = match self.pure_black_threshold {
            Some(p) if !(1..=254).contains(&p) => {
                return Err(invalid("pure_black_threshold", "must be in the range 1-254"))
            }
            Some(p) => p as u8,
            None => DEFAULT_PURE_BLACK_THRESHOLD,
        };

        let min_line_start_segment_length = match self.min_line_start_segment_length {
            Some(m) if m <= 0 => {
                return Err(invalid(
                    "min_line_start_segment_length",
                    "must be greater than 0",
                ))
            }
            Some(m) => to_usize("min_line_start_segment_length", m)?,
            None => DEFAULT_MIN_LINE_START_SEGMENT_LENGTH,
        };

        let line_start_smoothing_kernel_size = match self.line_start_smoothing_kernel_size {
            Some(k) if k < 1 => {
                return Err(invalid(
                    "line_start_smoothing_kernel_size",
                    "must be at least 1",
                ))
            }
            Some(k) => {
                let k = to_usize("line_start_smoothing_kernel_size", k)?;
                if k % 2 == 0 {
                    warn!(
                        requested = k,
                        used = k + 1,
                        "line_start_smoothing_kernel_size is even, forcing it odd"
                    );
                }
                k | 1
            }
            None => DEFAULT_LINE_START_SMOOTHING_KERNEL_SIZE,
        };

        let params = ProcessingParameters {
            col_range,
            target_line_start,
            pure_black_width,
            pure_black_threshold,
            min_line_start_segment_length,
            line_start_smoothing_kernel_size,
            edge_threshold: self.edge_threshold.unwrap_or(DEFAULT_EDGE_THRESHOLD),
            segment_tolerance: match self.segment_tolerance {
                Some(t) => to_i32("segment_tolerance", t)?,
                None => DEFAULT_SEGMENT_TOLERANCE,
            },
        };
        params.validate()?;
        Ok(params)
    }
}

fn invalid(name: &'static str, reason: impl Into<String>) -> DeshakeError {
    DeshakeError::InvalidParameter {
        name,
        reason: reason.into(),
    }
}

fn to_i32(name: &'static str, value: i64) -> Result<i32> {
    i32::try_from(value).map_err(|_| invalid(name, format!("{value} is out of range")))
}

fn to_usize(name: &'static str, value: i64) -> Result<usize> {
    usize::try_from(value).map_err(|_| invalid(name, format!("{value} is out of range")))
}
