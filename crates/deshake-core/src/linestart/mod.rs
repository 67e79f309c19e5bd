//! Per-row line-start estimation.
//!
//! A line start is the column where a row's pure-black border ends. Every
//! stage works on a [`LineStartSeries`] holding one optional offset per frame
//! row; `None` marks a row whose line start is unknown.

pub mod edge;
pub mod gaps;
pub mod merge;
pub mod segment;
pub mod smooth;

pub use edge::{locate_line_starts, EdgeStrip, Side};
pub use gaps::{extrapolate, fill_gaps, interpolate, GapFillOutcome};
pub use merge::{merge_line_starts, MergeStats};
pub use segment::{filter_segments, SegmentedSeries};
pub use smooth::smooth_line_starts;

/// One optional line start per frame row, top to bottom.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LineStartSeries {
    values: Vec<Option<i32>>,
}

impl LineStartSeries {
    /// A series of `len` unknown rows.
    pub fn missing(len: usize) -> Self {
        Self {
            values: vec![None; len],
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, row: usize) -> Option<i32> {
        self.values[row]
    }

    pub fn set(&mut self, row: usize, value: Option<i32>) {
        self.values[row] = value;
    }

    pub fn as_slice(&self) -> &[Option<i32>] {
        &self.values
    }

    pub fn as_mut_slice(&mut self) -> &mut [Option<i32>] {
        &mut self.values
    }

    pub fn iter(&self) -> impl Iterator<Item = Option<i32>> + '_ {
        self.values.iter().copied()
    }

    /// Number of rows with a known line start.
    pub fn known_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_some()).count()
    }

    pub fn is_all_missing(&self) -> bool {
        self.values.iter().all(Option::is_none)
    }

    pub fn is_complete(&self) -> bool {
        self.values.iter().all(Option::is_some)
    }

    /// The known values, or `None` if any row is still missing.
    pub fn to_complete(&self) -> Option<Vec<i32>> {
        self.values.iter().copied().collect()
    }

    /// Resize to `len` rows, all unknown. Keeps the allocation.
    pub fn reset(&mut self, len: usize) {
        self.values.clear();
        self.values.resize(len, None);
    }
}

impl From<Vec<Option<i32>>> for LineStartSeries {
    fn from(values: Vec<Option<i32>>) -> Self {
        Self { values }
    }
}

impl From<Vec<i32>> for LineStartSeries {
    fn from(values: Vec<i32>) -> Self {
        Self {
            values: values.into_iter().map(Some).collect(),
        }
    }
}

impl FromIterator<Option<i32>> for LineStartSeries {
    fn from_iter<I: IntoIterator<Item = Option<i32>>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}
