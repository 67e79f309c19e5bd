use super::LineStartSeries;

/// Line starts that survived segment filtering, with the length of the run
/// each row belongs to.
///
/// `run_lengths[y]` is 0 exactly when `starts.get(y)` is `None`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SegmentedSeries {
    pub starts: LineStartSeries,
    pub run_lengths: Vec<usize>,
}

impl SegmentedSeries {
    pub fn len(&self) -> usize {
        self.starts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.starts.is_empty()
    }
}

/// Discard line starts that are not part of a long enough consistent run.
///
/// Rows are grouped top to bottom into segments: a row joins the open segment
/// while it is known and differs from the segment's first value by less than
/// `tolerance`. A segment shorter than `min_segment_length` is erased; the
/// rows of a longer one are tagged with its length. The segment still open at
/// the bottom of the frame is closed the same way.
pub fn filter_segments(
    mut series: LineStartSeries,
    min_segment_length: usize,
    tolerance: i32,
) -> SegmentedSeries {
    let n = series.len();
    let mut run_lengths = vec![0usize; n];
    let mut open: Option<(usize, i32)> = None;

    for i in 0..=n {
        let value = if i < n { series.get(i) } else { None };

        if let Some((begin, first)) = open {
            if matches!(value, Some(v) if (v - first).abs() < tolerance) {
                continue;
            }

            let length = i - begin;
            if length < min_segment_length {
                series.as_mut_slice()[begin..i].fill(None);
            } else {
                run_lengths[begin..i].fill(length);
            }
            open = None;
        }

        if let Some(v) = value {
            open = Some((i, v));
        }
    }

    SegmentedSeries {
        starts: series,
        run_lengths,
    }
}
