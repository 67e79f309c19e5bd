use super::{LineStartSeries, SegmentedSeries};

/// How each row of a merged series was obtained.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MergeStats {
    /// Rows where only the left side was known, or its run was longer.
    pub from_left: usize,
    /// Rows where only the right side was known, or its run was longer.
    pub from_right: usize,
    /// Rows where both runs had equal length and the offsets were averaged.
    pub averaged: usize,
    /// Rows known on neither side.
    pub missing: usize,
}

impl MergeStats {
    pub fn accumulate(&mut self, other: &MergeStats) {
        self.from_left += other.from_left;
        self.from_right += other.from_right;
        self.averaged += other.averaged;
        self.missing += other.missing;
    }
}

/// Combine the filtered left and right line starts into one series.
///
/// When both sides know a row, the one from the longer run wins; equal run
/// lengths average the two offsets, truncating toward zero.
pub fn merge_line_starts(
    left: &SegmentedSeries,
    right: &SegmentedSeries,
) -> (LineStartSeries, MergeStats) {
    assert_eq!(left.len(), right.len(), "left and right series differ in length");

    let mut stats = MergeStats::default();
    let merged: LineStartSeries = left
        .starts
        .iter()
        .zip(right.starts.iter())
        .zip(left.run_lengths.iter().zip(&right.run_lengths))
        .map(|((l, r), (&l_run, &r_run))| match (l, r) {
            (Some(l), Some(r)) => {
                if l_run > r_run {
                    stats.from_left += 1;
                    Some(l)
                } else if r_run > l_run {
                    stats.from_right += 1;
                    Some(r)
                } else {
                    stats.averaged += 1;
                    Some((l + r) / 2)
                }
            }
            (Some(l), None) => {
                stats.from_left += 1;
                Some(l)
            }
            (None, Some(r)) => {
                stats.from_right += 1;
                Some(r)
            }
            (None, None) => {
                stats.missing += 1;
                None
            }
        })
        .collect();

    (merged, stats)
}
