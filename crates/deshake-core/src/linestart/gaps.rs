use super::LineStartSeries;

/// Result of [`fill_gaps`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GapFillOutcome {
    /// Every row now has a line start.
    Filled,
    /// No row had a line start, so there was nothing to fill from.
    NoData,
}

/// Fill missing line starts: boundary gaps by replication, interior gaps by
/// linear interpolation.
pub fn fill_gaps(series: &mut LineStartSeries) -> GapFillOutcome {
    if !extrapolate(series) {
        return GapFillOutcome::NoData;
    }
    interpolate(series);
    debug_assert!(series.is_complete());
    GapFillOutcome::Filled
}

/// Replicate the first known value up to row 0 and the last known value down
/// to the last row.
///
/// Returns `false`, leaving the series untouched, when no row is known.
pub fn extrapolate(series: &mut LineStartSeries) -> bool {
    let values = series.as_mut_slice();
    let Some(first) = values.iter().position(Option::is_some) else {
        return false;
    };
    let Some(last) = values.iter().rposition(Option::is_some) else {
        return false;
    };

    let head = values[first];
    values[..first].fill(head);
    let tail = values[last];
    values[last + 1..].fill(tail);
    true
}

/// Linearly interpolate every run of missing rows between two known rows,
/// rounding to the nearest column.
///
/// # Panics
///
/// Panics if the first or last row is missing. Run [`extrapolate`] first.
pub fn interpolate(series: &mut LineStartSeries) {
    let values = series.as_mut_slice();
    let n = values.len();
    if n == 0 {
        return;
    }
    assert!(
        values[0].is_some() && values[n - 1].is_some(),
        "interpolate requires known first and last rows; extrapolate must run first"
    );

    let mut before: Option<(usize, i32)> = None;
    for i in 0..n {
        let Some(v) = values[i] else {
            continue;
        };
        if let Some((x0, y0)) = before {
            if i > x0 + 1 {
                let x_range = (i - x0) as f64;
                let y_range = (v - y0) as f64;
                for (k, slot) in values.iter_mut().enumerate().take(i).skip(x0 + 1) {
                    let t = (k - x0) as f64 / x_range;
                    *slot = Some((y0 as f64 + t * y_range).round() as i32);
                }
            }
        }
        before = Some((i, v));
    }
}
