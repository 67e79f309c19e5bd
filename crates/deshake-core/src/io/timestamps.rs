use crate::consts::SER_TICKS_PER_SECOND;

/// Estimate frames per second from SER timestamps (100 ns ticks).
///
/// Uses the median of the positive deltas between consecutive timestamps, so
/// a few dropped or duplicated frames do not skew the result.
pub fn estimate_frame_rate(timestamps: &[u64]) -> Option<f64> {
    let mut deltas: Vec<u64> = timestamps
        .windows(2)
        .filter_map(|w| w[1].checked_sub(w[0]))
        .filter(|&d| d > 0)
        .collect();
    if deltas.is_empty() {
        return None;
    }
    deltas.sort_unstable();
    let median = deltas[deltas.len() / 2];
    Some(SER_TICKS_PER_SECOND / median as f64)
}

/// Evenly spaced timestamps for `count` frames at `frame_rate`, starting at `start`.
pub fn synthesize_timestamps(start: u64, count: usize, frame_rate: f64) -> Vec<u64> {
    let period = SER_TICKS_PER_SECOND / frame_rate;
    (0..count)
        .map(|i| start + (i as f64 * period).round() as u64)
        .collect()
}
