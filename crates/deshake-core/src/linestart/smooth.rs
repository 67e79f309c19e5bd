/// Box-filter complete line starts along the row axis.
///
/// The window is `kernel_size` rows wide (odd) and centred on each row; rows
/// beyond the first and last are replicated. Each output is the window mean
/// rounded to the nearest column.
pub fn smooth_line_starts(values: &[i32], kernel_size: usize) -> Vec<i32> {
    debug_assert!(kernel_size % 2 == 1, "kernel size must be odd");
    let n = values.len();
    if n == 0 || kernel_size <= 1 {
        return values.to_vec();
    }

    let radius = (kernel_size / 2) as isize;
    let at = |i: isize| values[i.clamp(0, n as isize - 1) as usize] as i64;

    // Running window sum, starting with the window centred on row 0.
    let mut sum: i64 = (-radius..=radius).map(at).sum();
    let mut out = Vec::with_capacity(n);
    for row in 0..n as isize {
        out.push((sum as f64 / kernel_size as f64).round() as i32);
        sum += at(row + radius + 1) - at(row - radius);
    }
    out
}
