use crate::consts::BYTES_PER_PIXEL;

/// Write `input` shifted horizontally by `shift` whole pixels into `output`.
///
/// A positive shift moves content right and zero-fills the first `shift`
/// pixels; a negative shift moves content left and zero-fills the last
/// `-shift` pixels. A shift at least as wide as the row zero-fills it entirely.
pub fn shift_row(input: &[u8], output: &mut [u8], shift: i32) {
    debug_assert_eq!(input.len(), output.len());
    debug_assert_eq!(input.len() % BYTES_PER_PIXEL, 0);

    let row_bytes = input.len();
    let shift_bytes = (shift.unsigned_abs() as usize)
        .saturating_mul(BYTES_PER_PIXEL)
        .min(row_bytes);
    let kept = row_bytes - shift_bytes;

    if shift > 0 {
        output[..shift_bytes].fill(0);
        output[shift_bytes..].copy_from_slice(&input[..kept]);
    } else if shift < 0 {
        output[..kept].copy_from_slice(&input[shift_bytes..]);
        output[kept..].fill(0);
    } else {
        output.copy_from_slice(input);
    }
}
