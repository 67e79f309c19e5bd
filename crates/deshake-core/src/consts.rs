/// Number of interleaved bytes per pixel in every frame (one per channel).
pub const BYTES_PER_PIXEL: usize = 3;

/// Expected width of the pure-black border on each side of a clean VHS capture.
pub const DEFAULT_PURE_BLACK_WIDTH: i32 = 8;

/// Highest 8-bit intensity still counted as pure black.
pub const DEFAULT_PURE_BLACK_THRESHOLD: u8 = 50;

/// Line starts outside a consistent run at least this many rows long are discarded.
pub const DEFAULT_MIN_LINE_START_SEGMENT_LENGTH: usize = 15;

/// Width of the box filter applied to the line starts along the row axis.
pub const DEFAULT_LINE_START_SMOOTHING_KERNEL_SIZE: usize = 51;

/// Gradient magnitude above which a column counts as the border crossing.
///
/// Measured on the Sobel scale of 8-bit intensities: a clean step of `d`
/// levels produces a response of `4 * d`.
pub const DEFAULT_EDGE_THRESHOLD: f32 = 30.0;

/// A row joins the current segment while its line start differs from the
/// segment's first value by less than this many columns.
pub const DEFAULT_SEGMENT_TOLERANCE: i32 = 2;

/// ITU-R BT.601 luminance coefficient for the red channel.
pub const LUMINANCE_R: f32 = 0.299;

/// ITU-R BT.601 luminance coefficient for the green channel.
pub const LUMINANCE_G: f32 = 0.587;

/// ITU-R BT.601 luminance coefficient for the blue channel.
pub const LUMINANCE_B: f32 = 0.114;

/// Progress is logged at debug level every this many frames.
pub const PROGRESS_LOG_INTERVAL: usize = 1000;

/// SER timestamps count 100 ns ticks.
pub const SER_TICKS_PER_SECOND: f64 = 10_000_000.0;
