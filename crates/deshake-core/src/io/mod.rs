pub mod overlay;
pub mod raw;
pub mod ser;
pub mod ser_writer;
pub mod timestamps;

use crate::error::Result;
use crate::frame::Frame;

/// Destination for corrected frames.
pub trait FrameSink {
    fn write_frame(&mut self, frame: &Frame) -> Result<()>;

    /// Flush buffered data and write any trailer. Call once after the last frame.
    fn finish(&mut self) -> Result<()>;

    fn frames_written(&self) -> usize;
}
